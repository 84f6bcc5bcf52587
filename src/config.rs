//! Workflow configuration
//!
//! All policy that the managers used to look up implicitly is collected in
//! one `WorkflowConfig` value and passed in explicitly:
//! - `trade_limits`: the per-caller trade amount ceiling
//! - `payment_terms`: grace window, surcharge rate and date format
//! - `membership`: which organisation holds which role
//!
//! Every field has a default, so an empty YAML document is a valid
//! configuration.
//!
//! ```yaml
//! trade_limits:
//!   default_limit: 1000000
//!   by_org:
//!     ImporterOrgMSP: 250000
//! payment_terms:
//!   grace_period_hours: 1440
//!   half_period_hours: 720
//!   surcharge_rate: 0.05
//!   date_format: "%m/%d/%Y"
//! ```

use crate::core::identity::MembershipPolicy;
use crate::types::WorkflowError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Trade amount ceiling per caller organisation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TradeLimits {
    /// Limit for organisations without an override
    pub default_limit: i64,
    /// Per-organisation overrides
    pub by_org: BTreeMap<String, i64>,
}

impl TradeLimits {
    /// Limit that applies to callers from `org`
    pub fn limit_for(&self, org: &str) -> i64 {
        self.by_org.get(org).copied().unwrap_or(self.default_limit)
    }
}

impl Default for TradeLimits {
    fn default() -> Self {
        TradeLimits {
            default_limit: 1_000_000,
            by_org: BTreeMap::new(),
        }
    }
}

/// Terms of the final installment
///
/// Payment is due within `grace_period_hours` of arrival. Past that, the
/// remaining balance grows by `surcharge_rate` for every
/// `half_period_hours` of delay, pro rata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaymentTerms {
    pub grace_period_hours: i64,
    pub half_period_hours: i64,
    pub surcharge_rate: Decimal,
    /// chrono format string for arrival and payment dates
    pub date_format: String,
}

impl PaymentTerms {
    /// Parse a calendar date in the configured format
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `raw` does not match `date_format`
    pub fn parse_date(&self, raw: &str) -> Result<NaiveDate, WorkflowError> {
        NaiveDate::parse_from_str(raw.trim(), &self.date_format).map_err(|e| {
            WorkflowError::invalid_argument(format!(
                "date '{}' does not match format '{}': {}",
                raw, self.date_format, e
            ))
        })
    }
}

impl Default for PaymentTerms {
    fn default() -> Self {
        PaymentTerms {
            grace_period_hours: 1440,
            half_period_hours: 720,
            surcharge_rate: Decimal::new(5, 2),
            date_format: "%m/%d/%Y".to_string(),
        }
    }
}

/// Complete workflow configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowConfig {
    pub trade_limits: TradeLimits,
    pub payment_terms: PaymentTerms,
    pub membership: MembershipPolicy,
}

impl WorkflowConfig {
    /// Parse and validate a configuration from YAML text
    ///
    /// # Errors
    ///
    /// `Config` if the document is malformed or fails validation
    pub fn from_yaml_str(yaml: &str) -> Result<Self, WorkflowError> {
        let config: WorkflowConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    ///
    /// # Errors
    ///
    /// `Config` if the file cannot be read, is malformed, or fails validation
    pub fn from_yaml_file(path: &Path) -> Result<Self, WorkflowError> {
        let yaml = std::fs::read_to_string(path).map_err(|e| WorkflowError::Config {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Reject values the settlement arithmetic cannot work with
    pub fn validate(&self) -> Result<(), WorkflowError> {
        let terms = &self.payment_terms;
        let problem = if terms.half_period_hours <= 0 {
            Some("payment_terms.half_period_hours must be positive")
        } else if terms.grace_period_hours < 0 {
            Some("payment_terms.grace_period_hours must not be negative")
        } else if terms.surcharge_rate.is_sign_negative() {
            Some("payment_terms.surcharge_rate must not be negative")
        } else if self.trade_limits.default_limit < 0 {
            Some("trade_limits.default_limit must not be negative")
        } else {
            None
        };

        match problem {
            Some(message) => Err(WorkflowError::Config {
                message: message.to_string(),
            }),
            None => Ok(()),
        }
    }
}
