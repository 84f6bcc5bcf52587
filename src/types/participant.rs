//! Participant types: roles, bootstrapped parties, balances and callers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::WorkflowError;

/// Role a caller may hold, as asserted by the identity gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Importer,
    Exporter,
    ImporterBank,
    ExporterBank,
    Lender,
    LenderBank,
    Carrier,
    Regulator,
    ExportingEntity,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Importer,
        Role::Exporter,
        Role::ImporterBank,
        Role::ExporterBank,
        Role::Lender,
        Role::LenderBank,
        Role::Carrier,
        Role::Regulator,
        Role::ExportingEntity,
    ];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Importer => "Importer",
            Self::Exporter => "Exporter",
            Self::ImporterBank => "Importer's Bank",
            Self::ExporterBank => "Exporter's Bank",
            Self::Lender => "Lender",
            Self::LenderBank => "Lender's Bank",
            Self::Carrier => "Carrier",
            Self::Regulator => "Regulatory Authority",
            Self::ExportingEntity => "Exporting Entity",
        };
        f.write_str(s)
    }
}

/// Party whose identity is recorded once at bootstrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Party {
    Exporter,
    ExporterBank,
    Importer,
    ImporterBank,
    Lender,
    LenderBank,
    Carrier,
    Regulator,
}

/// Holder of one of the three account balances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BalanceHolder {
    /// Exporter's bank account
    Exporter,
    /// Importer's bank account
    Importer,
    /// Lender's bank account
    Lender,
}

impl BalanceHolder {
    pub const ALL: [BalanceHolder; 3] = [
        BalanceHolder::Exporter,
        BalanceHolder::Importer,
        BalanceHolder::Lender,
    ];
}

impl fmt::Display for BalanceHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Exporter => "exporter",
            Self::Importer => "importer",
            Self::Lender => "lender",
        };
        f.write_str(s)
    }
}

impl FromStr for BalanceHolder {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exporter" => Ok(BalanceHolder::Exporter),
            "importer" => Ok(BalanceHolder::Importer),
            "lender" => Ok(BalanceHolder::Lender),
            _ => Err(WorkflowError::invalid_argument(format!(
                "Invalid entity {}; Permissible values: {{exporter, importer, lender}}",
                s
            ))),
        }
    }
}

/// Identity of the submitter of a transition
///
/// `org` is the caller's organisational unit (MSP id) and `cert_issuer` the
/// common name of the CA that issued its certificate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Caller {
    pub org: String,
    pub cert_issuer: String,
}

impl Caller {
    pub fn new(org: impl Into<String>, cert_issuer: impl Into<String>) -> Self {
        Caller {
            org: org.into(),
            cert_issuer: cert_issuer.into(),
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}', '{}'", self.org, self.cert_issuer)
    }
}

/// Kind of settlement a pending request is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Payment,
    AdvancePayment,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payment => f.write_str("payment"),
            Self::AdvancePayment => f.write_str("advance payment"),
        }
    }
}

/// A settlement request awaiting the paying bank
///
/// At most one exists per trade and kind. It is opened by the request
/// transition and removed by the matching settlement transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequest {
    pub kind: RequestKind,
    pub requested_by: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("exporter", BalanceHolder::Exporter)]
    #[case("Importer", BalanceHolder::Importer)]
    #[case("LENDER", BalanceHolder::Lender)]
    fn test_balance_holder_parse_is_case_insensitive(
        #[case] raw: &str,
        #[case] expected: BalanceHolder,
    ) {
        assert_eq!(raw.parse::<BalanceHolder>().unwrap(), expected);
    }

    #[test]
    fn test_balance_holder_rejects_unknown_entity() {
        let err = "carrier".parse::<BalanceHolder>().unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidArgument { .. }));
    }

    #[test]
    fn test_role_keys_in_yaml_are_snake_case() {
        let yaml = serde_yaml::to_string(&Role::ImporterBank).unwrap();
        assert_eq!(yaml.trim(), "importer_bank");
    }
}
