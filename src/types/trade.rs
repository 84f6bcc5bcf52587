//! Trade agreement record

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade identifier
///
/// Caller-supplied and unique per trade by convention.
pub type TradeId = String;

/// Status of a trade agreement
///
/// Variants are declared in lattice order so that `Ord` reflects progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    /// Importer has proposed the trade
    Requested,
    /// Exporter has agreed to the trade
    Accepted,
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Requested => "REQUESTED",
            Self::Accepted => "ACCEPTED",
        };
        f.write_str(s)
    }
}

/// Trade agreement between importer and exporter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeAgreement {
    /// Agreed trade amount (strictly positive)
    pub amount: i64,

    /// Free-form description of the goods
    pub description_of_goods: String,

    /// Current status; never regresses
    pub status: TradeStatus,

    /// Principal paid so far, in `0..=amount`
    pub paid_to_date: i64,
}

impl TradeAgreement {
    /// Create a freshly requested trade with nothing paid
    pub fn new(amount: i64, description_of_goods: impl Into<String>) -> Self {
        TradeAgreement {
            amount,
            description_of_goods: description_of_goods.into(),
            status: TradeStatus::Requested,
            paid_to_date: 0,
        }
    }

    /// Principal still owed
    pub fn remaining(&self) -> i64 {
        self.amount - self.paid_to_date
    }

    /// Whether the full amount has been paid
    pub fn is_settled(&self) -> bool {
        self.paid_to_date >= self.amount
    }
}
