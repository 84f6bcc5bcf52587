//! Export license record

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an export license
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElStatus {
    Requested,
    Issued,
}

impl fmt::Display for ElStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Requested => "REQUESTED",
            Self::Issued => "ISSUED",
        };
        f.write_str(s)
    }
}

/// Regulatory authorization to ship the goods of a trade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportLicense {
    pub id: String,
    pub expiration_date: String,
    pub exporter: String,
    pub carrier: String,
    pub description_of_goods: String,
    pub approver: String,
    pub status: ElStatus,
}
