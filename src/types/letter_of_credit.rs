//! Letter of credit record and its status lattice

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a letter of credit
///
/// Strictly ordered; every transition either moves forward along this list
/// or is a no-op. Variant order is the lattice order used by `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LcStatus {
    Requested,
    Issued,
    Accepted,
    TransferRequested,
    TransferIssued,
    TransferAccepted,
}

impl LcStatus {
    /// Whether the importer's bank may pay against the L/C in this state
    pub fn permits_payment(&self) -> bool {
        matches!(self, Self::Accepted | Self::TransferAccepted)
    }

    /// Whether a transfer to the lender has been started
    pub fn is_transfer(&self) -> bool {
        matches!(
            self,
            Self::TransferRequested | Self::TransferIssued | Self::TransferAccepted
        )
    }
}

impl fmt::Display for LcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Requested => "REQUESTED",
            Self::Issued => "ISSUED",
            Self::Accepted => "ACCEPTED",
            Self::TransferRequested => "TRANSFER_REQUESTED",
            Self::TransferIssued => "TRANSFER_ISSUED",
            Self::TransferAccepted => "TRANSFER_ACCEPTED",
        };
        f.write_str(s)
    }
}

/// Letter of credit issued against a trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterOfCredit {
    /// Bank-assigned L/C identifier (empty until issued)
    pub id: String,

    /// Expiration date as supplied by the issuing bank
    pub expiration_date: String,

    /// Identity currently entitled to draw on the L/C
    pub beneficiary: String,

    /// Remaining credit; only ever decreases
    pub amount: i64,

    /// Documents required for payment, in issuance order
    pub documents: Vec<String>,

    /// Current lattice position
    pub status: LcStatus,

    /// Discount applied to the advance payment, in `0..=1`
    pub discount_rate: Decimal,

    /// Whether the lender's advance payment has been made
    pub advance_payment_settled: bool,
}

impl LetterOfCredit {
    /// Create a requested L/C for the given beneficiary and credit
    pub fn requested(beneficiary: impl Into<String>, amount: i64) -> Self {
        LetterOfCredit {
            id: String::new(),
            expiration_date: String::new(),
            beneficiary: beneficiary.into(),
            amount,
            documents: Vec::new(),
            status: LcStatus::Requested,
            discount_rate: Decimal::ZERO,
            advance_payment_settled: false,
        }
    }
}
