//! Core business logic module
//!
//! This module contains the workflow state machine:
//! - `traits` - The record store and identity gate seams
//! - `record_store` - Key derivation, in-memory and staged stores, typed ledger
//! - `identity` - Membership policy and per-transition role checks
//! - `trade_agreement`, `letter_of_credit`, `export_license`, `shipment` -
//!   One manager per record type
//! - `settlement` - Payment requests, balance transfers and the late surcharge
//! - `query` - Read-only projections
//! - `engine` - Atomic dispatch of each transition

pub mod engine;
pub mod export_license;
pub mod identity;
pub mod letter_of_credit;
pub mod query;
pub mod record_store;
pub mod settlement;
pub mod shipment;
pub mod trade_agreement;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::TradeWorkflow;
pub use identity::{Authority, Membership, MembershipPolicy};
pub use query::{QueryLayer, TradeSummary};
pub use record_store::{Ledger, MemoryStore, RecordKey, StagedStore};
pub use traits::{IdentityGate, RecordStore};
