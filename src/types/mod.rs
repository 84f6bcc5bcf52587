//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `trade`: Trade agreement record
//! - `letter_of_credit`: Letter of credit record and status lattice
//! - `export_license`: Export license record
//! - `shipment`: Shipment location and bill of lading
//! - `participant`: Roles, parties, balances, callers and pending requests
//! - `command`: Typed transition surface
//! - `response`: Success payloads
//! - `error`: Error types for the workflow

pub mod command;
pub mod error;
pub mod export_license;
pub mod letter_of_credit;
pub mod participant;
pub mod response;
pub mod shipment;
pub mod trade;

pub use command::Command;
pub use error::WorkflowError;
pub use export_license::{ElStatus, ExportLicense};
pub use letter_of_credit::{LcStatus, LetterOfCredit};
pub use participant::{BalanceHolder, Caller, Party, PendingRequest, RequestKind, Role};
pub use response::Response;
pub use shipment::{BillOfLading, ShipmentLocation};
pub use trade::{TradeAgreement, TradeId, TradeStatus};
