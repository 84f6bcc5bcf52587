//! Trade Workflow Library
//! # Overview
//!
//! This library encodes a multi-party trade-finance protocol as authorized
//! state transitions over a key-value record set, and replays CSV transition
//! scripts through it with either a sync or an async strategy.
//!
//! # Architecture
//!
//! - [`types`] - Records, participants, commands, responses and errors
//! - [`config`] - Trade limits, payment terms and membership policy
//! - [`core`] - Workflow state machine:
//!   - [`core::engine`] - Atomic dispatch of each transition
//!   - [`core::identity`] - Role checks against caller membership
//!   - [`core::record_store`] - Keys, staged writes and the typed ledger
//!   - one manager per record type, plus [`core::settlement`] and [`core::query`]
//! - [`io`] - Script readers and report writers
//! - [`strategy`] - Sync and async replay pipelines
//! - [`cli`] - CLI arguments parsing
//!
//! # Trade Lifecycle
//!
//! 1. The importer requests a trade and the exporter accepts it
//! 2. The importer's bank issues a letter of credit, which the exporter's bank accepts
//! 3. The regulator issues an export license and the exporter prepares the shipment
//! 4. The carrier issues the bill of lading and moves the goods
//! 5. Payments settle half the amount on shipment and the rest on arrival,
//!    optionally via a lender that bought the L/C at a discount
//!
//! # Example
//!
//! ```
//! use trade_workflow::{Caller, Response, TradeWorkflow};
//!
//! let mut workflow = TradeWorkflow::default();
//! let importer = Caller::new("ImporterOrgMSP", "ca.importerorg.trade.com");
//! let args = ["T1", "50000", "Wood for Toys"].map(String::from);
//!
//! let response = workflow.invoke_function(&importer, "requestTrade", &args).unwrap();
//! assert_eq!(response, Response::Empty);
//! ```

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use config::{PaymentTerms, TradeLimits, WorkflowConfig};
pub use core::{IdentityGate, MembershipPolicy, MemoryStore, RecordStore, TradeWorkflow};
pub use io::{write_balances_csv, write_trades_csv};
pub use types::{
    BalanceHolder, Caller, Command, LcStatus, Response, Role, TradeId, WorkflowError,
};
