//! I/O module
//!
//! Handles transition-script parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (script rows, report serialization)
//! - `sync_reader` - Synchronous script reader with iterator interface
//! - `async_reader` - Asynchronous script reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{
    convert_script_record, write_balances_csv, write_trades_csv, ScriptRecord, ScriptStep,
};
pub use sync_reader::SyncReader;
