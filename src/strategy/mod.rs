//! Processing strategy module for script replay
//!
//! This module defines the Strategy pattern for complete replay pipelines,
//! covering both script parsing and workflow invocation. Different reading
//! implementations (synchronous, asynchronous batch) are selected at runtime
//! and share the same `Replay` driver, so their reports are identical.

use crate::cli::{ReportKind, StrategyType};
use crate::config::WorkflowConfig;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod replay;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use replay::Replay;
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete replay pipelines
///
/// Each strategy reads a transition script, replays it against a fresh
/// workflow and writes the requested report to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Replay the script at `input_path` and write the report to `output`
    ///
    /// # Errors
    ///
    /// Returns an error if the script cannot be opened or the report cannot
    /// be written. Rejected rows are logged and skipped, never returned.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `batch` configures the async strategy and is ignored for sync.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: WorkflowConfig,
    report: ReportKind,
    batch: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(config, report)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(
            config,
            report,
            batch.unwrap_or_default(),
        )),
    }
}
