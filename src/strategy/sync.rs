//! Synchronous processing strategy
//!
//! Streams the script one row at a time through `SyncReader` and hands each
//! step to `Replay`. Memory use is bounded by the workflow state, never by
//! the script length.

use crate::cli::ReportKind;
use crate::config::WorkflowConfig;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{ProcessingStrategy, Replay};
use std::io::Write;
use std::path::Path;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use trade_workflow::cli::ReportKind;
/// use trade_workflow::config::WorkflowConfig;
/// use trade_workflow::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
///
/// let strategy = SyncProcessingStrategy::new(WorkflowConfig::default(), ReportKind::Balances);
/// let mut output = std::io::stdout();
///
/// strategy.process(Path::new("script.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    config: WorkflowConfig,
    report: ReportKind,
}

impl SyncProcessingStrategy {
    /// Create a SyncProcessingStrategy
    ///
    /// # Arguments
    ///
    /// * `config` - Workflow configuration for the replayed ledger
    /// * `report` - Report written once the script is exhausted
    pub fn new(config: WorkflowConfig, report: ReportKind) -> Self {
        Self { config, report }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let reader = SyncReader::new(input_path)?;
        let mut replay = Replay::new(self.config.clone());

        for step in reader {
            replay.apply(step);
        }

        replay.finish(self.report, output)
    }
}
