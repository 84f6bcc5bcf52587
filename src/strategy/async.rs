//! Asynchronous batch processing strategy
//!
//! # Architecture
//!
//! ```text
//! reader task                          replay task
//! AsyncReader::read_batch ──mpsc──▶ Replay::apply (in script order)
//!        (csv-async)       bounded         │
//!                                          ▼
//!                                    report writer
//! ```
//!
//! Reading and replay overlap: the reader runs on its own tokio task and
//! stays at most `max_pending_batches` ahead. Steps are applied by a single
//! consumer, because every transition depends on the records left by the
//! ones before it.

use crate::cli::ReportKind;
use crate::config::WorkflowConfig;
use crate::io::async_reader::AsyncReader;
use crate::strategy::{ProcessingStrategy, Replay};
use std::io::Write;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Configuration for batch reading
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of script rows per batch
    pub batch_size: usize,
    /// Maximum number of batches read ahead of the replay
    pub max_pending_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_pending_batches: 4,
        }
    }
}

impl BatchConfig {
    /// Create a BatchConfig, replacing zero values with the defaults
    pub fn new(batch_size: usize, max_pending_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                fallback = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_pending_batches = if max_pending_batches == 0 {
            warn!(
                max_pending_batches,
                fallback = default.max_pending_batches,
                "invalid pending batch limit, using default"
            );
            default.max_pending_batches
        } else {
            max_pending_batches
        };

        Self {
            batch_size,
            max_pending_batches,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// Implements `ProcessingStrategy` with a reader task and a replay task on a
/// two-thread tokio runtime. Batches are applied strictly in script order,
/// so the report matches the synchronous strategy for the same script.
///
/// # Configuration
///
/// The strategy accepts a `BatchConfig` with:
/// - `batch_size`: script rows per batch (default: 1000)
/// - `max_pending_batches`: batches read ahead of the replay (default: 4)
///
/// # Examples
///
/// ```no_run
/// use trade_workflow::cli::ReportKind;
/// use trade_workflow::config::WorkflowConfig;
/// use trade_workflow::strategy::{AsyncProcessingStrategy, BatchConfig, ProcessingStrategy};
/// use std::path::Path;
///
/// let strategy = AsyncProcessingStrategy::new(
///     WorkflowConfig::default(),
///     ReportKind::Trades,
///     BatchConfig::new(500, 2),
/// );
/// let mut output = std::io::stdout();
///
/// strategy.process(Path::new("script.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: WorkflowConfig,
    report: ReportKind,
    batch: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create an AsyncProcessingStrategy
    ///
    /// # Arguments
    ///
    /// * `config` - Workflow configuration for the replayed ledger
    /// * `report` - Report written once the script is exhausted
    /// * `batch` - Batch size and read-ahead limit
    pub fn new(config: WorkflowConfig, report: ReportKind, batch: BatchConfig) -> Self {
        Self {
            config,
            report,
            batch,
        }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Replay the script at `input_path` and write the report to `output`
    ///
    /// # Errors
    ///
    /// Returns `Err(String)` if the runtime cannot start, the file cannot be
    /// opened, the reader task panics, or the report cannot be written.
    /// Rejected rows are logged and do not fail the run.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // Wrap tokio file in a compatibility layer for csv-async
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let (sender, mut receiver) = mpsc::channel(self.batch.max_pending_batches.max(1));
            let batch_size = self.batch.batch_size.max(1);

            let producer = tokio::spawn(async move {
                let mut batches = 0usize;
                loop {
                    let batch = reader.read_batch(batch_size).await;
                    if batch.is_empty() {
                        break;
                    }
                    batches += 1;
                    if sender.send(batch).await.is_err() {
                        break;
                    }
                }
                batches
            });

            let mut replay = Replay::new(self.config.clone());
            while let Some(batch) = receiver.recv().await {
                for step in batch {
                    replay.apply(step);
                }
            }

            let batches = producer
                .await
                .map_err(|e| format!("Script reader task failed: {}", e))?;
            debug!(batches, batch_size, "script read");

            replay.finish(self.report, output)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::SyncProcessingStrategy;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    const SCRIPT: &str = "org,issuer,function,args\n\
        ,,init,LumberInc|LumberBank|100000|WoodenToys|ToyBank|200000|EasyLoans|EasyBank|300000|UniversalFreight|ForestryDepartment\n\
        ImporterOrgMSP,ca.importerorg.trade.com,requestTrade,T1|50000|Wood for Toys\n\
        ExporterOrgMSP,ca.exporterorg.trade.com,acceptTrade,T1\n\
        ImporterOrgMSP,ca.importerorg.trade.com,requestTrade,T2|100|Nails\n\
        ImporterOrgMSP,ca.importerorg.trade.com,requestLC,T1\n\
        ImporterOrgMSP,ca.importerorg.trade.com,requestLC,T2\n";

    #[rstest]
    #[case(0, 0, BatchConfig::default())]
    #[case(10, 0, BatchConfig { batch_size: 10, max_pending_batches: 4 })]
    #[case(0, 2, BatchConfig { batch_size: 1000, max_pending_batches: 2 })]
    fn test_batch_config_zero_values_fallback(
        #[case] batch_size: usize,
        #[case] pending: usize,
        #[case] expected: BatchConfig,
    ) {
        assert_eq!(BatchConfig::new(batch_size, pending), expected);
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let strategy = AsyncProcessingStrategy::new(
            WorkflowConfig::default(),
            ReportKind::Balances,
            BatchConfig::default(),
        );
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.csv"), &mut output);
        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(1000)]
    fn test_async_strategy_matches_sync_across_batch_sizes(#[case] batch_size: usize) {
        let file = create_temp_csv(SCRIPT);

        let mut expected = Vec::new();
        SyncProcessingStrategy::new(WorkflowConfig::default(), ReportKind::Trades)
            .process(file.path(), &mut expected)
            .unwrap();

        let mut actual = Vec::new();
        AsyncProcessingStrategy::new(
            WorkflowConfig::default(),
            ReportKind::Trades,
            BatchConfig::new(batch_size, 1),
        )
        .process(file.path(), &mut actual)
        .unwrap();

        assert_eq!(String::from_utf8(actual).unwrap(), String::from_utf8(expected).unwrap());
    }
}
