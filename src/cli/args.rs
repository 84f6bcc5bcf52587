use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay a trade-finance transition script and report the outcome
#[derive(Parser, Debug)]
#[command(name = "trade-workflow")]
#[command(about = "Replay a trade-finance transition script and report the outcome", long_about = None)]
pub struct CliArgs {
    /// Input CSV script with columns org, issuer, function, args
    #[arg(value_name = "INPUT", help = "Path to the transition script")]
    pub input_file: PathBuf,

    /// Optional YAML workflow configuration
    #[arg(
        long = "config",
        value_name = "FILE",
        help = "YAML file with trade limits, payment terms and membership"
    )]
    pub config: Option<PathBuf>,

    /// Reading strategy to use for the script
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Reading strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Report written to stdout after the replay
    #[arg(
        long = "report",
        value_name = "REPORT",
        default_value = "balances",
        help = "Report to write: 'balances' for bank balances or 'trades' for per-trade state"
    )]
    pub report: ReportKind,

    /// Number of script rows per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of script rows per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,
}

/// Available strategies for reading the script
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Available end-of-run reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Balances,
    Trades,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments, defaulting what is not given
    pub fn to_batch_config(&self) -> BatchConfig {
        match self.batch_size {
            Some(batch_size) => {
                BatchConfig::new(batch_size, BatchConfig::default().max_pending_batches)
            }
            None => BatchConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program", "script.csv"], StrategyType::Sync)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "script.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "script.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::default_report(&["program", "script.csv"], ReportKind::Balances)]
    #[case::trades(&["program", "--report", "trades", "script.csv"], ReportKind::Trades)]
    fn test_report_parsing(#[case] args: &[&str], #[case] expected: ReportKind) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.report, expected);
    }

    #[test]
    fn test_all_options() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--config",
            "workflow.yaml",
            "--strategy",
            "async",
            "--report",
            "trades",
            "--batch-size",
            "50",
            "script.csv",
        ])
        .unwrap();

        assert_eq!(parsed.config, Some(PathBuf::from("workflow.yaml")));
        assert_eq!(parsed.input_file, PathBuf::from("script.csv"));
        assert_eq!(parsed.batch_size, Some(50));
    }

    #[rstest]
    #[case::all_defaults(&["program", "script.csv"], 1000)]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "script.csv"], 2000)]
    #[case::zero_falls_back(&["program", "--batch-size", "0", "script.csv"], 1000)]
    fn test_batch_config_conversion(#[case] args: &[&str], #[case] expected_batch_size: usize) {
        let config = CliArgs::try_parse_from(args).unwrap().to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_pending_batches, BatchConfig::default().max_pending_batches);
    }

    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "script.csv"])]
    #[case::invalid_report(&["program", "--report", "accounts", "script.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
