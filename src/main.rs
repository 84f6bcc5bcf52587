//! Trade Workflow CLI
//!
//! Replays a transition script and writes a CSV report to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- script.csv > balances.csv
//! cargo run -- --report trades script.csv > trades.csv
//! cargo run -- --strategy async --batch-size 500 script.csv > balances.csv
//! RUST_LOG=debug cargo run -- --config workflow.yaml script.csv
//! ```
//!
//! Logs go to stderr, so stdout holds only the report.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unreadable configuration, missing script, report write failure)

use std::process;
use trade_workflow::cli;
use trade_workflow::config::WorkflowConfig;
use trade_workflow::strategy;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let config = match &args.config {
        Some(path) => match WorkflowConfig::from_yaml_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => WorkflowConfig::default(),
    };

    let batch = matches!(args.strategy, cli::StrategyType::Async).then(|| args.to_batch_config());
    let strategy = strategy::create_strategy(args.strategy, config, args.report, batch);

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
