//! Benchmark suite for the trade lifecycle
//!
//! Measures a complete trade, from request to final payment, both directly
//! against the workflow and through the two replay strategies.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use trade_workflow::cli::{ReportKind, StrategyType};
use trade_workflow::config::WorkflowConfig;
use trade_workflow::strategy::{create_strategy, BatchConfig};
use trade_workflow::{Caller, TradeWorkflow};
use std::path::Path;

fn main() {
    divan::main();
}

const IMPORTER: (&str, &str) = ("ImporterOrgMSP", "ca.importerorg.trade.com");
const EXPORTER: (&str, &str) = ("ExporterOrgMSP", "ca.exporterorg.trade.com");
const LENDER: (&str, &str) = ("LenderOrgMSP", "ca.lenderorg.trade.com");
const CARRIER: (&str, &str) = ("CarrierOrgMSP", "ca.carrierorg.trade.com");
const REGULATOR: (&str, &str) = ("RegulatorOrgMSP", "ca.regulatororg.trade.com");

const LIFECYCLE: [((&str, &str), &str, &[&str]); 19] = [
    (IMPORTER, "requestTrade", &["50000", "Wood for Toys"]),
    (EXPORTER, "acceptTrade", &[]),
    (IMPORTER, "requestLC", &[]),
    (IMPORTER, "issueLC", &["lc8349", "12/31/2018", "E/L", "B/L"]),
    (EXPORTER, "acceptLC", &[]),
    (EXPORTER, "requestEL", &[]),
    (REGULATOR, "issueEL", &["el979", "4/30/2019"]),
    (EXPORTER, "prepareShipment", &[]),
    (CARRIER, "acceptShipmentAndIssueBL", &["bl06678", "8/31/2018", "Woodlands Port", "Market Port"]),
    (EXPORTER, "requestPayment", &[]),
    (IMPORTER, "makePayment", &["01/01/2019"]),
    (EXPORTER, "requestLCTransfer", &["0.1"]),
    (EXPORTER, "issueLCTransfer", &[]),
    (LENDER, "acceptLCTransfer", &[]),
    (EXPORTER, "requestAdvancePayment", &[]),
    (LENDER, "makeAdvancePayment", &[]),
    (CARRIER, "updateShipmentLocation", &["DESTINATION", "02/01/2019"]),
    (LENDER, "requestPayment", &[]),
    (IMPORTER, "makePayment", &["03/01/2019"]),
];

fn bootstrap_args() -> Vec<String> {
    [
        "LumberInc",
        "LumberBank",
        "100000",
        "WoodenToys",
        "ToyBank",
        "200000",
        "EasyLoans",
        "EasyBank",
        "300000",
        "UniversalFreight",
        "ForestryDepartment",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Run `trades` complete lifecycles on one workflow
#[divan::bench(args = [1, 10, 100])]
fn full_lifecycle(trades: usize) {
    let mut workflow = TradeWorkflow::default();
    workflow.init(&bootstrap_args()).expect("Bootstrap failed");

    for trade in 0..trades {
        let trade_id = format!("T{}", trade);
        for ((org, issuer), function, extra) in LIFECYCLE {
            let mut args = vec![trade_id.clone()];
            args.extend(extra.iter().map(|s| s.to_string()));
            workflow
                .invoke_function(&Caller::new(org, issuer), function, &args)
                .expect("Lifecycle step failed");
        }
    }

    divan::black_box(workflow.balances().expect("Balances failed"));
}

/// Replay the lifecycle fixture with the synchronous strategy
#[divan::bench]
fn sync_strategy_replay() {
    let strategy = create_strategy(
        StrategyType::Sync,
        WorkflowConfig::default(),
        ReportKind::Balances,
        None,
    );
    let mut output = Vec::new();

    strategy
        .process(Path::new("tests/fixtures/happy_path_transfer/input.csv"), &mut output)
        .expect("Processing failed");
}

/// Replay the lifecycle fixture with the asynchronous strategy
#[divan::bench]
fn async_strategy_replay() {
    let strategy = create_strategy(
        StrategyType::Async,
        WorkflowConfig::default(),
        ReportKind::Balances,
        Some(BatchConfig::default()),
    );
    let mut output = Vec::new();

    strategy
        .process(Path::new("tests/fixtures/happy_path_transfer/input.csv"), &mut output)
        .expect("Processing failed");
}
