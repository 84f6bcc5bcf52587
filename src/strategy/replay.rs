//! Script replay shared by every processing strategy
//!
//! `Replay` owns the workflow for one run. Strategies differ only in how
//! they read the script; each step they produce goes through `apply`, and
//! the report is written once the script is exhausted.

use crate::cli::ReportKind;
use crate::config::WorkflowConfig;
use crate::core::TradeWorkflow;
use crate::io::csv_format::{write_balances_csv, write_trades_csv, ScriptStep};
use crate::types::TradeId;
use std::collections::HashSet;
use std::io::Write;
use tracing::{debug, info, warn};

/// Replays script steps against a fresh in-memory workflow
pub struct Replay {
    workflow: TradeWorkflow,
    trades: Vec<TradeId>,
    seen: HashSet<TradeId>,
    applied: usize,
    rejected: usize,
}

impl Replay {
    pub fn new(config: WorkflowConfig) -> Self {
        Replay {
            workflow: TradeWorkflow::new(config),
            trades: Vec::new(),
            seen: HashSet::new(),
            applied: 0,
            rejected: 0,
        }
    }

    /// Apply one script step
    ///
    /// Unparseable rows and rejected transitions are logged and counted;
    /// they never stop the replay.
    pub fn apply(&mut self, step: Result<ScriptStep, String>) {
        let step = match step {
            Ok(step) => step,
            Err(e) => {
                warn!(error = %e, "script row skipped");
                self.rejected += 1;
                return;
            }
        };

        match step {
            ScriptStep::Init(args) => match self.workflow.init(&args) {
                Ok(()) => self.applied += 1,
                Err(e) => {
                    warn!(error = %e, "bootstrap rejected");
                    self.rejected += 1;
                }
            },
            ScriptStep::Invoke { caller, command } => {
                match self.workflow.invoke(&caller, &command) {
                    Ok(response) => {
                        self.applied += 1;
                        if let Ok(Some(payload)) = response.payload() {
                            debug!(function = command.name(), trade = command.trade_id(), %payload, "query answered");
                        }
                        if command.touches_trade() {
                            self.track(command.trade_id());
                        }
                    }
                    Err(e) => {
                        warn!(
                            function = command.name(),
                            trade = command.trade_id(),
                            caller = %caller,
                            error = %e,
                            "transition rejected"
                        );
                        self.rejected += 1;
                    }
                }
            }
        }
    }

    /// Remember a trade the first time a step on it succeeds
    fn track(&mut self, trade_id: &str) {
        if self.seen.insert(trade_id.to_string()) {
            self.trades.push(trade_id.to_string());
        }
    }

    /// Trade ids in the order they were first touched
    pub fn trades(&self) -> &[TradeId] {
        &self.trades
    }

    pub fn workflow(&self) -> &TradeWorkflow {
        &self.workflow
    }

    /// Write the chosen report and log the replay totals
    pub fn finish(self, report: ReportKind, output: &mut dyn Write) -> Result<(), String> {
        info!(
            applied = self.applied,
            rejected = self.rejected,
            trades = self.trades.len(),
            "script replayed"
        );

        match report {
            ReportKind::Balances => {
                let balances = self.workflow.balances().map_err(|e| e.to_string())?;
                write_balances_csv(&balances, output)
            }
            ReportKind::Trades => {
                let summaries = self
                    .trades
                    .iter()
                    .map(|trade_id| self.workflow.trade_summary(trade_id))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| e.to_string())?;
                write_trades_csv(&summaries, output)
            }
        }
    }
}
