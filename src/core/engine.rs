//! Trade workflow engine
//!
//! This module provides `TradeWorkflow`, which orchestrates every transition
//! by coordinating the record store, the identity gate and the managers.
//!
//! Each invocation runs against a `StagedStore` over the backing store:
//! - the command is dispatched to its owning manager
//! - on success the staged writes are applied in one pass
//! - on failure they are dropped, so no partial transition is ever visible

use crate::config::WorkflowConfig;
use crate::core::export_license::ExportLicenseManager;
use crate::core::identity::{Authority, MembershipPolicy};
use crate::core::letter_of_credit::LetterOfCreditManager;
use crate::core::query::{QueryLayer, TradeSummary};
use crate::core::record_store::{apply_writes, Ledger, MemoryStore, StagedStore};
use crate::core::settlement::SettlementEngine;
use crate::core::shipment::ShipmentManager;
use crate::core::trade_agreement::TradeAgreementManager;
use crate::core::traits::{IdentityGate, RecordStore};
use crate::types::{BalanceHolder, Caller, Command, Party, Response, WorkflowError};
use tracing::{debug, info};

/// Number of bootstrap arguments: eight identities and three balances
const BOOTSTRAP_ARGS: usize = 11;

/// Trade workflow over a record store and an identity gate
pub struct TradeWorkflow<S: RecordStore = MemoryStore, G: IdentityGate = MembershipPolicy> {
    store: S,
    gate: G,
    config: WorkflowConfig,
}

impl TradeWorkflow {
    /// Create a workflow over an empty in-memory store, gated by the
    /// configuration's membership table
    pub fn new(config: WorkflowConfig) -> Self {
        let gate = config.membership.clone();
        TradeWorkflow::with_parts(MemoryStore::new(), gate, config)
    }
}

impl Default for TradeWorkflow {
    fn default() -> Self {
        Self::new(WorkflowConfig::default())
    }
}

impl<S: RecordStore, G: IdentityGate> TradeWorkflow<S, G> {
    pub fn with_parts(store: S, gate: G, config: WorkflowConfig) -> Self {
        TradeWorkflow {
            store,
            gate,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Bootstrap participant identities and opening balances
    ///
    /// With no arguments the ledger is left as it is. Otherwise exactly
    /// eleven are expected, in this order: exporter, exporter's bank,
    /// exporter's balance, importer, importer's bank, importer's balance,
    /// lender, lender's bank, lender's balance, carrier, regulatory authority.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` on a wrong argument count or a balance that is not
    /// an integer; nothing is written in that case.
    pub fn init(&mut self, args: &[String]) -> Result<(), WorkflowError> {
        if args.is_empty() {
            debug!("bootstrap without arguments, ledger left untouched");
            return Ok(());
        }
        if args.len() != BOOTSTRAP_ARGS {
            return Err(WorkflowError::argument_count(
                "init",
                "11: {Exporter, Exporter's Bank, Exporter's Account Balance, \
                 Importer, Importer's Bank, Importer's Account Balance, \
                 Lender, Lender's Bank, Lender's Account Balance, \
                 Carrier, Regulatory Authority}",
                args.len(),
            ));
        }

        let balances = [
            (BalanceHolder::Exporter, &args[2]),
            (BalanceHolder::Importer, &args[5]),
            (BalanceHolder::Lender, &args[8]),
        ]
        .into_iter()
        .map(|(holder, raw)| {
            raw.trim()
                .parse::<i64>()
                .map(|balance| (holder, balance))
                .map_err(|_| {
                    WorkflowError::invalid_argument(format!(
                        "{} account balance must be an integer. Found {}",
                        holder, raw
                    ))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

        let identities = [
            (Party::Exporter, &args[0]),
            (Party::ExporterBank, &args[1]),
            (Party::Importer, &args[3]),
            (Party::ImporterBank, &args[4]),
            (Party::Lender, &args[6]),
            (Party::LenderBank, &args[7]),
            (Party::Carrier, &args[9]),
            (Party::Regulator, &args[10]),
        ];

        let mut staged = StagedStore::new(&self.store);
        {
            let mut ledger = Ledger::new(&mut staged);
            for (party, identity) in identities {
                ledger.put_identity(party, identity)?;
            }
            for (holder, balance) in balances {
                ledger.put_balance(holder, balance)?;
            }
        }
        let writes = staged.into_writes();
        apply_writes(&mut self.store, writes)?;

        info!(exporter = %args[0], importer = %args[3], lender = %args[6], "workflow bootstrapped");
        Ok(())
    }

    /// Parse `function` with its arguments and invoke it as `caller`
    ///
    /// Arguments are checked before the caller's role.
    pub fn invoke_function(
        &mut self,
        caller: &Caller,
        function: &str,
        args: &[String],
    ) -> Result<Response, WorkflowError> {
        let command = Command::parse(function, args)?;
        self.invoke(caller, &command)
    }

    /// Run one transition or query as `caller`
    ///
    /// The transition's writes reach the store only if it succeeds.
    ///
    /// # Errors
    ///
    /// Whatever the owning manager reports; see `WorkflowError`.
    pub fn invoke(&mut self, caller: &Caller, command: &Command) -> Result<Response, WorkflowError> {
        let mut staged = StagedStore::new(&self.store);
        let response = {
            let mut ledger = Ledger::new(&mut staged);
            let auth = Authority::new(&self.gate, caller);
            dispatch(&self.config, &mut ledger, &auth, command)?
        };

        let writes = staged.into_writes();
        debug!(
            function = command.name(),
            trade = command.trade_id(),
            writes = writes.len(),
            "transition committed"
        );
        apply_writes(&mut self.store, writes)?;
        Ok(response)
    }

    /// Operator view of one trade, bypassing the identity gate
    pub fn trade_summary(&self, trade_id: &str) -> Result<TradeSummary, WorkflowError> {
        let mut view = StagedStore::new(&self.store);
        let ledger = Ledger::new(&mut view);
        QueryLayer.summary(&ledger, trade_id)
    }

    /// Operator view of the bank balances, bypassing the identity gate
    pub fn balances(&self) -> Result<Vec<(BalanceHolder, Option<i64>)>, WorkflowError> {
        let mut view = StagedStore::new(&self.store);
        let ledger = Ledger::new(&mut view);
        QueryLayer.balances(&ledger)
    }
}

/// Route a command to the manager that owns it
fn dispatch(
    config: &WorkflowConfig,
    ledger: &mut Ledger<'_>,
    auth: &Authority<'_>,
    command: &Command,
) -> Result<Response, WorkflowError> {
    let trades = TradeAgreementManager::new(&config.trade_limits);
    let settlement = SettlementEngine::new(&config.payment_terms);

    match command {
        Command::RequestTrade {
            trade_id,
            amount,
            description,
        } => trades.request_trade(ledger, auth, trade_id, *amount, description)?,
        Command::AcceptTrade { trade_id } => trades.accept_trade(ledger, auth, trade_id)?,
        Command::RequestLc { trade_id } => LetterOfCreditManager.request_lc(ledger, auth, trade_id)?,
        Command::IssueLc {
            trade_id,
            lc_id,
            expiration_date,
            documents,
        } => LetterOfCreditManager.issue_lc(
            ledger,
            auth,
            trade_id,
            lc_id,
            expiration_date,
            documents,
        )?,
        Command::AcceptLc { trade_id } => LetterOfCreditManager.accept_lc(ledger, auth, trade_id)?,
        Command::RequestLcTransfer {
            trade_id,
            discount_rate,
        } => LetterOfCreditManager.request_lc_transfer(ledger, auth, trade_id, *discount_rate)?,
        Command::IssueLcTransfer { trade_id } => {
            LetterOfCreditManager.issue_lc_transfer(ledger, auth, trade_id)?
        }
        Command::AcceptLcTransfer { trade_id } => {
            LetterOfCreditManager.accept_lc_transfer(ledger, auth, trade_id)?
        }
        Command::RequestEl { trade_id } => ExportLicenseManager.request_el(ledger, auth, trade_id)?,
        Command::IssueEl {
            trade_id,
            el_id,
            expiration_date,
        } => ExportLicenseManager.issue_el(ledger, auth, trade_id, el_id, expiration_date)?,
        Command::PrepareShipment { trade_id } => {
            ShipmentManager.prepare_shipment(ledger, auth, trade_id)?
        }
        Command::AcceptShipmentAndIssueBl {
            trade_id,
            bl_id,
            expiration_date,
            source_port,
            destination_port,
        } => ShipmentManager.accept_shipment_and_issue_bl(
            ledger,
            auth,
            trade_id,
            bl_id,
            expiration_date,
            source_port,
            destination_port,
        )?,
        Command::UpdateShipmentLocation {
            trade_id,
            location,
            date,
        } => ShipmentManager.update_shipment_location(ledger, auth, trade_id, location, date)?,
        Command::RequestAdvancePayment { trade_id } => {
            settlement.request_advance_payment(ledger, auth, trade_id)?
        }
        Command::MakeAdvancePayment { trade_id } => {
            settlement.make_advance_payment(ledger, auth, trade_id)?
        }
        Command::RequestPayment { trade_id } => settlement.request_payment(ledger, auth, trade_id)?,
        Command::MakePayment {
            trade_id,
            payment_date,
        } => settlement.make_payment(ledger, auth, trade_id, payment_date)?,
        Command::GetTradeStatus { trade_id } => {
            return QueryLayer.trade_status(ledger, auth, trade_id)
        }
        Command::GetLcStatus { trade_id } => return QueryLayer.lc_status(ledger, auth, trade_id),
        Command::GetElStatus { trade_id } => return QueryLayer.el_status(ledger, auth, trade_id),
        Command::GetShipmentLocation { trade_id } => {
            return QueryLayer.shipment_location(ledger, auth, trade_id)
        }
        Command::GetArrivalDate { trade_id } => {
            return QueryLayer.arrival_date(ledger, auth, trade_id)
        }
        Command::GetBillOfLading { trade_id } => {
            return QueryLayer.bill_of_lading(ledger, auth, trade_id)
        }
        Command::GetAccountBalance { entity, .. } => {
            return QueryLayer.account_balance(ledger, auth, *entity)
        }
    }

    Ok(Response::Empty)
}
