//! Read-only projections
//!
//! Each query checks the caller against its own role list before reading.
//! Queries never write, so the engine discards their (empty) write set.
//!
//! `TradeSummary` and `balances` are operator views for reporting; they sit
//! outside the identity gate.

use crate::core::identity::Authority;
use crate::core::record_store::Ledger;
use crate::types::{
    BalanceHolder, ElStatus, LcStatus, Response, Role, ShipmentLocation, TradeStatus,
    WorkflowError,
};

/// Snapshot of every record of one trade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeSummary {
    pub trade_id: String,
    pub trade_status: Option<TradeStatus>,
    pub paid_to_date: Option<i64>,
    pub lc_status: Option<LcStatus>,
    pub lc_amount: Option<i64>,
    pub lc_beneficiary: Option<String>,
    pub el_status: Option<ElStatus>,
    pub location: Option<ShipmentLocation>,
}

pub struct QueryLayer;

impl QueryLayer {
    pub fn trade_status(
        &self,
        ledger: &Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
    ) -> Result<Response, WorkflowError> {
        auth.require_any(
            &[Role::Importer, Role::Exporter, Role::ExportingEntity],
            "getTradeStatus",
        )?;
        let trade = ledger.require_trade(trade_id)?;
        Ok(Response::Status(trade.status.to_string()))
    }

    pub fn lc_status(
        &self,
        ledger: &Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
    ) -> Result<Response, WorkflowError> {
        auth.require_any(&[Role::Importer, Role::Exporter, Role::Lender], "getLCStatus")?;
        let lc = ledger.require_letter_of_credit(trade_id)?;
        Ok(Response::Status(lc.status.to_string()))
    }

    pub fn el_status(
        &self,
        ledger: &Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
    ) -> Result<Response, WorkflowError> {
        auth.require_any(&[Role::Exporter, Role::Regulator], "getELStatus")?;
        let license = ledger.require_export_license(trade_id)?;
        Ok(Response::Status(license.status.to_string()))
    }

    pub fn shipment_location(
        &self,
        ledger: &Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
    ) -> Result<Response, WorkflowError> {
        auth.require_any(&SHIPMENT_READERS, "getShipmentLocation")?;
        let location = ledger
            .shipment_location(trade_id)?
            .ok_or_else(|| WorkflowError::not_found("shipment location", trade_id))?;
        Ok(Response::Location(location.to_string()))
    }

    pub fn arrival_date(
        &self,
        ledger: &Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
    ) -> Result<Response, WorkflowError> {
        auth.require_any(&SHIPMENT_READERS, "getArrivalDate")?;
        let date = ledger
            .arrival_date(trade_id)?
            .ok_or_else(|| WorkflowError::not_found("arrival date", trade_id))?;
        Ok(Response::ArrivalDate(date))
    }

    pub fn bill_of_lading(
        &self,
        ledger: &Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
    ) -> Result<Response, WorkflowError> {
        auth.require_any(
            &[
                Role::Importer,
                Role::Exporter,
                Role::ExportingEntity,
                Role::Carrier,
            ],
            "getBillOfLading",
        )?;
        let bill = ledger
            .bill_of_lading(trade_id)?
            .ok_or_else(|| WorkflowError::not_found("bill of lading", trade_id))?;
        Ok(Response::BillOfLading(bill))
    }

    /// Balance of one of the three bank accounts
    ///
    /// Only the account's own party may read it; the exporting entity may
    /// also read the exporter's.
    pub fn account_balance(
        &self,
        ledger: &Ledger<'_>,
        auth: &Authority<'_>,
        entity: BalanceHolder,
    ) -> Result<Response, WorkflowError> {
        let readers: &[Role] = match entity {
            BalanceHolder::Exporter => &[Role::Exporter, Role::ExportingEntity],
            BalanceHolder::Importer => &[Role::Importer],
            BalanceHolder::Lender => &[Role::Lender],
        };
        auth.require_any(readers, "getAccountBalance")?;
        Ok(Response::Balance(ledger.balance(entity)?))
    }

    /// Operator view of a trade; records not created yet are `None`
    pub fn summary(&self, ledger: &Ledger<'_>, trade_id: &str) -> Result<TradeSummary, WorkflowError> {
        let trade = ledger.trade(trade_id)?;
        let lc = ledger.letter_of_credit(trade_id)?;

        Ok(TradeSummary {
            trade_id: trade_id.to_string(),
            trade_status: trade.as_ref().map(|t| t.status),
            paid_to_date: trade.as_ref().map(|t| t.paid_to_date),
            lc_status: lc.as_ref().map(|l| l.status),
            lc_amount: lc.as_ref().map(|l| l.amount),
            lc_beneficiary: lc.map(|l| l.beneficiary),
            el_status: ledger.export_license(trade_id)?.map(|el| el.status),
            location: ledger.shipment_location(trade_id)?,
        })
    }

    /// Operator view of the three bank balances, in `BalanceHolder::ALL` order
    pub fn balances(
        &self,
        ledger: &Ledger<'_>,
    ) -> Result<Vec<(BalanceHolder, Option<i64>)>, WorkflowError> {
        BalanceHolder::ALL
            .iter()
            .map(|holder| Ok((*holder, ledger.recorded_balance(*holder)?)))
            .collect()
    }
}

const SHIPMENT_READERS: [Role; 4] = [Role::Importer, Role::Exporter, Role::Lender, Role::Carrier];
