//! Trade agreement manager
//!
//! Owns the `Trade:<id>` record and its REQUESTED to ACCEPTED transition.
//! The importer's trade limit comes from the `TradeLimits` it is built with.

use crate::config::TradeLimits;
use crate::core::identity::Authority;
use crate::core::record_store::Ledger;
use crate::types::{Role, TradeAgreement, TradeStatus, WorkflowError};
use tracing::{debug, info};

/// Write path for trade agreements
pub struct TradeAgreementManager<'c> {
    limits: &'c TradeLimits,
}

impl<'c> TradeAgreementManager<'c> {
    pub fn new(limits: &'c TradeLimits) -> Self {
        TradeAgreementManager { limits }
    }

    /// Record a trade request from the importer
    ///
    /// Re-submitting the same terms for an existing trade is a no-op; any
    /// other terms are rejected so a recorded trade is never reset.
    ///
    /// # Errors
    ///
    /// - `AccessDenied` unless the caller is the importer
    /// - `LimitExceeded` if `amount` is above the caller's limit
    /// - `DuplicateRequest` if the trade exists with different terms
    pub fn request_trade(
        &self,
        ledger: &mut Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
        amount: i64,
        description: &str,
    ) -> Result<(), WorkflowError> {
        auth.require(Role::Importer, "requestTrade")?;

        let limit = self.limits.limit_for(&auth.caller().org);
        if amount > limit {
            return Err(WorkflowError::limit_exceeded(limit, amount));
        }

        if let Some(existing) = ledger.trade(trade_id)? {
            if existing.amount == amount && existing.description_of_goods == description {
                debug!(trade = trade_id, "trade already requested");
                return Ok(());
            }
            return Err(WorkflowError::duplicate_request(
                trade_id,
                "trade already recorded with different terms",
            ));
        }

        ledger.put_trade(trade_id, &TradeAgreement::new(amount, description))?;
        info!(trade = trade_id, amount, "trade requested");
        Ok(())
    }

    /// Accept a requested trade on behalf of the exporter
    ///
    /// # Errors
    ///
    /// - `AccessDenied` unless the caller is the exporter
    /// - `NotFound` if no trade exists
    pub fn accept_trade(
        &self,
        ledger: &mut Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
    ) -> Result<(), WorkflowError> {
        auth.require(Role::Exporter, "acceptTrade")?;

        let mut trade = ledger.require_trade(trade_id)?;
        match trade.status {
            TradeStatus::Accepted => {
                debug!(trade = trade_id, "trade already accepted");
                Ok(())
            }
            TradeStatus::Requested => {
                trade.status = TradeStatus::Accepted;
                ledger.put_trade(trade_id, &trade)?;
                info!(trade = trade_id, "trade accepted");
                Ok(())
            }
        }
    }
}
