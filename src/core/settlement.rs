//! Settlement engine
//!
//! This module moves money between the three bank balances. It owns:
//! - the payment and advance-payment requests (`PendingRequest` records)
//! - the `paidToDate` progress of a trade and the remaining L/C credit
//! - the account balances
//!
//! # Payment Schedule
//!
//! While the goods are still at `SOURCE` the importer's bank pays half of the
//! trade amount. Once the goods have moved on, it pays the rest, plus a late
//! surcharge when payment comes after the grace window that starts on the
//! arrival date:
//!
//! ```text
//! surcharge = (hours(payment - arrival) - grace_period_hours) / half_period_hours
//! payment   = remaining                                if surcharge <= 0
//!           = trunc(remaining * (1 + rate * surcharge)) otherwise
//! ```
//!
//! `paidToDate` only counts the principal, so it never exceeds the trade
//! amount; the surcharge is still paid out and drawn from the L/C.
//!
//! # Funds
//!
//! A payer without enough balance is logged and the transfer goes ahead;
//! balances may go negative.

use crate::config::PaymentTerms;
use crate::core::identity::Authority;
use crate::core::record_store::Ledger;
use crate::types::{
    BalanceHolder, LcStatus, LetterOfCredit, Party, RequestKind, Role, ShipmentLocation,
    WorkflowError,
};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Request and settlement of payments against a letter of credit
pub struct SettlementEngine<'c> {
    terms: &'c PaymentTerms,
}

impl<'c> SettlementEngine<'c> {
    pub fn new(terms: &'c PaymentTerms) -> Self {
        SettlementEngine { terms }
    }

    /// Ask the lender for a discounted advance against a transferred L/C
    ///
    /// # Errors
    ///
    /// - `AccessDenied` unless the caller is the exporter
    /// - `NotFound` if there is no L/C
    /// - `InvalidState` unless the transfer to the lender was accepted
    /// - `AlreadySettled` if the advance was already paid
    pub fn request_advance_payment(
        &self,
        ledger: &mut Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
    ) -> Result<(), WorkflowError> {
        auth.require(Role::Exporter, "requestAdvancePayment")?;

        let lc = ledger.require_letter_of_credit(trade_id)?;
        if ledger
            .pending_request(RequestKind::AdvancePayment, trade_id)?
            .is_some()
        {
            debug!(trade = trade_id, "advance payment already requested");
            return Ok(());
        }

        check_transferred_to_lender(ledger, trade_id, &lc)?;
        if lc.advance_payment_settled {
            return Err(WorkflowError::already_settled(trade_id, "advance payment"));
        }

        ledger.open_request(RequestKind::AdvancePayment, trade_id, Role::Exporter)?;
        info!(trade = trade_id, "advance payment requested");
        Ok(())
    }

    /// Pay the requested advance from the lender to the exporter
    ///
    /// # Errors
    ///
    /// - `AccessDenied` unless the caller is the lender's bank
    /// - `NotFound` if no advance payment was requested
    /// - `InvalidState` unless the transfer to the lender was accepted and
    ///   the shipment is prepared
    pub fn make_advance_payment(
        &self,
        ledger: &mut Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
    ) -> Result<(), WorkflowError> {
        auth.require(Role::LenderBank, "makeAdvancePayment")?;

        ledger
            .pending_request(RequestKind::AdvancePayment, trade_id)?
            .ok_or_else(|| WorkflowError::not_found("advance payment request", trade_id))?;

        let mut lc = ledger.require_letter_of_credit(trade_id)?;
        check_transferred_to_lender(ledger, trade_id, &lc)?;
        ledger.require_prepared_shipment(trade_id)?;

        let amount = self.advance_amount(trade_id, &lc)?;
        transfer(
            ledger,
            trade_id,
            "makeAdvancePayment",
            BalanceHolder::Lender,
            BalanceHolder::Exporter,
            amount,
        )?;

        lc.advance_payment_settled = true;
        ledger.put_letter_of_credit(trade_id, &lc)?;
        ledger.close_request(RequestKind::AdvancePayment, trade_id)?;
        info!(trade = trade_id, amount, "advance payment made");
        Ok(())
    }

    /// Ask the importer's bank for the next installment
    ///
    /// The caller must be the current L/C beneficiary: the exporter before a
    /// transfer, the lender after.
    ///
    /// # Errors
    ///
    /// - `AccessDenied` unless the caller is the exporter or the lender
    /// - `NotFound` if the trade or L/C does not exist
    /// - `InvalidState` if the shipment is not prepared or the L/C does not
    ///   permit payment
    /// - `AlreadySettled` if the trade is fully paid
    /// - `DuplicateRequest` if the first installment was paid and the goods
    ///   are still at `SOURCE`
    /// - `RoleMismatch` if the caller is not the beneficiary
    pub fn request_payment(
        &self,
        ledger: &mut Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
    ) -> Result<(), WorkflowError> {
        auth.require_any(&[Role::Exporter, Role::Lender], "requestPayment")?;

        let trade = ledger.require_trade(trade_id)?;
        let lc = ledger.require_letter_of_credit(trade_id)?;
        let location = ledger.require_prepared_shipment(trade_id)?;

        if ledger
            .pending_request(RequestKind::Payment, trade_id)?
            .is_some()
        {
            debug!(trade = trade_id, "payment already requested");
            return Ok(());
        }

        if trade.is_settled() {
            return Err(WorkflowError::already_settled(trade_id, "payment"));
        }
        if location == ShipmentLocation::Source && trade.paid_to_date != 0 {
            return Err(WorkflowError::duplicate_request(
                trade_id,
                "partial payment already made",
            ));
        }
        if !lc.status.permits_payment() {
            return Err(WorkflowError::invalid_state(
                trade_id,
                "L/C does not permit payment",
            ));
        }

        let requested_by = if auth.holds(Role::Exporter)
            && lc.beneficiary == ledger.identity(Party::Exporter)?
        {
            Role::Exporter
        } else if auth.holds(Role::Lender) && lc.beneficiary == ledger.identity(Party::Lender)? {
            Role::Lender
        } else {
            return Err(WorkflowError::role_mismatch(trade_id));
        };

        ledger.open_request(RequestKind::Payment, trade_id, requested_by)?;
        info!(trade = trade_id, %requested_by, "payment requested");
        Ok(())
    }

    /// Pay the requested installment to the L/C beneficiary
    ///
    /// # Errors
    ///
    /// - `AccessDenied` unless the caller is the importer's bank
    /// - `NotFound` if no payment was requested
    /// - `InvalidState` if the L/C does not permit payment, the shipment is
    ///   not prepared, the arrival date is missing, or the beneficiary is
    ///   neither the exporter nor the lender
    /// - `InvalidArgument` if a date does not match the configured format
    /// - `AlreadySettled` if the trade is fully paid
    pub fn make_payment(
        &self,
        ledger: &mut Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
        payment_date: &str,
    ) -> Result<(), WorkflowError> {
        auth.require(Role::ImporterBank, "makePayment")?;

        ledger
            .pending_request(RequestKind::Payment, trade_id)?
            .ok_or_else(|| WorkflowError::not_found("payment request", trade_id))?;

        let mut trade = ledger.require_trade(trade_id)?;
        let mut lc = ledger.require_letter_of_credit(trade_id)?;
        if !lc.status.permits_payment() {
            return Err(WorkflowError::invalid_state(
                trade_id,
                "L/C does not permit payment",
            ));
        }
        let location = ledger.require_prepared_shipment(trade_id)?;
        if trade.is_settled() {
            return Err(WorkflowError::already_settled(trade_id, "payment"));
        }

        let amount = match location {
            ShipmentLocation::Source => trade.amount / 2,
            ShipmentLocation::Destination | ShipmentLocation::Elsewhere(_) => {
                let arrival = ledger
                    .arrival_date(trade_id)?
                    .ok_or_else(|| WorkflowError::invalid_state(trade_id, "arrival date missing"))?;
                let arrival = self.terms.parse_date(&arrival)?;
                let paid_on = self.terms.parse_date(payment_date)?;
                self.final_installment(trade_id, trade.remaining(), arrival, paid_on)?
            }
        };

        let payee = if lc.beneficiary == ledger.identity(Party::Exporter)? {
            BalanceHolder::Exporter
        } else if lc.beneficiary == ledger.identity(Party::Lender)? {
            BalanceHolder::Lender
        } else {
            return Err(WorkflowError::invalid_state(
                trade_id,
                "L/C beneficiary is neither the exporter nor the lender",
            ));
        };

        let principal = amount.min(trade.remaining());
        trade.paid_to_date = trade
            .paid_to_date
            .checked_add(principal)
            .ok_or_else(|| WorkflowError::arithmetic_overflow("makePayment", trade_id))?;
        lc.amount = lc
            .amount
            .checked_sub(amount)
            .ok_or_else(|| WorkflowError::arithmetic_overflow("makePayment", trade_id))?;

        transfer(
            ledger,
            trade_id,
            "makePayment",
            BalanceHolder::Importer,
            payee,
            amount,
        )?;
        ledger.put_trade(trade_id, &trade)?;
        ledger.put_letter_of_credit(trade_id, &lc)?;
        ledger.close_request(RequestKind::Payment, trade_id)?;
        info!(
            trade = trade_id,
            amount,
            paid_to_date = trade.paid_to_date,
            payee = %payee,
            "payment made"
        );
        Ok(())
    }

    /// Advance paid for `lc`: the remaining credit less the discount,
    /// truncated to a whole amount
    pub fn advance_amount(&self, trade_id: &str, lc: &LetterOfCredit) -> Result<i64, WorkflowError> {
        (Decimal::ONE - lc.discount_rate)
            .checked_mul(Decimal::from(lc.amount))
            .and_then(|amount| amount.trunc().to_i64())
            .ok_or_else(|| WorkflowError::arithmetic_overflow("makeAdvancePayment", trade_id))
    }

    /// Final installment on `remaining` for goods that arrived on `arrival`
    /// and are paid for on `paid_on`
    pub fn final_installment(
        &self,
        trade_id: &str,
        remaining: i64,
        arrival: NaiveDate,
        paid_on: NaiveDate,
    ) -> Result<i64, WorkflowError> {
        let overflow = || WorkflowError::arithmetic_overflow("makePayment", trade_id);

        let late_hours = (paid_on - arrival)
            .num_hours()
            .checked_sub(self.terms.grace_period_hours)
            .ok_or_else(overflow)?;
        let surcharge = Decimal::from(late_hours)
            .checked_div(Decimal::from(self.terms.half_period_hours))
            .ok_or_else(overflow)?;

        if surcharge <= Decimal::ZERO {
            return Ok(remaining);
        }

        self.terms
            .surcharge_rate
            .checked_mul(surcharge)
            .and_then(|fee| (Decimal::ONE + fee).checked_mul(Decimal::from(remaining)))
            .and_then(|amount| amount.trunc().to_i64())
            .ok_or_else(overflow)
    }
}

/// Advance payments need the L/C transferred to, and accepted by, the lender
fn check_transferred_to_lender(
    ledger: &Ledger<'_>,
    trade_id: &str,
    lc: &LetterOfCredit,
) -> Result<(), WorkflowError> {
    if lc.status != LcStatus::TransferAccepted {
        return Err(WorkflowError::invalid_state(
            trade_id,
            "L/C transfer not accepted yet",
        ));
    }
    if lc.beneficiary != ledger.identity(Party::Lender)? {
        return Err(WorkflowError::invalid_state(
            trade_id,
            "L/C beneficiary is not the lender",
        ));
    }
    Ok(())
}

/// Move `amount` from one bank balance to another
fn transfer(
    ledger: &mut Ledger<'_>,
    trade_id: &str,
    operation: &str,
    from: BalanceHolder,
    to: BalanceHolder,
    amount: i64,
) -> Result<(), WorkflowError> {
    let payer = ledger.balance(from)?;
    let payee = ledger.balance(to)?;

    if payer < amount {
        warn!(
            trade = trade_id,
            payer = %from,
            balance = payer,
            amount,
            "insufficient funds, transfer proceeds"
        );
    }

    let payer = payer
        .checked_sub(amount)
        .ok_or_else(|| WorkflowError::arithmetic_overflow(operation, trade_id))?;
    let payee = payee
        .checked_add(amount)
        .ok_or_else(|| WorkflowError::arithmetic_overflow(operation, trade_id))?;

    ledger.put_balance(from, payer)?;
    ledger.put_balance(to, payee)?;
    Ok(())
}
