//! Letter of credit manager
//!
//! Owns the `LetterOfCredit:<id>` record and drives it along the lattice
//!
//! ```text
//! REQUESTED < ISSUED < ACCEPTED < TRANSFER_REQUESTED < TRANSFER_ISSUED < TRANSFER_ACCEPTED
//! ```
//!
//! Every transition first authenticates its role, then either mutates the
//! record (status exactly one step before the target), succeeds without a
//! write (status at or past the target) or fails with `InvalidState` (status
//! before the prerequisite). Status never moves backwards.

use crate::core::identity::Authority;
use crate::core::record_store::Ledger;
use crate::types::{
    LcStatus, LetterOfCredit, Party, RequestKind, Role, TradeStatus, WorkflowError,
};
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Write path for letters of credit
pub struct LetterOfCreditManager;

impl LetterOfCreditManager {
    /// Request an L/C for an accepted trade
    ///
    /// The exporter is the first beneficiary and the full trade amount is
    /// the available credit. An existing L/C is left untouched.
    ///
    /// # Errors
    ///
    /// - `AccessDenied` unless the caller is the importer
    /// - `NotFound` if the trade does not exist
    /// - `InvalidState` if the trade is not accepted yet
    pub fn request_lc(
        &self,
        ledger: &mut Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
    ) -> Result<(), WorkflowError> {
        auth.require(Role::Importer, "requestLC")?;

        let trade = ledger.require_trade(trade_id)?;
        if trade.status != TradeStatus::Accepted {
            return Err(WorkflowError::invalid_state(
                trade_id,
                "trade has not been accepted by the parties",
            ));
        }

        if let Some(existing) = ledger.letter_of_credit(trade_id)? {
            debug!(trade = trade_id, status = %existing.status, "L/C already requested");
            return Ok(());
        }

        let exporter = ledger.identity(Party::Exporter)?;
        let lc = LetterOfCredit::requested(exporter, trade.amount);
        ledger.put_letter_of_credit(trade_id, &lc)?;
        info!(trade = trade_id, amount = lc.amount, "L/C requested");
        Ok(())
    }

    /// Issue the requested L/C
    ///
    /// # Errors
    ///
    /// - `AccessDenied` unless the caller is the importer's bank
    /// - `NotFound` if no L/C was requested
    pub fn issue_lc(
        &self,
        ledger: &mut Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
        lc_id: &str,
        expiration_date: &str,
        documents: &[String],
    ) -> Result<(), WorkflowError> {
        auth.require(Role::ImporterBank, "issueLC")?;

        let mut lc = ledger.require_letter_of_credit(trade_id)?;
        match lc.status {
            LcStatus::Requested => {
                lc.id = lc_id.to_string();
                lc.expiration_date = expiration_date.to_string();
                lc.documents = documents.to_vec();
                lc.status = LcStatus::Issued;
                ledger.put_letter_of_credit(trade_id, &lc)?;
                info!(trade = trade_id, lc = lc_id, "L/C issued");
            }
            LcStatus::Issued
            | LcStatus::Accepted
            | LcStatus::TransferRequested
            | LcStatus::TransferIssued
            | LcStatus::TransferAccepted => {
                debug!(trade = trade_id, status = %lc.status, "L/C already issued");
            }
        }
        Ok(())
    }

    /// Accept the issued L/C on behalf of the exporter's bank
    ///
    /// # Errors
    ///
    /// - `AccessDenied` unless the caller is the exporter's bank
    /// - `NotFound` if no L/C was requested
    /// - `InvalidState` if the L/C has not been issued
    pub fn accept_lc(
        &self,
        ledger: &mut Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
    ) -> Result<(), WorkflowError> {
        auth.require(Role::ExporterBank, "acceptLC")?;

        let mut lc = ledger.require_letter_of_credit(trade_id)?;
        match lc.status {
            LcStatus::Requested => Err(WorkflowError::invalid_state(trade_id, "L/C not issued yet")),
            LcStatus::Issued => {
                lc.status = LcStatus::Accepted;
                ledger.put_letter_of_credit(trade_id, &lc)?;
                info!(trade = trade_id, "L/C accepted");
                Ok(())
            }
            LcStatus::Accepted
            | LcStatus::TransferRequested
            | LcStatus::TransferIssued
            | LcStatus::TransferAccepted => {
                debug!(trade = trade_id, status = %lc.status, "L/C already accepted");
                Ok(())
            }
        }
    }

    /// Ask for the L/C to be transferred to the lender at `discount_rate`
    ///
    /// # Errors
    ///
    /// - `AccessDenied` unless the caller is the exporter
    /// - `NotFound` if no L/C was requested
    /// - `InvalidState` if a payment request is pending, the shipment is not
    ///   prepared, no credit remains, or the L/C is not accepted yet
    pub fn request_lc_transfer(
        &self,
        ledger: &mut Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
        discount_rate: Decimal,
    ) -> Result<(), WorkflowError> {
        auth.require(Role::Exporter, "requestLCTransfer")?;

        let mut lc = ledger.require_letter_of_credit(trade_id)?;
        check_transferable(ledger, trade_id, &lc)?;

        match lc.status {
            LcStatus::Requested | LcStatus::Issued => {
                Err(WorkflowError::invalid_state(trade_id, "L/C not accepted yet"))
            }
            LcStatus::Accepted => {
                lc.beneficiary = ledger.identity(Party::Lender)?;
                lc.discount_rate = discount_rate;
                lc.status = LcStatus::TransferRequested;
                ledger.put_letter_of_credit(trade_id, &lc)?;
                info!(trade = trade_id, %discount_rate, "L/C transfer requested");
                Ok(())
            }
            LcStatus::TransferRequested | LcStatus::TransferIssued | LcStatus::TransferAccepted => {
                debug!(trade = trade_id, status = %lc.status, "L/C transfer already requested");
                Ok(())
            }
        }
    }

    /// Issue the requested transfer
    ///
    /// # Errors
    ///
    /// Same preconditions as `request_lc_transfer`; the caller must be the
    /// exporter's bank and a transfer must have been requested.
    pub fn issue_lc_transfer(
        &self,
        ledger: &mut Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
    ) -> Result<(), WorkflowError> {
        auth.require(Role::ExporterBank, "issueLCTransfer")?;

        let mut lc = ledger.require_letter_of_credit(trade_id)?;
        check_transferable(ledger, trade_id, &lc)?;

        match lc.status {
            LcStatus::Requested | LcStatus::Issued | LcStatus::Accepted => Err(
                WorkflowError::invalid_state(trade_id, "L/C transfer not requested yet"),
            ),
            LcStatus::TransferRequested => {
                lc.status = LcStatus::TransferIssued;
                ledger.put_letter_of_credit(trade_id, &lc)?;
                info!(trade = trade_id, "L/C transfer issued");
                Ok(())
            }
            LcStatus::TransferIssued | LcStatus::TransferAccepted => {
                debug!(trade = trade_id, status = %lc.status, "L/C transfer already issued");
                Ok(())
            }
        }
    }

    /// Accept the issued transfer on behalf of the lender's bank
    ///
    /// # Errors
    ///
    /// Same preconditions as `request_lc_transfer`; the caller must be the
    /// lender's bank and the transfer must have been issued.
    pub fn accept_lc_transfer(
        &self,
        ledger: &mut Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
    ) -> Result<(), WorkflowError> {
        auth.require(Role::LenderBank, "acceptLCTransfer")?;

        let mut lc = ledger.require_letter_of_credit(trade_id)?;
        check_transferable(ledger, trade_id, &lc)?;

        match lc.status {
            LcStatus::Requested
            | LcStatus::Issued
            | LcStatus::Accepted
            | LcStatus::TransferRequested => Err(WorkflowError::invalid_state(
                trade_id,
                "L/C transfer not issued yet",
            )),
            LcStatus::TransferIssued => {
                lc.status = LcStatus::TransferAccepted;
                ledger.put_letter_of_credit(trade_id, &lc)?;
                info!(trade = trade_id, "L/C transfer accepted");
                Ok(())
            }
            LcStatus::TransferAccepted => {
                debug!(trade = trade_id, "L/C transfer already accepted");
                Ok(())
            }
        }
    }
}

/// Preconditions shared by the three transfer transitions
fn check_transferable(
    ledger: &Ledger<'_>,
    trade_id: &str,
    lc: &LetterOfCredit,
) -> Result<(), WorkflowError> {
    if ledger
        .pending_request(RequestKind::Payment, trade_id)?
        .is_some()
    {
        return Err(WorkflowError::invalid_state(
            trade_id,
            "payment request pending",
        ));
    }
    ledger.require_prepared_shipment(trade_id)?;
    if lc.amount <= 0 {
        return Err(WorkflowError::invalid_state(trade_id, "no available credit"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::MembershipPolicy;
    use crate::core::record_store::MemoryStore;
    use crate::core::testing::{self, caller, trade_store};
    use crate::types::{ShipmentLocation, TradeAgreement};
    use rstest::rstest;

    fn lc_status(store: &mut MemoryStore) -> LcStatus {
        Ledger::new(store)
            .require_letter_of_credit("T1")
            .unwrap()
            .status
    }

    #[test]
    fn test_request_lc_uses_exporter_and_trade_amount() {
        let policy = MembershipPolicy::default();
        let mut store = testing::bootstrapped_store();
        let mut ledger = Ledger::new(&mut store);
        ledger
            .put_trade("T1", &testing::accepted_trade(1000))
            .unwrap();

        let importer = caller(Role::Importer);
        LetterOfCreditManager
            .request_lc(&mut ledger, &Authority::new(&policy, &importer), "T1")
            .unwrap();

        let lc = ledger.require_letter_of_credit("T1").unwrap();
        assert_eq!(lc.amount, 1000);
        assert_eq!(lc.beneficiary, testing::EXPORTER);
        assert_eq!(lc.status, LcStatus::Requested);
    }

    #[test]
    fn test_request_lc_before_accept_trade() {
        let policy = MembershipPolicy::default();
        let mut store = testing::bootstrapped_store();
        let mut ledger = Ledger::new(&mut store);
        ledger
            .put_trade("T1", &TradeAgreement::new(1000, "widgets"))
            .unwrap();

        let importer = caller(Role::Importer);
        let err = LetterOfCreditManager
            .request_lc(&mut ledger, &Authority::new(&policy, &importer), "T1")
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidState { .. }));
        assert!(ledger.letter_of_credit("T1").unwrap().is_none());
    }

    #[test]
    fn test_request_lc_again_keeps_progress() {
        let policy = MembershipPolicy::default();
        let mut store = trade_store(1000, LcStatus::Accepted, None);
        let importer = caller(Role::Importer);

        LetterOfCreditManager
            .request_lc(
                &mut Ledger::new(&mut store),
                &Authority::new(&policy, &importer),
                "T1",
            )
            .unwrap();
        assert_eq!(lc_status(&mut store), LcStatus::Accepted);
    }

    #[test]
    fn test_issue_after_accept_does_not_regress() {
        let policy = MembershipPolicy::default();
        let mut store = trade_store(1000, LcStatus::Accepted, None);
        let bank = caller(Role::ImporterBank);

        LetterOfCreditManager
            .issue_lc(
                &mut Ledger::new(&mut store),
                &Authority::new(&policy, &bank),
                "T1",
                "lc-other",
                "01/01/2020",
                &[],
            )
            .unwrap();

        let lc = Ledger::new(&mut store).require_letter_of_credit("T1").unwrap();
        assert_eq!(lc.status, LcStatus::Accepted);
        assert_eq!(lc.id, "lc8349");
    }

    #[rstest]
    #[case(LcStatus::Requested, Err(()), LcStatus::Requested)]
    #[case(LcStatus::Issued, Ok(()), LcStatus::Accepted)]
    #[case(LcStatus::Accepted, Ok(()), LcStatus::Accepted)]
    #[case(LcStatus::TransferAccepted, Ok(()), LcStatus::TransferAccepted)]
    fn test_accept_lc(
        #[case] from: LcStatus,
        #[case] outcome: Result<(), ()>,
        #[case] to: LcStatus,
    ) {
        let policy = MembershipPolicy::default();
        let mut store = trade_store(1000, from, None);
        let bank = caller(Role::ExporterBank);

        let result = LetterOfCreditManager.accept_lc(
            &mut Ledger::new(&mut store),
            &Authority::new(&policy, &bank),
            "T1",
        );
        assert_eq!(result.is_ok(), outcome.is_ok());
        assert_eq!(lc_status(&mut store), to);
    }

    #[test]
    fn test_transfer_lattice_walk() {
        let policy = MembershipPolicy::default();
        let mut store = trade_store(1000, LcStatus::Accepted, Some(ShipmentLocation::Source));
        let exporter = caller(Role::Exporter);
        let exporter_bank = caller(Role::ExporterBank);
        let lender_bank = caller(Role::LenderBank);

        let mut ledger = Ledger::new(&mut store);
        LetterOfCreditManager
            .request_lc_transfer(
                &mut ledger,
                &Authority::new(&policy, &exporter),
                "T1",
                Decimal::new(1, 1),
            )
            .unwrap();
        let lc = ledger.require_letter_of_credit("T1").unwrap();
        assert_eq!(lc.beneficiary, testing::LENDER);
        assert_eq!(lc.discount_rate, Decimal::new(1, 1));

        LetterOfCreditManager
            .issue_lc_transfer(&mut ledger, &Authority::new(&policy, &exporter_bank), "T1")
            .unwrap();
        LetterOfCreditManager
            .accept_lc_transfer(&mut ledger, &Authority::new(&policy, &lender_bank), "T1")
            .unwrap();
        assert_eq!(
            ledger.require_letter_of_credit("T1").unwrap().status,
            LcStatus::TransferAccepted
        );

        // replaying the request keeps the original rate
        LetterOfCreditManager
            .request_lc_transfer(
                &mut ledger,
                &Authority::new(&policy, &exporter),
                "T1",
                Decimal::new(5, 1),
            )
            .unwrap();
        let lc = ledger.require_letter_of_credit("T1").unwrap();
        assert_eq!(lc.status, LcStatus::TransferAccepted);
        assert_eq!(lc.discount_rate, Decimal::new(1, 1));
    }

    #[test]
    fn test_transfer_requires_prepared_shipment() {
        let policy = MembershipPolicy::default();
        let mut store = trade_store(1000, LcStatus::Accepted, None);
        let exporter = caller(Role::Exporter);

        let err = LetterOfCreditManager
            .request_lc_transfer(
                &mut Ledger::new(&mut store),
                &Authority::new(&policy, &exporter),
                "T1",
                Decimal::new(1, 1),
            )
            .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::invalid_state("T1", "shipment not prepared yet")
        );
    }

    #[test]
    fn test_transfer_blocked_by_pending_payment() {
        let policy = MembershipPolicy::default();
        let mut store = trade_store(1000, LcStatus::Accepted, Some(ShipmentLocation::Source));
        Ledger::new(&mut store)
            .open_request(RequestKind::Payment, "T1", Role::Exporter)
            .unwrap();
        let exporter = caller(Role::Exporter);

        let err = LetterOfCreditManager
            .request_lc_transfer(
                &mut Ledger::new(&mut store),
                &Authority::new(&policy, &exporter),
                "T1",
                Decimal::new(1, 1),
            )
            .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::invalid_state("T1", "payment request pending")
        );
    }

    #[test]
    fn test_transfer_requires_available_credit() {
        let policy = MembershipPolicy::default();
        let mut store = trade_store(1000, LcStatus::TransferRequested, Some(ShipmentLocation::Source));
        {
            let mut ledger = Ledger::new(&mut store);
            let mut lc = ledger.require_letter_of_credit("T1").unwrap();
            lc.amount = 0;
            ledger.put_letter_of_credit("T1", &lc).unwrap();
        }
        let bank = caller(Role::ExporterBank);

        let err = LetterOfCreditManager
            .issue_lc_transfer(
                &mut Ledger::new(&mut store),
                &Authority::new(&policy, &bank),
                "T1",
            )
            .unwrap_err();
        assert_eq!(err, WorkflowError::invalid_state("T1", "no available credit"));
    }

    #[rstest]
    #[case(LcStatus::Issued)]
    #[case(LcStatus::Accepted)]
    fn test_issue_transfer_before_request(#[case] from: LcStatus) {
        let policy = MembershipPolicy::default();
        let mut store = trade_store(1000, from, Some(ShipmentLocation::Source));
        let bank = caller(Role::ExporterBank);

        let err = LetterOfCreditManager
            .issue_lc_transfer(
                &mut Ledger::new(&mut store),
                &Authority::new(&policy, &bank),
                "T1",
            )
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidState { .. }));
        assert_eq!(lc_status(&mut store), from);
    }

    #[test]
    fn test_accept_transfer_requires_lender_bank() {
        let policy = MembershipPolicy::default();
        let mut store = trade_store(1000, LcStatus::TransferIssued, Some(ShipmentLocation::Source));
        let exporter_bank = caller(Role::ExporterBank);

        let err = LetterOfCreditManager
            .accept_lc_transfer(
                &mut Ledger::new(&mut store),
                &Authority::new(&policy, &exporter_bank),
                "T1",
            )
            .unwrap_err();
        assert!(matches!(err, WorkflowError::AccessDenied { .. }));
    }
}
