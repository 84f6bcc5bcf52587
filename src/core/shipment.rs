//! Shipment and bill of lading manager
//!
//! Owns the `ShipmentLocation`, `ArrivalDate` and `BillOfLading` records of a
//! trade. A shipment exists once it is prepared at `SOURCE`; after that the
//! carrier moves it freely and records the arrival date when it reaches
//! `DESTINATION`.

use crate::core::identity::Authority;
use crate::core::record_store::Ledger;
use crate::types::{BillOfLading, ElStatus, Party, Role, ShipmentLocation, WorkflowError};
use tracing::{debug, info};

pub struct ShipmentManager;

impl ShipmentManager {
    /// Prepare the shipment, placing it at `SOURCE`
    ///
    /// # Errors
    ///
    /// - `AccessDenied` unless the caller is the exporter
    /// - `InvalidState` if the shipment already left `SOURCE` or the export
    ///   license is not issued
    /// - `NotFound` if no export license was requested
    pub fn prepare_shipment(
        &self,
        ledger: &mut Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
    ) -> Result<(), WorkflowError> {
        auth.require(Role::Exporter, "prepareShipment")?;

        match ledger.shipment_location(trade_id)? {
            Some(ShipmentLocation::Source) => {
                debug!(trade = trade_id, "shipment already prepared");
                return Ok(());
            }
            Some(_) => {
                return Err(WorkflowError::invalid_state(
                    trade_id,
                    "shipment past the preparation stage",
                ))
            }
            None => {}
        }

        let license = ledger.require_export_license(trade_id)?;
        if license.status != ElStatus::Issued {
            return Err(WorkflowError::invalid_state(trade_id, "E/L not issued yet"));
        }

        ledger.put_shipment_location(trade_id, &ShipmentLocation::Source)?;
        info!(trade = trade_id, "shipment prepared");
        Ok(())
    }

    /// Take the prepared shipment on board and issue the bill of lading
    ///
    /// The importer's bank is the beneficiary of the title to the goods. A
    /// bill of lading is issued at most once per trade.
    ///
    /// # Errors
    ///
    /// - `AccessDenied` unless the caller is the carrier
    /// - `InvalidState` unless the shipment is at `SOURCE`
    /// - `NotFound` if the trade does not exist
    pub fn accept_shipment_and_issue_bl(
        &self,
        ledger: &mut Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
        bl_id: &str,
        expiration_date: &str,
        source_port: &str,
        destination_port: &str,
    ) -> Result<(), WorkflowError> {
        auth.require(Role::Carrier, "acceptShipmentAndIssueBL")?;

        if ledger.require_prepared_shipment(trade_id)? != ShipmentLocation::Source {
            return Err(WorkflowError::invalid_state(
                trade_id,
                "shipment past the preparation stage",
            ));
        }

        if ledger.bill_of_lading(trade_id)?.is_some() {
            debug!(trade = trade_id, "B/L already issued");
            return Ok(());
        }

        let trade = ledger.require_trade(trade_id)?;
        let bill = BillOfLading {
            id: bl_id.to_string(),
            expiration_date: expiration_date.to_string(),
            exporter: ledger.identity(Party::Exporter)?,
            carrier: ledger.identity(Party::Carrier)?,
            description_of_goods: trade.description_of_goods,
            amount: trade.amount,
            beneficiary: ledger.identity(Party::ImporterBank)?,
            source_port: source_port.to_string(),
            destination_port: destination_port.to_string(),
        };
        ledger.put_bill_of_lading(trade_id, &bill)?;
        info!(trade = trade_id, bill = bl_id, "B/L issued");
        Ok(())
    }

    /// Move the shipment to `location`
    ///
    /// Reaching `DESTINATION` from anywhere else records `date` as the
    /// arrival date.
    ///
    /// # Errors
    ///
    /// - `AccessDenied` unless the caller is the carrier
    /// - `InvalidState` if the shipment was never prepared
    pub fn update_shipment_location(
        &self,
        ledger: &mut Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
        location: &str,
        date: &str,
    ) -> Result<(), WorkflowError> {
        auth.require(Role::Carrier, "updateShipmentLocation")?;

        let current = ledger.require_prepared_shipment(trade_id)?;
        let next = ShipmentLocation::from(location);

        if current == next {
            debug!(trade = trade_id, location, "shipment already at location");
        } else if next == ShipmentLocation::Destination {
            ledger.put_arrival_date(trade_id, date)?;
            info!(trade = trade_id, date, "shipment arrived");
        }

        ledger.put_shipment_location(trade_id, &next)?;
        info!(trade = trade_id, location, "shipment location recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::MembershipPolicy;
    use crate::core::record_store::MemoryStore;
    use crate::core::testing::{self, caller, trade_store};
    use crate::types::LcStatus;

    fn carrier_updates(store: &mut MemoryStore, location: &str, date: &str) -> Result<(), WorkflowError> {
        let policy = MembershipPolicy::default();
        let carrier = caller(Role::Carrier);
        ShipmentManager.update_shipment_location(
            &mut Ledger::new(store),
            &Authority::new(&policy, &carrier),
            "T1",
            location,
            date,
        )
    }

    #[test]
    fn test_prepare_requires_issued_license() {
        let policy = MembershipPolicy::default();
        let mut store = trade_store(1000, LcStatus::Accepted, None);
        let mut ledger = Ledger::new(&mut store);
        let mut license = testing::issued_license();
        license.status = ElStatus::Requested;
        ledger.put_export_license("T1", &license).unwrap();
        let exporter = caller(Role::Exporter);

        let err = ShipmentManager
            .prepare_shipment(&mut ledger, &Authority::new(&policy, &exporter), "T1")
            .unwrap_err();
        assert_eq!(err, WorkflowError::invalid_state("T1", "E/L not issued yet"));
        assert_eq!(ledger.shipment_location("T1").unwrap(), None);
    }

    #[test]
    fn test_prepare_is_idempotent_but_not_after_departure() {
        let policy = MembershipPolicy::default();
        let mut store = trade_store(1000, LcStatus::Accepted, None);
        let exporter = caller(Role::Exporter);
        let auth = Authority::new(&policy, &exporter);

        ShipmentManager
            .prepare_shipment(&mut Ledger::new(&mut store), &auth, "T1")
            .unwrap();
        ShipmentManager
            .prepare_shipment(&mut Ledger::new(&mut store), &auth, "T1")
            .unwrap();

        carrier_updates(&mut store, "AT_SEA", "01/15/2019").unwrap();
        let err = ShipmentManager
            .prepare_shipment(&mut Ledger::new(&mut store), &auth, "T1")
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidState { .. }));
    }

    #[test]
    fn test_issue_bill_of_lading() {
        let policy = MembershipPolicy::default();
        let mut store = trade_store(50000, LcStatus::Accepted, Some(ShipmentLocation::Source));
        let mut ledger = Ledger::new(&mut store);
        let carrier = caller(Role::Carrier);
        let auth = Authority::new(&policy, &carrier);

        ShipmentManager
            .accept_shipment_and_issue_bl(
                &mut ledger,
                &auth,
                "T1",
                "bl06678",
                "8/31/2018",
                "Woodlands Port",
                "Market Port",
            )
            .unwrap();

        let bill = ledger.bill_of_lading("T1").unwrap().unwrap();
        assert_eq!(bill.amount, 50000);
        assert_eq!(bill.beneficiary, testing::IMPORTER_BANK);
        assert_eq!(bill.exporter, testing::EXPORTER);
        assert_eq!(bill.carrier, testing::CARRIER);
        assert_eq!(bill.source_port, "Woodlands Port");

        // a second acceptance keeps the first bill
        ShipmentManager
            .accept_shipment_and_issue_bl(&mut ledger, &auth, "T1", "bl-2", "x", "A", "B")
            .unwrap();
        assert_eq!(ledger.bill_of_lading("T1").unwrap().unwrap().id, "bl06678");
    }

    #[test]
    fn test_bill_of_lading_needs_shipment_at_source() {
        let policy = MembershipPolicy::default();
        let carrier = caller(Role::Carrier);
        let auth = Authority::new(&policy, &carrier);

        let mut unprepared = trade_store(1000, LcStatus::Accepted, None);
        let err = ShipmentManager
            .accept_shipment_and_issue_bl(&mut Ledger::new(&mut unprepared), &auth, "T1", "bl", "x", "A", "B")
            .unwrap_err();
        assert_eq!(err, WorkflowError::invalid_state("T1", "shipment not prepared yet"));

        let mut departed = trade_store(1000, LcStatus::Accepted, Some(ShipmentLocation::Destination));
        let err = ShipmentManager
            .accept_shipment_and_issue_bl(&mut Ledger::new(&mut departed), &auth, "T1", "bl", "x", "A", "B")
            .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::invalid_state("T1", "shipment past the preparation stage")
        );
    }

    #[test]
    fn test_arrival_date_recorded_on_destination() {
        let mut store = trade_store(1000, LcStatus::Accepted, Some(ShipmentLocation::Source));

        carrier_updates(&mut store, "AT_SEA", "01/15/2019").unwrap();
        assert_eq!(Ledger::new(&mut store).arrival_date("T1").unwrap(), None);

        carrier_updates(&mut store, "DESTINATION", "02/01/2019").unwrap();
        let ledger = Ledger::new(&mut store);
        assert_eq!(
            ledger.shipment_location("T1").unwrap(),
            Some(ShipmentLocation::Destination)
        );
        assert_eq!(ledger.arrival_date("T1").unwrap().as_deref(), Some("02/01/2019"));
    }

    #[test]
    fn test_repeated_destination_keeps_first_arrival() {
        let mut store = trade_store(1000, LcStatus::Accepted, Some(ShipmentLocation::Source));

        carrier_updates(&mut store, "DESTINATION", "02/01/2019").unwrap();
        carrier_updates(&mut store, "DESTINATION", "02/09/2019").unwrap();

        assert_eq!(
            Ledger::new(&mut store).arrival_date("T1").unwrap().as_deref(),
            Some("02/01/2019")
        );
    }

    #[test]
    fn test_update_before_preparation() {
        let mut store = trade_store(1000, LcStatus::Accepted, None);
        let err = carrier_updates(&mut store, "DESTINATION", "02/01/2019").unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidState { .. }));
    }
}
