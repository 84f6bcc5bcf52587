//! Export license manager
//!
//! Owns the `ExportLicense:<id>` record: requested by the exporter once the
//! L/C is accepted, issued by the regulatory authority.

use crate::core::identity::Authority;
use crate::core::record_store::Ledger;
use crate::types::{ElStatus, ExportLicense, LcStatus, Party, Role, WorkflowError};
use tracing::{debug, info};

pub struct ExportLicenseManager;

impl ExportLicenseManager {
    /// Request an export license for the goods of an accepted L/C
    ///
    /// The license names the bootstrapped exporter, carrier and regulator.
    /// A license that already exists is left as it is.
    ///
    /// # Errors
    ///
    /// - `AccessDenied` unless the caller is the exporter
    /// - `NotFound` if the L/C or the trade does not exist
    /// - `InvalidState` if the L/C is not accepted
    pub fn request_el(
        &self,
        ledger: &mut Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
    ) -> Result<(), WorkflowError> {
        auth.require(Role::Exporter, "requestEL")?;

        if let Some(existing) = ledger.export_license(trade_id)? {
            debug!(trade = trade_id, status = %existing.status, "E/L already requested");
            return Ok(());
        }

        let lc = ledger.require_letter_of_credit(trade_id)?;
        if lc.status != LcStatus::Accepted {
            return Err(WorkflowError::invalid_state(trade_id, "L/C not accepted yet"));
        }
        let trade = ledger.require_trade(trade_id)?;

        let license = ExportLicense {
            id: String::new(),
            expiration_date: String::new(),
            exporter: ledger.identity(Party::Exporter)?,
            carrier: ledger.identity(Party::Carrier)?,
            description_of_goods: trade.description_of_goods,
            approver: ledger.identity(Party::Regulator)?,
            status: ElStatus::Requested,
        };
        ledger.put_export_license(trade_id, &license)?;
        info!(trade = trade_id, "E/L requested");
        Ok(())
    }

    /// Issue a requested export license
    ///
    /// # Errors
    ///
    /// - `AccessDenied` unless the caller is the regulatory authority
    /// - `NotFound` if no license was requested
    pub fn issue_el(
        &self,
        ledger: &mut Ledger<'_>,
        auth: &Authority<'_>,
        trade_id: &str,
        el_id: &str,
        expiration_date: &str,
    ) -> Result<(), WorkflowError> {
        auth.require(Role::Regulator, "issueEL")?;

        let mut license = ledger.require_export_license(trade_id)?;
        match license.status {
            ElStatus::Issued => {
                debug!(trade = trade_id, "E/L already issued");
            }
            ElStatus::Requested => {
                license.id = el_id.to_string();
                license.expiration_date = expiration_date.to_string();
                license.status = ElStatus::Issued;
                ledger.put_export_license(trade_id, &license)?;
                info!(trade = trade_id, license = el_id, "E/L issued");
            }
        }
        Ok(())
    }
}
