//! Shared fixtures for manager tests

use crate::core::identity::MembershipPolicy;
use crate::core::record_store::{Ledger, MemoryStore};
use crate::types::{
    BalanceHolder, Caller, ElStatus, ExportLicense, LcStatus, LetterOfCredit, Party, Role,
    ShipmentLocation, TradeAgreement, TradeStatus,
};

pub const EXPORTER: &str = "LumberInc";
pub const EXPORTER_BANK: &str = "LumberBank";
pub const IMPORTER: &str = "WoodenToys";
pub const IMPORTER_BANK: &str = "ToyBank";
pub const LENDER: &str = "EasyLoans";
pub const LENDER_BANK: &str = "EasyBank";
pub const CARRIER: &str = "UniversalFreight";
pub const REGULATOR: &str = "ForestryDepartment";

pub const EXPORTER_BALANCE: i64 = 100_000;
pub const IMPORTER_BALANCE: i64 = 200_000;
pub const LENDER_BALANCE: i64 = 300_000;

/// Caller holding `role` under the default membership table
pub fn caller(role: Role) -> Caller {
    let policy = MembershipPolicy::default();
    let membership = policy
        .membership(role)
        .expect("default policy covers every role");
    Caller::new(membership.org.clone(), membership.cert_issuer.clone())
}

/// Store with identities and balances recorded
pub fn bootstrapped_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    {
        let mut ledger = Ledger::new(&mut store);
        for (party, identity) in [
            (Party::Exporter, EXPORTER),
            (Party::ExporterBank, EXPORTER_BANK),
            (Party::Importer, IMPORTER),
            (Party::ImporterBank, IMPORTER_BANK),
            (Party::Lender, LENDER),
            (Party::LenderBank, LENDER_BANK),
            (Party::Carrier, CARRIER),
            (Party::Regulator, REGULATOR),
        ] {
            ledger.put_identity(party, identity).unwrap();
        }
        ledger
            .put_balance(BalanceHolder::Exporter, EXPORTER_BALANCE)
            .unwrap();
        ledger
            .put_balance(BalanceHolder::Importer, IMPORTER_BALANCE)
            .unwrap();
        ledger
            .put_balance(BalanceHolder::Lender, LENDER_BALANCE)
            .unwrap();
    }
    store
}

pub fn accepted_trade(amount: i64) -> TradeAgreement {
    let mut trade = TradeAgreement::new(amount, "Wood for Toys");
    trade.status = TradeStatus::Accepted;
    trade
}

pub fn lc_at(status: LcStatus, amount: i64) -> LetterOfCredit {
    let mut lc = LetterOfCredit::requested(EXPORTER, amount);
    if status >= LcStatus::Issued {
        lc.id = "lc8349".to_string();
        lc.expiration_date = "12/31/2018".to_string();
        lc.documents = vec!["E/L".to_string(), "B/L".to_string()];
    }
    if status >= LcStatus::TransferRequested {
        lc.beneficiary = LENDER.to_string();
        lc.discount_rate = rust_decimal::Decimal::new(1, 1);
    }
    lc.status = status;
    lc
}

pub fn issued_license() -> ExportLicense {
    ExportLicense {
        id: "el979".to_string(),
        expiration_date: "4/30/2019".to_string(),
        exporter: EXPORTER.to_string(),
        carrier: CARRIER.to_string(),
        description_of_goods: "Wood for Toys".to_string(),
        approver: REGULATOR.to_string(),
        status: ElStatus::Issued,
    }
}

/// Store holding an accepted trade, an L/C at `status`, an issued E/L and,
/// optionally, a shipment location
pub fn trade_store(
    amount: i64,
    status: LcStatus,
    location: Option<ShipmentLocation>,
) -> MemoryStore {
    let mut store = bootstrapped_store();
    {
        let mut ledger = Ledger::new(&mut store);
        ledger.put_trade("T1", &accepted_trade(amount)).unwrap();
        ledger
            .put_letter_of_credit("T1", &lc_at(status, amount))
            .unwrap();
        ledger.put_export_license("T1", &issued_license()).unwrap();
        if let Some(location) = location {
            ledger.put_shipment_location("T1", &location).unwrap();
        }
    }
    store
}
