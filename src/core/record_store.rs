//! Record store adapter
//!
//! This module provides the pieces between the raw key-value contract and the
//! managers:
//! - `RecordKey` derives the deterministic key for every record kind
//! - `MemoryStore` is an ordered in-memory `RecordStore`
//! - `StagedStore` buffers one transition's writes over a read-only base so
//!   they can be applied all at once, or dropped on failure
//! - `Ledger` is the typed view the managers read and write through
//!
//! # Key Layout
//!
//! Per-trade records live under `"<Namespace>:<tradeId>"`. Participant
//! identities and account balances live under fixed keys written once at
//! bootstrap.

use crate::core::traits::RecordStore;
use crate::types::{
    BalanceHolder, BillOfLading, ExportLicense, LetterOfCredit, Party, PendingRequest,
    RequestKind, Role, ShipmentLocation, TradeAgreement, WorkflowError,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Key of a record on the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKey<'a> {
    Trade(&'a str),
    LetterOfCredit(&'a str),
    ExportLicense(&'a str),
    ShipmentLocation(&'a str),
    ArrivalDate(&'a str),
    BillOfLading(&'a str),
    PendingRequest(RequestKind, &'a str),
    Identity(Party),
    Balance(BalanceHolder),
}

impl fmt::Display for RecordKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Trade(id) => write!(f, "Trade:{}", id),
            RecordKey::LetterOfCredit(id) => write!(f, "LetterOfCredit:{}", id),
            RecordKey::ExportLicense(id) => write!(f, "ExportLicense:{}", id),
            RecordKey::ShipmentLocation(id) => write!(f, "ShipmentLocation:{}", id),
            RecordKey::ArrivalDate(id) => write!(f, "ArrivalDate:{}", id),
            RecordKey::BillOfLading(id) => write!(f, "BillOfLading:{}", id),
            RecordKey::PendingRequest(RequestKind::Payment, id) => {
                write!(f, "PaymentRequest:{}", id)
            }
            RecordKey::PendingRequest(RequestKind::AdvancePayment, id) => {
                write!(f, "AdvancePaymentRequest:{}", id)
            }
            RecordKey::Identity(party) => f.write_str(match party {
                Party::Exporter => "Exporter",
                Party::ExporterBank => "ExportersBank",
                Party::Importer => "Importer",
                Party::ImporterBank => "ImportersBank",
                Party::Lender => "Lender",
                Party::LenderBank => "LendersBank",
                Party::Carrier => "Carrier",
                Party::Regulator => "RegulatoryAuthority",
            }),
            RecordKey::Balance(holder) => f.write_str(match holder {
                BalanceHolder::Exporter => "ExportersAccountBalance",
                BalanceHolder::Importer => "ImportersAccountBalance",
                BalanceHolder::Lender => "LendersAccountBalance",
            }),
        }
    }
}

/// Ordered in-memory record store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            records: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, WorkflowError> {
        Ok(self.records.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), WorkflowError> {
        self.records.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), WorkflowError> {
        self.records.remove(key);
        Ok(())
    }
}

/// One buffered mutation; `None` deletes the key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedWrite {
    pub key: String,
    pub value: Option<Vec<u8>>,
}

/// Write set of a single transition, layered over a read-only base store
///
/// Reads observe the transition's own writes first. Nothing reaches the base
/// store until the caller applies the write set returned by `into_writes`.
pub struct StagedStore<'a, S: RecordStore + ?Sized> {
    base: &'a S,
    writes: BTreeMap<String, Option<Vec<u8>>>,
}

impl<'a, S: RecordStore + ?Sized> StagedStore<'a, S> {
    pub fn new(base: &'a S) -> Self {
        StagedStore {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// Consume the stage, yielding writes in key order
    pub fn into_writes(self) -> Vec<StagedWrite> {
        self.writes
            .into_iter()
            .map(|(key, value)| StagedWrite { key, value })
            .collect()
    }
}

impl<S: RecordStore + ?Sized> RecordStore for StagedStore<'_, S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, WorkflowError> {
        match self.writes.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => self.base.get(key),
        }
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), WorkflowError> {
        self.writes.insert(key.to_string(), Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), WorkflowError> {
        self.writes.insert(key.to_string(), None);
        Ok(())
    }
}

/// Apply a staged write set to the backing store
pub fn apply_writes<S: RecordStore + ?Sized>(
    store: &mut S,
    writes: Vec<StagedWrite>,
) -> Result<(), WorkflowError> {
    for write in writes {
        match write.value {
            Some(value) => store.put(&write.key, value)?,
            None => store.delete(&write.key)?,
        }
    }
    Ok(())
}

/// Typed view over a record store
///
/// Values are stored as JSON. Each `require_*` accessor turns an absent
/// record into `NotFound`.
pub struct Ledger<'s> {
    store: &'s mut dyn RecordStore,
}

impl<'s> Ledger<'s> {
    pub fn new(store: &'s mut dyn RecordStore) -> Self {
        Ledger { store }
    }

    fn read<T: DeserializeOwned>(&self, key: RecordKey<'_>) -> Result<Option<T>, WorkflowError> {
        let key = key.to_string();
        match self.store.get(&key)? {
            Some(bytes) if !bytes.is_empty() => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| WorkflowError::Codec {
                    message: format!("{}: {}", key, e),
                }),
            _ => Ok(None),
        }
    }

    fn write<T: Serialize>(&mut self, key: RecordKey<'_>, value: &T) -> Result<(), WorkflowError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.put(&key.to_string(), bytes)
    }

    fn remove(&mut self, key: RecordKey<'_>) -> Result<(), WorkflowError> {
        self.store.delete(&key.to_string())
    }

    pub fn trade(&self, trade_id: &str) -> Result<Option<TradeAgreement>, WorkflowError> {
        self.read(RecordKey::Trade(trade_id))
    }

    pub fn require_trade(&self, trade_id: &str) -> Result<TradeAgreement, WorkflowError> {
        self.trade(trade_id)?
            .ok_or_else(|| WorkflowError::not_found("trade agreement", trade_id))
    }

    pub fn put_trade(&mut self, trade_id: &str, trade: &TradeAgreement) -> Result<(), WorkflowError> {
        self.write(RecordKey::Trade(trade_id), trade)
    }

    pub fn letter_of_credit(&self, trade_id: &str) -> Result<Option<LetterOfCredit>, WorkflowError> {
        self.read(RecordKey::LetterOfCredit(trade_id))
    }

    pub fn require_letter_of_credit(&self, trade_id: &str) -> Result<LetterOfCredit, WorkflowError> {
        self.letter_of_credit(trade_id)?
            .ok_or_else(|| WorkflowError::not_found("letter of credit", trade_id))
    }

    pub fn put_letter_of_credit(
        &mut self,
        trade_id: &str,
        lc: &LetterOfCredit,
    ) -> Result<(), WorkflowError> {
        self.write(RecordKey::LetterOfCredit(trade_id), lc)
    }

    pub fn export_license(&self, trade_id: &str) -> Result<Option<ExportLicense>, WorkflowError> {
        self.read(RecordKey::ExportLicense(trade_id))
    }

    pub fn require_export_license(&self, trade_id: &str) -> Result<ExportLicense, WorkflowError> {
        self.export_license(trade_id)?
            .ok_or_else(|| WorkflowError::not_found("export license", trade_id))
    }

    pub fn put_export_license(
        &mut self,
        trade_id: &str,
        license: &ExportLicense,
    ) -> Result<(), WorkflowError> {
        self.write(RecordKey::ExportLicense(trade_id), license)
    }

    pub fn shipment_location(
        &self,
        trade_id: &str,
    ) -> Result<Option<ShipmentLocation>, WorkflowError> {
        self.read(RecordKey::ShipmentLocation(trade_id))
    }

    /// Shipment location, or `InvalidState` if the shipment was never prepared
    pub fn require_prepared_shipment(
        &self,
        trade_id: &str,
    ) -> Result<ShipmentLocation, WorkflowError> {
        self.shipment_location(trade_id)?
            .ok_or_else(|| WorkflowError::invalid_state(trade_id, "shipment not prepared yet"))
    }

    pub fn put_shipment_location(
        &mut self,
        trade_id: &str,
        location: &ShipmentLocation,
    ) -> Result<(), WorkflowError> {
        self.write(RecordKey::ShipmentLocation(trade_id), location)
    }

    pub fn arrival_date(&self, trade_id: &str) -> Result<Option<String>, WorkflowError> {
        self.read(RecordKey::ArrivalDate(trade_id))
    }

    pub fn put_arrival_date(&mut self, trade_id: &str, date: &str) -> Result<(), WorkflowError> {
        self.write(RecordKey::ArrivalDate(trade_id), &date)
    }

    pub fn bill_of_lading(&self, trade_id: &str) -> Result<Option<BillOfLading>, WorkflowError> {
        self.read(RecordKey::BillOfLading(trade_id))
    }

    pub fn put_bill_of_lading(
        &mut self,
        trade_id: &str,
        bill: &BillOfLading,
    ) -> Result<(), WorkflowError> {
        self.write(RecordKey::BillOfLading(trade_id), bill)
    }

    pub fn pending_request(
        &self,
        kind: RequestKind,
        trade_id: &str,
    ) -> Result<Option<PendingRequest>, WorkflowError> {
        self.read(RecordKey::PendingRequest(kind, trade_id))
    }

    pub fn open_request(
        &mut self,
        kind: RequestKind,
        trade_id: &str,
        requested_by: Role,
    ) -> Result<(), WorkflowError> {
        let request = PendingRequest { kind, requested_by };
        self.write(RecordKey::PendingRequest(kind, trade_id), &request)
    }

    pub fn close_request(&mut self, kind: RequestKind, trade_id: &str) -> Result<(), WorkflowError> {
        self.remove(RecordKey::PendingRequest(kind, trade_id))
    }

    /// Identity recorded for `party` at bootstrap
    pub fn identity(&self, party: Party) -> Result<String, WorkflowError> {
        let key = RecordKey::Identity(party);
        self.read(key)?
            .ok_or_else(|| WorkflowError::not_found("participant identity", &key.to_string()))
    }

    pub fn put_identity(&mut self, party: Party, identity: &str) -> Result<(), WorkflowError> {
        self.write(RecordKey::Identity(party), &identity)
    }

    /// Balance of `holder`, or `None` before bootstrap
    pub fn recorded_balance(&self, holder: BalanceHolder) -> Result<Option<i64>, WorkflowError> {
        self.read(RecordKey::Balance(holder))
    }

    pub fn balance(&self, holder: BalanceHolder) -> Result<i64, WorkflowError> {
        self.recorded_balance(holder)?.ok_or_else(|| {
            WorkflowError::not_found("account balance", &RecordKey::Balance(holder).to_string())
        })
    }

    pub fn put_balance(&mut self, holder: BalanceHolder, balance: i64) -> Result<(), WorkflowError> {
        self.write(RecordKey::Balance(holder), &balance)
    }
}
