//! Core traits for record storage and caller identity
//!
//! These are the two seams to external collaborators: the replicated
//! key-value store that persists records, and the membership service that
//! asserts a caller's roles. Managers only ever see these traits.

use crate::types::{Caller, Role, WorkflowError};

/// Minimal key-value contract over the shared ledger
///
/// Implementations provide linearizable per-key reads and writes. Missing
/// keys read as `None`.
pub trait RecordStore {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, WorkflowError>;

    /// Write `value` under `key`, replacing any previous value
    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), WorkflowError>;

    /// Remove `key`; removing an absent key is not an error
    fn delete(&mut self, key: &str) -> Result<(), WorkflowError>;
}

/// Role verifier over a caller's organisational identity
///
/// `verify` is the policy hook. The per-role predicates default to it and
/// are what `Authority` asks, so a gate can override one capability alone.
pub trait IdentityGate {
    /// Whether `caller` holds `role`
    fn verify(&self, caller: &Caller, role: Role) -> bool;

    fn is_importer(&self, caller: &Caller) -> bool {
        self.verify(caller, Role::Importer)
    }

    fn is_exporter(&self, caller: &Caller) -> bool {
        self.verify(caller, Role::Exporter)
    }

    fn is_importer_bank(&self, caller: &Caller) -> bool {
        self.verify(caller, Role::ImporterBank)
    }

    fn is_exporter_bank(&self, caller: &Caller) -> bool {
        self.verify(caller, Role::ExporterBank)
    }

    fn is_lender(&self, caller: &Caller) -> bool {
        self.verify(caller, Role::Lender)
    }

    fn is_lender_bank(&self, caller: &Caller) -> bool {
        self.verify(caller, Role::LenderBank)
    }

    fn is_carrier(&self, caller: &Caller) -> bool {
        self.verify(caller, Role::Carrier)
    }

    fn is_regulator(&self, caller: &Caller) -> bool {
        self.verify(caller, Role::Regulator)
    }

    fn is_exporting_entity(&self, caller: &Caller) -> bool {
        self.verify(caller, Role::ExportingEntity)
    }
}
