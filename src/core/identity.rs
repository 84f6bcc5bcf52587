//! Identity gate
//!
//! `MembershipPolicy` maps each role to the organisation and certificate
//! issuer that hold it. `Authority` binds a gate to the caller of the current
//! transition and turns failed role checks into `AccessDenied`.

use crate::core::traits::IdentityGate;
use crate::types::{Caller, Role, WorkflowError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Organisation and certificate issuer that hold a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub org: String,
    pub cert_issuer: String,
}

impl Membership {
    pub fn new(org: impl Into<String>, cert_issuer: impl Into<String>) -> Self {
        Membership {
            org: org.into(),
            cert_issuer: cert_issuer.into(),
        }
    }

    fn admits(&self, caller: &Caller) -> bool {
        self.org == caller.org && self.cert_issuer == caller.cert_issuer
    }
}

/// Role table of the trade network
///
/// A caller holds a role when both its organisation and its certificate
/// issuer match the entry for that role. Roles without an entry are held by
/// nobody. Several roles may share one entry; in the default network the
/// importer and its bank are the same organisation, and likewise for the
/// exporter and the lender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipPolicy {
    members: BTreeMap<Role, Membership>,
}

impl MembershipPolicy {
    /// Create a policy in which nobody holds any role
    pub fn empty() -> Self {
        MembershipPolicy {
            members: BTreeMap::new(),
        }
    }

    /// Grant `role` to the given organisation and issuer, replacing any
    /// previous entry
    pub fn with_member(
        mut self,
        role: Role,
        org: impl Into<String>,
        cert_issuer: impl Into<String>,
    ) -> Self {
        self.members.insert(role, Membership::new(org, cert_issuer));
        self
    }

    pub fn membership(&self, role: Role) -> Option<&Membership> {
        self.members.get(&role)
    }

    /// All roles `caller` holds, in role order
    pub fn roles_of(&self, caller: &Caller) -> Vec<Role> {
        self.members
            .iter()
            .filter(|(_, membership)| membership.admits(caller))
            .map(|(role, _)| *role)
            .collect()
    }
}

impl Default for MembershipPolicy {
    fn default() -> Self {
        const IMPORTER: (&str, &str) = ("ImporterOrgMSP", "ca.importerorg.trade.com");
        const EXPORTER: (&str, &str) = ("ExporterOrgMSP", "ca.exporterorg.trade.com");
        const LENDER: (&str, &str) = ("LenderOrgMSP", "ca.lenderorg.trade.com");

        MembershipPolicy::empty()
            .with_member(Role::Importer, IMPORTER.0, IMPORTER.1)
            .with_member(Role::ImporterBank, IMPORTER.0, IMPORTER.1)
            .with_member(Role::Exporter, EXPORTER.0, EXPORTER.1)
            .with_member(Role::ExporterBank, EXPORTER.0, EXPORTER.1)
            .with_member(Role::Lender, LENDER.0, LENDER.1)
            .with_member(Role::LenderBank, LENDER.0, LENDER.1)
            .with_member(Role::Carrier, "CarrierOrgMSP", "ca.carrierorg.trade.com")
            .with_member(
                Role::Regulator,
                "RegulatorOrgMSP",
                "ca.regulatororg.trade.com",
            )
            .with_member(
                Role::ExportingEntity,
                "ExportingEntityOrgMSP",
                "ca.exportingentityorg.trade.com",
            )
    }
}

impl IdentityGate for MembershipPolicy {
    fn verify(&self, caller: &Caller, role: Role) -> bool {
        self.members
            .get(&role)
            .is_some_and(|membership| membership.admits(caller))
    }
}

/// Role checks for the caller of one transition
pub struct Authority<'a> {
    gate: &'a dyn IdentityGate,
    caller: &'a Caller,
}

impl<'a> Authority<'a> {
    pub fn new(gate: &'a dyn IdentityGate, caller: &'a Caller) -> Self {
        Authority { gate, caller }
    }

    pub fn caller(&self) -> &Caller {
        self.caller
    }

    /// Whether the caller holds `role`, asked through the gate's
    /// capability check for that role
    pub fn holds(&self, role: Role) -> bool {
        let caller = self.caller;
        match role {
            Role::Importer => self.gate.is_importer(caller),
            Role::Exporter => self.gate.is_exporter(caller),
            Role::ImporterBank => self.gate.is_importer_bank(caller),
            Role::ExporterBank => self.gate.is_exporter_bank(caller),
            Role::Lender => self.gate.is_lender(caller),
            Role::LenderBank => self.gate.is_lender_bank(caller),
            Role::Carrier => self.gate.is_carrier(caller),
            Role::Regulator => self.gate.is_regulator(caller),
            Role::ExportingEntity => self.gate.is_exporting_entity(caller),
        }
    }

    /// Require the caller to hold `role`
    ///
    /// # Errors
    ///
    /// `AccessDenied` naming `operation` if the role check fails
    pub fn require(&self, role: Role, operation: &str) -> Result<(), WorkflowError> {
        if self.holds(role) {
            Ok(())
        } else {
            Err(WorkflowError::access_denied(operation, &role.to_string()))
        }
    }

    /// Require the caller to hold at least one of `roles`
    ///
    /// Returns the first role in `roles` the caller holds, so callers with
    /// several roles resolve deterministically.
    pub fn require_any(&self, roles: &[Role], operation: &str) -> Result<Role, WorkflowError> {
        roles
            .iter()
            .copied()
            .find(|role| self.holds(*role))
            .ok_or_else(|| {
                let required = roles
                    .iter()
                    .map(Role::to_string)
                    .collect::<Vec<_>>()
                    .join(" or ");
                WorkflowError::access_denied(operation, &required)
            })
    }
}
