//! Audit events
//!
//! Events are the compatibility contract with external indexers: field names and
//! shapes are stable. They are emitted after the state change they describe has
//! been applied, inside the same critical section.

use crate::identifiers::{CapabilityId, OpaqueId, RecordId, RegistryId, TypeIdentity};
use serde::{Deserialize, Serialize};

/// Which retirement entry point produced a `Retired` event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetirerKind {
    /// Retired by a holder of the retirement authority
    Centralized,
    /// Retired by the holder of the object itself
    Holder,
}

/// Audit events observed by external indexers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A uniqueness registry came into existence
    RegistryInitialized {
        /// Registry identity
        registry_id: RegistryId,
    },

    /// A resource type was claimed and bound to its canonical record
    RecordRegistered {
        /// Claimed resource type
        type_identity: TypeIdentity,
        /// Canonical record for that type
        record_id: RecordId,
    },

    /// A single object was issued
    Issued {
        /// Record that was charged
        record_id: RecordId,
        /// Object that was issued
        opaque_id: OpaqueId,
        /// Issuance authority used
        issuer: CapabilityId,
        /// Value of `issued` after this issuance
        sequence: u64,
    },

    /// A batch of objects was issued in one step
    BatchIssued {
        /// Record that was charged
        record_id: RecordId,
        /// Objects that were issued, in request order
        opaque_ids: Vec<OpaqueId>,
        /// Batch length
        count: u64,
    },

    /// An object was retired
    Retired {
        /// Record that was charged
        record_id: RecordId,
        /// Object that was retired
        opaque_id: OpaqueId,
        /// Entry point that performed the retirement
        retirer_kind: RetirerKind,
    },

    /// Externally stored metadata fields changed
    MetadataChanged {
        /// Record the metadata belongs to
        record_id: RecordId,
        /// Bitmask of changed fields
        changed_fields_bitmask: u32,
    },

    /// Metadata authority was destroyed
    MetadataFrozen {
        /// Record whose metadata is now immutable
        record_id: RecordId,
    },

    /// Issuance was paused
    Paused {
        /// Paused record
        record_id: RecordId,
    },

    /// Issuance was resumed
    Resumed {
        /// Resumed record
        record_id: RecordId,
    },

    /// The cap was pinned to the current issued count
    SupplyFinalized {
        /// Finalized record
        record_id: RecordId,
        /// Cap now in force
        final_cap: u64,
    },
}

impl AuditEvent {
    /// Record this event concerns, if any
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            AuditEvent::RegistryInitialized { .. } => None,
            AuditEvent::RecordRegistered { record_id, .. }
            | AuditEvent::Issued { record_id, .. }
            | AuditEvent::BatchIssued { record_id, .. }
            | AuditEvent::Retired { record_id, .. }
            | AuditEvent::MetadataChanged { record_id, .. }
            | AuditEvent::MetadataFrozen { record_id }
            | AuditEvent::Paused { record_id }
            | AuditEvent::Resumed { record_id }
            | AuditEvent::SupplyFinalized { record_id, .. } => Some(*record_id),
        }
    }

    /// Event type name, matching the serialized `type` tag
    pub fn event_type(&self) -> &'static str {
        match self {
            AuditEvent::RegistryInitialized { .. } => "registry_initialized",
            AuditEvent::RecordRegistered { .. } => "record_registered",
            AuditEvent::Issued { .. } => "issued",
            AuditEvent::BatchIssued { .. } => "batch_issued",
            AuditEvent::Retired { .. } => "retired",
            AuditEvent::MetadataChanged { .. } => "metadata_changed",
            AuditEvent::MetadataFrozen { .. } => "metadata_frozen",
            AuditEvent::Paused { .. } => "paused",
            AuditEvent::Resumed { .. } => "resumed",
            AuditEvent::SupplyFinalized { .. } => "supply_finalized",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_matches_serde_tag() {
        let event = AuditEvent::SupplyFinalized {
            record_id: RecordId::new(),
            final_cap: 10,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.event_type());
        assert_eq!(json["final_cap"], 10);
    }

    #[test]
    fn test_retired_event_shape() {
        let record_id = RecordId::new();
        let event = AuditEvent::Retired {
            record_id,
            opaque_id: OpaqueId::derive("x"),
            retirer_kind: RetirerKind::Holder,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["retirer_kind"], "holder");
        assert_eq!(event.record_id(), Some(record_id));
    }

    #[test]
    fn test_registry_event_has_no_record() {
        let event = AuditEvent::RegistryInitialized {
            registry_id: RegistryId::new(),
        };
        assert_eq!(event.record_id(), None);
    }
}
