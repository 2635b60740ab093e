//! Capability tokens
//!
//! Authority over a record is proven by possession of a token, never by caller
//! identity. Three kinds exist, each typed by the resource type `T` it governs:
//!
//! | Token | Gates |
//! |---|---|
//! | [`IssuanceAuthority<T>`] | `issue_one`, `issue_batch` |
//! | [`RetirementAuthority<T>`] | `retire_centralized` (centralized records only) |
//! | [`MetadataAuthority<T>`] | `finalize`, `pause`, `resume`, metadata changes, `freeze_metadata` |
//!
//! Tokens are minted exactly once, by [`RegistrationHandle::create`](crate::RegistrationHandle::create).
//! They are move-only: they can be handed to a delegate but never duplicated.
//!
//! A token typed for one resource is rejected at compile time by a record of
//! another resource:
//!
//! ```compile_fail
//! use std::sync::Arc;
//! use tally_supply::{NullAuditSink, OpaqueId, OriginProof, SupplyOptions, SupplyRegistry};
//! use tally_supply::{TallyResult, TypeIdentity};
//!
//! struct Badge;
//! struct Ticket;
//! struct Origin;
//! impl<T: 'static> OriginProof<T> for Origin {
//!     fn verify(self, _identity: &TypeIdentity) -> TallyResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! let registry = SupplyRegistry::new(Arc::new(NullAuditSink));
//! let badges = registry.register::<Badge, _>(Origin).unwrap().create(SupplyOptions::unlimited());
//! let tickets = registry.register::<Ticket, _>(Origin).unwrap().create(SupplyOptions::unlimited());
//!
//! // IssuanceAuthority<Badge> is not IssuanceAuthority<Ticket>
//! tickets.record.issue_one(&badges.issuance, OpaqueId::derive("t-1")).unwrap();
//! ```
//!
//! Tokens cannot be cloned:
//!
//! ```compile_fail
//! fn duplicate<T>(token: &tally_supply::IssuanceAuthority<T>) -> tally_supply::IssuanceAuthority<T> {
//!     token.clone()
//! }
//! ```
//!
//! Nor built outside this crate:
//!
//! ```compile_fail
//! struct Badge;
//! let forged = tally_supply::MetadataAuthority::<Badge>::mint(tally_supply::RecordId::new());
//! ```

use std::fmt;
use std::marker::PhantomData;
use tally_core::{CapabilityId, RecordId, TallyError, TallyResult};

mod sealed {
    pub trait Sealed {}
}

/// Kind of authority a token carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    /// Issue new objects
    Issuance,
    /// Retire objects on a centralized record
    Retirement,
    /// Govern pause, finalization and metadata
    Metadata,
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityKind::Issuance => f.write_str("issuance"),
            CapabilityKind::Retirement => f.write_str("retirement"),
            CapabilityKind::Metadata => f.write_str("metadata"),
        }
    }
}

/// Common surface of the three token kinds. Sealed: only this crate implements it.
pub trait Capability: sealed::Sealed {
    /// Authority kind carried by this token type
    const KIND: CapabilityKind;

    /// Identity of this token, recorded in audit events
    fn id(&self) -> CapabilityId;

    /// Record whose creation minted this token
    fn record_id(&self) -> RecordId;
}

macro_rules! capability_token {
    ($(#[$meta:meta])* $name:ident => $kind:expr) => {
        $(#[$meta])*
        pub struct $name<T: 'static> {
            id: CapabilityId,
            record_id: RecordId,
            _resource: PhantomData<fn() -> T>,
        }

        impl<T: 'static> $name<T> {
            pub(crate) fn mint(record_id: RecordId) -> Self {
                Self {
                    id: CapabilityId::new(),
                    record_id,
                    _resource: PhantomData,
                }
            }

            /// Identity of this token
            pub fn id(&self) -> CapabilityId {
                self.id
            }

            /// Record whose creation minted this token
            pub fn record_id(&self) -> RecordId {
                self.record_id
            }

            /// Fail with `Authority` if this token was minted for another record.
            ///
            /// Only reachable when one process runs several registries that
            /// each claimed the same Rust type.
            pub(crate) fn authorize(&self, record_id: RecordId) -> TallyResult<()> {
                if self.record_id == record_id {
                    Ok(())
                } else {
                    Err(TallyError::authority(format!(
                        "{} authority {} belongs to {}, not {}",
                        $kind, self.id, self.record_id, record_id
                    )))
                }
            }
        }

        impl<T: 'static> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("id", &self.id)
                    .field("record_id", &self.record_id)
                    .field("resource", &std::any::type_name::<T>())
                    .finish()
            }
        }

        impl<T: 'static> sealed::Sealed for $name<T> {}

        impl<T: 'static> Capability for $name<T> {
            const KIND: CapabilityKind = $kind;

            fn id(&self) -> CapabilityId {
                self.id
            }

            fn record_id(&self) -> RecordId {
                self.record_id
            }
        }
    };
}

capability_token! {
    /// Authority to issue objects of resource type `T`
    IssuanceAuthority => CapabilityKind::Issuance
}

capability_token! {
    /// Authority to retire objects of resource type `T` on a centralized record.
    ///
    /// Exists only when the record was created with `BurnMode::Centralized` and
    /// the retirement authority was requested.
    RetirementAuthority => CapabilityKind::Retirement
}

capability_token! {
    /// Authority over pause, finalization and metadata of resource type `T`.
    ///
    /// Consuming it with `SupplyRecord::freeze_metadata` destroys the only
    /// metadata authority for the record, permanently.
    MetadataAuthority => CapabilityKind::Metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Badge;

    fn kind_of<C: Capability>(_token: &C) -> CapabilityKind {
        C::KIND
    }

    #[test]
    fn test_tokens_carry_kind_and_record() {
        let record_id = RecordId::new();
        let issuance = IssuanceAuthority::<Badge>::mint(record_id);
        let retirement = RetirementAuthority::<Badge>::mint(record_id);
        let metadata = MetadataAuthority::<Badge>::mint(record_id);

        assert_eq!(kind_of(&issuance), CapabilityKind::Issuance);
        assert_eq!(kind_of(&retirement), CapabilityKind::Retirement);
        assert_eq!(kind_of(&metadata), CapabilityKind::Metadata);
        assert_eq!(Capability::record_id(&metadata), record_id);
        assert_ne!(issuance.id(), metadata.id());
    }

    #[test]
    fn test_authorize_rejects_foreign_record() {
        let token = IssuanceAuthority::<Badge>::mint(RecordId::new());
        assert!(token.authorize(token.record_id()).is_ok());
        assert!(matches!(
            token.authorize(RecordId::new()),
            Err(TallyError::Authority { .. })
        ));
    }

    #[test]
    fn test_debug_names_resource() {
        let token = MetadataAuthority::<Badge>::mint(RecordId::new());
        let rendered = format!("{token:?}");
        assert!(rendered.starts_with("MetadataAuthority"));
        assert!(rendered.contains("Badge"));
    }
}
