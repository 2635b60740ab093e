//! Tally Supply - per-type supply records and capability authority
//!
//! This crate tracks how many objects of a resource type exist and who may
//! change that number. It never owns the objects: they live in some external
//! store and are referred to only by an [`OpaqueId`].
//!
//! # Architecture
//!
//! - [`SupplyRegistry`]: at most one record per resource type
//! - [`SupplyRecord<T>`]: counters, optional cap, pause flag, burn mode, side table
//! - [`IssuanceAuthority<T>`], [`RetirementAuthority<T>`], [`MetadataAuthority<T>`]:
//!   move-only tokens minted once at creation
//! - [`BurnMode`]: centralized (token-holder retires) or decentralized (object holder retires)
//! - [`SupplyOptions`]: validated creation policy, loadable from TOML
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tally_supply::{NullAuditSink, OpaqueId, OriginProof, SupplyOptions, SupplyRegistry};
//! use tally_supply::{TallyError, TallyResult, TypeIdentity};
//!
//! struct Badge;
//! struct Origin;
//! impl OriginProof<Badge> for Origin {
//!     fn verify(self, _identity: &TypeIdentity) -> TallyResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! let registry = SupplyRegistry::new(Arc::new(NullAuditSink));
//! let badges = registry
//!     .register::<Badge, _>(Origin)?
//!     .create(SupplyOptions::capped(2));
//!
//! badges.record.issue_one(&badges.issuance, OpaqueId::derive("badge-1"))?;
//! badges.record.issue_one(&badges.issuance, OpaqueId::derive("badge-2"))?;
//! assert!(matches!(
//!     badges.record.issue_one(&badges.issuance, OpaqueId::derive("badge-3")),
//!     Err(TallyError::SupplyExceeded { .. })
//! ));
//!
//! if let Some(retirement) = &badges.retirement {
//!     badges.record.retire_centralized(retirement, OpaqueId::derive("badge-1"))?;
//! }
//! assert_eq!(badges.record.supply(), 1);
//! # Ok::<(), TallyError>(())
//! ```

#![forbid(unsafe_code)]

/// Burn modes
pub mod burn;

/// Capability tokens
pub mod capability;

/// Record creation options
pub mod config;

/// Metadata change flags
pub mod metadata;

/// Supply records
pub mod record;

/// Uniqueness registry
pub mod registry;

mod counters;
mod side_table;

pub use burn::BurnMode;
pub use capability::{
    Capability, CapabilityKind, IssuanceAuthority, MetadataAuthority, RetirementAuthority,
};
pub use config::SupplyOptions;
pub use metadata::MetadataFields;
pub use record::{SupplyRecord, SupplySnapshot};
pub use registry::{CreatedSupply, RegistrationHandle, SupplyRegistry};

pub use tally_core::{
    AuditEffects, AuditEvent, CapabilityId, NullAuditSink, OpaqueId, OriginProof, RecordId,
    RegistryId, RetirerKind, SharedAuditSink, TallyError, TallyResult, TracingAuditSink,
    TypeIdentity,
};
