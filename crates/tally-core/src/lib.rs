//! Tally Core - shared vocabulary for supply tracking
//!
//! This crate holds the types every other Tally crate speaks in: the unified
//! error, identifiers, audit events and the effect interfaces for collaborators
//! that Tally consumes but does not implement.
//!
//! # Contents
//! - [`TallyError`]: one error enum with a distinguishable variant per failure reason
//! - [`RecordId`], [`RegistryId`], [`CapabilityId`], [`TypeIdentity`], [`OpaqueId`]
//! - [`AuditEvent`]: the event contract with external indexers
//! - [`AuditEffects`], [`OriginProof`]: collaborator interfaces

#![forbid(unsafe_code)]

/// Unified error handling
pub mod errors;

/// Registry, record, capability, type and object identifiers
pub mod identifiers;

/// Audit events emitted by registries and records
pub mod events;

/// Collaborator interfaces (audit sink, type-origin proof)
pub mod effects;

pub use effects::{AuditEffects, NullAuditSink, OriginProof, SharedAuditSink, TracingAuditSink};
pub use errors::{Result as TallyResult, TallyError};
pub use events::{AuditEvent, RetirerKind};
pub use identifiers::{CapabilityId, OpaqueId, RecordId, RegistryId, TypeIdentity};
