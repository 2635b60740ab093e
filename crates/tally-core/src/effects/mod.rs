//! Effect interfaces for external collaborators
//!
//! Tally consumes two collaborators it does not implement: an audit sink that
//! forwards events to indexers, and a type-origin proof that attests the caller
//! controls a resource type. Handlers live with the caller; this module only
//! defines **what** they must do.

pub mod audit;
pub mod origin;

pub use audit::{AuditEffects, NullAuditSink, SharedAuditSink, TracingAuditSink};
pub use origin::OriginProof;
