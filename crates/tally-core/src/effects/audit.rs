//! Audit effect interface

use crate::events::AuditEvent;
use std::sync::Arc;

/// Sink for audit events.
///
/// `emit` is called while the emitting record is locked, so implementations must
/// return promptly and must not call back into the record. Delivery is
/// fire-and-forget: a sink cannot veto or fail an operation.
pub trait AuditEffects: Send + Sync {
    /// Deliver one event
    fn emit(&self, event: AuditEvent);
}

/// Audit sink shared between a registry and the records it creates
pub type SharedAuditSink = Arc<dyn AuditEffects>;

impl<T: AuditEffects + ?Sized> AuditEffects for Arc<T> {
    fn emit(&self, event: AuditEvent) {
        (**self).emit(event);
    }
}

/// Forwards every event to `tracing` under the `tally::audit` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditEffects for TracingAuditSink {
    fn emit(&self, event: AuditEvent) {
        tracing::info!(
            target: "tally::audit",
            event_type = event.event_type(),
            record_id = ?event.record_id(),
            event = ?event,
            "audit event"
        );
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAuditSink;

impl AuditEffects for NullAuditSink {
    fn emit(&self, _event: AuditEvent) {}
}
