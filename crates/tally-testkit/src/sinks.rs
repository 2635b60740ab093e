//! Audit sinks for tests

use parking_lot::Mutex;
use tally_core::{AuditEffects, AuditEvent};

/// Audit sink that keeps every event in emission order
#[derive(Debug, Default)]
pub struct RecordingAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAuditSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Most recent event
    pub fn last(&self) -> Option<AuditEvent> {
        self.events.lock().last().cloned()
    }

    /// Count events accepted by `predicate`
    pub fn count_matching(&self, predicate: impl Fn(&AuditEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| predicate(e)).count()
    }

    /// Count events whose `event_type()` equals `event_type`
    pub fn count_of(&self, event_type: &str) -> usize {
        self.count_matching(|e| e.event_type() == event_type)
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl AuditEffects for RecordingAuditSink {
    fn emit(&self, event: AuditEvent) {
        self.events.lock().push(event);
    }
}
