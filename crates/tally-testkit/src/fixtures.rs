//! Registry fixtures

use crate::origin::TrustedOrigin;
use crate::sinks::RecordingAuditSink;
use std::sync::Arc;
use tally_core::{AuditEvent, OpaqueId, SharedAuditSink};
use tally_supply::{CreatedSupply, SupplyOptions, SupplyRegistry};

/// A registry wired to a [`RecordingAuditSink`]
#[derive(Debug)]
pub struct SupplyFixture {
    /// Registry under test
    pub registry: Arc<SupplyRegistry>,
    /// Every event the registry and its records emitted
    pub sink: Arc<RecordingAuditSink>,
}

impl SupplyFixture {
    /// Fresh registry with an empty recording sink
    pub fn new() -> Self {
        crate::init_test_tracing();
        let sink = Arc::new(RecordingAuditSink::new());
        let shared: SharedAuditSink = sink.clone();
        Self {
            registry: SupplyRegistry::shared(shared),
            sink,
        }
    }

    /// Register `T` with a trusted origin and create its record.
    ///
    /// Panics if `T` is already registered in this fixture.
    pub fn create<T: 'static>(&self, options: SupplyOptions) -> CreatedSupply<T> {
        self.registry
            .register_and_create::<T, _>(TrustedOrigin::<T>::new(), options)
            .expect("fixture registration")
    }

    /// Recorded events
    pub fn events(&self) -> Vec<AuditEvent> {
        self.sink.events()
    }
}

impl Default for SupplyFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic opaque ids `label-0 .. label-(count-1)`
pub fn opaque_ids(label: &str, count: usize) -> Vec<OpaqueId> {
    (0..count)
        .map(|i| OpaqueId::derive(format!("{label}-{i}")))
        .collect()
}
