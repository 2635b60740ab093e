//! Supply records
//!
//! A [`SupplyRecord<T>`] is the canonical tracking record for resource type `T`:
//! issued and retired counters, optional cap, pause flag, burn mode and the
//! side table of issued object ids. Every clone of the handle refers to the same
//! record, and every mutation runs inside the record's single lock:
//!
//! 1. the operation is checked against the record's burn mode and the
//!    presented token against this record,
//! 2. every remaining precondition is checked,
//! 3. counters and side table are updated together,
//! 4. the audit event is emitted.
//!
//! A failure in steps 1 or 2 returns before step 3, so a rejected call leaves
//! no counter change, no side-table entry and no event behind.

use crate::burn::BurnMode;
use crate::capability::{IssuanceAuthority, MetadataAuthority, RetirementAuthority};
use crate::config::SupplyOptions;
use crate::counters::SupplyCounters;
use crate::metadata::MetadataFields;
use crate::side_table::SideTable;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tally_core::{
    AuditEvent, OpaqueId, RecordId, RetirerKind, SharedAuditSink, TallyError, TallyResult,
    TypeIdentity,
};
use tracing::{debug, info, instrument, warn};

/// Consistent view of a record at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplySnapshot {
    /// Record identity
    pub record_id: RecordId,
    /// Governed resource type
    pub type_identity: TypeIdentity,
    /// Objects issued so far
    pub issued: u64,
    /// Objects retired so far
    pub retired: u64,
    /// `issued - retired`
    pub supply: u64,
    /// Cap, if any
    pub cap: Option<u64>,
    /// `cap - issued`, if capped
    pub remaining: Option<u64>,
    /// Whether issuance is paused
    pub paused: bool,
    /// Retirement model
    pub burn_mode: BurnMode,
    /// Whether the metadata authority has been destroyed
    pub metadata_frozen: bool,
    /// Side-table entries, retired ones included
    pub tracked: u64,
}

struct RecordState {
    counters: SupplyCounters,
    side_table: SideTable,
    metadata_frozen: bool,
}

struct RecordInner {
    id: RecordId,
    burn_mode: BurnMode,
    state: Mutex<RecordState>,
    sink: SharedAuditSink,
}

/// Shared handle to the canonical record of resource type `T`
pub struct SupplyRecord<T: 'static> {
    inner: Arc<RecordInner>,
    _resource: PhantomData<fn() -> T>,
}

impl<T: 'static> Clone for SupplyRecord<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _resource: PhantomData,
        }
    }
}

impl<T: 'static> fmt::Debug for SupplyRecord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupplyRecord")
            .field("id", &self.inner.id)
            .field("resource", &std::any::type_name::<T>())
            .field("burn_mode", &self.inner.burn_mode)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> SupplyRecord<T> {
    pub(crate) fn new(
        id: RecordId,
        type_identity: TypeIdentity,
        options: &SupplyOptions,
        sink: SharedAuditSink,
    ) -> Self {
        let state = RecordState {
            counters: SupplyCounters::new(options.cap()),
            side_table: SideTable::new(type_identity),
            metadata_frozen: false,
        };
        Self {
            inner: Arc::new(RecordInner {
                id,
                burn_mode: options.burn_mode(),
                state: Mutex::new(state),
                sink,
            }),
            _resource: PhantomData,
        }
    }

    fn rejected(&self, operation: &'static str, err: TallyError) -> TallyError {
        warn!(
            record_id = %self.inner.id,
            operation,
            code = err.code(),
            error = %err,
            "supply operation rejected"
        );
        err
    }

    // === Issuance ===

    /// Issue one object, returning its sequence number (the new `issued`).
    ///
    /// Fails with `Paused`, `SupplyExceeded` or `DuplicateAttachment`, with no
    /// effect, when the object cannot be issued.
    pub fn issue_one(
        &self,
        authority: &IssuanceAuthority<T>,
        opaque_id: OpaqueId,
    ) -> TallyResult<u64> {
        authority
            .authorize(self.inner.id)
            .map_err(|e| self.rejected("issue_one", e))?;

        let mut state = self.inner.state.lock();
        if let Err(err) = state
            .counters
            .check_issue(1)
            .and_then(|()| state.side_table.check_vacant(&[opaque_id]))
        {
            return Err(self.rejected("issue_one", err));
        }

        let sequence = state.counters.commit_issue(1);
        state.side_table.attach(opaque_id, self.inner.id)?;
        self.inner.sink.emit(AuditEvent::Issued {
            record_id: self.inner.id,
            opaque_id,
            issuer: authority.id(),
            sequence,
        });

        debug!(
            record_id = %self.inner.id,
            opaque_id = %opaque_id,
            sequence,
            cap = ?state.counters.cap(),
            "issued"
        );
        Ok(sequence)
    }

    /// Issue a batch of objects in one step.
    ///
    /// Either all ids are attached, `issued` grows by the batch length and one
    /// `BatchIssued` event is emitted, or nothing changes at all. An empty batch
    /// is rejected as `Invalid`.
    #[instrument(skip(self, authority, opaque_ids), fields(record_id = %self.inner.id, count = opaque_ids.len()))]
    pub fn issue_batch(
        &self,
        authority: &IssuanceAuthority<T>,
        opaque_ids: &[OpaqueId],
    ) -> TallyResult<()> {
        authority
            .authorize(self.inner.id)
            .map_err(|e| self.rejected("issue_batch", e))?;
        if opaque_ids.is_empty() {
            return Err(self.rejected(
                "issue_batch",
                TallyError::invalid("batch issuance needs at least one id"),
            ));
        }
        let count = opaque_ids.len() as u64;

        let mut state = self.inner.state.lock();
        if let Err(err) = state
            .counters
            .check_issue(count)
            .and_then(|()| state.side_table.check_vacant(opaque_ids))
        {
            return Err(self.rejected("issue_batch", err));
        }

        let issued = state.counters.commit_issue(count);
        state.side_table.attach_all(opaque_ids, self.inner.id)?;
        self.inner.sink.emit(AuditEvent::BatchIssued {
            record_id: self.inner.id,
            opaque_ids: opaque_ids.to_vec(),
            count,
        });

        debug!(issued, cap = ?state.counters.cap(), "batch issued");
        Ok(())
    }

    // === Retirement ===

    /// Retire an object using the retirement authority.
    ///
    /// Only valid on a centralized record; on a decentralized one it fails with
    /// `WrongBurnMode` for every input, whatever token is presented.
    pub fn retire_centralized(
        &self,
        authority: &RetirementAuthority<T>,
        opaque_id: OpaqueId,
    ) -> TallyResult<()> {
        self.retire(RetirerKind::Centralized, Some(authority), opaque_id)
    }

    /// Retire an object on behalf of its holder.
    ///
    /// Takes no token. The calling layer must already have established that the
    /// caller holds the object; this record only checks that the id was issued
    /// here and not yet retired. Only valid on a decentralized record.
    pub fn retire_by_holder(&self, opaque_id: OpaqueId) -> TallyResult<()> {
        self.retire(RetirerKind::Holder, None, opaque_id)
    }

    fn retire(
        &self,
        retirer_kind: RetirerKind,
        authority: Option<&RetirementAuthority<T>>,
        opaque_id: OpaqueId,
    ) -> TallyResult<()> {
        let operation = match retirer_kind {
            RetirerKind::Centralized => "retire_centralized",
            RetirerKind::Holder => "retire_by_holder",
        };
        self.inner
            .burn_mode
            .require(retirer_kind)
            .map_err(|e| self.rejected(operation, e))?;
        if let Some(authority) = authority {
            authority
                .authorize(self.inner.id)
                .map_err(|e| self.rejected(operation, e))?;
        }

        let mut state = self.inner.state.lock();
        if let Err(err) = state.side_table.check_retirable(&opaque_id) {
            return Err(self.rejected(operation, err));
        }

        state.side_table.mark_retired(&opaque_id)?;
        let retired = state.counters.commit_retire();
        self.inner.sink.emit(AuditEvent::Retired {
            record_id: self.inner.id,
            opaque_id,
            retirer_kind,
        });

        debug!(
            record_id = %self.inner.id,
            opaque_id = %opaque_id,
            retired,
            ?retirer_kind,
            "retired"
        );
        Ok(())
    }

    // === Metadata authority ===

    /// Pin the cap to the current issued count. Irreversible.
    ///
    /// Fails with `AlreadyFinalized` if a cap is already in force, whether it
    /// came from creation or an earlier finalize.
    pub fn finalize(&self, authority: &MetadataAuthority<T>) -> TallyResult<u64> {
        authority
            .authorize(self.inner.id)
            .map_err(|e| self.rejected("finalize", e))?;

        let mut state = self.inner.state.lock();
        let final_cap = state
            .counters
            .finalize()
            .map_err(|e| self.rejected("finalize", e))?;
        self.inner.sink.emit(AuditEvent::SupplyFinalized {
            record_id: self.inner.id,
            final_cap,
        });

        info!(record_id = %self.inner.id, final_cap, "supply finalized");
        Ok(final_cap)
    }

    /// Stop issuance until [`resume`](Self::resume). Repeating is a no-op.
    pub fn pause(&self, authority: &MetadataAuthority<T>) -> TallyResult<()> {
        self.set_paused(authority, true)
    }

    /// Allow issuance again. Repeating is a no-op.
    pub fn resume(&self, authority: &MetadataAuthority<T>) -> TallyResult<()> {
        self.set_paused(authority, false)
    }

    fn set_paused(&self, authority: &MetadataAuthority<T>, paused: bool) -> TallyResult<()> {
        let operation = if paused { "pause" } else { "resume" };
        authority
            .authorize(self.inner.id)
            .map_err(|e| self.rejected(operation, e))?;

        let mut state = self.inner.state.lock();
        if !state.counters.set_paused(paused) {
            debug!(record_id = %self.inner.id, paused, "pause flag unchanged");
            return Ok(());
        }
        let record_id = self.inner.id;
        self.inner.sink.emit(if paused {
            AuditEvent::Paused { record_id }
        } else {
            AuditEvent::Resumed { record_id }
        });

        debug!(record_id = %record_id, paused, "pause flag changed");
        Ok(())
    }

    /// Announce that fields of the external metadata store changed.
    pub fn record_metadata_change(
        &self,
        authority: &MetadataAuthority<T>,
        fields: MetadataFields,
    ) -> TallyResult<()> {
        authority
            .authorize(self.inner.id)
            .map_err(|e| self.rejected("record_metadata_change", e))?;
        if fields.is_empty() {
            return Err(self.rejected(
                "record_metadata_change",
                TallyError::invalid("metadata change must name at least one field"),
            ));
        }

        let _state = self.inner.state.lock();
        self.inner.sink.emit(AuditEvent::MetadataChanged {
            record_id: self.inner.id,
            changed_fields_bitmask: fields.bits(),
        });

        debug!(record_id = %self.inner.id, fields = ?fields, "metadata changed");
        Ok(())
    }

    /// Destroy the metadata authority, freezing metadata-governed state forever.
    ///
    /// After this no `finalize`, `pause`, `resume` or metadata change can ever
    /// happen on this record: the only token that could authorize them is gone.
    pub fn freeze_metadata(&self, authority: MetadataAuthority<T>) -> TallyResult<()> {
        authority
            .authorize(self.inner.id)
            .map_err(|e| self.rejected("freeze_metadata", e))?;

        let mut state = self.inner.state.lock();
        state.metadata_frozen = true;
        drop(authority);
        self.inner.sink.emit(AuditEvent::MetadataFrozen {
            record_id: self.inner.id,
        });

        info!(record_id = %self.inner.id, "metadata frozen");
        Ok(())
    }

    // === Queries ===

    /// Record identity
    pub fn id(&self) -> RecordId {
        self.inner.id
    }

    /// Governed resource type
    pub fn type_identity(&self) -> TypeIdentity {
        self.inner.state.lock().side_table.namespace().clone()
    }

    /// Retirement model, fixed at creation
    pub fn burn_mode(&self) -> BurnMode {
        self.inner.burn_mode
    }

    /// `issued - retired`
    pub fn supply(&self) -> u64 {
        self.inner.state.lock().counters.supply()
    }

    /// Objects issued so far
    pub fn issued(&self) -> u64 {
        self.inner.state.lock().counters.issued()
    }

    /// Objects retired so far
    pub fn retired(&self) -> u64 {
        self.inner.state.lock().counters.retired()
    }

    /// Cap, if any
    pub fn cap(&self) -> Option<u64> {
        self.inner.state.lock().counters.cap()
    }

    /// `cap - issued`, if capped
    pub fn remaining(&self) -> Option<u64> {
        self.inner.state.lock().counters.remaining()
    }

    /// Whether `quantity` more objects could be issued right now
    pub fn can_issue(&self, quantity: u64) -> bool {
        self.inner.state.lock().counters.can_issue(quantity)
    }

    /// Whether issuance is paused
    pub fn is_paused(&self) -> bool {
        self.inner.state.lock().counters.is_paused()
    }

    /// Whether the metadata authority has been destroyed
    pub fn is_metadata_frozen(&self) -> bool {
        self.inner.state.lock().metadata_frozen
    }

    /// Whether `opaque_id` was issued by this record
    pub fn is_tracked(&self, opaque_id: &OpaqueId) -> bool {
        self.inner.state.lock().side_table.is_tracked(opaque_id)
    }

    /// Record that issued `opaque_id`, if any
    pub fn lookup(&self, opaque_id: &OpaqueId) -> Option<RecordId> {
        self.inner.state.lock().side_table.lookup(opaque_id)
    }

    /// Record that issued `opaque_id`, or `NotTracked`
    pub fn require_lookup(&self, opaque_id: &OpaqueId) -> TallyResult<RecordId> {
        self.inner.state.lock().side_table.require_lookup(opaque_id)
    }

    /// Whether `opaque_id` was issued here and later retired
    pub fn is_retired(&self, opaque_id: &OpaqueId) -> bool {
        self.inner.state.lock().side_table.is_retired(opaque_id)
    }

    /// Number of side-table entries, retired ones included
    pub fn tracked_count(&self) -> u64 {
        self.inner.state.lock().side_table.len() as u64
    }

    /// All counters and flags, read under one lock
    pub fn snapshot(&self) -> SupplySnapshot {
        let state = self.inner.state.lock();
        SupplySnapshot {
            record_id: self.inner.id,
            type_identity: state.side_table.namespace().clone(),
            issued: state.counters.issued(),
            retired: state.counters.retired(),
            supply: state.counters.supply(),
            cap: state.counters.cap(),
            remaining: state.counters.remaining(),
            paused: state.counters.is_paused(),
            burn_mode: self.inner.burn_mode,
            metadata_frozen: state.metadata_frozen,
            tracked: state.side_table.len() as u64,
        }
    }
}
