//! Side-table association
//!
//! Maps an externally-owned object's [`OpaqueId`] to the record that issued it,
//! without touching or knowing the object itself. One table exists per resource
//! type (its namespace), so identical opaque ids under unrelated types never
//! collide. Entries are written once at issuance and are never removed;
//! retirement only marks them.

use std::collections::{HashMap, HashSet};
use tally_core::{OpaqueId, RecordId, TallyError, TallyResult, TypeIdentity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SideEntry {
    record_id: RecordId,
    retired: bool,
}

#[derive(Debug)]
pub(crate) struct SideTable {
    namespace: TypeIdentity,
    entries: HashMap<OpaqueId, SideEntry>,
}

impl SideTable {
    pub(crate) fn new(namespace: TypeIdentity) -> Self {
        Self {
            namespace,
            entries: HashMap::new(),
        }
    }

    pub(crate) fn namespace(&self) -> &TypeIdentity {
        &self.namespace
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Fail with `DuplicateAttachment` if any id is already attached or
    /// appears twice in `opaque_ids`.
    pub(crate) fn check_vacant(&self, opaque_ids: &[OpaqueId]) -> TallyResult<()> {
        let mut seen = HashSet::with_capacity(opaque_ids.len());
        for opaque_id in opaque_ids {
            if self.entries.contains_key(opaque_id) || !seen.insert(*opaque_id) {
                return Err(TallyError::duplicate_attachment(opaque_id.to_hex()));
            }
        }
        Ok(())
    }

    pub(crate) fn attach(&mut self, opaque_id: OpaqueId, record_id: RecordId) -> TallyResult<()> {
        self.attach_all(&[opaque_id], record_id)
    }

    /// Attach every id or none of them.
    pub(crate) fn attach_all(
        &mut self,
        opaque_ids: &[OpaqueId],
        record_id: RecordId,
    ) -> TallyResult<()> {
        self.check_vacant(opaque_ids)?;
        self.entries.reserve(opaque_ids.len());
        for opaque_id in opaque_ids {
            self.entries.insert(
                *opaque_id,
                SideEntry {
                    record_id,
                    retired: false,
                },
            );
        }
        Ok(())
    }

    pub(crate) fn lookup(&self, opaque_id: &OpaqueId) -> Option<RecordId> {
        self.entries.get(opaque_id).map(|entry| entry.record_id)
    }

    pub(crate) fn require_lookup(&self, opaque_id: &OpaqueId) -> TallyResult<RecordId> {
        self.lookup(opaque_id)
            .ok_or_else(|| TallyError::not_tracked(opaque_id.to_hex()))
    }

    pub(crate) fn is_tracked(&self, opaque_id: &OpaqueId) -> bool {
        self.lookup(opaque_id).is_some()
    }

    pub(crate) fn is_retired(&self, opaque_id: &OpaqueId) -> bool {
        self.entries
            .get(opaque_id)
            .is_some_and(|entry| entry.retired)
    }

    /// Fail unless the id is attached and not yet retired.
    pub(crate) fn check_retirable(&self, opaque_id: &OpaqueId) -> TallyResult<()> {
        match self.entries.get(opaque_id) {
            None => Err(TallyError::not_tracked(opaque_id.to_hex())),
            Some(entry) if entry.retired => Err(TallyError::already_retired(opaque_id.to_hex())),
            Some(_) => Ok(()),
        }
    }

    pub(crate) fn mark_retired(&mut self, opaque_id: &OpaqueId) -> TallyResult<()> {
        self.check_retirable(opaque_id)?;
        if let Some(entry) = self.entries.get_mut(opaque_id) {
            entry.retired = true;
        }
        Ok(())
    }
}
