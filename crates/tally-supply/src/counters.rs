//! Issuance counters and the supply cap invariant
//!
//! `issued` and `retired` only grow. `cap`, once set, is never changed, and
//! `issued <= cap` holds after every operation because every increment goes
//! through [`SupplyCounters::check_issue`] first.

use tally_core::{TallyError, TallyResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SupplyCounters {
    issued: u64,
    retired: u64,
    cap: Option<u64>,
    paused: bool,
}

impl SupplyCounters {
    pub(crate) fn new(cap: Option<u64>) -> Self {
        Self {
            issued: 0,
            retired: 0,
            cap,
            paused: false,
        }
    }

    pub(crate) fn issued(&self) -> u64 {
        self.issued
    }

    pub(crate) fn retired(&self) -> u64 {
        self.retired
    }

    pub(crate) fn cap(&self) -> Option<u64> {
        self.cap
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused
    }

    /// Live supply (`issued - retired`)
    pub(crate) fn supply(&self) -> u64 {
        self.issued.saturating_sub(self.retired)
    }

    /// Headroom before the cap, `None` when unlimited
    pub(crate) fn remaining(&self) -> Option<u64> {
        self.cap.map(|cap| cap.saturating_sub(self.issued))
    }

    pub(crate) fn can_issue(&self, quantity: u64) -> bool {
        self.check_issue(quantity).is_ok()
    }

    /// Reason `quantity` more items cannot be issued, if any.
    pub(crate) fn check_issue(&self, quantity: u64) -> TallyResult<()> {
        if self.paused {
            return Err(TallyError::paused("issuance is paused"));
        }
        let next = self.issued.checked_add(quantity);
        match (self.cap, next) {
            (Some(cap), None) => Err(TallyError::supply_exceeded(quantity, self.issued, cap)),
            (Some(cap), Some(next)) if next > cap => {
                Err(TallyError::supply_exceeded(quantity, self.issued, cap))
            }
            // No cap to exceed: the counter itself is exhausted.
            (None, None) => Err(TallyError::invalid(format!(
                "issuing {quantity} would overflow the issued counter at {}",
                self.issued
            ))),
            _ => Ok(()),
        }
    }

    /// Apply an issuance that already passed `check_issue`; returns the new `issued`.
    pub(crate) fn commit_issue(&mut self, quantity: u64) -> u64 {
        debug_assert!(self.check_issue(quantity).is_ok());
        self.issued += quantity;
        self.issued
    }

    pub(crate) fn commit_retire(&mut self) -> u64 {
        debug_assert!(self.retired < self.issued);
        self.retired += 1;
        self.retired
    }

    /// Pin the cap to the current issued count. One-way.
    pub(crate) fn finalize(&mut self) -> TallyResult<u64> {
        if let Some(cap) = self.cap {
            return Err(TallyError::already_finalized(cap));
        }
        self.cap = Some(self.issued);
        Ok(self.issued)
    }

    /// Set the pause flag, returning whether it changed.
    pub(crate) fn set_paused(&mut self, paused: bool) -> bool {
        let changed = self.paused != paused;
        self.paused = paused;
        changed
    }
}
