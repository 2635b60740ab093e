//! Burn coordination
//!
//! A record retires objects through exactly one of two entry points, fixed when
//! the record is created:
//!
//! - [`BurnMode::Centralized`]: only a holder of the record's
//!   [`RetirementAuthority`](crate::RetirementAuthority) may retire.
//! - [`BurnMode::Decentralized`]: whoever holds an object may retire it; no
//!   retirement authority exists.
//!
//! There is no mode that permits both, and no transition between modes. A
//! `WrongBurnMode` failure is therefore permanent for that record.

use serde::{Deserialize, Serialize};
use std::fmt;
use tally_core::{RetirerKind, TallyError, TallyResult};

/// Retirement model of a record, chosen once at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurnMode {
    /// Token-gated retirement
    #[default]
    Centralized,
    /// Holder-initiated retirement
    Decentralized,
}

impl BurnMode {
    /// The only retirement entry point this mode admits
    pub fn retirer_kind(self) -> RetirerKind {
        match self {
            BurnMode::Centralized => RetirerKind::Centralized,
            BurnMode::Decentralized => RetirerKind::Holder,
        }
    }

    /// Whether `kind` is the entry point this mode admits
    pub fn permits(self, kind: RetirerKind) -> bool {
        self.retirer_kind() == kind
    }

    /// Whether a retirement authority may exist under this mode
    pub fn allows_retirement_authority(self) -> bool {
        matches!(self, BurnMode::Centralized)
    }

    /// Fail with `WrongBurnMode` unless `kind` is admitted.
    pub fn require(self, kind: RetirerKind) -> TallyResult<()> {
        if self.permits(kind) {
            return Ok(());
        }
        let attempted = match kind {
            RetirerKind::Centralized => "token-gated retirement",
            RetirerKind::Holder => "holder retirement",
        };
        Err(TallyError::wrong_burn_mode(format!(
            "{attempted} is unavailable on a {self} record"
        )))
    }
}

impl fmt::Display for BurnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BurnMode::Centralized => f.write_str("centralized"),
            BurnMode::Decentralized => f.write_str("decentralized"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_are_exclusive() {
        assert!(BurnMode::Centralized.permits(RetirerKind::Centralized));
        assert!(!BurnMode::Centralized.permits(RetirerKind::Holder));
        assert!(BurnMode::Decentralized.permits(RetirerKind::Holder));
        assert!(!BurnMode::Decentralized.permits(RetirerKind::Centralized));
    }

    #[test]
    fn test_require_reports_wrong_mode() {
        let err = BurnMode::Decentralized
            .require(RetirerKind::Centralized)
            .unwrap_err();
        assert!(matches!(err, TallyError::WrongBurnMode { .. }));
        assert!(err.is_permanent());
        assert!(err.to_string().contains("decentralized"));

        assert!(BurnMode::Centralized.require(RetirerKind::Centralized).is_ok());
    }

    #[test]
    fn test_serde_names() {
        let mode: BurnMode = serde_json::from_str("\"decentralized\"").unwrap();
        assert_eq!(mode, BurnMode::Decentralized);
        assert_eq!(BurnMode::default(), BurnMode::Centralized);
    }
}
