//! Unified error system for Tally
//!
//! Every fallible operation in the workspace returns [`TallyError`]. Each variant
//! is a distinguishable failure reason that callers can match on; none of them is
//! retried internally and all of them abort the operation with no partial effect.

use serde::{Deserialize, Serialize};

/// Unified error type for all Tally operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum TallyError {
    /// Missing or mismatched capability, or an invalid type-origin proof
    #[error("Authority error: {message}")]
    Authority {
        /// Error message describing the authority failure
        message: String,
    },

    /// The resource type already has a canonical record
    #[error("Duplicate registration: {type_identity}")]
    DuplicateRegistration {
        /// Fully qualified type path that was already claimed
        type_identity: String,
    },

    /// Issuance would push `issued` past the cap
    #[error("Supply exceeded: requested {requested}, issued {issued}, cap {cap}")]
    SupplyExceeded {
        /// Number of items the caller tried to issue
        requested: u64,
        /// Issued counter at the time of the attempt
        issued: u64,
        /// Configured cap
        cap: u64,
    },

    /// Issuance attempted while the record is paused
    #[error("Paused: {message}")]
    Paused {
        /// Error message naming the paused record
        message: String,
    },

    /// Retirement entry point does not match the record's burn mode
    #[error("Wrong burn mode: {message}")]
    WrongBurnMode {
        /// Error message describing the mismatch
        message: String,
    },

    /// Opaque identifier has no side-table entry
    #[error("Not tracked: {opaque_id}")]
    NotTracked {
        /// Hex form of the opaque identifier
        opaque_id: String,
    },

    /// The record already has a cap
    #[error("Already finalized: cap is {cap}")]
    AlreadyFinalized {
        /// Cap that is already in force
        cap: u64,
    },

    /// Opaque identifier is already attached to a record
    #[error("Duplicate attachment: {opaque_id}")]
    DuplicateAttachment {
        /// Hex form of the opaque identifier
        opaque_id: String,
    },

    /// Opaque identifier was already retired
    #[error("Already retired: {opaque_id}")]
    AlreadyRetired {
        /// Hex form of the opaque identifier
        opaque_id: String,
    },

    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },
}

impl TallyError {
    /// Create an authority error
    pub fn authority(message: impl Into<String>) -> Self {
        Self::Authority {
            message: message.into(),
        }
    }

    /// Create a duplicate registration error
    pub fn duplicate_registration(type_identity: impl Into<String>) -> Self {
        Self::DuplicateRegistration {
            type_identity: type_identity.into(),
        }
    }

    /// Create a supply exceeded error
    pub fn supply_exceeded(requested: u64, issued: u64, cap: u64) -> Self {
        Self::SupplyExceeded {
            requested,
            issued,
            cap,
        }
    }

    /// Create a paused error
    pub fn paused(message: impl Into<String>) -> Self {
        Self::Paused {
            message: message.into(),
        }
    }

    /// Create a wrong burn mode error
    pub fn wrong_burn_mode(message: impl Into<String>) -> Self {
        Self::WrongBurnMode {
            message: message.into(),
        }
    }

    /// Create a not tracked error
    pub fn not_tracked(opaque_id: impl Into<String>) -> Self {
        Self::NotTracked {
            opaque_id: opaque_id.into(),
        }
    }

    /// Create an already finalized error
    pub fn already_finalized(cap: u64) -> Self {
        Self::AlreadyFinalized { cap }
    }

    /// Create a duplicate attachment error
    pub fn duplicate_attachment(opaque_id: impl Into<String>) -> Self {
        Self::DuplicateAttachment {
            opaque_id: opaque_id.into(),
        }
    }

    /// Create an already retired error
    pub fn already_retired(opaque_id: impl Into<String>) -> Self {
        Self::AlreadyRetired {
            opaque_id: opaque_id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this failure reason
    pub fn code(&self) -> &'static str {
        match self {
            Self::Authority { .. } => "TALLY_AUTHORITY",
            Self::DuplicateRegistration { .. } => "TALLY_DUPLICATE_REGISTRATION",
            Self::SupplyExceeded { .. } => "TALLY_SUPPLY_EXCEEDED",
            Self::Paused { .. } => "TALLY_PAUSED",
            Self::WrongBurnMode { .. } => "TALLY_WRONG_BURN_MODE",
            Self::NotTracked { .. } => "TALLY_NOT_TRACKED",
            Self::AlreadyFinalized { .. } => "TALLY_ALREADY_FINALIZED",
            Self::DuplicateAttachment { .. } => "TALLY_DUPLICATE_ATTACHMENT",
            Self::AlreadyRetired { .. } => "TALLY_ALREADY_RETIRED",
            Self::Invalid { .. } => "TALLY_INVALID",
            Self::Serialization { .. } => "TALLY_SERIALIZATION",
        }
    }

    /// True when the failure reflects a state that can never change.
    ///
    /// A finalized cap and a burn mode are write-once; retrying the same call
    /// against the same record will fail the same way forever.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::AlreadyFinalized { .. }
                | Self::WrongBurnMode { .. }
                | Self::DuplicateRegistration { .. }
                | Self::AlreadyRetired { .. }
        )
    }
}

/// Standard Result type for Tally operations
pub type Result<T> = std::result::Result<T, TallyError>;

impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::invalid(format!("not found: {err}")),
            std::io::ErrorKind::PermissionDenied => Self::authority(err.to_string()),
            _ => Self::invalid(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<toml::de::Error> for TallyError {
    fn from(err: toml::de::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
