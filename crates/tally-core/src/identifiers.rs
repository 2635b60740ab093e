//! Core identifier types used across Tally
//!
//! Registry, record and capability identities are random UUIDs. Resource types
//! are identified by their fully qualified Rust path, and externally-owned
//! objects by an opaque 32-byte identity that this crate never interprets.

use crate::{TallyError, TallyResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a uniqueness registry instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegistryId(pub Uuid);

impl RegistryId {
    /// Create a new random registry ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RegistryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegistryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "registry-{}", self.0)
    }
}

impl From<Uuid> for RegistryId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Identifier of a counter record
///
/// This is the "tracking-record identity" stored in side-table entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Create a new random record ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record-{}", self.0)
    }
}

impl From<Uuid> for RecordId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<RecordId> for Uuid {
    fn from(record_id: RecordId) -> Self {
        record_id.0
    }
}

/// Identifier of a single capability token, used in audit trails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CapabilityId(pub Uuid);

impl CapabilityId {
    /// Create a new random capability ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CapabilityId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for CapabilityId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cap-{}", self.0)
    }
}

/// Identity of a resource type
///
/// Holds the fully qualified Rust path of the type, so two distinct types never
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeIdentity(String);

impl TypeIdentity {
    /// Identity of the resource type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(std::any::type_name::<T>().to_string())
    }

    /// Get the type path
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of an externally-owned object
///
/// Tally never dereferences or interprets this value; it is only a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OpaqueId(pub [u8; 32]);

impl OpaqueId {
    /// Create from raw bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive a deterministic identifier from a label
    ///
    /// Intended for tests and off-ledger callers that key objects by name.
    pub fn derive(label: impl AsRef<[u8]>) -> Self {
        Self(*blake3::hash(label.as_ref()).as_bytes())
    }

    /// Parse from a 64 character hex string
    pub fn from_hex(hex_str: &str) -> TallyResult<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| TallyError::invalid(format!("opaque id is not hex: {e}")))?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            TallyError::invalid(format!("opaque id must be 32 bytes, got {}", v.len()))
        })?;
        Ok(Self(bytes))
    }

    /// Lowercase hex encoding
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for OpaqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; 32]> for OpaqueId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Badge;
    struct Ticket;

    #[test]
    fn test_type_identity_distinguishes_types() {
        assert_eq!(TypeIdentity::of::<Badge>(), TypeIdentity::of::<Badge>());
        assert_ne!(TypeIdentity::of::<Badge>(), TypeIdentity::of::<Ticket>());
        assert!(TypeIdentity::of::<Badge>().as_str().ends_with("Badge"));
    }

    #[test]
    fn test_opaque_id_hex() {
        let id = OpaqueId::derive("badge-1");
        let parsed = OpaqueId::from_hex(&id.to_hex()).unwrap();
        assert_eq!(id, parsed);
        assert_eq!(id.to_string().len(), 64);

        assert!(OpaqueId::from_hex("zz").is_err());
        assert!(OpaqueId::from_hex("abcd").is_err());
    }

    #[test]
    fn test_display_prefixes() {
        assert!(RecordId::new().to_string().starts_with("record-"));
        assert!(RegistryId::new().to_string().starts_with("registry-"));
        assert!(CapabilityId::new().to_string().starts_with("cap-"));
    }
}
