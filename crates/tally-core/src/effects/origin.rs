//! Type-origin proof interface

use crate::identifiers::TypeIdentity;
use crate::TallyResult;

/// Proof that the caller uniquely controls the identity of resource type `T`.
///
/// The proof is consumed by value at registration, so a single proof can back at
/// most one registration attempt. How the proof is produced (a one-time witness,
/// a signed attestation, a module publisher check) is the implementor's concern.
///
/// `verify` runs with no registry lock held and must not assume one is. It may
/// query the registry, and the claim it backs is re-checked after it returns.
pub trait OriginProof<T: ?Sized + 'static> {
    /// Check the proof against the identity being claimed.
    ///
    /// Returning an error rejects the registration; the registry reports it as
    /// [`TallyError::Authority`](crate::TallyError::Authority).
    fn verify(self, identity: &TypeIdentity) -> TallyResult<()>;
}
