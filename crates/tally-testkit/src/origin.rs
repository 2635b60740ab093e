//! Origin proofs for tests

use std::fmt;
use std::marker::PhantomData;
use tally_core::{OriginProof, TallyError, TallyResult, TypeIdentity};

/// Proof that always verifies for `T`
pub struct TrustedOrigin<T: ?Sized + 'static>(PhantomData<fn() -> Box<T>>);

impl<T: ?Sized + 'static> TrustedOrigin<T> {
    /// Create a proof for `T`
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: ?Sized + 'static> Default for TrustedOrigin<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + 'static> fmt::Debug for TrustedOrigin<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrustedOrigin<{}>", std::any::type_name::<T>())
    }
}

impl<T: ?Sized + 'static> OriginProof<T> for TrustedOrigin<T> {
    fn verify(self, _identity: &TypeIdentity) -> TallyResult<()> {
        Ok(())
    }
}

/// Proof that never verifies, as presented by a party that does not own `T`
pub struct ForgedOrigin<T: ?Sized + 'static>(PhantomData<fn() -> Box<T>>);

impl<T: ?Sized + 'static> ForgedOrigin<T> {
    /// Create a forged proof for `T`
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: ?Sized + 'static> Default for ForgedOrigin<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + 'static> fmt::Debug for ForgedOrigin<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ForgedOrigin<{}>", std::any::type_name::<T>())
    }
}

impl<T: ?Sized + 'static> OriginProof<T> for ForgedOrigin<T> {
    fn verify(self, identity: &TypeIdentity) -> TallyResult<()> {
        Err(TallyError::authority(format!(
            "caller does not control the origin of {identity}"
        )))
    }
}
