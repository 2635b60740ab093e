//! Uniqueness registry
//!
//! A [`SupplyRegistry`] guarantees at most one supply record per resource type.
//! Registration is a two-step flow: [`SupplyRegistry::register`] claims the type
//! (after the caller proves it owns the type's origin) and returns a
//! [`RegistrationHandle`]; [`RegistrationHandle::create`] then builds the record
//! and mints its capability tokens. A claim is never released.

use crate::capability::{IssuanceAuthority, MetadataAuthority, RetirementAuthority};
use crate::config::SupplyOptions;
use crate::record::SupplyRecord;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tally_core::{
    AuditEvent, OriginProof, RecordId, RegistryId, SharedAuditSink, TallyError, TallyResult,
    TypeIdentity,
};
use tracing::{debug, info, instrument, warn};

/// Process-wide registry of claimed resource types
pub struct SupplyRegistry {
    id: RegistryId,
    claimed: RwLock<BTreeMap<TypeIdentity, RecordId>>,
    sink: SharedAuditSink,
}

impl fmt::Debug for SupplyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupplyRegistry")
            .field("id", &self.id)
            .field("claimed", &self.claimed.read().len())
            .finish_non_exhaustive()
    }
}

impl SupplyRegistry {
    /// Create an empty registry. Emits `RegistryInitialized`.
    pub fn new(sink: SharedAuditSink) -> Self {
        let id = RegistryId::new();
        sink.emit(AuditEvent::RegistryInitialized { registry_id: id });
        info!(registry_id = %id, "supply registry initialized");
        Self {
            id,
            claimed: RwLock::new(BTreeMap::new()),
            sink,
        }
    }

    /// Create a registry behind an `Arc`, for sharing across threads
    pub fn shared(sink: SharedAuditSink) -> Arc<Self> {
        Arc::new(Self::new(sink))
    }

    /// Registry identity
    pub fn id(&self) -> RegistryId {
        self.id
    }

    /// Claim resource type `T`.
    ///
    /// Fails with `DuplicateRegistration` if `T` is already claimed here, or with
    /// `Authority` if `proof` does not verify for `T`. An already-claimed type is
    /// rejected before the proof is looked at. The proof runs with no registry
    /// lock held, so it may query this registry; the claim is re-checked and
    /// inserted under one write lock afterwards, and of two racing registrants
    /// with valid proofs exactly one wins.
    ///
    /// On success the claim is permanent and `RecordRegistered` is emitted with
    /// the id the record will carry, before the record exists. Dropping the
    /// returned handle without calling [`RegistrationHandle::create`] leaves the
    /// type claimed with no record behind that id; use
    /// [`register_and_create`](Self::register_and_create) when the options are
    /// already known.
    #[instrument(skip(self, proof), fields(registry_id = %self.id, resource = std::any::type_name::<T>()))]
    pub fn register<T, P>(&self, proof: P) -> TallyResult<RegistrationHandle<T>>
    where
        T: 'static,
        P: OriginProof<T>,
    {
        let type_identity = TypeIdentity::of::<T>();

        Self::check_unclaimed(&self.claimed.read(), &type_identity)?;
        if let Err(err) = proof.verify(&type_identity) {
            let err = match err {
                TallyError::Authority { .. } => err,
                other => TallyError::authority(format!(
                    "origin proof for {type_identity} failed: {other}"
                )),
            };
            warn!(code = err.code(), "registration rejected");
            return Err(err);
        }

        let mut claimed = self.claimed.write();
        Self::check_unclaimed(&claimed, &type_identity)?;
        let record_id = RecordId::new();
        claimed.insert(type_identity.clone(), record_id);
        self.sink.emit(AuditEvent::RecordRegistered {
            type_identity: type_identity.clone(),
            record_id,
        });
        drop(claimed);

        debug!(record_id = %record_id, "resource type registered");
        Ok(RegistrationHandle {
            record_id,
            type_identity,
            sink: Arc::clone(&self.sink),
            _resource: PhantomData,
        })
    }

    /// Claim resource type `T` and create its record in one step.
    pub fn register_and_create<T, P>(
        &self,
        proof: P,
        options: SupplyOptions,
    ) -> TallyResult<CreatedSupply<T>>
    where
        T: 'static,
        P: OriginProof<T>,
    {
        Ok(self.register::<T, P>(proof)?.create(options))
    }

    fn check_unclaimed(
        claimed: &BTreeMap<TypeIdentity, RecordId>,
        type_identity: &TypeIdentity,
    ) -> TallyResult<()> {
        if claimed.contains_key(type_identity) {
            let err = TallyError::duplicate_registration(type_identity.as_str());
            warn!(code = err.code(), "registration rejected");
            return Err(err);
        }
        Ok(())
    }

    /// Whether `type_identity` has been claimed
    pub fn contains(&self, type_identity: &TypeIdentity) -> bool {
        self.claimed.read().contains_key(type_identity)
    }

    /// Whether resource type `T` has been claimed
    pub fn contains_type<T: 'static>(&self) -> bool {
        self.contains(&TypeIdentity::of::<T>())
    }

    /// Record id assigned to a claimed type
    pub fn record_of(&self, type_identity: &TypeIdentity) -> Option<RecordId> {
        self.claimed.read().get(type_identity).copied()
    }

    /// Record id assigned to resource type `T`
    pub fn record_of_type<T: 'static>(&self) -> Option<RecordId> {
        self.record_of(&TypeIdentity::of::<T>())
    }

    /// Number of claimed types
    pub fn len(&self) -> usize {
        self.claimed.read().len()
    }

    /// Whether nothing has been claimed yet
    pub fn is_empty(&self) -> bool {
        self.claimed.read().is_empty()
    }

    /// Claimed types, in sorted order
    pub fn registered_types(&self) -> Vec<TypeIdentity> {
        self.claimed.read().keys().cloned().collect()
    }
}

/// Claim on resource type `T`, waiting to be turned into a record
#[must_use = "a registration handle claims its type forever; call `create` to obtain the record"]
pub struct RegistrationHandle<T: 'static> {
    record_id: RecordId,
    type_identity: TypeIdentity,
    sink: SharedAuditSink,
    _resource: PhantomData<fn() -> T>,
}

impl<T: 'static> fmt::Debug for RegistrationHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationHandle")
            .field("record_id", &self.record_id)
            .field("type_identity", &self.type_identity)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> RegistrationHandle<T> {
    /// Id the record will carry
    pub fn record_id(&self) -> RecordId {
        self.record_id
    }

    /// Claimed resource type
    pub fn type_identity(&self) -> &TypeIdentity {
        &self.type_identity
    }

    /// Build the record and mint its tokens.
    ///
    /// The retirement authority is minted only for a centralized record whose
    /// options ask for one.
    pub fn create(self, options: SupplyOptions) -> CreatedSupply<T> {
        let record = SupplyRecord::new(self.record_id, self.type_identity, &options, self.sink);
        let retirement = options
            .retirement_authority()
            .then(|| RetirementAuthority::mint(self.record_id));

        info!(
            record_id = %self.record_id,
            cap = ?options.cap(),
            burn_mode = %options.burn_mode(),
            retirement_authority = retirement.is_some(),
            "supply record created"
        );
        CreatedSupply {
            record,
            issuance: IssuanceAuthority::mint(self.record_id),
            retirement,
            metadata: MetadataAuthority::mint(self.record_id),
        }
    }
}

/// A freshly created record with every token minted for it
#[derive(Debug)]
pub struct CreatedSupply<T: 'static> {
    /// Shared record handle
    pub record: SupplyRecord<T>,
    /// Issuance authority
    pub issuance: IssuanceAuthority<T>,
    /// Retirement authority, present only on a centralized record that asked for one
    pub retirement: Option<RetirementAuthority<T>>,
    /// Metadata authority
    pub metadata: MetadataAuthority<T>,
}
