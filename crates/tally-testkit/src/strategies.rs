//! Property test strategies for Tally types
//!
//! Opaque ids are drawn from a small seed space so that generated operation
//! sequences revisit the same ids and exercise duplicate and retirement paths.

use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

use tally_core::OpaqueId;
use tally_supply::{MetadataFields, SupplyOptions};

/// Opaque id derived from a seed in `0..64`
pub fn arb_opaque_id() -> impl Strategy<Value = OpaqueId> {
    (0u8..64).prop_map(|seed| OpaqueId::derive(format!("object-{seed}")))
}

/// Batch of 0 to 8 ids, possibly with repeats
pub fn arb_opaque_batch() -> impl Strategy<Value = Vec<OpaqueId>> {
    prop::collection::vec(arb_opaque_id(), 0..8)
}

/// Options for a centralized record with a retirement authority
pub fn arb_centralized_options() -> impl Strategy<Value = SupplyOptions> {
    prop::option::of(0u64..32).prop_map(|cap| match cap {
        Some(cap) => SupplyOptions::capped(cap),
        None => SupplyOptions::unlimited(),
    })
}

/// Any non-empty set of metadata fields
pub fn arb_metadata_fields() -> impl Strategy<Value = MetadataFields> {
    (1u32..=MetadataFields::all().bits()).prop_map(MetadataFields::from_bits_truncate)
}

/// One step against a centralized record
#[derive(Debug, Clone)]
pub enum SupplyOp {
    /// `issue_one`
    Issue(OpaqueId),
    /// `issue_batch`
    IssueBatch(Vec<OpaqueId>),
    /// `retire_centralized`
    Retire(OpaqueId),
    /// `pause`
    Pause,
    /// `resume`
    Resume,
    /// `finalize`
    Finalize,
}

/// Weighted mix of record operations, issuance-heavy
pub fn arb_supply_op() -> impl Strategy<Value = SupplyOp> {
    prop_oneof![
        4 => arb_opaque_id().prop_map(SupplyOp::Issue),
        2 => arb_opaque_batch().prop_map(SupplyOp::IssueBatch),
        3 => arb_opaque_id().prop_map(SupplyOp::Retire),
        1 => Just(SupplyOp::Pause),
        1 => Just(SupplyOp::Resume),
        1 => Just(SupplyOp::Finalize),
    ]
}

/// Sequence of up to 64 operations
pub fn arb_supply_ops() -> impl Strategy<Value = Vec<SupplyOp>> {
    prop::collection::vec(arb_supply_op(), 0..64)
}
