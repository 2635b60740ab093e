//! Metadata change flags
//!
//! Metadata itself lives in an external store. Tally only records that a set of
//! fields changed, under metadata authority, as a `MetadataChanged` event.

use bitflags::bitflags;

bitflags! {
    /// Fields of the external metadata store
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MetadataFields: u32 {
        /// Display name
        const NAME = 1 << 0;
        /// Long description
        const DESCRIPTION = 1 << 1;
        /// Image location
        const IMAGE_URL = 1 << 2;
        /// Project or collection page
        const EXTERNAL_URL = 1 << 3;
        /// Whether issuance may be paused, as advertised to holders
        const PAUSABLE = 1 << 4;
        /// Advisory display cap, independent of the enforced cap
        const DISPLAY_CAP = 1 << 5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmask_values() {
        let fields = MetadataFields::NAME | MetadataFields::IMAGE_URL;
        assert_eq!(fields.bits(), 0b101);
        assert!(MetadataFields::empty().is_empty());
        assert_eq!(MetadataFields::all().bits(), 0b11_1111);
    }
}
