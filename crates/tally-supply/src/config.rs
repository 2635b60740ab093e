//! Record creation options
//!
//! [`SupplyOptions`] describes the creation-time policy of one record: its cap,
//! its burn mode and whether a retirement authority is minted. A value of this
//! type is always valid, so validation happens before a registry is touched.
//!
//! Options can be written in TOML:
//!
//! ```toml
//! cap = 10000
//! burn_mode = "centralized"
//! retirement_authority = true
//! ```

use crate::burn::BurnMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tally_core::{TallyError, TallyResult};

/// Validated creation options for a supply record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSupplyOptions", into = "RawSupplyOptions")]
pub struct SupplyOptions {
    cap: Option<u64>,
    burn_mode: BurnMode,
    retirement_authority: bool,
}

/// Wire form of [`SupplyOptions`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSupplyOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cap: Option<u64>,
    #[serde(default)]
    burn_mode: BurnMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    retirement_authority: Option<bool>,
}

impl SupplyOptions {
    /// Build options, rejecting a retirement authority under decentralized burn.
    pub fn new(
        cap: Option<u64>,
        burn_mode: BurnMode,
        retirement_authority: bool,
    ) -> TallyResult<Self> {
        let options = Self {
            cap,
            burn_mode,
            retirement_authority,
        };
        options.validate()?;
        Ok(options)
    }

    /// No cap, centralized burn, retirement authority minted
    pub fn unlimited() -> Self {
        Self {
            cap: None,
            burn_mode: BurnMode::Centralized,
            retirement_authority: true,
        }
    }

    /// Fixed cap, centralized burn, retirement authority minted
    pub fn capped(cap: u64) -> Self {
        Self {
            cap: Some(cap),
            ..Self::unlimited()
        }
    }

    /// Change the burn mode.
    ///
    /// The retirement authority follows the mode: requested for a centralized
    /// record, dropped for a decentralized one.
    #[must_use]
    pub fn with_burn_mode(self, burn_mode: BurnMode) -> Self {
        Self {
            burn_mode,
            retirement_authority: burn_mode.allows_retirement_authority(),
            ..self
        }
    }

    /// Request or drop the retirement authority.
    ///
    /// Fails with `WrongBurnMode` when requesting one for a decentralized
    /// record. Dropping it on a centralized record yields a record that can
    /// never retire anything.
    pub fn with_retirement_authority(self, retirement_authority: bool) -> TallyResult<Self> {
        Self::new(self.cap, self.burn_mode, retirement_authority)
    }

    /// Check the option set. A value built through this type's constructors
    /// always passes; this is the single rule every constructor goes through.
    pub fn validate(&self) -> TallyResult<()> {
        if self.retirement_authority && !self.burn_mode.allows_retirement_authority() {
            return Err(TallyError::wrong_burn_mode(format!(
                "a retirement authority cannot be minted for a {} record",
                self.burn_mode
            )));
        }
        Ok(())
    }

    /// Parse options from TOML text
    pub fn from_toml_str(source: &str) -> TallyResult<Self> {
        let raw: RawSupplyOptions = toml::from_str(source)?;
        Self::try_from(raw)
    }

    /// Load options from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> TallyResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            TallyError::invalid(format!(
                "failed to read supply options {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&source)
    }

    /// Cap, if any
    pub fn cap(&self) -> Option<u64> {
        self.cap
    }

    /// Burn mode
    pub fn burn_mode(&self) -> BurnMode {
        self.burn_mode
    }

    /// Whether a retirement authority will be minted
    pub fn retirement_authority(&self) -> bool {
        self.retirement_authority
    }
}

impl Default for SupplyOptions {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl TryFrom<RawSupplyOptions> for SupplyOptions {
    type Error = TallyError;

    fn try_from(raw: RawSupplyOptions) -> TallyResult<Self> {
        let retirement_authority = raw
            .retirement_authority
            .unwrap_or_else(|| raw.burn_mode.allows_retirement_authority());
        Self::new(raw.cap, raw.burn_mode, retirement_authority)
    }
}

impl From<SupplyOptions> for RawSupplyOptions {
    fn from(options: SupplyOptions) -> Self {
        Self {
            cap: options.cap,
            burn_mode: options.burn_mode,
            retirement_authority: Some(options.retirement_authority),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retirement_authority_rejected_when_decentralized() {
        let err = SupplyOptions::new(None, BurnMode::Decentralized, true).unwrap_err();
        assert!(matches!(err, TallyError::WrongBurnMode { .. }));

        let options = SupplyOptions::new(None, BurnMode::Decentralized, false).unwrap();
        assert!(!options.retirement_authority());
    }

    #[test]
    fn test_builders() {
        let options = SupplyOptions::capped(5).with_burn_mode(BurnMode::Decentralized);
        assert_eq!(options.cap(), Some(5));
        assert_eq!(options.burn_mode(), BurnMode::Decentralized);
        assert!(!options.retirement_authority());
        assert!(options.validate().is_ok());

        let options = SupplyOptions::unlimited()
            .with_retirement_authority(false)
            .unwrap();
        assert_eq!(options.burn_mode(), BurnMode::Centralized);
        assert!(!options.retirement_authority());

        assert!(matches!(
            options
                .with_burn_mode(BurnMode::Decentralized)
                .with_retirement_authority(true),
            Err(TallyError::WrongBurnMode { .. })
        ));
    }

    #[test]
    fn test_toml_defaults_follow_burn_mode() {
        let options = SupplyOptions::from_toml_str("cap = 100").unwrap();
        assert_eq!(options.cap(), Some(100));
        assert!(options.retirement_authority());

        let options = SupplyOptions::from_toml_str("burn_mode = \"decentralized\"").unwrap();
        assert_eq!(options.cap(), None);
        assert!(!options.retirement_authority());
    }

    #[test]
    fn test_toml_rejections() {
        let err = SupplyOptions::from_toml_str(
            "burn_mode = \"decentralized\"\nretirement_authority = true",
        )
        .unwrap_err();
        assert!(matches!(err, TallyError::WrongBurnMode { .. }));

        let err = SupplyOptions::from_toml_str("max_supply = 3").unwrap_err();
        assert!(matches!(err, TallyError::Serialization { .. }));

        let err = SupplyOptions::from_toml_str("cap = -1").unwrap_err();
        assert!(matches!(err, TallyError::Serialization { .. }));
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let json = r#"{"burn_mode":"decentralized","retirement_authority":true}"#;
        assert!(serde_json::from_str::<SupplyOptions>(json).is_err());

        let options = SupplyOptions::capped(7);
        let encoded = serde_json::to_string(&options).unwrap();
        assert_eq!(
            serde_json::from_str::<SupplyOptions>(&encoded).unwrap(),
            options
        );
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = SupplyOptions::load_from_file("/nonexistent/tally/options.toml").unwrap_err();
        assert!(matches!(err, TallyError::Invalid { .. }));
    }
}
