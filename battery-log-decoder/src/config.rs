//! Decoder configuration types
//!
//! The decoder has three knobs, all of them fixed properties of the logger hardware.
//! They live here as named values so tests (and unusual dumps) can override them.

use crate::types::{DecoderError, Result};
use serde::{Deserialize, Serialize};

/// Constant power draw of the robot in milliwatts.
///
/// The step-up regulator keeps the draw roughly constant regardless of battery voltage,
/// so current is derived as power / voltage instead of being measured.
pub const POWER_MILLIWATTS: f64 = 0.24 * 5000.0;

/// Upper bound on the number of tokens looked at in one dump
pub const MAX_TOKENS: usize = 9999;

/// Erased EEPROM reads back as all ones; a pair decoding to this ends the data
pub const SENTINEL_MILLIVOLTS: u16 = 0xFFFF;

/// Configuration for the decoder library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Assumed constant power draw (mW)
    #[serde(default = "default_power")]
    pub power_milliwatts: f64,

    /// Tokens beyond this count are ignored
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Voltage value that marks the end of valid data
    #[serde(default = "default_sentinel")]
    pub sentinel_millivolts: u16,
}

fn default_power() -> f64 {
    POWER_MILLIWATTS
}

fn default_max_tokens() -> usize {
    MAX_TOKENS
}

fn default_sentinel() -> u16 {
    SENTINEL_MILLIVOLTS
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            power_milliwatts: POWER_MILLIWATTS,
            max_tokens: MAX_TOKENS,
            sentinel_millivolts: SENTINEL_MILLIVOLTS,
        }
    }
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: override the power draw
    pub fn with_power_milliwatts(mut self, power: f64) -> Self {
        self.power_milliwatts = power;
        self
    }

    /// Builder method: override the token cap
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Builder method: override the end-of-data marker
    pub fn with_sentinel(mut self, sentinel: u16) -> Self {
        self.sentinel_millivolts = sentinel;
        self
    }

    /// Reject values that would make the derived series meaningless
    pub fn validate(&self) -> Result<()> {
        if !self.power_milliwatts.is_finite() || self.power_milliwatts <= 0.0 {
            return Err(DecoderError::InvalidConfig(format!(
                "power_milliwatts must be positive, got {}",
                self.power_milliwatts
            )));
        }
        if self.max_tokens == 0 {
            return Err(DecoderError::InvalidConfig(
                "max_tokens must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecoderConfig::new();
        assert!((config.power_milliwatts - 1200.0).abs() < 1e-9);
        assert_eq!(config.max_tokens, 9999);
        assert_eq!(config.sentinel_millivolts, 0xFFFF);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_decoder_config_builder() {
        let config = DecoderConfig::new()
            .with_power_milliwatts(600.0)
            .with_max_tokens(10)
            .with_sentinel(0);

        assert_eq!(config.power_milliwatts, 600.0);
        assert_eq!(config.max_tokens, 10);
        assert_eq!(config.sentinel_millivolts, 0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(DecoderConfig::new().with_power_milliwatts(0.0).validate().is_err());
        assert!(DecoderConfig::new().with_power_milliwatts(f64::NAN).validate().is_err());
        assert!(DecoderConfig::new().with_max_tokens(0).validate().is_err());
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let config: DecoderConfig = serde_json::from_str(r#"{"max_tokens": 42}"#).unwrap();
        assert_eq!(config.max_tokens, 42);
        assert_eq!(config.sentinel_millivolts, SENTINEL_MILLIVOLTS);
        assert_eq!(config.power_milliwatts, POWER_MILLIWATTS);
    }
}
