//! Host configuration
//!
//! Loaded from TOML; every field has a default matching the stock
//! programmer firmware, so an empty file only needs the port:
//!
//! ```toml
//! port = "/dev/ttyUSB0"
//! device_size = 8192
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProgrammerError, Result};

/// Default baud rate of the programmer firmware
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default time to wait for a single byte
pub const DEFAULT_TIMEOUT_MS: u64 = 1_000;

/// Default length of the reset pulse on DTR
pub const DEFAULT_RESET_PULSE_MS: u64 = 110;

/// Default time the controller needs to boot after reset
pub const DEFAULT_BOOT_DELAY_MS: u64 = 2_000;

/// Connection and device settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgrammerConfig {
    /// Serial port of the programmer
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Read timeout for every expected byte
    pub timeout_ms: u64,
    /// EEPROM size in bytes, needed for whole-chip operations
    pub device_size: Option<u32>,
    /// How long the reset line is held
    pub reset_pulse_ms: u64,
    /// How long to wait for the controller after reset
    pub boot_delay_ms: u64,
}

impl Default for ProgrammerConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            device_size: None,
            reset_pulse_ms: DEFAULT_RESET_PULSE_MS,
            boot_delay_ms: DEFAULT_BOOT_DELAY_MS,
        }
    }
}

/// Reset line timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetTiming {
    /// How long the reset line is held asserted
    pub pulse: Duration,
    /// Wait after release before the controller accepts commands
    pub boot_delay: Duration,
}

impl Default for ResetTiming {
    fn default() -> Self {
        Self {
            pulse: Duration::from_millis(DEFAULT_RESET_PULSE_MS),
            boot_delay: Duration::from_millis(DEFAULT_BOOT_DELAY_MS),
        }
    }
}

impl ProgrammerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading programmer config");
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            return Err(ProgrammerError::InvalidConfig("baud_rate must be positive".into()));
        }
        if self.timeout_ms == 0 {
            return Err(ProgrammerError::InvalidConfig("timeout_ms must be positive".into()));
        }
        if self.device_size == Some(0) {
            return Err(ProgrammerError::InvalidConfig("device_size must be positive".into()));
        }
        Ok(())
    }

    /// Read timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reset line timing
    pub fn reset_timing(&self) -> ResetTiming {
        ResetTiming {
            pulse: Duration::from_millis(self.reset_pulse_ms),
            boot_delay: Duration::from_millis(self.boot_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = ProgrammerConfig::from_toml_str("port = \"/dev/ttyUSB0\"").unwrap();
        assert_eq!(config.port, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.timeout(), Duration::from_secs(1));
        assert_eq!(config.device_size, None);
        assert_eq!(config.reset_timing(), ResetTiming::default());
    }

    #[test]
    fn test_full_config() {
        let text = r#"
            port = "COM3"
            baud_rate = 57600
            timeout_ms = 250
            device_size = 8192
            reset_pulse_ms = 50
            boot_delay_ms = 500
        "#;
        let config = ProgrammerConfig::from_toml_str(text).unwrap();
        assert_eq!(config.baud_rate, 57600);
        assert_eq!(config.device_size, Some(8192));
        assert_eq!(config.reset_timing().pulse, Duration::from_millis(50));
        assert_eq!(config.reset_timing().boot_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ProgrammerConfig::from_toml_str("parity = \"even\"").unwrap_err();
        assert!(matches!(err, ProgrammerError::Config(_)));
    }

    #[test]
    fn test_zero_device_size_rejected() {
        let err = ProgrammerConfig::from_toml_str("device_size = 0").unwrap_err();
        assert!(matches!(err, ProgrammerError::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = ProgrammerConfig::from_toml_str("timeout_ms = 0").unwrap_err();
        assert!(matches!(err, ProgrammerError::InvalidConfig(_)));
    }
}
