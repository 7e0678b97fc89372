//! Device configuration
//!
//! The controller only needs to know how large the attached chip is so it
//! can refuse addresses the chip cannot decode. Write timing is fixed by
//! the AT28C family datasheets and shared by every bus driver.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Width of the write-enable low pulse, in nanoseconds
pub const WRITE_PULSE_NS: u32 = 1_000;

/// Time the chip needs to commit a byte after the write-enable pulse, in milliseconds
pub const WRITE_SETTLE_MS: u32 = 10;

/// Supported parallel EEPROMs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Chip {
    /// 2K x 8
    At28c16,
    /// 8K x 8
    At28c64,
    /// 32K x 8
    At28c256,
}

impl Chip {
    /// Capacity in bytes
    pub const fn capacity(self) -> u32 {
        match self {
            Chip::At28c16 => 2 * 1024,
            Chip::At28c64 => 8 * 1024,
            Chip::At28c256 => 32 * 1024,
        }
    }
}

/// Controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    /// Number of addressable bytes; valid addresses are `0..capacity`
    pub capacity: u32,
}

impl DeviceConfig {
    /// Config for an arbitrary capacity
    pub const fn new(capacity: u32) -> Self {
        Self { capacity }
    }

    /// Config for a known chip
    pub const fn for_chip(chip: Chip) -> Self {
        Self::new(chip.capacity())
    }

    /// True if `length` bytes starting at `start` fit in the device
    pub fn contains_range(&self, start: u32, length: u32) -> bool {
        start
            .checked_add(length)
            .is_some_and(|end| end <= self.capacity)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::for_chip(Chip::At28c256)
    }
}
