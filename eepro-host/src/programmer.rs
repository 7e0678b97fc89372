//! Bulk memory operations
//!
//! [`Programmer`] builds whole-memory operations out of write and read
//! sessions: filling, verifying against expected contents, and checking that
//! a range holds one repeated byte.

use std::fmt;

use tracing::{info, warn};

use crate::client::ProtocolClient;
use crate::config::ProgrammerConfig;
use crate::error::{ProgrammerError, Result};
use crate::hexdump;
use crate::transport::{SerialTransport, Transport};

/// Value of an erased cell
pub const ERASED: u8 = 0xFF;

/// Label used for the device side of a content diff
pub const DEVICE_LABEL: &str = "EEPROM contents";

/// Label used for caller-supplied data in [`Programmer::verify`]
pub const INPUT_LABEL: &str = "input";

/// A run of identical bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillBytes {
    pub byte: u8,
    pub length: usize,
}

impl FillBytes {
    pub fn new(byte: u8, length: usize) -> Self {
        Self { byte, length }
    }

    pub fn to_vec(self) -> Vec<u8> {
        vec![self.byte; self.length]
    }
}

impl fmt::Display for FillBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fill bytes (0x{:02X})", self.byte)
    }
}

/// High-level programmer handle
pub struct Programmer<T> {
    client: ProtocolClient<T>,
}

impl Programmer<SerialTransport> {
    /// Open the serial port named in `config`
    pub fn open(config: &ProgrammerConfig) -> Result<Self> {
        let transport = SerialTransport::open(config)?;
        Ok(Self::new(ProtocolClient::new(transport, config.reset_timing())))
    }
}

impl<T: Transport> Programmer<T> {
    pub fn new(client: ProtocolClient<T>) -> Self {
        Self { client }
    }

    /// Access the protocol client
    pub fn client(&self) -> &ProtocolClient<T> {
        &self.client
    }

    /// Mutable access to the protocol client
    pub fn client_mut(&mut self) -> &mut ProtocolClient<T> {
        &mut self.client
    }

    pub fn into_inner(self) -> ProtocolClient<T> {
        self.client
    }

    /// Reset the controller
    pub fn reset(&mut self) -> Result<()> {
        self.client.reset()
    }

    /// Write `data` at `start`
    pub fn write(&mut self, data: &[u8], start: u32) -> Result<()> {
        wire_len(data.len())?;
        self.client.write_session(data, start)
    }

    /// Read `length` bytes at `start`
    pub fn read(&mut self, start: u32, length: usize) -> Result<Vec<u8>> {
        let length = wire_len(length)?;
        self.client.read_session(start, length)
    }

    /// Fill the first `length` bytes with `byte`
    pub fn fill(&mut self, byte: u8, length: usize) -> Result<()> {
        self.fill_at(byte, length, 0)
    }

    /// Fill `length` bytes at `start` with `byte`
    pub fn fill_at(&mut self, byte: u8, length: usize, start: u32) -> Result<()> {
        info!(byte, length, start, "filling");
        self.write(&FillBytes::new(byte, length).to_vec(), start)
    }

    /// Compare memory at `start` with `expected`
    pub fn verify(&mut self, expected: &[u8], start: u32) -> Result<()> {
        self.verify_labeled(expected, start, INPUT_LABEL)
    }

    /// Compare memory at `start` with `expected`, naming it `label` in the
    /// mismatch report
    pub fn verify_labeled(&mut self, expected: &[u8], start: u32, label: &str) -> Result<()> {
        let actual = self.read(start, expected.len())?;
        if actual == expected {
            info!(start, len = expected.len(), "verified");
            return Ok(());
        }

        let diff = hexdump::diff(label, expected, DEVICE_LABEL, &actual);
        warn!(start, %label, "contents differ");
        Err(ProgrammerError::ContentMismatch {
            message: format!("{} differ from {}", DEVICE_LABEL, label),
            diff,
        })
    }

    /// Check that the first `length` bytes all equal `byte`
    pub fn check_filled(&mut self, byte: u8, length: usize) -> Result<()> {
        self.check_filled_at(byte, length, 0)
    }

    /// Check that `length` bytes at `start` all equal `byte`
    pub fn check_filled_at(&mut self, byte: u8, length: usize, start: u32) -> Result<()> {
        let fill = FillBytes::new(byte, length);
        match self.verify_labeled(&fill.to_vec(), start, &fill.to_string()) {
            Err(ProgrammerError::ContentMismatch { diff, .. }) => {
                Err(ProgrammerError::ContentMismatch {
                    message: format!("EEPROM is not filled with 0x{:02X}", byte),
                    diff,
                })
            }
            other => other,
        }
    }
}

fn wire_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| ProgrammerError::TooLarge(len))
}
