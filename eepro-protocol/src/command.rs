//! Command and reply bytes
//!
//! - Host → controller: single-byte session commands
//! - Controller → host: acknowledgment tokens

use crate::{ACK, NACK};

/// Command byte opening a write session
pub const CMD_WRITE: u8 = b'w';

/// Command byte opening a read session
pub const CMD_READ: u8 = b'r';

/// Session commands understood by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Write an escaped payload starting at an address
    Write,
    /// Read a block of memory
    Read,
}

impl Command {
    /// Parse a command byte. Commands are case-sensitive.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_WRITE => Some(Command::Write),
            CMD_READ => Some(Command::Read),
            _ => None,
        }
    }

    /// Wire representation of this command
    pub fn to_byte(self) -> u8 {
        match self {
            Command::Write => CMD_WRITE,
            Command::Read => CMD_READ,
        }
    }
}

/// Acknowledgment sent by the controller after each interpreted byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    Ack,
    Nack,
}

impl Reply {
    /// Parse an acknowledgment byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            ACK => Some(Reply::Ack),
            NACK => Some(Reply::Nack),
            _ => None,
        }
    }

    /// Wire representation of this reply
    pub fn to_byte(self) -> u8 {
        match self {
            Reply::Ack => ACK,
            Reply::Nack => NACK,
        }
    }
}
