//! Inputs and actions of the state machine

use core::fmt;

use eepro_protocol::{Reply, TokenError};
use heapless::Vec;

/// Upper bound on actions produced by a single transition
pub const MAX_ACTIONS: usize = 4;

/// Actions produced by one transition
pub type Actions = Vec<Action, MAX_ACTIONS>;

/// Inputs that drive the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Input {
    /// A byte arrived from the host
    Byte(u8),
    /// The line stayed idle for the UART timeout
    ///
    /// Finishes a pending decimal token, the way a number typed by hand
    /// ends when the user stops typing.
    Idle,
}

/// Work the controller must perform after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Send an acknowledgment byte
    Reply(Reply),
    /// Run a bus write cycle
    WriteByte { address: u32, data: u8 },
    /// Stream `length` bytes from `start`, escaped, followed by `END` and the
    /// transmitted byte count
    StreamRead { start: u32, length: u32 },
    /// Send the number of bytes written in the finished session
    ReportWritten(u32),
    /// Send a human-readable diagnostic line
    Diagnostic(ProtocolFault),
}

/// Protocol violations detected by the controller
///
/// Reported to the host as `NACK` plus a diagnostic line. None of them
/// wedge the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolFault {
    /// Byte in idle state is not a command
    UnknownCommand(u8),
    /// `ESC` followed by something other than `END` or `ESC`
    InvalidEscape(u8),
    /// Address or length token could not be parsed
    MalformedNumber(TokenError),
    /// Address outside the device
    AddressOutOfRange { address: u32, capacity: u32 },
    /// Read range extends past the end of the device
    RangeOutOfBounds { start: u32, length: u32, capacity: u32 },
}

impl fmt::Display for ProtocolFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ProtocolFault::UnknownCommand(byte) => {
                write!(f, "unknown command 0x{:02X}", byte)
            }
            ProtocolFault::InvalidEscape(byte) => {
                write!(f, "invalid escape sequence 0x1B 0x{:02X}", byte)
            }
            ProtocolFault::MalformedNumber(TokenError::Overflow) => {
                f.write_str("number too large")
            }
            ProtocolFault::MalformedNumber(TokenError::UnexpectedByte(byte)) => {
                write!(f, "expected decimal digit, got 0x{:02X}", byte)
            }
            ProtocolFault::AddressOutOfRange { address, capacity } => {
                write!(f, "address {} out of range (size {})", address, capacity)
            }
            ProtocolFault::RangeOutOfBounds {
                start,
                length,
                capacity,
            } => write!(
                f,
                "range {}+{} out of range (size {})",
                start, length, capacity
            ),
        }
    }
}
