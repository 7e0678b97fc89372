//! Error types for the programmer host.

use thiserror::Error;

/// Main error type for all programmer operations.
#[derive(Debug, Error)]
pub enum ProgrammerError {
    /// I/O error on the serial link or while reading config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port could not be opened or configured.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Config file is not valid TOML for [`ProgrammerConfig`](crate::ProgrammerConfig).
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Config values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The programmer did not acknowledge a write.
    ///
    /// `received` is the byte that arrived instead of `ACK` (`None` on
    /// timeout), `drained` whatever the programmer sent after it.
    #[error("Programmer did not acknowledge write (got {})", describe_reply(.received))]
    Connection {
        received: Option<u8>,
        drained: String,
    },

    /// A transfer count reported by the programmer disagrees with ours.
    #[error("{operation}: programmer reported {reported} bytes, expected {expected}")]
    Integrity {
        operation: &'static str,
        reported: usize,
        expected: usize,
    },

    /// Memory contents differ from what was expected.
    #[error("{message}")]
    ContentMismatch { message: String, diff: String },

    /// A status line could not be parsed.
    #[error("Invalid {what} from programmer: {line:?}")]
    InvalidResponse { what: &'static str, line: String },

    /// Request does not fit the 32-bit address space of the protocol.
    #[error("Request too large: {0} bytes")]
    TooLarge(usize),
}

fn describe_reply(received: &Option<u8>) -> String {
    match received {
        Some(byte) => format!("0x{:02X}", byte),
        None => "timeout".to_string(),
    }
}

impl ProgrammerError {
    /// Diagnostic text attached to the fault, if any
    ///
    /// Drained link output for connection faults, the rendered hex dump diff
    /// for content mismatches.
    pub fn details(&self) -> Option<&str> {
        match self {
            ProgrammerError::Connection { drained, .. } if !drained.is_empty() => Some(drained),
            ProgrammerError::ContentMismatch { diff, .. } => Some(diff),
            _ => None,
        }
    }
}

/// Result type alias using ProgrammerError.
pub type Result<T> = std::result::Result<T, ProgrammerError>;
