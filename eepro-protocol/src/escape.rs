//! Byte stuffing for payload data
//!
//! Escaping rules:
//! - `END` is sent as `ESC END`
//! - `ESC` is sent as `ESC ESC`
//! - every other byte is sent unchanged
//!
//! Decoding is incremental: both the controller (write payloads) and the
//! host (read responses) feed one wire byte at a time into an [`Unescaper`].

use crate::{END, ESC};

/// Returns true for the two reserved control values
pub fn is_control(byte: u8) -> bool {
    byte == END || byte == ESC
}

/// Wire form of a single payload byte (one or two bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapedByte {
    bytes: [u8; 2],
    len: u8,
    pos: u8,
}

impl EscapedByte {
    /// Remaining wire bytes as a slice
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[self.pos as usize..self.len as usize]
    }
}

impl Iterator for EscapedByte {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.pos < self.len {
            let byte = self.bytes[self.pos as usize];
            self.pos += 1;
            Some(byte)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.len - self.pos) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for EscapedByte {}

/// Escape a single byte
pub fn escape_byte(byte: u8) -> EscapedByte {
    if is_control(byte) {
        EscapedByte {
            bytes: [ESC, byte],
            len: 2,
            pos: 0,
        }
    } else {
        EscapedByte {
            bytes: [byte, 0],
            len: 1,
            pos: 0,
        }
    }
}

/// Iterator over the escaped form of a byte slice
#[derive(Debug, Clone)]
pub struct Escape<'a> {
    input: core::slice::Iter<'a, u8>,
    current: Option<EscapedByte>,
}

impl Iterator for Escape<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        loop {
            if let Some(byte) = self.current.as_mut().and_then(Iterator::next) {
                return Some(byte);
            }
            self.current = Some(escape_byte(*self.input.next()?));
        }
    }
}

/// Escape a byte slice, preserving order
pub fn escape(bytes: &[u8]) -> Escape<'_> {
    Escape {
        input: bytes.iter(),
        current: None,
    }
}

/// Length of the escaped form of `bytes`
pub fn escaped_len(bytes: &[u8]) -> usize {
    bytes.len() + bytes.iter().filter(|&&b| is_control(b)).count()
}

/// Result of feeding one wire byte to an [`Unescaper`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Unescaped {
    /// `ESC` received, the next byte is literal
    Pending,
    /// A payload byte
    Literal(u8),
    /// Unescaped `END`: the payload is complete
    End,
    /// `ESC` followed by something other than `END` or `ESC`
    ///
    /// The byte is handed back so the reader can decide whether to keep it.
    InvalidEscape(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum DecodeState {
    #[default]
    Plain,
    Escaped,
}

/// Incremental decoder for escaped payload streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Unescaper {
    state: DecodeState,
}

impl Unescaper {
    /// Create a decoder expecting a fresh byte
    pub const fn new() -> Self {
        Self {
            state: DecodeState::Plain,
        }
    }

    /// Forget a half-received escape sequence
    pub fn reset(&mut self) {
        self.state = DecodeState::Plain;
    }

    /// True between an `ESC` and its follow byte
    pub fn is_pending(&self) -> bool {
        self.state == DecodeState::Escaped
    }

    /// Feed one wire byte
    pub fn feed(&mut self, byte: u8) -> Unescaped {
        match self.state {
            DecodeState::Plain => match byte {
                END => Unescaped::End,
                ESC => {
                    self.state = DecodeState::Escaped;
                    Unescaped::Pending
                }
                _ => Unescaped::Literal(byte),
            },
            DecodeState::Escaped => {
                self.state = DecodeState::Plain;
                if is_control(byte) {
                    Unescaped::Literal(byte)
                } else {
                    Unescaped::InvalidEscape(byte)
                }
            }
        }
    }
}
