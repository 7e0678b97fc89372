//! Decimal tokens and status lines
//!
//! Addresses and lengths travel as decimal ASCII. The controller parses them
//! greedily, one byte at a time: leading whitespace is skipped, digits are
//! accumulated, and the first non-digit after at least one digit ends the
//! token. An idle line also ends a pending token (see [`DecimalToken::finish`]).
//!
//! Status lines (bytes written / bytes transmitted) are decimal ASCII
//! followed by [`LINE_TERMINATOR`](crate::LINE_TERMINATOR).

use core::fmt::Write;
use heapless::String;

use crate::LINE_TERMINATOR;

/// Longest status line: ten digits of `u32::MAX` plus `\r\n`
pub const MAX_STATUS_LINE: usize = 12;

/// Errors while parsing a decimal token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TokenError {
    /// Value does not fit in 32 bits
    Overflow,
    /// Byte that can neither start nor be skipped before a number
    UnexpectedByte(u8),
}

/// Outcome of feeding one byte to a [`DecimalToken`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TokenStep {
    /// More bytes needed
    Pending,
    /// Token finished; the terminating byte was consumed
    Complete(u32),
}

/// Incremental decimal number parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecimalToken {
    value: u32,
    digits: u8,
}

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

impl DecimalToken {
    /// Create an empty token
    pub const fn new() -> Self {
        Self {
            value: 0,
            digits: 0,
        }
    }

    /// True once at least one digit was accepted
    pub fn has_digits(&self) -> bool {
        self.digits > 0
    }

    /// Feed a single byte
    pub fn feed(&mut self, byte: u8) -> Result<TokenStep, TokenError> {
        if byte.is_ascii_digit() {
            self.value = self
                .value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(byte - b'0')))
                .ok_or(TokenError::Overflow)?;
            self.digits = self.digits.saturating_add(1);
            return Ok(TokenStep::Pending);
        }

        if self.has_digits() {
            Ok(TokenStep::Complete(self.value))
        } else if is_whitespace(byte) {
            Ok(TokenStep::Pending)
        } else {
            Err(TokenError::UnexpectedByte(byte))
        }
    }

    /// Finish the token because the line went idle
    ///
    /// Returns `None` if no digit has been received yet.
    pub fn finish(&self) -> Option<u32> {
        self.has_digits().then_some(self.value)
    }
}

/// Format a status line (`"<value>\r\n"`)
pub fn status_line(value: u32) -> String<MAX_STATUS_LINE> {
    let mut line = String::new();
    // Cannot fail: u32::MAX has ten digits
    let _ = write!(line, "{}", value);
    for &byte in LINE_TERMINATOR {
        let _ = line.push(byte as char);
    }
    line
}

/// Parse a status line, ignoring surrounding whitespace
pub fn parse_status_line(line: &[u8]) -> Option<u32> {
    let text = core::str::from_utf8(line).ok()?.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
