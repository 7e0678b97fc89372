//! EEPROM Programmer Link Protocol
//!
//! This crate defines the byte protocol spoken between the host and the
//! programmer controller over a half-duplex serial link. It is shared by
//! both sides so the two implementations cannot drift apart.
//!
//! # Protocol Overview
//!
//! A session starts with a single command byte and a number of decimal
//! tokens. The controller answers every command byte, every token and every
//! payload byte with `ACK` (or `NACK`), which is the only flow control the
//! link has.
//!
//! ```text
//! write:  host  'w' ' ' "0" ' '  <escaped payload, byte by byte>  END
//!         ctrl  ACK          ACK  ACK ACK ...                      ACK "3\r\n"
//!
//! read:   host  'r' ' ' "0" ' ' "3" ' '
//!         ctrl  ACK          ACK        ACK <escaped data> END "3\r\n"
//! ```
//!
//! Payload data is byte-stuffed: `END` and `ESC` are prefixed with `ESC`,
//! every other byte value passes through untouched.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod escape;
pub mod token;

pub use command::{Command, Reply};
pub use escape::{escape, escape_byte, escaped_len, EscapedByte, Unescaped, Unescaper};
pub use token::{parse_status_line, status_line, DecimalToken, TokenError, TokenStep};

/// Frame terminator (ASCII EOT)
pub const END: u8 = 0x04;

/// Escape marker (ASCII ESC)
pub const ESC: u8 = 0x1B;

/// Positive acknowledgment (ASCII ACK)
pub const ACK: u8 = 0x06;

/// Negative acknowledgment (ASCII NAK)
pub const NACK: u8 = 0x15;

/// Terminator of status and diagnostic lines
pub const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Byte the host appends to every command and decimal token
pub const TOKEN_SEPARATOR: u8 = b' ';
