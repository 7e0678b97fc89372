//! Host side of the EEPROM programmer
//!
//! Layers, bottom up:
//! - [`Transport`]: byte link with a per-byte timeout and a reset line
//! - [`ProtocolClient`]: acknowledged write and read sessions
//! - [`Programmer`]: fill, verify and check operations over whole ranges
//! - [`Job`]: ordered steps that stop at the first fault
//!
//! All failures surface as [`ProgrammerError`]; nothing is retried. A
//! [`ProtocolClient::reset`] brings the controller back to idle after any
//! fault.

pub mod client;
pub mod config;
pub mod error;
pub mod hexdump;
pub mod job;
pub mod programmer;
pub mod transport;

pub use client::ProtocolClient;
pub use config::{ProgrammerConfig, ResetTiming};
pub use error::{ProgrammerError, Result};
pub use hexdump::format_hex;
pub use job::{Job, JobRequest, Step};
pub use programmer::{FillBytes, Programmer, ERASED};
pub use transport::{SerialTransport, Transport};
