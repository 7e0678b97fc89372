//! Board-agnostic controller logic for the EEPROM programmer
//!
//! This crate contains everything the controller does that does not depend
//! on a specific board:
//!
//! - Bus driver trait (address/data/strobe access to the memory chip)
//! - Device configuration and write timing
//! - Protocol state machine (pure transition function)
//! - Controller that executes state machine actions against a bus and UART

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod state;
pub mod traits;

pub use config::{Chip, DeviceConfig};
pub use controller::{Controller, ControllerError};
pub use state::{Action, Input, ProtocolFault, State};
pub use traits::BusDriver;
