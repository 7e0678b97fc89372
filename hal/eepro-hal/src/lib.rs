//! EEPROM Programmer Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the programmer controller needs
//! from a board: GPIO for the data bus and control strobes, a UART for the
//! host link, and an address latch that presents a full address to the
//! memory chip. Board crates implement these; the controller in
//! `eepro-core` and the drivers in `eepro-drivers` only see the traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  eepro-core (state machine, controller) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  eepro-drivers (parallel bus driver)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  eepro-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`], [`gpio::FlexPin`] - Digital I/O
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication
//! - [`latch::AddressLatch`] - Address bus presentation

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod latch;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::{FlexPin, InputPin, OutputPin};
pub use latch::AddressLatch;
pub use uart::{UartRx, UartTx};
