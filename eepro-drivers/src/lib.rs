//! Bus driver implementations
//!
//! This crate provides concrete implementations of the
//! [`BusDriver`](eepro_core::BusDriver) trait:
//!
//! - Parallel pin driver (address latch, eight data lines, write enable)
//! - Simulated EEPROM for host-side testing and loopback links

#![no_std]
#![deny(unsafe_code)]

pub mod bus;

pub use bus::{ParallelBus, SimulatedEeprom};
