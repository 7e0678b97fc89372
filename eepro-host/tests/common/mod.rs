//! Simulated programmer for host integration tests
//!
//! [`Loopback`] runs the real controller state machine against a simulated
//! chip. Bytes the host writes are handed to the controller one at a time;
//! whatever the controller transmits is queued for the host to read. An
//! empty queue reads as a timeout, and the controller sees an idle line.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;
use std::io;
use std::time::Duration;

use eepro_core::{Controller, DeviceConfig, Input};
use eepro_drivers::SimulatedEeprom;
use eepro_hal::UartTx;
use eepro_host::{Programmer, ProtocolClient, ResetTiming, Transport};

/// Bytes queued by the controller for the host
#[derive(Debug, Default)]
pub struct ResponseQueue(VecDeque<u8>);

impl UartTx for ResponseQueue {
    type Error = Infallible;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Infallible> {
        self.0.extend(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Host link wired straight into a controller
pub struct Loopback<const N: usize> {
    controller: Controller<SimulatedEeprom<N>, ResponseQueue>,
    in_reset: bool,
    reads: usize,
    substitutions: Vec<(usize, u8)>,
    /// Every byte the host sent, in order
    pub sent: Vec<u8>,
}

impl<const N: usize> Loopback<N> {
    pub fn new() -> Self {
        Self::with_chip(SimulatedEeprom::new())
    }

    pub fn with_chip(chip: SimulatedEeprom<N>) -> Self {
        Self {
            controller: Controller::new(
                chip,
                ResponseQueue::default(),
                DeviceConfig::new(N as u32),
            ),
            in_reset: false,
            reads: 0,
            substitutions: Vec::new(),
            sent: Vec::new(),
        }
    }

    pub fn chip(&self) -> &SimulatedEeprom<N> {
        self.controller.bus()
    }

    pub fn chip_mut(&mut self) -> &mut SimulatedEeprom<N> {
        self.controller.bus_mut()
    }

    pub fn controller(&self) -> &Controller<SimulatedEeprom<N>, ResponseQueue> {
        &self.controller
    }

    /// Replace the `index`th byte the host reads (counting from 0) with
    /// `byte`
    pub fn substitute(&mut self, index: usize, byte: u8) {
        self.substitutions.push((index, byte));
    }

    /// Number of bytes the host has read so far
    pub fn reads(&self) -> usize {
        self.reads
    }

    fn handle(&mut self, input: Input) {
        match self.controller.handle(input) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }
}

impl<const N: usize> Transport for Loopback<N> {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.sent.extend_from_slice(bytes);
        if self.in_reset {
            return Ok(());
        }
        for &byte in bytes {
            self.handle(Input::Byte(byte));
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if self.in_reset {
            return Ok(None);
        }
        if self.controller.tx().0.is_empty() {
            self.handle(Input::Idle);
        }

        let Some(byte) = self.controller.tx_mut().0.pop_front() else {
            return Ok(None);
        };
        let index = self.reads;
        self.reads += 1;
        let byte = self
            .substitutions
            .iter()
            .find(|(at, _)| *at == index)
            .map_or(byte, |&(_, replacement)| replacement);
        Ok(Some(byte))
    }

    fn set_reset_line(&mut self, asserted: bool) -> io::Result<()> {
        if self.in_reset && !asserted {
            self.controller.reset();
            self.controller.tx_mut().0.clear();
        }
        self.in_reset = asserted;
        Ok(())
    }
}

pub fn instant() -> ResetTiming {
    ResetTiming {
        pulse: Duration::ZERO,
        boot_delay: Duration::ZERO,
    }
}

pub fn client<const N: usize>() -> ProtocolClient<Loopback<N>> {
    ProtocolClient::new(Loopback::new(), instant())
}

pub fn programmer<const N: usize>() -> Programmer<Loopback<N>> {
    Programmer::new(client())
}

pub fn loopback<const N: usize>(programmer: &mut Programmer<Loopback<N>>) -> &mut Loopback<N> {
    programmer.client_mut().transport_mut()
}
