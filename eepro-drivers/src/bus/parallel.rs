//! Parallel pin bus driver
//!
//! Drives an AT28C-style chip with:
//! - an address latch (usually shift registers) that also carries output enable
//! - eight bidirectional data lines, D0 first
//! - an active-low write enable pin
//!
//! Data line direction is switched so that the controller and the chip never
//! drive the bus at the same time.

use eepro_core::config::{WRITE_PULSE_NS, WRITE_SETTLE_MS};
use eepro_core::BusDriver;
use eepro_hal::{AddressLatch, FlexPin, InputPin, OutputPin};
use embedded_hal::delay::DelayNs;

/// Number of data lines
pub const DATA_LINES: usize = 8;

/// Bus driver over GPIO pins
pub struct ParallelBus<L, D, W, T> {
    latch: L,
    data: [D; DATA_LINES],
    write_enable: W,
    delay: T,
}

impl<L, D, W, T> ParallelBus<L, D, W, T>
where
    L: AddressLatch,
    D: FlexPin,
    W: OutputPin,
    T: DelayNs,
{
    /// Create a new bus driver
    ///
    /// Write enable is released (high) and the data lines start as inputs.
    pub fn new(latch: L, mut data: [D; DATA_LINES], mut write_enable: W, delay: T) -> Self {
        write_enable.set_high();
        for pin in data.iter_mut() {
            pin.set_as_input();
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("Parallel bus ready, {} data lines", DATA_LINES);

        Self {
            latch,
            data,
            write_enable,
            delay,
        }
    }

    /// Release the pins
    pub fn release(self) -> (L, [D; DATA_LINES], W, T) {
        (self.latch, self.data, self.write_enable, self.delay)
    }
}

impl<L, D, W, T> BusDriver for ParallelBus<L, D, W, T>
where
    L: AddressLatch,
    D: FlexPin,
    W: OutputPin,
    T: DelayNs,
{
    fn set_address(&mut self, address: u32, output_enable: bool) {
        if output_enable {
            // Let go of the bus before the chip starts driving it
            for pin in self.data.iter_mut() {
                pin.set_as_input();
            }
            self.latch.latch(address, true);
        } else {
            self.latch.latch(address, false);
            for pin in self.data.iter_mut() {
                pin.set_as_output();
            }
        }
    }

    fn read_data_lines(&mut self) -> u8 {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, pin)| pin.is_high())
            .fold(0u8, |value, (bit, _)| value | (1 << bit))
    }

    fn write_data_lines(&mut self, data: u8) {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            pin.set_state(data & (1 << bit) != 0);
        }
    }

    fn strobe_write_enable(&mut self) {
        self.write_enable.set_low();
        self.delay.delay_ns(WRITE_PULSE_NS);
        self.write_enable.set_high();
    }

    fn settle(&mut self) {
        self.delay.delay_ms(WRITE_SETTLE_MS);
    }
}
