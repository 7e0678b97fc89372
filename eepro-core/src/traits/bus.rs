//! Memory bus trait

/// Access to the address and data pins of a parallel EEPROM
///
/// Implementations own the pin-level details (address latching, data line
/// direction, strobe timing). The controller only uses the composed
/// [`write_byte`](BusDriver::write_byte) and [`read_byte`](BusDriver::read_byte)
/// cycles, which fix the order of the primitive operations.
pub trait BusDriver {
    /// Present `address` to the chip
    ///
    /// With `output_enable` set the chip drives the data lines; otherwise
    /// its outputs are disabled so the controller can drive them.
    fn set_address(&mut self, address: u32, output_enable: bool);

    /// Sample the data lines
    fn read_data_lines(&mut self) -> u8;

    /// Drive `data` onto the data lines
    fn write_data_lines(&mut self, data: u8);

    /// Pulse write enable low for
    /// [`WRITE_PULSE_NS`](crate::config::WRITE_PULSE_NS), then release it
    fn strobe_write_enable(&mut self);

    /// Wait [`WRITE_SETTLE_MS`](crate::config::WRITE_SETTLE_MS) for the chip
    /// to commit the last write
    fn settle(&mut self);

    /// Full write cycle for one byte
    fn write_byte(&mut self, address: u32, data: u8) {
        self.set_address(address, false);
        self.write_data_lines(data);
        self.strobe_write_enable();
        self.settle();
    }

    /// Full read cycle for one byte
    fn read_byte(&mut self, address: u32) -> u8 {
        self.set_address(address, true);
        self.read_data_lines()
    }
}
