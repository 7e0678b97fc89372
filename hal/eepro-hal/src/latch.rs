//! Address latch abstraction
//!
//! Parallel EEPROMs need up to 15 address lines, more than most
//! controllers have to spare. Boards usually shift the address into a pair
//! of shift registers whose spare output drives the chip's output enable.
//! How the bits get there is board specific; the controller only needs the
//! full address and the output-enable level presented at the chip pins.

/// Presents an address (and the output-enable level) to the memory chip
pub trait AddressLatch {
    /// Latch `address` onto the address bus
    ///
    /// When `output_enable` is true the chip is allowed to drive the data
    /// bus (read cycle). When false the chip's outputs are high impedance
    /// and the controller may drive the data lines (write cycle).
    fn latch(&mut self, address: u32, output_enable: bool);
}
