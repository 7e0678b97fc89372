//! Simulated EEPROM
//!
//! Behaves like a parallel EEPROM at the bus level: the address decodes
//! modulo the chip size, data is latched from the data lines and committed
//! on the write-enable strobe, and reads only see the cells while output
//! enable is asserted. Erased cells read `0xFF`.

use eepro_core::BusDriver;

/// Value of an erased cell
pub const ERASED: u8 = 0xFF;

/// Value seen on the data lines when nobody drives them
const FLOATING: u8 = 0xFF;

/// In-memory chip of `N` bytes
#[derive(Debug, Clone)]
pub struct SimulatedEeprom<const N: usize> {
    cells: [u8; N],
    address: usize,
    output_enable: bool,
    data: u8,
    write_cycles: usize,
}

impl<const N: usize> Default for SimulatedEeprom<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SimulatedEeprom<N> {
    /// Create an erased chip
    pub fn new() -> Self {
        Self {
            cells: [ERASED; N],
            address: 0,
            output_enable: false,
            data: FLOATING,
            write_cycles: 0,
        }
    }

    /// Create a chip whose first bytes hold `contents`
    pub fn with_contents(contents: &[u8]) -> Self {
        let mut chip = Self::new();
        let len = contents.len().min(N);
        chip.cells[..len].copy_from_slice(&contents[..len]);
        chip
    }

    /// Chip capacity in bytes
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Current cell contents
    pub fn contents(&self) -> &[u8; N] {
        &self.cells
    }

    /// Mutable cell contents, bypassing the bus
    pub fn contents_mut(&mut self) -> &mut [u8; N] {
        &mut self.cells
    }

    /// Number of committed write cycles
    pub fn write_cycles(&self) -> usize {
        self.write_cycles
    }
}

impl<const N: usize> BusDriver for SimulatedEeprom<N> {
    fn set_address(&mut self, address: u32, output_enable: bool) {
        // Upper address lines are not connected
        self.address = address as usize % N;
        self.output_enable = output_enable;
    }

    fn read_data_lines(&mut self) -> u8 {
        if self.output_enable {
            self.cells[self.address]
        } else {
            FLOATING
        }
    }

    fn write_data_lines(&mut self, data: u8) {
        self.data = data;
    }

    fn strobe_write_enable(&mut self) {
        // The chip ignores write enable while it drives the bus
        if !self.output_enable {
            self.cells[self.address] = self.data;
            self.write_cycles += 1;
        }
    }

    fn settle(&mut self) {}
}
