//! GPIO pin abstractions
//!
//! Digital pins used for the EEPROM control strobes (write enable, output
//! enable) and the eight bidirectional data lines.

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Pin samples the line
    Input,
    /// Pin drives the line
    Output,
}

/// Pin whose direction can be switched at runtime
///
/// The EEPROM data bus is shared: the controller drives it while writing
/// and the chip drives it while output enable is asserted. Data line pins
/// must be switched to input before the chip is allowed to drive them.
pub trait FlexPin: OutputPin + InputPin {
    /// Change the pin direction
    fn set_direction(&mut self, direction: Direction);

    /// Current pin direction
    fn direction(&self) -> Direction;

    /// Switch to input
    fn set_as_input(&mut self) {
        self.set_direction(Direction::Input);
    }

    /// Switch to output
    fn set_as_output(&mut self) {
        self.set_direction(Direction::Output);
    }
}
