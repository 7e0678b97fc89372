//! UART serial communication abstractions
//!
//! The host link is a plain byte stream. The controller only needs blocking
//! single-byte reads (with an idle timeout to finish pending number tokens)
//! and blocking writes.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Write a single byte
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.write_blocking(&[byte])
    }

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read a single byte, waiting at most the configured idle timeout
    ///
    /// Returns `Ok(None)` if the line stayed idle for the whole timeout.
    fn read_byte_timeout(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Read a single byte, waiting indefinitely
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        loop {
            if let Some(byte) = self.read_byte_timeout()? {
                return Ok(byte);
            }
        }
    }
}
