//! Byte link to the programmer
//!
//! [`Transport`] is the seam between the protocol client and the physical
//! link. [`SerialTransport`] talks to a real board over a serial port; tests
//! plug in a simulated device instead.

use std::io::{self, Read, Write};

use serialport::SerialPort;
use tracing::{debug, info};

use crate::config::ProgrammerConfig;
use crate::error::{ProgrammerError, Result};

/// Ordered, bidirectional byte link with a per-byte read timeout
pub trait Transport {
    /// Send all bytes
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Push buffered output onto the link
    fn flush(&mut self) -> io::Result<()>;

    /// Receive one byte, `None` if the timeout elapsed first
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Drive the controller's reset line
    fn set_reset_line(&mut self, asserted: bool) -> io::Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }

    fn set_reset_line(&mut self, asserted: bool) -> io::Result<()> {
        (**self).set_reset_line(asserted)
    }
}

/// Serial port link; DTR is wired to the controller reset
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open the port named in `config`
    pub fn open(config: &ProgrammerConfig) -> Result<Self> {
        if config.port.is_empty() {
            return Err(ProgrammerError::InvalidConfig("no serial port configured".into()));
        }

        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(config.timeout())
            .open()?;
        info!(port = %config.port, baud = config.baud_rate, "opened programmer port");

        Ok(Self::new(port))
    }

    /// Wrap an already opened port
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }

    /// Release the port
    pub fn into_inner(self) -> Box<dyn SerialPort> {
        self.port
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.port.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        match self.port.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set_reset_line(&mut self, asserted: bool) -> io::Result<()> {
        debug!(asserted, "reset line");
        self.port
            .write_data_terminal_ready(asserted)
            .map_err(io::Error::from)
    }
}
