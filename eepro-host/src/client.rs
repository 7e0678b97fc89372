//! Protocol client
//!
//! Drives the acknowledged byte exchange with the programmer. Every byte
//! the host sends during a session is answered with `ACK` before the next
//! one goes out, so the client never has more than one unacknowledged byte
//! in flight. Anything other than `ACK` aborts the session with a
//! [`ProgrammerError::Connection`] carrying whatever the programmer printed
//! afterwards.

use std::thread;

use eepro_protocol::{
    escape_byte, escaped_len, parse_status_line, Command, Unescaped, Unescaper, ACK, END,
    TOKEN_SEPARATOR,
};
use tracing::{debug, info, trace, warn};

use crate::config::ResetTiming;
use crate::error::{ProgrammerError, Result};
use crate::transport::Transport;

/// Upper bound on bytes collected by [`ProtocolClient::drain`]
const MAX_DRAIN: usize = 4096;

/// Upper bound on a status line
const MAX_LINE: usize = 64;

/// Session-level client over a [`Transport`]
pub struct ProtocolClient<T> {
    transport: T,
    timing: ResetTiming,
}

impl<T: Transport> ProtocolClient<T> {
    /// Create a client with the given reset timing
    pub fn new(transport: T, timing: ResetTiming) -> Self {
        Self { transport, timing }
    }

    /// Access the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the client, returning the transport
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Pulse the reset line and wait for the controller to boot
    ///
    /// Recovers from any fault: the controller comes back idle. Output left
    /// over from before the reset is discarded.
    pub fn reset(&mut self) -> Result<()> {
        info!("resetting programmer");
        self.transport.set_reset_line(true)?;
        thread::sleep(self.timing.pulse);
        self.transport.set_reset_line(false)?;
        thread::sleep(self.timing.boot_delay);

        let stale = self.drain()?;
        if !stale.is_empty() {
            debug!(bytes = stale.len(), "discarded output after reset");
        }
        Ok(())
    }

    /// Send bytes and require a single `ACK` in return
    pub fn acknowledged_write(&mut self, bytes: &[u8]) -> Result<()> {
        self.transport.write_all(bytes)?;
        self.transport.flush()?;

        match self.transport.read_byte()? {
            Some(ACK) => Ok(()),
            received => {
                let drained = String::from_utf8_lossy(&self.drain()?).into_owned();
                warn!(?received, %drained, "write not acknowledged");
                Err(ProgrammerError::Connection { received, drained })
            }
        }
    }

    /// Read until the link goes quiet
    pub fn drain(&mut self) -> Result<Vec<u8>> {
        let mut drained = Vec::new();
        while drained.len() < MAX_DRAIN {
            match self.transport.read_byte()? {
                Some(byte) => drained.push(byte),
                None => break,
            }
        }
        Ok(drained)
    }

    /// Read one line, up to and including `\n`
    ///
    /// A timeout ends the line early; the caller sees whatever arrived.
    pub fn read_line(&mut self) -> Result<Vec<u8>> {
        let mut line = Vec::new();
        while line.len() < MAX_LINE {
            match self.transport.read_byte()? {
                Some(byte) => {
                    line.push(byte);
                    if byte == b'\n' {
                        break;
                    }
                }
                None => break,
            }
        }
        Ok(line)
    }

    /// Write `payload` starting at `start`
    ///
    /// Every payload byte is escaped and each wire byte is acknowledged
    /// individually. Fails with [`ProgrammerError::Integrity`] if the
    /// programmer reports a byte count different from `payload.len()`.
    pub fn write_session(&mut self, payload: &[u8], start: u32) -> Result<()> {
        info!(start, len = payload.len(), "write session");

        self.command(Command::Write)?;
        self.token(start)?;
        for (offset, &byte) in payload.iter().enumerate() {
            for wire in escape_byte(byte) {
                self.acknowledged_write(&[wire])?;
            }
            trace!(offset, byte, "byte acknowledged");
        }
        self.acknowledged_write(&[END])?;

        let reported = self.read_count("write count")?;
        if reported != payload.len() {
            return Err(ProgrammerError::Integrity {
                operation: "write",
                reported,
                expected: payload.len(),
            });
        }
        debug!(written = reported, "write session complete");
        Ok(())
    }

    /// Read `length` bytes starting at `start`
    ///
    /// The programmer's transfer count covers escape markers, so it is
    /// compared against the escaped length of the decoded data.
    pub fn read_session(&mut self, start: u32, length: u32) -> Result<Vec<u8>> {
        info!(start, length, "read session");

        self.command(Command::Read)?;
        self.token(start)?;
        self.token(length)?;

        let mut content = Vec::with_capacity(length as usize);
        let mut decoder = Unescaper::new();
        loop {
            let byte = match self.transport.read_byte()? {
                Some(byte) => byte,
                None => {
                    warn!(received = content.len(), "read session timed out");
                    return Err(ProgrammerError::Connection {
                        received: None,
                        drained: String::new(),
                    });
                }
            };
            match decoder.feed(byte) {
                Unescaped::End => break,
                Unescaped::Pending => {}
                Unescaped::Literal(byte) => content.push(byte),
                Unescaped::InvalidEscape(byte) => {
                    warn!(byte, offset = content.len(), "invalid escape in read data");
                    content.push(byte);
                }
            }
            if content.len() > length as usize {
                warn!(length, "read data overran requested length");
                return Err(ProgrammerError::Integrity {
                    operation: "read length",
                    reported: content.len(),
                    expected: length as usize,
                });
            }
        }

        let reported = self.read_count("read count")?;
        let transmitted = escaped_len(&content);
        if reported != transmitted {
            return Err(ProgrammerError::Integrity {
                operation: "read",
                reported,
                expected: transmitted,
            });
        }
        if content.len() != length as usize {
            return Err(ProgrammerError::Integrity {
                operation: "read length",
                reported: content.len(),
                expected: length as usize,
            });
        }
        debug!(transmitted, "read session complete");
        Ok(content)
    }

    fn command(&mut self, command: Command) -> Result<()> {
        self.acknowledged_write(&[command.to_byte(), TOKEN_SEPARATOR])
    }

    fn token(&mut self, value: u32) -> Result<()> {
        self.acknowledged_write(format!("{} ", value).as_bytes())
    }

    fn read_count(&mut self, what: &'static str) -> Result<usize> {
        let line = self.read_line()?;
        parse_status_line(&line)
            .map(|count| count as usize)
            .ok_or_else(|| ProgrammerError::InvalidResponse {
                what,
                line: String::from_utf8_lossy(&line).into_owned(),
            })
    }
}
