//! Controller executing the protocol state machine
//!
//! The controller is the only place where the state machine meets hardware:
//! - Reads bytes (or idle timeouts) from the host UART
//! - Runs the transition function
//! - Performs the resulting bus cycles and replies, in order
//!
//! Reads are streamed synchronously from inside a single step, so the
//! controller never buffers more than one escaped byte.

use core::fmt::Write;

use eepro_hal::{UartRx, UartTx};
use eepro_protocol::{escape_byte, status_line, END, LINE_TERMINATOR};
use heapless::String;

use crate::config::DeviceConfig;
use crate::state::{Action, Input, ProtocolFault, State};
use crate::traits::BusDriver;

/// Longest diagnostic line, without terminator
const MAX_DIAGNOSTIC_LEN: usize = 64;

/// Errors from [`Controller::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError<R, T> {
    /// Receiving from the host failed
    Rx(R),
    /// Sending to the host failed
    Tx(T),
}

/// Programmer controller
pub struct Controller<B, T> {
    state: State,
    config: DeviceConfig,
    bus: B,
    tx: T,
}

impl<B: BusDriver, T: UartTx> Controller<B, T> {
    /// Create a controller in the idle state
    pub fn new(bus: B, tx: T, config: DeviceConfig) -> Self {
        Self {
            state: State::Idle,
            config,
            bus,
            tx,
        }
    }

    /// Get current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Get device configuration
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Return to idle, dropping any open session
    ///
    /// Equivalent to the state after a board reset.
    pub fn reset(&mut self) {
        #[cfg(feature = "defmt")]
        if !self.state.is_idle() {
            defmt::warn!("Reset during session: {}", self.state);
        }
        self.state = State::Idle;
    }

    /// Access the bus driver
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable access to the bus driver
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Access the UART transmitter
    pub fn tx(&self) -> &T {
        &self.tx
    }

    /// Mutable access to the UART transmitter
    pub fn tx_mut(&mut self) -> &mut T {
        &mut self.tx
    }

    /// Consume the controller, returning bus and transmitter
    pub fn into_parts(self) -> (B, T) {
        (self.bus, self.tx)
    }

    /// Wait for the next byte from the host and process it
    pub fn poll<R: UartRx>(&mut self, rx: &mut R) -> Result<(), ControllerError<R::Error, T::Error>> {
        let input = match rx.read_byte_timeout().map_err(ControllerError::Rx)? {
            Some(byte) => Input::Byte(byte),
            None => Input::Idle,
        };
        self.handle(input).map_err(ControllerError::Tx)
    }

    /// Process one input
    pub fn handle(&mut self, input: Input) -> Result<(), T::Error> {
        let (next, actions) = self.state.transition(input, &self.config);
        self.state = next;

        for action in actions {
            self.execute(action)?;
        }
        self.tx.flush()
    }

    fn execute(&mut self, action: Action) -> Result<(), T::Error> {
        match action {
            Action::Reply(reply) => self.tx.write_byte(reply.to_byte()),
            Action::WriteByte { address, data } => {
                self.bus.write_byte(address, data);
                Ok(())
            }
            Action::StreamRead { start, length } => self.stream(start, length),
            Action::ReportWritten(count) => {
                #[cfg(feature = "defmt")]
                defmt::info!("Wrote {} bytes", count);
                self.tx.write_blocking(status_line(count).as_bytes())
            }
            Action::Diagnostic(fault) => self.diagnostic(fault),
        }
    }

    /// Stream a memory block to the host
    ///
    /// Sends the escaped data, `END`, then the number of bytes put on the
    /// wire including escape markers.
    fn stream(&mut self, start: u32, length: u32) -> Result<(), T::Error> {
        let mut transmitted: u32 = 0;
        for address in start..start + length {
            let escaped = escape_byte(self.bus.read_byte(address));
            transmitted = count_transmitted(transmitted, escaped.len());
            self.tx.write_blocking(escaped.as_slice())?;
        }
        self.tx.write_byte(END)?;

        #[cfg(feature = "defmt")]
        defmt::info!("Read {} bytes from {}, sent {}", length, start, transmitted);

        self.tx.write_blocking(status_line(transmitted).as_bytes())
    }

    fn diagnostic(&mut self, fault: ProtocolFault) -> Result<(), T::Error> {
        #[cfg(feature = "defmt")]
        defmt::warn!("Protocol fault: {}", fault);

        let mut line: String<MAX_DIAGNOSTIC_LEN> = String::new();
        // Messages are bounded well below the line size
        let _ = write!(line, "{}", fault);
        self.tx.write_blocking(line.as_bytes())?;
        self.tx.write_blocking(LINE_TERMINATOR)
    }
}

/// Add escaped bytes to a running transfer count, saturating at `u32::MAX`
fn count_transmitted(total: u32, escaped: usize) -> u32 {
    total.saturating_add(escaped as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eepro_protocol::{ACK, ESC, NACK};
    use heapless::Vec;

    const SIZE: usize = 32;

    /// In-memory chip; write cycles commit on strobe
    struct MemoryBus {
        cells: [u8; SIZE],
        address: u32,
        output_enable: bool,
        data: u8,
        strobes: usize,
        settles: usize,
    }

    impl MemoryBus {
        fn new() -> Self {
            Self {
                cells: [0xFF; SIZE],
                address: 0,
                output_enable: false,
                data: 0,
                strobes: 0,
                settles: 0,
            }
        }
    }

    impl BusDriver for MemoryBus {
        fn set_address(&mut self, address: u32, output_enable: bool) {
            self.address = address;
            self.output_enable = output_enable;
        }

        fn read_data_lines(&mut self) -> u8 {
            assert!(self.output_enable);
            self.cells[self.address as usize]
        }

        fn write_data_lines(&mut self, data: u8) {
            assert!(!self.output_enable);
            self.data = data;
        }

        fn strobe_write_enable(&mut self) {
            self.cells[self.address as usize] = self.data;
            self.strobes += 1;
        }

        fn settle(&mut self) {
            self.settles += 1;
        }
    }

    /// Captures everything sent to the host
    #[derive(Default)]
    struct Wire {
        sent: Vec<u8, 256>,
        flushes: usize,
    }

    impl UartTx for Wire {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            self.sent.extend_from_slice(data)
        }

        fn flush(&mut self) -> Result<(), ()> {
            self.flushes += 1;
            Ok(())
        }
    }

    /// Host bytes with an idle line at the end
    struct Script<'a> {
        bytes: &'a [u8],
        pos: usize,
    }

    impl UartRx for Script<'_> {
        type Error = ();

        fn read_byte_timeout(&mut self) -> Result<Option<u8>, ()> {
            let byte = self.bytes.get(self.pos).copied();
            self.pos += 1;
            Ok(byte)
        }
    }

    fn controller() -> Controller<MemoryBus, Wire> {
        Controller::new(MemoryBus::new(), Wire::default(), DeviceConfig::new(SIZE as u32))
    }

    fn feed(ctrl: &mut Controller<MemoryBus, Wire>, bytes: &[u8]) {
        for &byte in bytes {
            ctrl.handle(Input::Byte(byte)).unwrap();
        }
    }

    #[test]
    fn test_write_three_bytes() {
        let mut ctrl = controller();
        feed(&mut ctrl, &[b'w', b' ', b'0', b' ', 0x01, 0x02, 0x03, END]);

        assert_eq!(&ctrl.bus().cells[..3], &[0x01, 0x02, 0x03]);
        assert_eq!(ctrl.bus().strobes, 3);
        assert_eq!(ctrl.bus().settles, 3);
        assert_eq!(&ctrl.tx().sent[..], &[ACK, ACK, ACK, ACK, ACK, ACK, b'3', b'\r', b'\n']);
        assert!(ctrl.state().is_idle());
    }

    #[test]
    fn test_read_three_bytes() {
        let mut ctrl = controller();
        ctrl.bus_mut().cells[..3].copy_from_slice(&[0x01, 0x02, 0x03]);
        feed(&mut ctrl, b"r 0 3 ");

        assert_eq!(
            &ctrl.tx().sent[..],
            &[ACK, ACK, ACK, 0x01, 0x02, 0x03, END, b'3', b'\r', b'\n']
        );
        assert!(ctrl.state().is_idle());
    }

    #[test]
    fn test_read_escapes_control_bytes() {
        let mut ctrl = controller();
        ctrl.bus_mut().cells[4..7].copy_from_slice(&[END, ESC, 0x41]);
        feed(&mut ctrl, b"r 4 3 ");

        assert_eq!(
            &ctrl.tx().sent[3..],
            &[ESC, END, ESC, ESC, 0x41, END, b'5', b'\r', b'\n']
        );
    }

    #[test]
    fn test_read_zero_length() {
        let mut ctrl = controller();
        feed(&mut ctrl, b"r 0 0 ");
        assert_eq!(&ctrl.tx().sent[..], &[ACK, ACK, ACK, END, b'0', b'\r', b'\n']);
    }

    #[test]
    fn test_unknown_command_diagnostic() {
        let mut ctrl = controller();
        feed(&mut ctrl, b"x");
        assert_eq!(ctrl.tx().sent[0], NACK);
        assert_eq!(&ctrl.tx().sent[1..], b"unknown command 0x78\r\n");

        feed(&mut ctrl, b"w");
        assert_eq!(*ctrl.tx().sent.last().unwrap(), ACK);
    }

    #[test]
    fn test_reset_drops_session() {
        let mut ctrl = controller();
        feed(&mut ctrl, b"w 0 ");
        assert!(!ctrl.state().is_idle());
        ctrl.reset();
        assert!(ctrl.state().is_idle());
    }

    #[test]
    fn test_poll_finishes_token_on_idle_line() {
        let mut ctrl = controller();
        let mut rx = Script {
            bytes: b"w 7",
            pos: 0,
        };
        for _ in 0..4 {
            ctrl.poll(&mut rx).unwrap();
        }
        assert!(matches!(ctrl.state(), State::WriteStream(s) if s.start == 7));
        assert_eq!(&ctrl.tx().sent[..], &[ACK, ACK]);
    }

    #[test]
    fn test_transmitted_count_saturates() {
        assert_eq!(count_transmitted(3, 2), 5);
        assert_eq!(count_transmitted(u32::MAX - 1, 2), u32::MAX);
        assert_eq!(count_transmitted(u32::MAX, 1), u32::MAX);
    }

    #[test]
    fn test_flush_after_every_input() {
        let mut ctrl = controller();
        feed(&mut ctrl, b"w 0 ");
        assert_eq!(ctrl.tx().flushes, 4);
    }
}
