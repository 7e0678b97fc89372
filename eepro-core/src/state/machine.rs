//! State machine definition
//!
//! Every byte from the host is a function of the current state: the
//! transition returns the next state and the actions to perform.

use eepro_protocol::{Command, DecimalToken, Reply, TokenStep, Unescaped, Unescaper};

use super::events::{Action, Actions, Input, ProtocolFault};
use crate::config::DeviceConfig;

/// Cursor of an open write session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WriteSession {
    /// Address of the first payload byte
    pub start: u32,
    /// Address of the next payload byte
    pub cursor: u32,
    decoder: Unescaper,
}

impl WriteSession {
    fn new(start: u32) -> Self {
        Self {
            start,
            cursor: start,
            decoder: Unescaper::new(),
        }
    }

    /// Bytes written so far
    pub fn written(&self) -> u32 {
        self.cursor - self.start
    }

    /// True while waiting for the byte after an `ESC`
    pub fn escape_pending(&self) -> bool {
        self.decoder.is_pending()
    }
}

/// Progress of a read request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadPhase {
    /// Collecting the start address
    Start(DecimalToken),
    /// Collecting the length
    Length { start: u32, token: DecimalToken },
}

/// Controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Waiting for a command byte
    #[default]
    Idle,
    /// Write command received, collecting the start address
    WriteAddress(DecimalToken),
    /// Accepting escaped payload bytes
    WriteStream(WriteSession),
    /// Read command received, collecting start address and length
    Read(ReadPhase),
}

fn push(actions: &mut Actions, action: Action) {
    // Transitions never produce more than MAX_ACTIONS actions
    let _ = actions.push(action);
}

fn nack(actions: &mut Actions, fault: ProtocolFault) {
    push(actions, Action::Reply(Reply::Nack));
    push(actions, Action::Diagnostic(fault));
}

impl State {
    /// Check if no session is open
    pub fn is_idle(&self) -> bool {
        matches!(self, State::Idle)
    }

    /// Process an input and return the next state with the actions to run
    ///
    /// This is the core protocol logic. It is pure: the same state, input
    /// and configuration always yield the same result.
    pub fn transition(self, input: Input, config: &DeviceConfig) -> (Self, Actions) {
        let mut actions = Actions::new();
        let next = match (self, input) {
            (State::Idle, Input::Idle) => State::Idle,
            (State::Idle, Input::Byte(byte)) => match Command::from_byte(byte) {
                Some(Command::Write) => {
                    push(&mut actions, Action::Reply(Reply::Ack));
                    State::WriteAddress(DecimalToken::new())
                }
                Some(Command::Read) => {
                    push(&mut actions, Action::Reply(Reply::Ack));
                    State::Read(ReadPhase::Start(DecimalToken::new()))
                }
                None => {
                    nack(&mut actions, ProtocolFault::UnknownCommand(byte));
                    State::Idle
                }
            },

            (State::WriteAddress(mut token), input) => {
                match Self::feed_token(&mut token, input, &mut actions) {
                    Some(start) if start > config.capacity => {
                        nack(
                            &mut actions,
                            ProtocolFault::AddressOutOfRange {
                                address: start,
                                capacity: config.capacity,
                            },
                        );
                        State::Idle
                    }
                    Some(start) => {
                        push(&mut actions, Action::Reply(Reply::Ack));
                        State::WriteStream(WriteSession::new(start))
                    }
                    None if actions.is_empty() => State::WriteAddress(token),
                    None => State::Idle,
                }
            }

            // The controller blocks inside a session; idle lines change nothing
            (State::WriteStream(session), Input::Idle) => State::WriteStream(session),
            (State::WriteStream(mut session), Input::Byte(byte)) => {
                match session.decoder.feed(byte) {
                    Unescaped::End => {
                        push(&mut actions, Action::Reply(Reply::Ack));
                        push(&mut actions, Action::ReportWritten(session.written()));
                        State::Idle
                    }
                    Unescaped::Pending => {
                        push(&mut actions, Action::Reply(Reply::Ack));
                        State::WriteStream(session)
                    }
                    Unescaped::Literal(data) => {
                        Self::write_payload(&mut session, data, config, &mut actions);
                        State::WriteStream(session)
                    }
                    Unescaped::InvalidEscape(data) => {
                        // Flag the malformed sequence but keep the byte
                        nack(&mut actions, ProtocolFault::InvalidEscape(data));
                        Self::write_payload(&mut session, data, config, &mut actions);
                        State::WriteStream(session)
                    }
                }
            }

            (State::Read(ReadPhase::Start(mut token)), input) => {
                match Self::feed_token(&mut token, input, &mut actions) {
                    Some(start) if start > config.capacity => {
                        nack(
                            &mut actions,
                            ProtocolFault::AddressOutOfRange {
                                address: start,
                                capacity: config.capacity,
                            },
                        );
                        State::Idle
                    }
                    Some(start) => {
                        push(&mut actions, Action::Reply(Reply::Ack));
                        State::Read(ReadPhase::Length {
                            start,
                            token: DecimalToken::new(),
                        })
                    }
                    None if actions.is_empty() => State::Read(ReadPhase::Start(token)),
                    None => State::Idle,
                }
            }

            (State::Read(ReadPhase::Length { start, mut token }), input) => {
                match Self::feed_token(&mut token, input, &mut actions) {
                    Some(length) if !config.contains_range(start, length) => {
                        nack(
                            &mut actions,
                            ProtocolFault::RangeOutOfBounds {
                                start,
                                length,
                                capacity: config.capacity,
                            },
                        );
                        State::Idle
                    }
                    Some(length) => {
                        push(&mut actions, Action::Reply(Reply::Ack));
                        push(&mut actions, Action::StreamRead { start, length });
                        State::Idle
                    }
                    None if actions.is_empty() => State::Read(ReadPhase::Length { start, token }),
                    None => State::Idle,
                }
            }
        };
        (next, actions)
    }

    /// Feed a decimal token
    ///
    /// Returns the finished value, or `None` while pending. A malformed
    /// token pushes a `NACK` with diagnostic and returns `None`; callers
    /// tell the cases apart by whether any action was produced.
    fn feed_token(token: &mut DecimalToken, input: Input, actions: &mut Actions) -> Option<u32> {
        match input {
            Input::Idle => token.finish(),
            Input::Byte(byte) => match token.feed(byte) {
                Ok(TokenStep::Complete(value)) => Some(value),
                Ok(TokenStep::Pending) => None,
                Err(err) => {
                    nack(actions, ProtocolFault::MalformedNumber(err));
                    None
                }
            },
        }
    }

    fn write_payload(
        session: &mut WriteSession,
        data: u8,
        config: &DeviceConfig,
        actions: &mut Actions,
    ) {
        if session.cursor >= config.capacity {
            nack(
                actions,
                ProtocolFault::AddressOutOfRange {
                    address: session.cursor,
                    capacity: config.capacity,
                },
            );
            return;
        }
        push(
            actions,
            Action::WriteByte {
                address: session.cursor,
                data,
            },
        );
        session.cursor += 1;
        push(actions, Action::Reply(Reply::Ack));
    }
}
