//! Protocol state machine
//!
//! Defines how the controller interprets the byte stream from the host.
//! The state machine is explicit, finite, and deterministic: it never
//! touches hardware itself but returns the actions the controller must
//! perform, in order.

pub mod events;
pub mod machine;

pub use events::{Action, Actions, Input, ProtocolFault, MAX_ACTIONS};
pub use machine::{ReadPhase, State, WriteSession};
