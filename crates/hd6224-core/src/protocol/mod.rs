//! HD6224A serial protocol.
//!
//! Outbound: ASCII commands of the form `//m<N>\r\n` ([`command`]).
//! Inbound: free-text status lines terminated by a bare `\r` ([`line_decoder`]).
//! The switch never acknowledges a command, so the two directions are
//! independent.

pub mod command;
pub mod line_decoder;

pub use command::{KvmCommand, COMMAND_TERMINATOR, SELECT_INPUT_PREFIX};
pub use line_decoder::{LineDecoder, LINE_DELIMITER};
