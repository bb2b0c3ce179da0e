//! Outbound command encoding.
//!
//! Wire format:
//! ```text
//! //m<N>\r\n
//! ```
//! where `<N>` is the decimal input identifier.  The command is plain ASCII;
//! there is no header, length prefix, or checksum.

use std::fmt;

use crate::domain::input::InputId;

/// Prefix of the "switch KM and video to input N" command.
pub const SELECT_INPUT_PREFIX: &str = "//m";

/// Every command ends with CR LF.
pub const COMMAND_TERMINATOR: &str = "\r\n";

/// A command the bridge sends to the switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvmCommand {
    /// Route keyboard, mouse, and video to the given input.
    SelectInput(InputId),
}

impl KvmCommand {
    /// Encodes the command as the ASCII string written to the serial line.
    ///
    /// Encoding never fails.  An identifier outside `1..=4` is formatted
    /// like any other and the switch decides what to do with it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hd6224_core::{InputId, KvmCommand};
    ///
    /// let cmd = KvmCommand::SelectInput(InputId::new(3));
    /// assert_eq!(cmd.encode(), "//m3\r\n");
    /// ```
    pub fn encode(&self) -> String {
        match self {
            KvmCommand::SelectInput(id) => {
                format!("{SELECT_INPUT_PREFIX}{id}{COMMAND_TERMINATOR}")
            }
        }
    }

    /// Encodes the command as bytes ready for a serial write.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode().into_bytes()
    }
}

impl fmt::Display for KvmCommand {
    /// Shows the command without its line terminator, for log output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KvmCommand::SelectInput(id) => write!(f, "{SELECT_INPUT_PREFIX}{id}"),
        }
    }
}
