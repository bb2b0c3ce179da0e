//! Serial line settings.
//!
//! The HD6224A RS-232 port is fixed at 8 data bits, no parity, 1 stop bit,
//! with neither hardware nor XON/XOFF flow control.  Only the device path and
//! baud rate vary between installations.

use serde::{Deserialize, Serialize};

/// Baud rate used when the configuration does not name one.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Frame layout of the serial line.
///
/// The switch speaks 8 data bits, no parity, 1 stop bit and no flow control,
/// and nothing else, so those are not configurable.  The transport applies
/// them as fixed values; the only remaining choice is device locking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialFraming {
    /// Take an exclusive lock on the device so no other process can open it.
    pub exclusive: bool,
}

impl SerialFraming {
    /// 8N1, no flow control, exclusive access.
    pub const HD6224A: SerialFraming = SerialFraming { exclusive: true };
}

impl Default for SerialFraming {
    fn default() -> Self {
        SerialFraming::HD6224A
    }
}

/// Where and how fast to talk to one switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialSettings {
    /// Device path, e.g. `/dev/ttyUSB0` or `COM3`.
    pub path: String,
    pub baud_rate: u32,
    #[serde(skip)]
    pub framing: SerialFraming,
}

impl SerialSettings {
    pub fn new(path: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            path: path.into(),
            baud_rate,
            framing: SerialFraming::HD6224A,
        }
    }
}
