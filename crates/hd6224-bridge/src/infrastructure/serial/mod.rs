//! Serial transport infrastructure.
//!
//! A transport owns exactly one serial connection to one switch.  It can be
//! opened, closed, and written to; the inbound side is decoded into lines by
//! the concrete adapter and delivered on a channel nobody is required to read.
//!
//! # Testability
//!
//! The [`SerialTransport`] trait lets the device controller run against
//! [`mock::RecordingTransport`] in tests instead of a real tty.

pub mod mock;
pub mod port;

use thiserror::Error;

pub use mock::RecordingTransport;
pub use port::SerialPortTransport;

/// Error type for serial transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The device could not be opened (missing, busy, or permission denied).
    #[error("failed to open serial port {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },

    /// `open` was called on a connection that is already open.
    #[error("serial port {0} is already open")]
    AlreadyOpen(String),

    /// `close` or `write` was called while the connection is closed.
    #[error("serial port {0} is not open")]
    NotOpen(String),

    /// The bytes could not be written.
    #[error("write to serial port {path} failed: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Byte-stream connection to one switch.
///
/// Implementations report failures as values; deciding what to do about them
/// (the controller logs and moves on) is the caller's business.
#[cfg_attr(test, mockall::automock)]
pub trait SerialTransport: Send {
    /// Opens the underlying device.
    fn open(&mut self) -> Result<(), TransportError>;

    /// Closes the underlying device and stops the read side.
    fn close(&mut self) -> Result<(), TransportError>;

    /// Returns `true` while the connection is open.  Never touches the device.
    fn is_open(&self) -> bool;

    /// Sends `bytes` without waiting for any reply.  Nothing is queued while
    /// the port is closed.
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;
}
