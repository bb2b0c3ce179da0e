//! Serial transport backed by the `serialport` crate.
//!
//! The write side is the port handle itself.  The read side is a cloned handle
//! moved onto a dedicated thread that feeds a [`LineDecoder`] and forwards each
//! decoded line on an unbounded channel.  Nothing in the bridge acts on those
//! lines; the binary only logs them.
//!
//! # Read timeout
//!
//! The port is configured with a short read timeout so the reader thread wakes
//! up regularly to check its `running` flag.  Closing the transport clears the
//! flag and joins the thread, so no reader outlives its connection.

use std::io::{Read, Write};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::JoinHandle;
use std::time::Duration;

use hd6224_core::{LineDecoder, SerialSettings};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{SerialTransport, TransportError};

/// How long a blocking read waits before re-checking the shutdown flag.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Size of the reader thread's receive buffer.
const READ_BUFFER_SIZE: usize = 256;

/// Background thread decoding inbound bytes for one open connection.
struct ReaderHandle {
    running: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl ReaderHandle {
    fn stop(self) {
        self.running.store(false, Ordering::Relaxed);
        if self.thread.join().is_err() {
            warn!("serial reader thread panicked");
        }
    }
}

/// A [`SerialTransport`] talking to a real serial device.
pub struct SerialPortTransport {
    settings: SerialSettings,
    port: Option<Box<dyn SerialPort>>,
    reader: Option<ReaderHandle>,
    lines: mpsc::UnboundedSender<String>,
}

impl SerialPortTransport {
    /// Creates a closed transport for `settings`.
    ///
    /// Returns the transport and the receiver on which decoded inbound lines
    /// are delivered for every connection this transport opens.
    pub fn new(settings: SerialSettings) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (lines, rx) = mpsc::unbounded_channel();
        let transport = Self {
            settings,
            port: None,
            reader: None,
            lines,
        };
        (transport, rx)
    }

    /// The settings this transport opens the device with.
    pub fn settings(&self) -> &SerialSettings {
        &self.settings
    }

    /// Opens the device with the switch's only framing, 8N1 without flow
    /// control.
    fn open_device(&self) -> Result<Box<dyn SerialPort>, serialport::Error> {
        let builder = serialport::new(&self.settings.path, self.settings.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(READ_TIMEOUT);

        #[cfg(unix)]
        {
            let mut port = builder.open_native()?;
            port.set_exclusive(self.settings.framing.exclusive)?;
            Ok(Box::new(port))
        }

        #[cfg(not(unix))]
        {
            // COM ports are exclusive by default on Windows.
            builder.open()
        }
    }

    fn spawn_reader(&self, port: &dyn SerialPort) -> Option<ReaderHandle> {
        let mut reader = match port.try_clone() {
            Ok(reader) => reader,
            Err(e) => {
                warn!(path = %self.settings.path, "cannot clone port for reading: {e}");
                return None;
            }
        };

        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let lines = self.lines.clone();
        let path = self.settings.path.clone();

        let spawned = std::thread::Builder::new()
            .name("hd6224-reader".to_string())
            .spawn(move || {
                let mut decoder = LineDecoder::new();
                let mut buf = [0u8; READ_BUFFER_SIZE];
                while flag.load(Ordering::Relaxed) {
                    match reader.read(&mut buf) {
                        Ok(0) => {}
                        Ok(n) => {
                            for line in decoder.push(&buf[..n]) {
                                // Receiver gone: keep draining the port anyway.
                                let _ = lines.send(line);
                            }
                        }
                        Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {}
                        Err(e) => {
                            warn!(%path, "serial read failed, stopping reader: {e}");
                            break;
                        }
                    }
                }
                debug!(%path, discarded = decoder.pending_len(), "serial reader stopped");
            });

        match spawned {
            Ok(thread) => Some(ReaderHandle { running, thread }),
            Err(e) => {
                warn!(path = %self.settings.path, "cannot spawn serial reader: {e}");
                None
            }
        }
    }

    fn stop_reader(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.stop();
        }
    }
}

impl SerialTransport for SerialPortTransport {
    fn open(&mut self) -> Result<(), TransportError> {
        if self.port.is_some() {
            return Err(TransportError::AlreadyOpen(self.settings.path.clone()));
        }

        let port = self.open_device().map_err(|source| TransportError::Open {
            path: self.settings.path.clone(),
            source,
        })?;
        self.reader = self.spawn_reader(port.as_ref());
        self.port = Some(port);

        info!(
            path = %self.settings.path,
            baud_rate = self.settings.baud_rate,
            "serial port opened"
        );
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        let port = self
            .port
            .take()
            .ok_or_else(|| TransportError::NotOpen(self.settings.path.clone()))?;
        self.stop_reader();
        // Dropping the last handle closes the file descriptor.
        drop(port);
        info!(path = %self.settings.path, "serial port closed");
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let path = &self.settings.path;
        let port = self
            .port
            .as_mut()
            .ok_or_else(|| TransportError::NotOpen(path.clone()))?;
        port.write_all(bytes).map_err(|source| TransportError::Write {
            path: path.clone(),
            source,
        })
    }
}

impl Drop for SerialPortTransport {
    fn drop(&mut self) {
        self.stop_reader();
    }
}
