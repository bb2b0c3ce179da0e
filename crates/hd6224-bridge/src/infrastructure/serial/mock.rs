//! In-memory serial transport for testing.
//!
//! Records every write and tracks the open flag without touching a tty.
//! Clones share the same state, so a test can hand one clone to a controller
//! and keep another to inspect what was sent.
//!
//! # Failure injection
//!
//! [`RecordingTransport::fail_opens`] and [`RecordingTransport::fail_writes`]
//! make the next calls return errors, which lets tests exercise the
//! controller's "log and absorb" paths.

use std::sync::{Arc, Mutex};

use super::{SerialTransport, TransportError};

#[derive(Debug, Default)]
struct RecordingState {
    open: bool,
    fail_opens: bool,
    fail_writes: bool,
    open_calls: u32,
    close_calls: u32,
    writes: Vec<Vec<u8>>,
}

/// A [`SerialTransport`] that records calls instead of performing I/O.
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    path: String,
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingTransport {
    /// Creates a closed transport reporting errors against `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state: Arc::new(Mutex::new(RecordingState::default())),
        }
    }

    /// When `true`, every `open` fails as if the device did not exist.
    pub fn fail_opens(&self, fail: bool) {
        self.state.lock().expect("lock poisoned").fail_opens = fail;
    }

    /// When `true`, every `write` on an open port fails with a broken pipe.
    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().expect("lock poisoned").fail_writes = fail;
    }

    /// All successfully written payloads, oldest first.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state.lock().expect("lock poisoned").writes.clone()
    }

    /// Successfully written payloads decoded as UTF-8.
    pub fn written_text(&self) -> Vec<String> {
        self.writes()
            .into_iter()
            .map(|w| String::from_utf8_lossy(&w).into_owned())
            .collect()
    }

    /// Number of `open` calls, successful or not.
    pub fn open_calls(&self) -> u32 {
        self.state.lock().expect("lock poisoned").open_calls
    }

    /// Number of `close` calls, successful or not.
    pub fn close_calls(&self) -> u32 {
        self.state.lock().expect("lock poisoned").close_calls
    }
}

impl SerialTransport for RecordingTransport {
    fn open(&mut self) -> Result<(), TransportError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.open_calls += 1;
        if state.open {
            return Err(TransportError::AlreadyOpen(self.path.clone()));
        }
        if state.fail_opens {
            return Err(TransportError::Open {
                path: self.path.clone(),
                source: serialport::Error::new(
                    serialport::ErrorKind::NoDevice,
                    "simulated missing device",
                ),
            });
        }
        state.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.close_calls += 1;
        if !state.open {
            return Err(TransportError::NotOpen(self.path.clone()));
        }
        state.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.state.lock().expect("lock poisoned").open
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let mut state = self.state.lock().expect("lock poisoned");
        if !state.open {
            return Err(TransportError::NotOpen(self.path.clone()));
        }
        if state.fail_writes {
            return Err(TransportError::Write {
                path: self.path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "simulated write failure"),
            });
        }
        state.writes.push(bytes.to_vec());
        Ok(())
    }
}
