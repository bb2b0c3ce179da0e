//! Inbound line decoder.
//!
//! The switch echoes status text terminated by a bare carriage return.  The
//! decoder accumulates raw serial chunks and yields one `String` per complete
//! line with the `\r` removed.  A `\n` is ordinary content, so for a CR LF
//! pair the `\r` ends the current line and the `\n` becomes the first
//! character of the next one.
//!
//! Bytes are buffered before UTF-8 decoding so a multi-byte character split
//! across two reads is reassembled correctly.  Invalid UTF-8 is replaced with
//! U+FFFD.

use tracing::trace;

/// Byte that terminates an inbound line.
pub const LINE_DELIMITER: u8 = b'\r';

/// Incremental splitter for the switch's `\r`-terminated output.
#[derive(Debug, Default)]
pub struct LineDecoder {
    pending: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk of received bytes and returns every line it completes.
    ///
    /// Trailing bytes after the last delimiter are kept for the next call.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|&b| b == LINE_DELIMITER) {
            self.pending.extend_from_slice(&rest[..pos]);
            let line = String::from_utf8_lossy(&self.pending).into_owned();
            trace!(line = %line, "decoded inbound line");
            lines.push(line);
            self.pending.clear();
            rest = &rest[pos + 1..];
        }

        self.pending.extend_from_slice(rest);
        lines
    }

    /// Number of buffered bytes not yet terminated by a delimiter.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Discards any partial line.
    ///
    /// A reader that creates one decoder per connection never needs this.
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}
