//! Partial-record assembly
//!
//! Bytes arrive in arbitrary chunks; a record only exists once a newline has
//! been seen. The assembler buffers the unterminated tail and hands out
//! complete records as newlines show up. One assembler is shared by all
//! connections through the log facade, so interleaved unterminated writes
//! from concurrent clients land in the same pending record.

use crate::types::Record;
use memchr::memchr;

/// Accumulates bytes until a newline, then promotes them to a [`Record`].
#[derive(Debug, Default)]
pub struct PartialAssembler {
    buf: Vec<u8>,
}

impl PartialAssembler {
    /// Create an assembler with no pending bytes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes verbatim to the pending buffer. An empty feed is a no-op.
    /// Growth is bounded only by available memory.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Extract the shortest pending prefix ending at the first newline,
    /// retaining everything after that newline. `None` when no newline is
    /// pending. A single feed containing several newlines yields one record
    /// per call until the buffer runs dry.
    pub fn take_record(&mut self) -> Option<Record> {
        let pos = memchr(b'\n', &self.buf)?;
        let rest = self.buf.split_off(pos + 1);
        let line = std::mem::replace(&mut self.buf, rest);
        Some(Record::new(line))
    }

    /// Number of buffered bytes not yet promoted to a record.
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }
}
