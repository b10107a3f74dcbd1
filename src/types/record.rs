//! Record type and utilities

use std::fmt;

/// A complete log record: an owned byte sequence ending in exactly one
/// newline, with no interior newlines.
///
/// Records are created by the partial assembler when it observes a newline
/// and are immutable from that point on. A record containing only `\n` is
/// valid.
#[derive(Clone, PartialEq, Eq)]
pub struct Record {
    bytes: Box<[u8]>,
}

impl Record {
    /// Wrap a newline-terminated byte sequence as a record.
    ///
    /// Callers are expected to hand over bytes ending in `\n`; the assembler
    /// and the timestamp emitter both guarantee this.
    pub fn new(bytes: Vec<u8>) -> Self {
        debug_assert!(
            bytes.last() == Some(&b'\n'),
            "record must be newline-terminated"
        );
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// The record contents, trailing newline included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes, trailing newline included. Always at least 1.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// A record is never empty; this exists for clippy's `len`/`is_empty`
    /// pairing convention.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record({:?})", String::from_utf8_lossy(&self.bytes))
    }
}

impl From<Vec<u8>> for Record {
    fn from(bytes: Vec<u8>) -> Self {
        Record::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_trailing_newline() {
        let r = Record::new(b"hello\n".to_vec());
        assert_eq!(r.as_bytes(), b"hello\n");
        assert_eq!(r.len(), 6);
        assert!(!r.is_empty());
    }

    #[test]
    fn single_newline_record_is_valid() {
        let r = Record::new(b"\n".to_vec());
        assert_eq!(r.len(), 1);
    }
}
