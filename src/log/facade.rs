//! The shared log facade
//!
//! Exactly one resource is shared across connection workers and the
//! timestamp emitter: this facade. It owns the ring and the partial
//! assembler behind a single mutex and serializes every append, seek and
//! snapshot. All operations are short and never touch a socket while the
//! lock is held; echo payloads are copied out under the lock and sent after
//! release, so every echo reflects a consistent prefix of the log.

use crate::log::assembler::PartialAssembler;
use crate::log::ring::RingLog;
use crate::log::seek::{SeekError, SeekTo};
use crate::types::Record;
use chrono::Local;
use parking_lot::Mutex;
use tracing::{debug, warn};

/// strftime pattern for periodic timestamp records (RFC 2822 style).
const TIMESTAMP_FORMAT: &str = "timestamp:%a, %d %b %Y %T %z";

/// What an [`SharedLog::append`] call did with the bytes it was given.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AppendReport {
    /// Records promoted to the ring. Echo is owed iff this is non-zero.
    pub appended: usize,
    /// Seek directives that were dropped as malformed or out of range.
    pub rejected_seeks: usize,
}

/// Mutex-guarded aggregate of the ring log and the partial assembler.
///
/// The partial buffer is deliberately shared: two clients that interleave
/// unterminated writes contribute to the same pending record. That is the
/// contract, not an accident of this implementation.
pub struct SharedLog {
    inner: Mutex<LogState>,
}

struct LogState {
    ring: RingLog,
    partial: PartialAssembler,
}

impl SharedLog {
    /// Create an empty log whose ring holds at most `ring_capacity` records.
    pub fn new(ring_capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LogState {
                ring: RingLog::new(ring_capacity),
                partial: PartialAssembler::new(),
            }),
        }
    }

    /// Feed bytes into the log.
    ///
    /// Every record completed by these bytes is either appended to the ring
    /// or, if it carries the seek prefix, applied to `cursor`: a valid
    /// directive repositions `cursor` to the absolute offset it names, and a
    /// malformed or out-of-range one is dropped with a warning, leaving
    /// `cursor` untouched. Directives are never stored and never echoed.
    pub fn append(&self, bytes: &[u8], cursor: &mut u64) -> AppendReport {
        let mut state = self.inner.lock();
        let mut report = AppendReport::default();

        state.partial.feed(bytes);
        while let Some(record) = state.partial.take_record() {
            match SeekTo::parse(record.as_bytes()) {
                None => {
                    state.ring.push(record);
                    report.appended += 1;
                }
                Some(Ok(seek)) => match resolve_seek(&state.ring, seek) {
                    Ok(absolute) => {
                        debug!(
                            record_index = seek.record_index,
                            byte_offset = seek.byte_offset,
                            absolute,
                            "seek directive applied"
                        );
                        *cursor = absolute;
                    }
                    Err(err) => {
                        warn!(error = %err, "seek directive rejected");
                        report.rejected_seeks += 1;
                    }
                },
                Some(Err(err)) => {
                    warn!(error = %err, "seek directive rejected");
                    report.rejected_seeks += 1;
                }
            }
        }
        report
    }

    /// Copy the byte range `[cursor, total_bytes)` of the logical log out in
    /// one consistent pass. Empty when the cursor is at or past the end.
    pub fn snapshot_from(&self, cursor: u64) -> Vec<u8> {
        let state = self.inner.lock();
        let total = state.ring.total_bytes();
        if cursor >= total {
            return Vec::new();
        }

        let mut out = Vec::with_capacity((total - cursor) as usize);
        if let Some((first, within)) = state.ring.locate(cursor) {
            for (i, record) in state.ring.records().enumerate().skip(first) {
                let start = if i == first { within } else { 0 };
                out.extend_from_slice(&record.as_bytes()[start..]);
            }
        }
        out
    }

    /// Append one record carrying the current local time, formatted
    /// `timestamp:%a, %d %b %Y %T %z` plus the terminating newline.
    ///
    /// Timestamps are always complete records; the partial buffer is not
    /// involved.
    pub fn append_timestamp(&self) {
        let mut line = Local::now().format(TIMESTAMP_FORMAT).to_string().into_bytes();
        line.push(b'\n');
        self.inner.lock().ring.push(Record::new(line));
    }

    /// Translate a parsed directive into a new cursor value against the
    /// current log contents. Pure with respect to the log: nothing is
    /// appended and nothing is released.
    pub fn apply_seek(&self, seek: SeekTo) -> Result<u64, SeekError> {
        resolve_seek(&self.inner.lock().ring, seek)
    }

    /// Sum of the lengths of all present records.
    pub fn total_bytes(&self) -> u64 {
        self.inner.lock().ring.total_bytes()
    }

    /// Number of records currently present in the ring.
    pub fn record_count(&self) -> usize {
        self.inner.lock().ring.len()
    }
}

/// Translate a directive to an absolute offset against the current ring.
///
/// The record index must address a present record (logical order) and the
/// offset must be strictly inside it.
fn resolve_seek(ring: &RingLog, seek: SeekTo) -> Result<u64, SeekError> {
    let index = seek.record_index as usize;
    let record = ring.record(index).ok_or(SeekError::OutOfRange)?;
    if seek.byte_offset as usize >= record.len() {
        return Err(SeekError::OutOfRange);
    }
    let base = ring.offset_of(index).ok_or(SeekError::OutOfRange)?;
    Ok(base + seek.byte_offset as u64)
}
