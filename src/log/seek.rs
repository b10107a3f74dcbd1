//! In-band seek directive parsing
//!
//! A complete record beginning with `AESDCHAR_IOCSEEKTO:` is a command, not
//! log content: it names a stored record and a byte offset inside it, and the
//! connection's next echo starts there. The remainder of the record is two
//! base-10 unsigned integers separated by a single comma.

/// Literal prefix that marks a record as a seek directive.
pub const SEEK_PREFIX: &[u8] = b"AESDCHAR_IOCSEEKTO:";

/// A parsed seek directive: position the read cursor at `byte_offset` inside
/// the record at `record_index`.
///
/// `record_index` is the logical index among present records, 0 being the
/// oldest. This stays stable when the ring wraps, unlike a raw slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekTo {
    /// Logical index of the target record.
    pub record_index: u32,
    /// Byte offset inside the target record; must be strictly less than the
    /// record's length.
    pub byte_offset: u32,
}

/// Why a seek directive was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekError {
    /// The directive body did not parse as `<u32>,<u32>`.
    Malformed(&'static str),
    /// The directive parsed but names a record or offset that is not present.
    OutOfRange,
}

impl std::fmt::Display for SeekError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeekError::Malformed(reason) => write!(f, "malformed directive: {}", reason),
            SeekError::OutOfRange => write!(f, "record index or offset out of range"),
        }
    }
}

impl SeekTo {
    /// Recognize and parse a seek directive.
    ///
    /// Returns `None` when `record` is not a directive at all (no prefix);
    /// such records are ordinary log content. Returns `Some(Err(..))` when
    /// the prefix matches but the body is malformed: a missing comma, a field
    /// that is not a base-10 unsigned integer, or an extra field.
    pub fn parse(record: &[u8]) -> Option<Result<Self, SeekError>> {
        let body = record.strip_prefix(SEEK_PREFIX)?;
        Some(Self::parse_body(body))
    }

    fn parse_body(body: &[u8]) -> Result<Self, SeekError> {
        // The terminating newline is part of the record, not the directive.
        let body = body.strip_suffix(b"\n").unwrap_or(body);
        let body = std::str::from_utf8(body)
            .map_err(|_| SeekError::Malformed("directive body is not valid text"))?;

        let (index, offset) = body
            .split_once(',')
            .ok_or(SeekError::Malformed("missing comma separator"))?;
        let record_index = index
            .parse::<u32>()
            .map_err(|_| SeekError::Malformed("record index is not an unsigned integer"))?;
        // An extra comma lands in the offset field and fails here.
        let byte_offset = offset
            .parse::<u32>()
            .map_err(|_| SeekError::Malformed("byte offset is not an unsigned integer"))?;

        Ok(SeekTo {
            record_index,
            byte_offset,
        })
    }
}
