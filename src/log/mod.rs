//! The in-memory command log
//!
//! Ring storage for complete records, partial-record assembly, in-band seek
//! directive parsing, and the mutex facade that binds them together.

pub mod assembler;
pub mod facade;
pub mod ring;
pub mod seek;

pub use assembler::PartialAssembler;
pub use facade::{AppendReport, SharedLog};
pub use ring::RingLog;
pub use seek::{SeekError, SeekTo, SEEK_PREFIX};
