//! # ringlog - Line-Oriented TCP Accumulator Server
//!
//! ringlog accepts TCP connections on port 9000, appends every
//! newline-terminated record it receives to a shared in-memory ring of the
//! ten most recent records, and echoes the accumulated log back on the same
//! connection after each record.
//!
//! ## Features
//!
//! - **Ring log**: fixed-capacity, overwrite-oldest storage for complete
//!   records, addressable by absolute byte offset
//! - **In-band seek**: an `AESDCHAR_IOCSEEKTO:<record>,<offset>` record
//!   repositions where the next echo starts instead of being logged
//! - **Concurrent clients**: one task per connection, serialized only at the
//!   shared log
//! - **Timestamp records**: a `timestamp:...` record every 10 seconds
//!   (`timestamps` feature, on by default)
//! - **Daemon mode**: `-d` forks after bind and detaches
//!
//! ## Quick Start
//!
//! ```no_run
//! use ringlog::config::ServerConfig;
//! use ringlog::server::AccumulatorServer;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let server = AccumulatorServer::bind(config)?;
//!     let runtime = tokio::runtime::Runtime::new()?;
//!     runtime.block_on(server.start())?;
//!     Ok(())
//! }
//! ```
//!
//! Drive it with netcat:
//!
//! ```text
//! $ printf 'hello\n' | nc localhost 9000
//! hello
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod log;
pub mod server;
pub mod types;

/// Common error types used throughout ringlog
pub mod error {
    use std::fmt;

    /// ringlog error types
    #[derive(Debug)]
    pub enum RingLogError {
        /// I/O operation failed
        Io(std::io::Error),
        /// Configuration error
        Config(String),
        /// Server setup or supervision error
        Server(String),
        /// Per-connection error
        Connection(String),
    }

    impl fmt::Display for RingLogError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                RingLogError::Io(e) => write!(f, "I/O error: {}", e),
                RingLogError::Config(e) => write!(f, "Configuration error: {}", e),
                RingLogError::Server(e) => write!(f, "Server error: {}", e),
                RingLogError::Connection(e) => write!(f, "Connection error: {}", e),
            }
        }
    }

    impl std::error::Error for RingLogError {}

    impl From<std::io::Error> for RingLogError {
        fn from(err: std::io::Error) -> Self {
            RingLogError::Io(err)
        }
    }

    /// Result type alias for ringlog operations
    pub type Result<T> = std::result::Result<T, RingLogError>;
}

pub use error::{Result, RingLogError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::ServerConfig;
    pub use crate::log::{RingLog, SharedLog};
    pub use crate::server::AccumulatorServer;
    pub use crate::types::Record;
    pub use crate::{Result, RingLogError};
}
