//! Configuration structures for ringlog

use crate::{Result, RingLogError};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::Path;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listener and per-connection settings
    pub server: ServerSettings,
    /// Ring log settings
    pub log: LogSettings,
    /// Periodic timestamp settings
    pub timestamps: TimestampSettings,
}

/// Listener and per-connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Address to bind. When unset, IPv6 any is tried first, then IPv4 any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_address: Option<IpAddr>,
    /// TCP port to listen on. 0 requests an ephemeral port.
    pub port: u16,
    /// Listen backlog
    pub backlog: i32,
    /// Receive buffer growth increment in bytes
    pub read_size: usize,
    /// Echo frame size in bytes
    pub write_size: usize,
}

/// Ring log settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// Number of complete records retained before the oldest is overwritten
    pub ring_capacity: usize,
}

/// Periodic timestamp settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampSettings {
    /// Enable the periodic timestamp record
    pub enabled: bool,
    /// Seconds between timestamp records
    pub interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                bind_address: None,
                port: 9000,
                backlog: 10,
                read_size: 1024,
                write_size: 1024,
            },
            log: LogSettings { ring_capacity: 10 },
            timestamps: TimestampSettings {
                enabled: true,
                interval_secs: 10,
            },
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RingLogError::Config(format!("Failed to read config file: {}", e)))?;

        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| RingLogError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.read_size == 0 {
            return Err(RingLogError::Config("read_size must be non-zero".to_string()));
        }
        if self.server.write_size == 0 {
            return Err(RingLogError::Config("write_size must be non-zero".to_string()));
        }
        if self.server.backlog <= 0 {
            return Err(RingLogError::Config("backlog must be positive".to_string()));
        }
        if self.log.ring_capacity == 0 {
            return Err(RingLogError::Config("ring_capacity must be non-zero".to_string()));
        }
        if self.timestamps.enabled && self.timestamps.interval_secs == 0 {
            return Err(RingLogError::Config(
                "timestamp interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
