//! Configuration management for ringlog

pub mod settings;

pub use settings::{LogSettings, ServerConfig, ServerSettings, TimestampSettings};
