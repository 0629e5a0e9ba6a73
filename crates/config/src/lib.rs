//! Configuration management for the product advisor
//!
//! Supports loading configuration from:
//! - TOML files
//! - Environment variables (ADVISOR_ prefix, `__` separator)
//!
//! Remote-agent delegation is part of the explicit configuration surface
//! (disabled by default) rather than process-wide state.

pub mod advisor;
pub mod settings;

pub use advisor::{AdvisorConfig, RemoteAgentConfig, VoiceSettings};
pub use settings::{load_settings, ServerConfig, Settings};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
