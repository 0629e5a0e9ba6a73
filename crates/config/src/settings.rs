//! Top-level settings and the layered loader

use serde::{Deserialize, Serialize};

use crate::advisor::{AdvisorConfig, RemoteAgentConfig};
use crate::ConfigError;

/// Complete application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Advisor settings
    #[serde(default)]
    pub advisor: AdvisorConfig,

    /// Remote agent delegation
    #[serde(default)]
    pub remote: RemoteAgentConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enforce the configured CORS origins
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Maximum concurrent sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Session inactivity timeout in seconds
    #[serde(default = "default_session_timeout_secs")]
    pub session_timeout_secs: u64,

    /// Interval of the background session cleanup in seconds
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_true() -> bool {
    true
}
fn default_max_sessions() -> usize {
    256
}
fn default_session_timeout_secs() -> u64 {
    1800
}
fn default_cleanup_interval_secs() -> u64 {
    300
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            cors_origins: Vec::new(),
            max_sessions: default_max_sessions(),
            session_timeout_secs: default_session_timeout_secs(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl Settings {
    /// Cross-field validation the deserializer cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.remote.enabled && self.remote.webhook_url.is_none() {
            return Err(ConfigError::InvalidValue {
                field: "remote.webhook_url".to_string(),
                message: "required when remote.enabled is true".to_string(),
            });
        }
        Ok(())
    }
}

/// Load settings from an optional TOML file plus `ADVISOR_`-prefixed
/// environment variables (`ADVISOR_SERVER__PORT=9000` overrides
/// `server.port`).
pub fn load_settings(path: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::with_name(path).required(false));
        tracing::debug!(path, "loading configuration file");
    }

    let settings = builder
        .add_source(config::Environment::with_prefix("ADVISOR").separator("__"))
        .build()?
        .try_deserialize::<Settings>()?;

    settings.validate()?;

    Ok(settings)
}
