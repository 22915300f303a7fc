//! Server configuration module
//!
//! Configuration comes from three layers, each overriding the last:
//! built-in defaults, a TOML file, and `AVENTURA_*` environment
//! variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Where this configuration was loaded from
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Server name displayed to players
    #[serde(default = "default_server_name")]
    pub server_name: String,

    /// WebSocket port for game clients
    #[serde(default = "default_websocket_port")]
    pub websocket_port: u16,

    /// HTTP port for the status API
    #[serde(default = "default_status_port")]
    pub status_port: u16,

    /// Maximum number of concurrent sessions
    #[serde(default = "default_max_players")]
    pub max_players: u32,

    /// Outbound event channel capacity per session
    #[serde(default = "default_outbound_capacity")]
    pub outbound_capacity: usize,

    /// Map key newly joined players start on
    #[serde(default = "default_starting_map")]
    pub starting_map: String,

    /// Development mode flag
    #[serde(default)]
    pub dev_mode: bool,

    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,
}

// Default value functions
fn default_server_name() -> String {
    "Aventura".to_string()
}

fn default_websocket_port() -> u16 {
    3001
}

fn default_status_port() -> u16 {
    3002
}

fn default_max_players() -> u32 {
    100
}

fn default_outbound_capacity() -> usize {
    64
}

fn default_starting_map() -> String {
    "town".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("config/server.toml"),
            server_name: default_server_name(),
            websocket_port: default_websocket_port(),
            status_port: default_status_port(),
            max_players: default_max_players(),
            outbound_capacity: default_outbound_capacity(),
            starting_map: default_starting_map(),
            dev_mode: false,
            debug: false,
        }
    }
}

/// Read an environment variable and parse it, keeping the current value
/// when the variable is unset or unparseable
fn env_override<T: FromStr>(name: &str, target: &mut T) {
    if let Ok(raw) = env::var(name) {
        match raw.parse() {
            Ok(value) => *target = value,
            Err(_) => warn!(var = name, value = %raw, "Ignoring unparseable override"),
        }
    }
}

fn env_override_flag(name: &str, target: &mut bool) {
    if let Ok(raw) = env::var(name) {
        *target = raw.eq_ignore_ascii_case("true") || raw == "1";
    }
}

impl ServerConfig {
    /// Load configuration: file (if present), then environment
    /// overrides, then validation
    pub async fn load() -> Result<Self> {
        let config_path = env::var("AVENTURA_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/server.toml"));

        let mut config = Self::from_file(&config_path).await?;
        config.config_path = config_path;
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parse the given TOML file, falling back to defaults when the
    /// file does not exist
    async fn from_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "No config file, starting from defaults");
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        env_override("AVENTURA_SERVER_NAME", &mut self.server_name);
        env_override("AVENTURA_WEBSOCKET_PORT", &mut self.websocket_port);
        env_override("AVENTURA_STATUS_PORT", &mut self.status_port);
        env_override("AVENTURA_MAX_PLAYERS", &mut self.max_players);
        env_override("AVENTURA_OUTBOUND_CAPACITY", &mut self.outbound_capacity);
        env_override("AVENTURA_STARTING_MAP", &mut self.starting_map);
        env_override_flag("AVENTURA_DEV_MODE", &mut self.dev_mode);
        env_override_flag("AVENTURA_DEBUG", &mut self.debug);
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.websocket_port == self.status_port {
            anyhow::bail!("websocket_port and status_port must differ");
        }
        if self.max_players == 0 || self.max_players > 10_000 {
            anyhow::bail!("max_players must be between 1 and 10000");
        }
        if self.outbound_capacity == 0 {
            anyhow::bail!("outbound_capacity must be at least 1");
        }
        if self.starting_map.is_empty() {
            anyhow::bail!("starting_map must not be empty");
        }
        Ok(())
    }
}
