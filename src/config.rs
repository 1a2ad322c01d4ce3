//! Server configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use eos_rules::{Layout, RuleTable, ScoringTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "EOS_CONFIG";

/// Configuration for the EOS server.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct EosConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// Rule table to load instead of the built-in one (TOML, or JSON by extension).
    #[serde(default)]
    rules_path: Option<PathBuf>,

    /// Starting layout to load instead of the built-in one.
    #[serde(default)]
    layout_path: Option<PathBuf>,

    /// End-of-game bonus weights.
    #[serde(default)]
    scoring: ScoringTable,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for EosConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            rules_path: None,
            layout_path: None,
            scoring: ScoringTable::default(),
        }
    }
}

impl EosConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file named by `explicit`, else by `EOS_CONFIG`, else defaults.
    #[instrument]
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => Self::from_file(path),
            _ => {
                debug!("No config file given; using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Loads the configured rule table, or the built-in one.
    pub fn load_rules(&self) -> Result<RuleTable, ConfigError> {
        let table = match &self.rules_path {
            Some(path) => RuleTable::from_file(path),
            None => RuleTable::standard(),
        };
        table.map_err(|e| ConfigError::new(e.to_string()))
    }

    /// Loads the configured layout, or the built-in one.
    pub fn load_layout(&self) -> Result<Layout, ConfigError> {
        let layout = match &self.layout_path {
            Some(path) => Layout::from_file(path),
            None => Layout::standard(),
        };
        layout.map_err(|e| ConfigError::new(e.to_string()))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
