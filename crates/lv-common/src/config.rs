//! Session configuration.
//!
//! Supports configuration via:
//! - Builder methods (`SessionConfig::new().with_port(9112)`)
//! - JSON (`SessionConfig::from_json`, `SessionConfig::load`)
//! - Environment variables (`LV_PORT`, `LV_HOST`, `LV_OUTPUT`,
//!   `LV_RUN_SERVER`, `LV_LAZY`)

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default port for the background server.
pub const DEFAULT_PORT: u16 = 9111;

/// Default bind host for the background server.
pub const DEFAULT_HOST: &str = "localhost";

/// Options for a visualizer session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Defer server startup and file creation until `start` is called.
    #[serde(default)]
    pub lazy: bool,
    /// Output HTML file. Overwritten if it exists; a temp file in the
    /// working directory is generated when `None`.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
    /// Serve the working directory in the background.
    #[serde(default = "default_true")]
    pub run_server: bool,
    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Server bind host.
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_true() -> bool {
    true
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lazy: false,
            output_path: None,
            run_server: true,
            port: DEFAULT_PORT,
            host: default_host(),
        }
    }
}

impl SessionConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set lazy startup.
    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// Set the output file.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Enable or disable the background server.
    pub fn with_run_server(mut self, run_server: bool) -> Self {
        self.run_server = run_server;
        self
    }

    /// Set the server port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the server bind host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Load configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Defaults overridden by `LV_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_lookup(|key| std::env::var(key).ok())
    }

    /// Override fields from a variable lookup (normally the process env).
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("LV_PORT") {
            self.port = val
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("LV_PORT={val:?}: {e}")))?;
        }
        if let Some(val) = lookup("LV_HOST") {
            if val.trim().is_empty() {
                return Err(Error::Config("LV_HOST is empty".to_string()));
            }
            self.host = val.trim().to_string();
        }
        if let Some(val) = lookup("LV_OUTPUT") {
            self.output_path = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }
        if let Some(val) = lookup("LV_RUN_SERVER") {
            self.run_server = parse_flag("LV_RUN_SERVER", &val)?;
        }
        if let Some(val) = lookup("LV_LAZY") {
            self.lazy = parse_flag("LV_LAZY", &val)?;
        }
        Ok(self)
    }
}

fn parse_flag(key: &str, val: &str) -> Result<bool> {
    match val.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!("{key}={val:?}: expected a boolean"))),
    }
}
