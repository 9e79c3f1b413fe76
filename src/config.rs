//! Configuration for spalaunch.
//!
//! User defaults live in `~/.spalaunch/config.toml`. Command line flags are
//! layered on top into a [`LaunchRequest`] and [`ServerConfig`], built once in
//! `main` and passed down by reference.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Global user configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Port tried first when no port is given on the command line.
    #[serde(default = "default_port")]
    pub default_port: u16,

    #[serde(default = "default_true")]
    pub open_browser: bool,

    /// Delay before opening the browser, so startup lines are visible first.
    #[serde(default = "default_browser_delay_ms")]
    pub browser_delay_ms: u64,

    /// Entry point served for client-side routes.
    #[serde(default = "default_index_file")]
    pub index_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: ServerSettings::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            default_port: default_port(),
            open_browser: true,
            browser_delay_ms: default_browser_delay_ms(),
            index_file: default_index_file(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_browser_delay_ms() -> u64 {
    100
}

fn default_index_file() -> String {
    "index.html".to_string()
}

impl Config {
    /// Load config from ~/.spalaunch/config.toml
    pub fn load() -> Result<Self, Error> {
        Self::load_from(&Self::path())
    }

    /// Load config from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Path to global spalaunch directory (~/.spalaunch/)
    pub fn global_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".spalaunch")
    }

    /// Path to config file
    pub fn path() -> PathBuf {
        Self::global_dir().join("config.toml")
    }
}

/// Which port the static server should bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRequest {
    /// Bind exactly this port; failure is fatal.
    Explicit(u16),
    /// Try the default port, then let the OS pick one.
    Fallback,
}

impl PortRequest {
    /// Parse the `--port` flag. An empty value selects the fallback scheme.
    pub fn parse(raw: Option<&str>) -> Result<Self, Error> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::Fallback),
            Some(value) => value
                .parse::<u16>()
                .map(Self::Explicit)
                .map_err(|_| Error::InvalidPort(value.to_string())),
        }
    }
}

/// Input to the launch pipeline for a single `run` invocation.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    /// Project directory or `.zip` archive.
    pub source: PathBuf,
    pub port: PortRequest,
    pub open_browser: bool,
}

/// Settings the static server needs, resolved from config and flags.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub root: PathBuf,
    pub port: PortRequest,
    pub default_port: u16,
    pub open_browser: bool,
    pub browser_delay: Duration,
    pub index_file: String,
}

impl ServerConfig {
    pub fn new(root: PathBuf, request: &LaunchRequest, settings: &ServerSettings) -> Self {
        Self {
            root,
            port: request.port,
            default_port: settings.default_port,
            open_browser: request.open_browser && settings.open_browser,
            browser_delay: Duration::from_millis(settings.browser_delay_ms),
            index_file: settings.index_file.clone(),
        }
    }
}
