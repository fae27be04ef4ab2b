//! Configuration loader/writer plus strongly typed settings structures.
//!
//! Settings live in `~/.bbs-theme-tool/config.toml` (or under the directory
//! named by `BBS_THEME_TOOL_DIR`). A missing file is created with defaults on
//! first load; missing keys fall back to their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DATA_DIR_ENV: &str = "BBS_THEME_TOOL_DIR";
pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_PORT: u16 = 8000;

/// Top-level configuration object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub bbs: BbsConfig,
}

/// Static file server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served over HTTP
    #[serde(default = "default_dir")]
    pub root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Where `bbs-theme.json` is written
    #[serde(default = "default_dir")]
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Frame interval of the editor loop
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
    /// How long a notification stays before leaving
    #[serde(default = "default_notification_ms")]
    pub notification_ms: u64,
    /// Preset selected at startup (name or index)
    #[serde(default = "default_preset")]
    pub default_preset: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BbsConfig {
    /// Default `config/bbs` directory for the `bbs` subcommands
    #[serde(default)]
    pub config_path: Option<PathBuf>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_poll_timeout_ms() -> u64 {
    16
}

fn default_notification_ms() -> u64 {
    3000
}

fn default_preset() -> String {
    "Classic Green".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            root: default_dir(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_dir(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: default_poll_timeout_ms(),
            notification_ms: default_notification_ms(),
            default_preset: default_preset(),
        }
    }
}

impl UiConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    pub fn notification_hold(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }
}

impl ServerConfig {
    /// Port precedence: command line, then the `PORT` environment value, then
    /// the config file. An unparsable environment value is ignored.
    pub fn resolve_port(&self, cli_port: Option<u16>, env_port: Option<&str>) -> u16 {
        if let Some(port) = cli_port {
            return port;
        }
        if let Some(raw) = env_port {
            match raw.trim().parse::<u16>() {
                Ok(port) => return port,
                Err(e) => tracing::warn!("Ignoring invalid {}={:?}: {}", PORT_ENV, raw, e),
            }
        }
        self.port
    }
}

impl Config {
    /// Load from the default location, writing defaults if the file is missing
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            let config = Self::default();
            config.save_to(&path)?;
            tracing::info!("Created default config at {:?}", path);
            return Ok(config);
        }
        Self::load_from_path(&path)
    }

    /// Load from an explicit file; the file must exist
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Get the base directory (~/.bbs-theme-tool/)
    /// Can be overridden with BBS_THEME_TOOL_DIR environment variable
    pub fn base_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".bbs-theme-tool"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }
}
