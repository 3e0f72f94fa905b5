//! Configuration handling for the Mullvad helper
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. Built-in defaults
//! 2. `config.toml` in the config directory (optional)
//! 3. Environment variables
//!
//! | Variable | Example | Description |
//! |----------|---------|-------------|
//! | `MULLVAD_BIN` | `/usr/bin/mullvad` | Mullvad CLI name or path |
//! | `MULLVAD_CONNECT_DELAY` | `3` | Seconds to wait after connecting |
//! | `MULLVAD_HELPER_CONFIG_DIR` | `/tmp/mh` | Overrides the config directory |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const APP_DIR: &str = "mullvad-helper";
pub const CONFIG_FILE: &str = "config.toml";

pub const BIN_VAR: &str = "MULLVAD_BIN";
pub const DELAY_VAR: &str = "MULLVAD_CONNECT_DELAY";
pub const DIR_VAR: &str = "MULLVAD_HELPER_CONFIG_DIR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Config file already exists: {0}")]
    AlreadyExists(PathBuf),
    #[error("Could not determine a config directory (no HOME?)")]
    NoConfigDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mullvad CLI executable, bare name or path
    pub binary: String,
    /// Delay between `connect` and the verification lookups
    pub connect_delay_secs: u64,
    /// Endpoint printing the apparent public IP
    pub ip_endpoint: String,
    /// Endpoint confirming whether traffic exits through Mullvad
    pub check_endpoint: String,
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            binary: "mullvad".to_string(),
            connect_delay_secs: 1,
            ip_endpoint: "https://am.i.mullvad.net/json".to_string(),
            check_endpoint: "https://am.i.mullvad.net/connected".to_string(),
            http_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load the file in `dir` if present and apply process environment overrides
    pub fn resolve(dir: &Path) -> Result<Self, ConfigError> {
        Self::resolve_with(dir, |key| env::var(key))
    }

    /// Same as [`Config::resolve`] with a custom environment getter (for testing)
    pub fn resolve_with<F>(dir: &Path, get_var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let path = dir.join(CONFIG_FILE);
        let mut config = if path.exists() {
            debug!("Loading config from {}", path.display());
            Self::load(&path)?
        } else {
            Self::default()
        };
        config.apply_env_fn(get_var);
        Ok(config)
    }

    /// Apply environment overrides on top of the current values
    pub fn apply_env_fn<F>(&mut self, get_var: F)
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        if let Ok(binary) = get_var(BIN_VAR) {
            if !binary.trim().is_empty() {
                self.binary = binary.trim().to_string();
            }
        }

        if let Ok(delay) = get_var(DELAY_VAR) {
            match delay.trim().parse::<u64>() {
                Ok(secs) => self.connect_delay_secs = secs,
                Err(_) => warn!(
                    "Ignoring {}={:?}: not a whole number of seconds",
                    DELAY_VAR, delay
                ),
            }
        }
    }
}

/// Write a default `config.toml` into `dir`, never overwriting
pub fn write_default(dir: &Path) -> Result<PathBuf, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path));
    }
    Config::default().save(&path)?;
    Ok(path)
}

/// Directory holding `config.toml` and the hardening marker
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    config_dir_with(|key| env::var(key), dirs::config_dir(), dirs::home_dir())
}

/// Directory resolution with injected lookups (for testing)
pub fn config_dir_with<F>(
    get_var: F,
    os_config: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf, ConfigError>
where
    F: Fn(&str) -> Result<String, env::VarError>,
{
    let non_empty = |key: &str| get_var(key).ok().filter(|v| !v.trim().is_empty());

    if let Some(dir) = non_empty(DIR_VAR) {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }
    if let Some(base) = os_config {
        return Ok(base.join(APP_DIR));
    }
    home.map(|h| h.join(".config").join(APP_DIR))
        .ok_or(ConfigError::NoConfigDir)
}
