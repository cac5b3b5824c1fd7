//! User configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{OcalError, OcalResult};
use crate::timezone::{TimezoneSource, system_timezone};

pub const DEFAULT_GRAPH_URL: &str = "https://graph.microsoft.com/v1.0";

/// Prefix of environment variables overriding file settings (`OCAL_TIMEZONE`).
const ENV_PREFIX: &str = "OCAL";

fn default_graph_url() -> String {
    DEFAULT_GRAPH_URL.to_string()
}

fn is_default_graph_url(url: &String) -> bool {
    url == DEFAULT_GRAPH_URL
}

/// Configuration at ~/.config/ocal/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OcalConfig {
    /// IANA timezone name; the system timezone when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Calendar to operate on; the primary calendar when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,

    #[serde(default = "default_graph_url", skip_serializing_if = "is_default_graph_url")]
    pub graph_url: String,
}

impl Default for OcalConfig {
    fn default() -> Self {
        OcalConfig {
            timezone: None,
            calendar_id: None,
            graph_url: default_graph_url(),
        }
    }
}

/// Directory holding the config file and the token cache.
pub fn config_dir() -> OcalResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("ocal"))
        .ok_or_else(|| OcalError::Config("Could not determine config directory".into()))
}

impl OcalConfig {
    pub fn config_path() -> OcalResult<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from the default location, with `OCAL_*` overrides.
    pub fn load() -> OcalResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path` (which may not exist), with `OCAL_*` overrides.
    pub fn load_from(path: &Path) -> OcalResult<Self> {
        Self::load_with_env(path, None)
    }

    fn load_with_env(path: &Path, env: Option<config::Map<String, String>>) -> OcalResult<Self> {
        tracing::debug!(path = %path.display(), "loading config");

        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
            .build()
            .map_err(|e| OcalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| OcalError::Config(e.to_string()))
    }

    /// Save to the default location.
    pub fn save(&self) -> OcalResult<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> OcalResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| OcalError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                OcalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, content)
            .map_err(|e| OcalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Configured timezone, else the system timezone.
    pub fn timezone_name(&self) -> String {
        self.timezone.clone().unwrap_or_else(system_timezone)
    }
}

impl TimezoneSource for OcalConfig {
    fn timezone_name(&self) -> String {
        OcalConfig::timezone_name(self)
    }
}
