//! Application settings and paths.
//!
//! Settings live in `settings.json` under the XDG configuration directory.
//! A missing file means built-in defaults.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Port;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

/// Application directory paths following XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/lanscan)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory for this user.
    pub fn discover() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("com", "lanscan", "lanscan").ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Remote address used only to learn the outbound interface.
    pub remote: Ipv4Addr,
    /// Port paired with `remote` when asking for a route.
    pub remote_port: u16,
    /// Port probed on every host.
    pub port: Port,
    /// Probe timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum probes in flight, 0 for unlimited.
    pub concurrency: usize,
    /// Default output format.
    pub output_format: String,
    /// List unreachable hosts as well as reachable ones.
    pub show_all: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            remote: Ipv4Addr::new(8, 8, 8, 8),
            remote_port: 80,
            port: Port::DEFAULT_TARGET,
            timeout_ms: 2000,
            concurrency: 0,
            output_format: "plain".to_string(),
            show_all: false,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::discover()?.settings_file();

        if !file.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values no scan could run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.remote_port == 0 {
            return Err(ConfigError::InvalidValue(
                "remote_port must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
