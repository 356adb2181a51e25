//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. WAYFINDER_CONFIG environment variable
//! 3. Default: wayfinder.toml in the working directory (optional)

use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};
use crate::core::model::NavigationUserPreferences;
use crate::core::source::LayoutSource;

pub const CONFIG_ENV: &str = "WAYFINDER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "wayfinder.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayoutConfig {
    /// File path, http(s) URL, or `bundled:sample`
    #[serde(default = "default_layout_source")]
    pub source: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            source: default_layout_source(),
        }
    }
}

fn default_layout_source() -> String {
    "bundled:sample".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Preferences new sessions start with
    #[serde(default)]
    pub preferences: NavigationUserPreferences,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load from an explicit path, the environment, or the optional default file.
    ///
    /// An explicitly named file must exist; a missing default file yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

        match named {
            Some(path) => Self::from_file(&path).map_err(|e| match e {
                Error::Io(io) => Error::Io(std::io::Error::new(
                    io.kind(),
                    format!("config {}: {io}", path.display()),
                )),
                other => other,
            }),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn layout_source(&self) -> LayoutSource {
        LayoutSource::parse(&self.layout.source)
    }
}
