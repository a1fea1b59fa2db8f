//! Configuration Management
//!
//! Loads settings for the `circbuf` binary from TOML files.
//! Configuration includes:
//! - Demo settings (buffer capacity used by the walkthrough)
//! - Storage settings (where persistence files go, default encoding)
//!
//! The library itself takes no configuration.

use crate::errors::ConfigError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// On-disk encoding for saved buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    /// Native-endian header and fixed-width records (default)
    #[default]
    Binary,
    /// Space-separated decimal header and elements
    Text,
}

impl std::fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageFormat::Binary => write!(f, "binary"),
            StorageFormat::Text => write!(f, "text"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub demo: DemoConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Detailed logging (set via CLI, not persisted)
    #[serde(skip)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Capacity of the buffer used by the basic walkthrough
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for demo persistence files (system temp dir when unset)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub format: StorageFormat,
    /// Keep demo files instead of removing them afterwards
    #[serde(default)]
    pub keep_files: bool,
}

fn default_capacity() -> usize {
    5
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `circbuf.toml` in the
    /// working directory and then `~/.config/circbuf/config.toml` are tried,
    /// falling back to defaults. `CIRCBUF_CAPACITY` and `CIRCBUF_DATA_DIR`
    /// override file values.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)
                    .map_err(|e| ConfigError(format!("Failed to read config from {}: {}", p, e)))?;
                Self::parse(&content)?
            }
            None => {
                let mut default_paths = vec![PathBuf::from("circbuf.toml")];
                if let Some(home) = dirs::home_dir() {
                    default_paths.push(home.join(".config/circbuf/config.toml"));
                }

                let mut loaded = None;
                for p in &default_paths {
                    if let Ok(content) = std::fs::read_to_string(p) {
                        debug!(path = %p.display(), "Loaded config file");
                        loaded = Some(Self::parse(&content)?);
                        break;
                    }
                }
                loaded.unwrap_or_else(|| {
                    debug!("No config file found, using defaults");
                    Self::default()
                })
            }
        };

        if let Ok(capacity) = std::env::var("CIRCBUF_CAPACITY") {
            if let Ok(n) = capacity.parse::<usize>() {
                config.demo.capacity = n;
            }
        }
        if let Ok(dir) = std::env::var("CIRCBUF_DATA_DIR") {
            config.storage.data_dir = Some(PathBuf::from(dir));
        }

        config.validate()?;
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self> {
        let config = toml::from_str(content)
            .map_err(|e| ConfigError(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.demo.capacity == 0 {
            return Err(ConfigError("demo.capacity must be at least 1".to_string()).into());
        }
        if let Some(dir) = &self.storage.data_dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError("storage.data_dir must not be empty".to_string()).into());
            }
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}
