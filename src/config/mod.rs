//! Configuration loading for relorder.

use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "RELORDER_CONFIG";

/// Top-level configuration loaded from config.toml.
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub datasets: DatasetConfig,
}

/// Configuration for dataset locations.
#[derive(Debug, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_paths")]
    pub paths: Vec<String>,
}

fn default_dataset_paths() -> Vec<String> {
    vec!["~/.relorder/datasets".to_string(), "./datasets".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            datasets: DatasetConfig::default(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            paths: default_dataset_paths(),
        }
    }
}

impl Config {
    /// Load config from `$RELORDER_CONFIG`, falling back to
    /// `~/.config/relorder/config.toml`, or defaults if neither exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or
    /// parsed.
    pub fn load() -> anyhow::Result<Self> {
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            let contents = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            return Ok(config);
        }

        Ok(Config::default())
    }

    /// Resolve the config file path, honoring the env override.
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }

        ProjectDirs::from("", "", "relorder").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Expand ~ to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(base_dirs) = BaseDirs::new()
    {
        return base_dirs.home_dir().join(&path[2..]);
    }
    PathBuf::from(path)
}
