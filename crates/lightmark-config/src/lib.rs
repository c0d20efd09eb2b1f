use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub library_path: PathBuf,
}

impl Config {
    /// Load config from an explicit path. A missing file is `Ok(None)`;
    /// an unreadable or malformed file is an error.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })?;
        config.library_path = expand_path(&config.library_path).unwrap_or(config.library_path);

        Ok(Some(config))
    }

    /// Load from the default config location.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(config_path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/lightmark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }
}

/// Expand `~` and environment variables in a configured path.
fn expand_path(path: &Path) -> Option<PathBuf> {
    let path_str = path.to_string_lossy();
    shellexpand::full(&path_str)
        .ok()
        .map(|expanded| PathBuf::from(expanded.as_ref()))
}
