use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::config::data::{path_display, Config};

const CONFIG_FILE_NAME: &str = "halp-gpt.toml";

/// Errors that can occur when reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {}: {source}", path_display(path))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {}: {source}", path_display(path))]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config at {}: {source}", path_display(path))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine the home directory")]
    NoHomeDirectory,
}

/// `~/.config/halp-gpt.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;
    Ok(dirs.home_dir().join(".config").join(CONFIG_FILE_NAME))
}

/// Create the directory that holds `config_path`.
pub fn ensure_config_dir(config_path: &Path) -> Result<(), ConfigError> {
    match config_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        Some(dir) => fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
            path: config_path.to_path_buf(),
            source,
        }),
        None => Ok(()),
    }
}

impl Config {
    /// Read `config_path`. A missing file is an empty config.
    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })
    }

    /// Like [`Config::load_from_path`], but an unreadable or malformed file
    /// is reported and replaced by the defaults.
    pub fn load_or_default(config_path: &Path) -> Config {
        Config::load_from_path(config_path).unwrap_or_else(|err| {
            warn!(error = %err, "Ignoring unusable config");
            Config::default()
        })
    }

    /// Write the config as pretty TOML, replacing the file atomically.
    pub fn save_to_path(&self, config_path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: config_path.to_path_buf(),
            source,
        };

        ensure_config_dir(config_path)?;
        let contents = toml::to_string_pretty(self)?;
        let parent = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(write_error)?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(write_error)?;
        temp_file.as_file_mut().sync_all().map_err(write_error)?;
        temp_file
            .persist(config_path)
            .map_err(|err| write_error(err.error))?;
        debug!(path = %config_path.display(), "Config saved");
        Ok(())
    }
}
