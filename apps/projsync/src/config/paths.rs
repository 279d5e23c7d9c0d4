//! Platform-specific configuration paths

use crate::error::{CliError, CliResult};
use std::path::{Path, PathBuf};

/// Environment variable that relocates the configuration directory.
pub const CONFIG_DIR_ENV: &str = "PROJSYNC_CONFIG_DIR";

/// Configuration paths for the projsync CLI
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Base configuration directory
    pub config_dir: PathBuf,
    /// Path to profiles.json
    pub profiles_file: PathBuf,
}

impl ConfigPaths {
    /// Resolve configuration paths.
    ///
    /// An explicit directory wins; otherwise `PROJSYNC_CONFIG_DIR`, then the
    /// platform directory:
    /// - Linux: ~/.config/projsync/
    /// - macOS: ~/Library/Application Support/projsync/
    /// - Windows: %APPDATA%\projsync\
    pub fn new(explicit: Option<&Path>) -> CliResult<Self> {
        let config_dir = match explicit {
            Some(dir) => dir.to_path_buf(),
            None => Self::default_config_dir()?,
        };
        Ok(Self::from_dir(config_dir))
    }

    pub fn from_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            profiles_file: config_dir.join("profiles.json"),
            config_dir,
        }
    }

    fn default_config_dir() -> CliResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let base_dir = dirs::config_dir().ok_or_else(|| {
            CliError::Config("Could not determine configuration directory".to_string())
        })?;

        Ok(base_dir.join("projsync"))
    }
}
