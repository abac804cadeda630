use std::path::PathBuf;

use anyhow::{Context, Result};
use directories_next::ProjectDirs;

/// Resolved per-user directories for configuration and runtime state.
pub struct AppPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "backdrop")
            .context("failed to resolve per-user application directories")?;
        Ok(Self {
            config_dir: dirs.config_dir().to_path_buf(),
            data_dir: dirs.data_dir().to_path_buf(),
        })
    }

    /// Default configuration file location, used when `--config` is absent.
    pub fn default_config_file(&self) -> PathBuf {
        self.config_dir.join("backdrop.toml")
    }

    /// Persisted application state (the entrance-fade flag).
    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join("state.toml")
    }
}
