//! Unified path management for roast configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/roast/             # Config directory
//! ├── config.toml              # Application configuration
//! └── secret.json              # API keys
//!
//! ~/.local/share/roast/        # Data directory
//! └── store/                   # Key-value blobs
//!     ├── therapist_session.json
//!     └── therapist_messages.json
//! ```

use roast_core::error::{Result, RoastError};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "roast";
const STORE_DIR: &str = "store";

/// Resolved locations for one run.
///
/// Either directory can be overridden (command line, tests); the rest is
/// derived from the platform defaults via `dirs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoastPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl RoastPaths {
    /// Platform defaults, with optional overrides for either directory.
    pub fn resolve(config_dir: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<Self> {
        let config_dir = match config_dir {
            Some(dir) => dir,
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| RoastError::config("Cannot find config directory"))?,
        };
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| RoastError::config("Cannot find data directory"))?,
        };
        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    /// Both directories rooted under `root` (used by tests).
    pub fn under(root: &Path) -> Self {
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// # Security Note
    ///
    /// The file holds a plaintext API key and should be mode 600.
    pub fn secret_file(&self) -> PathBuf {
        self.config_dir.join("secret.json")
    }

    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join(STORE_DIR)
    }
}
