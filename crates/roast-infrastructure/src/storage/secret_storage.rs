//! Secret configuration file storage.
//!
//! Read-only loading of `secret.json`. The file is optional: without it the
//! provider is simply unconfigured.

use roast_core::config::SecretConfig;
use roast_core::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Storage for the secret configuration file (`secret.json`).
///
/// Does NOT write or validate keys; a blank key is treated as absent by
/// [`roast_core::config::GeminiConfig::has_key`].
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the secret configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(SecretConfig)`: parsed file, or the empty config if it is missing
    /// - `Err(_)`: unreadable file or invalid JSON
    pub fn load(&self) -> Result<SecretConfig> {
        if !self.path.exists() {
            return Ok(SecretConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(SecretConfig::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
