//! `config.toml` storage.

use super::atomic_file::AtomicFile;
use roast_core::config::AppConfig;
use roast_core::error::Result;
use std::path::PathBuf;

/// Loads and saves [`AppConfig`].
///
/// A missing or blank file yields the defaults; a malformed one is an error
/// so a typo is never silently ignored.
pub struct ConfigStorage {
    file: AtomicFile,
}

impl ConfigStorage {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::new(path),
        }
    }

    pub fn load(&self) -> Result<AppConfig> {
        match self.file.read()? {
            Some(content) => Ok(toml::from_str(&content)?),
            None => Ok(AppConfig::default()),
        }
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        let content = toml::to_string_pretty(config)?;
        self.file.write(&content)
    }
}
