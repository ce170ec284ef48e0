//! Effective settings: files merged with environment overrides.

use crate::paths::RoastPaths;
use crate::storage::{ConfigStorage, SecretStorage};
use roast_core::config::{AppConfig, GeminiConfig, SecretConfig};
use roast_core::error::Result;
use tracing::{debug, warn};

pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_API_URL: &str = "GEMINI_API_URL";
pub const ENV_MODEL: &str = "GEMINI_MODEL";

/// Environment variables that take precedence over the files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub model: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds overrides from any lookup; blank values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            api_key: get(ENV_API_KEY),
            api_url: get(ENV_API_URL),
            model: get(ENV_MODEL),
        }
    }
}

/// Configuration as the rest of the program sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub app: AppConfig,
    /// Present only when a non-blank API key was found.
    pub gemini: Option<GeminiConfig>,
}

impl Settings {
    /// Loads `config.toml` and `secret.json` from `paths` and applies `env`.
    ///
    /// An unusable `secret.json` leaves the provider unconfigured instead of
    /// failing; a broken `config.toml` is still an error.
    pub fn load(paths: &RoastPaths, env: &EnvOverrides) -> Result<Self> {
        let app = ConfigStorage::new(paths.config_file()).load()?;
        let secret = match SecretStorage::new(paths.secret_file()).load() {
            Ok(secret) => secret,
            Err(e) => {
                warn!(
                    path = %paths.secret_file().display(),
                    malformed = e.is_serialization(),
                    "Ignoring unusable secret file: {}",
                    e
                );
                SecretConfig::default()
            }
        };
        Ok(Self::merge(app, secret, env))
    }

    /// Precedence: environment, then `secret.json`, then `config.toml`.
    pub fn merge(mut app: AppConfig, secret: SecretConfig, env: &EnvOverrides) -> Self {
        let mut gemini = secret.gemini;

        if let Some(key) = &env.api_key {
            match gemini.as_mut() {
                Some(existing) => existing.api_key = key.clone(),
                None => {
                    gemini = Some(GeminiConfig {
                        api_key: key.clone(),
                        model_name: None,
                    })
                }
            }
        }

        if let Some(model) = gemini.as_ref().and_then(|g| g.model_name.clone()) {
            app.generation.model = model;
        }
        if let Some(model) = &env.model {
            app.generation.model = model.clone();
        }
        if let Some(url) = &env.api_url {
            app.generation.api_url = Some(url.clone());
        }

        let gemini = gemini.filter(GeminiConfig::has_key);
        debug!(
            model = %app.generation.model,
            has_key = gemini.is_some(),
            "Resolved generation settings"
        );
        Self { app, gemini }
    }
}
