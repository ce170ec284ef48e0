//! Configuration models.
//!
//! `AppConfig` mirrors `config.toml`; `SecretConfig` mirrors `secret.json`.
//! Loading lives in the infrastructure crate.

use serde::{Deserialize, Serialize};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TASK_COUNTDOWN_SECS: u64 = 30;

/// Top-level application configuration (`config.toml`).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Display name. When set it is also recorded as `personalInfo.name`
    /// on new sessions.
    #[serde(default)]
    pub username: Option<String>,
    /// Seconds a therapy task stays open before it is auto-skipped.
    #[serde(default = "default_task_countdown_secs")]
    pub task_countdown_secs: u64,
    #[serde(default)]
    pub generation: GenerationSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            username: None,
            task_countdown_secs: DEFAULT_TASK_COUNTDOWN_SECS,
            generation: GenerationSettings::default(),
        }
    }
}

fn default_task_countdown_secs() -> u64 {
    DEFAULT_TASK_COUNTDOWN_SECS
}

/// Parameters forwarded to the generation provider.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    pub model: String,
    /// Full endpoint override; when unset the model endpoint is derived
    /// from `model`.
    pub api_url: Option<String>,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_url: None,
            temperature: 0.9,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

/// Secret configuration (`secret.json`).
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

impl GeminiConfig {
    /// A key that is empty or whitespace counts as missing.
    pub fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults_from_empty_toml() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.task_countdown_secs, 30);
        assert_eq!(config.generation.top_k, 40);
    }

    #[test]
    fn test_partial_generation_section() {
        let config: AppConfig = toml::from_str(
            r#"
            username = "Sam"

            [generation]
            temperature = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.username.as_deref(), Some("Sam"));
        assert_eq!(config.generation.temperature, 0.5);
        assert_eq!(config.generation.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.generation.max_output_tokens, 1024);
    }

    #[test]
    fn test_blank_key_is_missing() {
        let gemini = GeminiConfig {
            api_key: "   ".to_string(),
            model_name: None,
        };
        assert!(!gemini.has_key());
    }
}
