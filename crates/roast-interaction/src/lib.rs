//! Generation provider adapters.

pub mod gemini_api_agent;
pub mod unconfigured;

pub use gemini_api_agent::GeminiApiAgent;
pub use unconfigured::UnconfiguredGenerator;

use roast_core::config::{GeminiConfig, GenerationSettings};
use roast_core::generation::Generator;
use std::sync::Arc;
use tracing::{error, info};

/// Picks the provider for this run.
///
/// Without an API key the returned generator fails every call, which sends
/// every turn down the canned fallback path. The missing key is reported
/// here, once.
pub fn generator_from_config(
    gemini: Option<&GeminiConfig>,
    settings: &GenerationSettings,
) -> Arc<dyn Generator> {
    match gemini.filter(|config| config.has_key()) {
        Some(config) => {
            info!(model = %settings.model, "Using Gemini generation provider");
            Arc::new(GeminiApiAgent::from_settings(config.api_key.clone(), settings))
        }
        None => {
            error!(
                "No Gemini API key configured (secret.json or GEMINI_API_KEY); using canned roasts only"
            );
            Arc::new(UnconfiguredGenerator)
        }
    }
}
