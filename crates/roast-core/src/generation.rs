//! Generation provider boundary.
//!
//! The provider is an external text-completion service. The domain only
//! sees a fallible `generate(prompt) -> text`; every failure kind is
//! treated as "generation unavailable" by callers.

use async_trait::async_trait;
use thiserror::Error;

/// Why a generation call produced no usable text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Credentials or endpoint were absent at startup.
    #[error("generation provider is not configured")]
    NotConfigured,

    /// The request never completed (DNS, connect, TLS, timeout).
    #[error("transport failure: {0}")]
    Transport(String),

    /// Non-2xx status from the provider.
    #[error("provider returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// 2xx, but no candidate text.
    #[error("provider returned no text")]
    EmptyResponse,

    /// 2xx, but the body could not be decoded.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl GenerationError {
    /// True for failures worth retrying at the transport level. Callers in
    /// this crate never retry; the flag is informational for logs.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }
}

/// An external text generator.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generates free text for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
