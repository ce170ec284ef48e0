//! Conversation mode types.

use crate::paywall::PaywallPrompt;
use crate::task::TherapyTask;
use serde::{Deserialize, Serialize};

/// The mutually exclusive UI modes of a conversation.
///
/// A pending paywall or task blocks ordinary roasting until it is resolved,
/// skipped or dismissed. Both cannot be pending at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "data")]
pub enum ConversationMode {
    /// Ordinary roasting.
    #[default]
    Normal,
    /// The paywall is shown and waiting for payment, confession or refusal.
    PaywallPending { prompt: PaywallPrompt },
    /// A therapy task is shown. `ticket` identifies this particular
    /// assignment so a stale countdown cannot resolve a later task.
    TaskPending { task: TherapyTask, ticket: u64 },
}

impl ConversationMode {
    pub fn label(&self) -> &'static str {
        match self {
            ConversationMode::Normal => "NORMAL",
            ConversationMode::PaywallPending { .. } => "PAYWALL_PENDING",
            ConversationMode::TaskPending { .. } => "TASK_PENDING",
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, ConversationMode::Normal)
    }
}
