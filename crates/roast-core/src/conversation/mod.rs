//! Conversation state machine.
//!
//! - `mode`: `ConversationMode` (NORMAL / PAYWALL_PENDING / TASK_PENDING)
//! - `state`: `Conversation` and the turn types it returns

mod mode;
mod state;

pub use mode::ConversationMode;
pub use state::{Conversation, IgnoreReason, Turn, TurnStep};
