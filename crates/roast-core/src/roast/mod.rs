//! Roast content: request/response types, canned fallbacks, greetings and
//! the task gate.
//!
//! Prompt rendering and the provider call live in the application crate;
//! everything here is synchronous and deterministic given a
//! [`RandomSource`](crate::random::RandomSource).

mod fallback;
mod gate;
mod greeting;

pub use fallback::{fallback_lines, fallback_opening_question, fallback_roast};
pub use gate::{
    TASK_MIN_MESSAGES, TASK_PROBABILITY_STEP, TASK_TYPE_CONFESSION, should_trigger_task,
    task_probability,
};
pub use greeting::{WELCOME_MESSAGE, welcome_back_message};

use crate::session::{Message, RoastTier, Session};

/// Number of trailing transcript entries included in the prompt.
pub const HISTORY_WINDOW: usize = 4;

/// Everything the selection engine needs for one roast.
#[derive(Debug, Clone)]
pub struct RoastRequest {
    pub user_message: String,
    pub session: Session,
    pub history: Vec<Message>,
}

/// What the selection engine decided to say.
#[derive(Debug, Clone, PartialEq)]
pub struct RoastResponse {
    pub content: String,
    pub tier: RoastTier,
    pub should_trigger_task: bool,
    pub task_type: Option<String>,
    /// True when `content` came from the canned list.
    pub is_fallback: bool,
}
