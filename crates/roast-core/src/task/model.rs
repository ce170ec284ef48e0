//! Therapy task domain model.

use serde::{Deserialize, Serialize};

/// How a task response is judged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TaskCheck {
    /// Canonicalized reply must equal the canonicalized target.
    Exact,
    /// Digits 1 through 10 must appear in increasing order.
    CountToTen,
    /// At least this many numeric characters.
    MinDigits(usize),
    /// Any trimmed reply of at least this many characters.
    OpenEnded(usize),
}

/// A side-challenge copied out of the static catalog when triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TherapyTask {
    pub id: String,
    pub prompt: String,
    pub expected_response: Option<String>,
    pub check: TaskCheck,
    pub punishment_roast: String,
    pub reward_roast: Option<String>,
}

/// Outcome of a task exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResolution {
    pub task_id: String,
    pub completed: bool,
    pub roast: String,
}
