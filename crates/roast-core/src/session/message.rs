//! Conversation message types.

use super::tier::RoastTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// A single transcript entry. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    /// Severity attached to roast replies
    pub roast_tier: Option<RoastTier>,
    /// Reply produced by resolving the paywall
    pub is_paywall_response: bool,
    /// Task this message belongs to, if it is part of a task exchange
    pub task_id: Option<String>,
    pub is_task: bool,
}

impl Message {
    fn new(content: impl Into<String>, sender: Sender, now: DateTime<Utc>) -> Self {
        Self {
            id: format!("msg_{}", Uuid::new_v4().simple()),
            content: content.into(),
            sender,
            timestamp: now,
            roast_tier: None,
            is_paywall_response: false,
            task_id: None,
            is_task: false,
        }
    }

    pub fn user(content: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::new(content, Sender::User, now)
    }

    pub fn ai(content: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::new(content, Sender::Ai, now)
    }

    pub fn with_tier(mut self, tier: RoastTier) -> Self {
        self.roast_tier = Some(tier);
        self
    }

    pub fn as_paywall_response(mut self) -> Self {
        self.is_paywall_response = true;
        self
    }

    pub fn for_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self.is_task = true;
        self
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}
