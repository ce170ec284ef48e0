//! Session domain model.
//!
//! One `Session` exists per client. It carries the counters and flags the
//! roast/paywall/task state machine runs on, plus a small bag of facts the
//! user volunteered.

use super::tier::RoastTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Placeholder display label for sessions created without a username.
pub const DEFAULT_USERNAME: &str = "Anonymous Disaster";

/// `personal_info` key holding the user's name. Read by `is_returning_user`.
pub const INFO_NAME: &str = "name";
/// `personal_info` key holding the first substantive message. Read by the
/// prompt builder.
pub const INFO_MAIN_PROBLEM: &str = "mainProblem";

/// Represents a client session in the application's domain layer.
///
/// Flags are write-once: setters only ever flip them to `true`.
/// `current_tier` only moves upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque unique identifier (`session_<uuid>`)
    pub id: String,
    /// Display label
    pub username: String,
    /// Number of ordinary user messages submitted
    pub message_count: u32,
    pub has_hit_paywall: bool,
    pub has_confessed: bool,
    pub has_paid: bool,
    pub current_tier: RoastTier,
    /// Immutable after creation
    pub session_started: DateTime<Utc>,
    /// Bumped on every mutation
    pub last_activity: DateTime<Utc>,
    /// Free-text facts. Only `name` and `mainProblem` are read by logic;
    /// anything else is prompt/display context.
    pub personal_info: BTreeMap<String, String>,
    /// Identifiers of tasks completed successfully
    pub completed_tasks: BTreeSet<String>,
}

impl Session {
    /// The captured `name`, if any.
    pub fn name(&self) -> Option<&str> {
        self.personal_info.get(INFO_NAME).map(String::as_str)
    }

    /// The captured main problem, if any.
    pub fn main_problem(&self) -> Option<&str> {
        self.personal_info.get(INFO_MAIN_PROBLEM).map(String::as_str)
    }

    /// Raises `current_tier` to at least `floor`. Never lowers it.
    pub fn raise_tier(&mut self, floor: RoastTier) {
        self.current_tier = self.current_tier.max(floor);
    }

    /// Records a task as completed. Returns `false` if it already was.
    pub fn mark_task_completed(&mut self, task_id: &str) -> bool {
        self.completed_tasks.insert(task_id.to_string())
    }

    /// Applies a paywall resolution. Flags are only ever set, never reset.
    pub fn apply(&mut self, update: &SessionUpdate) {
        self.has_hit_paywall |= update.has_hit_paywall;
        self.has_paid |= update.has_paid;
        self.has_confessed |= update.has_confessed;
        if let Some(floor) = update.tier_floor {
            self.raise_tier(floor);
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }
}

/// A partial, monotonic update to a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionUpdate {
    pub has_hit_paywall: bool,
    pub has_paid: bool,
    pub has_confessed: bool,
    pub tier_floor: Option<RoastTier>,
}
