//! Read-only session summary for the status view.

use chrono::{DateTime, Utc};
use roast_core::paywall::post_paywall_message;
use roast_core::random::RandomSource;
use roast_core::session::{RoastTier, Session};
use roast_core::task::{
    TherapyTask, achievement, catalog_len, completion_rate, next_task_suggestion,
};

#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub username: String,
    pub message_count: u32,
    pub tier: RoastTier,
    pub has_hit_paywall: bool,
    pub has_paid: bool,
    pub has_confessed: bool,
    pub session_minutes: i64,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub completion_rate: f64,
    pub achievement: &'static str,
    /// Only once the paywall has been seen.
    pub paywall_remark: Option<&'static str>,
    /// A random task not completed yet; `None` once all are done.
    pub next_task: Option<TherapyTask>,
}

impl StatusReport {
    pub fn from_session(session: &Session, now: DateTime<Utc>, rng: &dyn RandomSource) -> Self {
        Self {
            username: session.username.clone(),
            message_count: session.message_count,
            tier: session.current_tier,
            has_hit_paywall: session.has_hit_paywall,
            has_paid: session.has_paid,
            has_confessed: session.has_confessed,
            session_minutes: (now - session.session_started).num_minutes().max(0),
            completed_tasks: session.completed_tasks.len(),
            total_tasks: catalog_len(),
            completion_rate: completion_rate(&session.completed_tasks),
            achievement: achievement(session.completed_tasks.len()),
            paywall_remark: session
                .has_hit_paywall
                .then(|| post_paywall_message(session)),
            next_task: next_task_suggestion(&session.completed_tasks, rng),
        }
    }
}
