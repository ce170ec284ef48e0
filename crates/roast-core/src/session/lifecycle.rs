//! Session state machine rules.
//!
//! All functions here are pure: they take the current session (or the
//! counters they depend on) and return a value. Persisting the result is
//! the caller's job.

use super::model::{DEFAULT_USERNAME, INFO_NAME, Session};
use super::tier::RoastTier;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Message count at which the paywall fires.
pub const PAYWALL_THRESHOLD: u32 = 5;
/// Messages beyond this count escalate to `Medium`.
pub const MEDIUM_AFTER: u32 = 5;
/// Messages beyond this count escalate to `Nuclear`.
pub const NUCLEAR_AFTER: u32 = 10;

/// Creates a fresh session.
///
/// A non-blank `username` is used as the display label and also recorded
/// as `personal_info.name`; otherwise the placeholder label is used and no
/// name is captured.
pub fn create_session(username: Option<&str>, now: DateTime<Utc>) -> Session {
    let username = username.map(str::trim).filter(|name| !name.is_empty());

    let mut personal_info = BTreeMap::new();
    if let Some(name) = username {
        personal_info.insert(INFO_NAME.to_string(), name.to_string());
    }

    Session {
        id: format!("session_{}", Uuid::new_v4().simple()),
        username: username.unwrap_or(DEFAULT_USERNAME).to_string(),
        message_count: 0,
        has_hit_paywall: false,
        has_confessed: false,
        has_paid: false,
        current_tier: RoastTier::Mild,
        session_started: now,
        last_activity: now,
        personal_info,
        completed_tasks: BTreeSet::new(),
    }
}

/// Counts one user-submitted message.
pub fn record_user_message(session: &Session, now: DateTime<Utc>) -> Session {
    let mut next = session.clone();
    next.message_count = next.message_count.saturating_add(1);
    next.last_activity = now;
    next
}

/// One-shot edge trigger: true iff the threshold is reached and the paywall
/// has not been hit yet.
pub fn should_trigger_paywall(message_count: u32, has_hit_paywall: bool) -> bool {
    message_count >= PAYWALL_THRESHOLD && !has_hit_paywall
}

/// Target tier for the next roast. Both inputs are monotonic, so the
/// result never decreases over a session.
pub fn escalate_tier(message_count: u32, has_hit_paywall: bool) -> RoastTier {
    if message_count > NUCLEAR_AFTER || has_hit_paywall {
        RoastTier::Nuclear
    } else if message_count > MEDIUM_AFTER {
        RoastTier::Medium
    } else {
        RoastTier::Mild
    }
}

/// True iff the user has talked before and we know their name.
pub fn is_returning_user(session: &Session) -> bool {
    session.message_count > 0 && session.name().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Session {
        create_session(None, Utc::now())
    }

    #[test]
    fn test_create_session_defaults() {
        let now = Utc::now();
        let session = create_session(None, now);
        assert!(session.id.starts_with("session_"));
        assert_eq!(session.username, DEFAULT_USERNAME);
        assert_eq!(session.message_count, 0);
        assert_eq!(session.current_tier, RoastTier::Mild);
        assert!(!session.has_hit_paywall && !session.has_paid && !session.has_confessed);
        assert!(session.personal_info.is_empty());
        assert!(session.completed_tasks.is_empty());
        assert_eq!(session.session_started, now);
        assert_eq!(session.last_activity, now);
    }

    #[test]
    fn test_create_session_with_username_captures_name() {
        let session = create_session(Some("  Sam "), Utc::now());
        assert_eq!(session.username, "Sam");
        assert_eq!(session.name(), Some("Sam"));

        let blank = create_session(Some("   "), Utc::now());
        assert_eq!(blank.username, DEFAULT_USERNAME);
        assert!(blank.name().is_none());
    }

    #[test]
    fn test_record_user_message_counts_and_touches() {
        let session = fresh();
        let later = session.last_activity + chrono::Duration::seconds(5);
        let next = record_user_message(&session, later);
        assert_eq!(next.message_count, 1);
        assert_eq!(next.last_activity, later);
        assert_eq!(next.session_started, session.session_started);
        // original untouched
        assert_eq!(session.message_count, 0);
    }

    #[test]
    fn test_message_count_equals_submissions() {
        let mut session = fresh();
        for n in 1..=25 {
            session = record_user_message(&session, Utc::now());
            assert_eq!(session.message_count, n);
        }
    }

    #[test]
    fn test_paywall_fires_exactly_once() {
        let mut hit = false;
        let mut fired_at = Vec::new();
        for count in 0..40 {
            if should_trigger_paywall(count, hit) {
                fired_at.push(count);
                hit = true;
            }
        }
        assert_eq!(fired_at, vec![5]);
    }

    #[test]
    fn test_escalate_tier_thresholds() {
        assert_eq!(escalate_tier(0, false), RoastTier::Mild);
        assert_eq!(escalate_tier(5, false), RoastTier::Mild);
        assert_eq!(escalate_tier(6, false), RoastTier::Medium);
        assert_eq!(escalate_tier(10, false), RoastTier::Medium);
        assert_eq!(escalate_tier(11, false), RoastTier::Nuclear);
        assert_eq!(escalate_tier(1, true), RoastTier::Nuclear);
    }

    #[test]
    fn test_tier_never_regresses_over_turns() {
        let mut previous = RoastTier::Mild;
        let mut hit = false;
        for count in 1..30 {
            if count == 5 {
                hit = true;
            }
            let tier = escalate_tier(count, hit);
            assert!(tier >= previous, "tier regressed at turn {count}");
            previous = tier;
        }
    }

    #[test]
    fn test_is_returning_user() {
        let mut session = create_session(Some("Sam"), Utc::now());
        assert!(!is_returning_user(&session));
        session.message_count = 3;
        assert!(is_returning_user(&session));

        let mut anonymous = fresh();
        anonymous.message_count = 3;
        assert!(!is_returning_user(&anonymous));
    }
}
