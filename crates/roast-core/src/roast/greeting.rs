//! Greetings for new and returning users.

use crate::random::{RandomSource, choose};
use crate::session::Session;
use chrono::{DateTime, Utc};

pub const WELCOME_MESSAGE: &str = "Welcome to !THERAPIST - where your problems get worse, but at least you'll laugh about it! 💀🎭\n\nI'm your definitely-not-licensed AI therapist, and I'm here to make your day worse in the most entertaining way possible.\n\nLet's start...";

/// Welcome-back line plus a remark about how long the user was away.
pub fn welcome_back_message(session: &Session, now: DateTime<Utc>, rng: &dyn RandomSource) -> String {
    let name = session.name();
    let openers = [
        format!("Back for more pain, {}? 😈", name.unwrap_or("Anonymous")),
        "Oh look who's returned to their favorite emotional disaster zone! 🎭".to_string(),
        "Couldn't stay away, could you? Your masochistic tendencies are showing. 💀".to_string(),
        format!("Welcome back to your personal hell, {}! 🔥", name.unwrap_or("sweetie")),
        "Miss me? Of course you did. Nobody else roasts you quite like I do! 🎯".to_string(),
    ];

    let opener = choose(rng, &openers).cloned().unwrap_or_default();
    format!("{opener}{}", time_away_remark(session.last_activity, now))
}

fn time_away_remark(last_activity: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - last_activity).num_hours();
    if hours > 24 {
        format!(
            " It's been {} days - did you actually try to improve your life? Cute. 📅",
            hours / 24
        )
    } else if hours > 1 {
        format!(
            " {hours} hours away and you're already back? That's either dedication or desperation. 🕐"
        )
    } else {
        " You literally just left! Can't even take a break from being roasted? Wow. ⏰".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use crate::session::create_session;
    use chrono::Duration;

    #[test]
    fn test_personalised_with_name() {
        let now = Utc::now();
        let session = create_session(Some("Sam"), now);
        let message = welcome_back_message(&session, now, &ScriptedRandom::constant(0.0));
        assert!(message.starts_with("Back for more pain, Sam?"));
        assert!(message.contains("just left"));
    }

    #[test]
    fn test_time_away_buckets() {
        let now = Utc::now();
        assert!(time_away_remark(now - Duration::hours(3), now).contains("3 hours away"));
        assert!(time_away_remark(now - Duration::hours(50), now).contains("2 days"));
        assert!(time_away_remark(now - Duration::minutes(30), now).contains("just left"));
    }
}
