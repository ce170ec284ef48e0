//! Canned replies used when the generator is unavailable.

use crate::random::{RandomSource, choose};
use crate::session::RoastTier;

const MILD: &[&str] = &[
    "Oh, that's... interesting. In a 'watching a car crash in slow motion' kind of way. 🚗💥 What made you think that was a good idea?",
    "I see you've chosen the path of maximum drama. Bold strategy! 🎭 How's that working out for you so far?",
    "That sounds like something someone with your track record would do. 😅 What's your next brilliant plan?",
];

const MEDIUM: &[&str] = &[
    "Wow. I mean... WOW. That's impressively bad decision-making right there. 🤦‍♂️ Do you always choose chaos, or is this a special occasion?",
    "Your ability to consistently make questionable choices is genuinely remarkable. It's like a superpower, but useless. 💀 What other life failures shall we discuss?",
    "That level of self-sabotage takes SKILL. I'm almost impressed! 🎯 Tell me, what childhood trauma led to this moment?",
];

const NUCLEAR: &[&str] = &[
    "Holy hell, that's the most spectacularly stupid thing I've heard all day. And I talk to people like you for a living! 💥 How do you even function in society?",
    "Your life choices make reality TV look classy. That's genuinely impressive in the worst possible way. 🔥 What other disasters are you hiding from me?",
    "I've seen some trainwrecks, but you're like the Titanic of personal decisions - epic, preventable, and somehow still sinking. ⚰️ What's your next catastrophe going to be?",
];

const OPENING_QUESTIONS: &[&str] = &[
    "So, what brings you here today? And please, don't tell me everything is 'fine'.",
    "What's been weighing on your mind lately? Besides your questionable decision to talk to an AI therapist.",
    "Tell me about what's troubling you. I promise to make it worse with my helpful insights.",
    "What's your biggest problem right now? And choosing to chat with me doesn't count... yet.",
    "What would you like to discuss today? Your feelings? Your failures? Your poor judgment?",
];

/// The pre-written roasts for a tier.
pub fn fallback_lines(tier: RoastTier) -> &'static [&'static str] {
    match tier {
        RoastTier::Mild => MILD,
        RoastTier::Medium => MEDIUM,
        RoastTier::Nuclear => NUCLEAR,
    }
}

/// Uniform pick from the tier's canned roasts.
pub fn fallback_roast(tier: RoastTier, rng: &dyn RandomSource) -> String {
    choose(rng, fallback_lines(tier))
        .copied()
        .unwrap_or(MILD[0])
        .to_string()
}

/// Uniform pick from the canned opening questions.
pub fn fallback_opening_question(rng: &dyn RandomSource) -> String {
    choose(rng, OPENING_QUESTIONS)
        .copied()
        .unwrap_or(OPENING_QUESTIONS[0])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::StdRandom;

    #[test]
    fn test_three_lines_per_tier() {
        for tier in [RoastTier::Mild, RoastTier::Medium, RoastTier::Nuclear] {
            assert_eq!(fallback_lines(tier).len(), 3);
        }
    }

    #[test]
    fn test_fallback_stays_in_tier() {
        let rng = StdRandom::seeded(1);
        for tier in [RoastTier::Mild, RoastTier::Medium, RoastTier::Nuclear] {
            for _ in 0..20 {
                let line = fallback_roast(tier, &rng);
                assert!(fallback_lines(tier).contains(&line.as_str()));
            }
        }
    }

    #[test]
    fn test_opening_question_non_empty() {
        let rng = StdRandom::seeded(2);
        assert!(!fallback_opening_question(&rng).is_empty());
    }
}
