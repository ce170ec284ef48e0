//! Paywall flow: prompt generation and reply classification.

use super::model::{PaywallKind, PaywallOutcome, PaywallPrompt, PaywallResolution};
use crate::random::{RandomSource, choose};
use crate::session::{RoastTier, Session, SessionUpdate};

/// The fake price shown on every paywall.
pub const PAYMENT_AMOUNT: &str = "₹999.99";
const PAYMENT_AMOUNT_DIGITS: &str = "999";
const CONFESSION_MIN_CHARS: usize = 20;

const CURRENCY_SYMBOLS: &[char] = &['₹', '$', '€', '£', '¥'];
const PAYMENT_KEYWORDS: &[&str] = &["pay"];
const CONFESSION_KEYWORDS: &[&str] = &["yes", "admit", "confess", "true"];

const PAYWALL_MESSAGES: &[&str] = &[
    "🚨 PAYWALL ACTIVATED! 🚨\nPay ₹999.99 for more emotional damage, or confess something embarrassing!",
    "💸 Time to pay up, buttercup! ₹999.99 for premium roasting, or spill your secrets!",
    "🤑 Your free trial of self-destruction has ended! ₹999.99, or tell me your shame!",
    "💰 Cough up ₹999.99 for advanced trauma, or confess your deepest cringe!",
    "🏧 Insert ₹999.99 to continue your spiral into despair, or share your embarrassment!",
];

const CONFESSION_PROMPTS: &[&str] = &[
    "Confess: Have you ever Googled your own name?",
    "Admit it: You've practiced acceptance speeches in the mirror, haven't you?",
    "Tell the truth: How many times have you pretended to be sick to avoid social events?",
    "Confess: You've definitely stalked your ex on social media this week.",
    "Admit: You've argued with someone on the internet about something stupid.",
    "Truth time: How many self-help books have you bought but never finished?",
    "Confess: You've lied about reading a book you've never actually read.",
    "Admit it: You've cried during a commercial, haven't you?",
    "Tell the truth: You've practiced conversations in your head, then said none of it.",
    "Confess: You've pretended to understand something you had no clue about.",
    "Admit: You've definitely looked up your symptoms on WebMD and panicked.",
    "Truth: You've eaten food that fell on the floor when no one was looking.",
];

const PAYMENT_ROASTS: &[&str] = &[
    "HAHAHA! You actually tried to pay me fake money? That's the most desperate thing I've seen all day, and I've seen some pathetic stuff. Fine, continue your journey of self-destruction - it's on the house since you're clearly broke AND desperate! 💸😂",
    "OH MY GOD, you really thought this was a real payment system?! That's adorable! Your financial literacy is as bad as your life choices. Congratulations, you've unlocked 'Gullible Premium' - keep talking, this is hilarious! 🎪💳",
    "Wait... you were actually willing to PAY me to insult you? That's simultaneously the saddest and most honest thing you've done all day. I respect the commitment to your own destruction. Continue, you beautiful disaster! 🏆💀",
    "You tried to pay me with FAKE MONEY for FAKE THERAPY from a FAKE THERAPIST. The layers of delusion here are *chef's kiss* magnificent! Your payment has been 'processed' (into the void). Keep talking! 🎭✨",
    "I can't decide what's worse - that you tried to pay, or that you thought ₹999.99 was enough for this premium emotional carnage. Honey, this level of therapy costs WAY more than your self-worth. But I'll give you a discount for being entertainingly pathetic! 🎯💸",
];

/// `{confession}` is replaced with the user's literal reply.
const CONFESSION_ROASTS: &[&str] = &[
    "Oh wow, you actually confessed! \"{confession}\" - That's somehow worse than I expected, and my expectations were already underground. Thanks for the ammunition! 🎯😂",
    "\"{confession}\" - I've heard some pathetic confessions, but this one takes the cake. And then drops it. Face first. Into concrete. 🍰💥",
    "Well, \"{confession}\" explains... literally EVERYTHING about you. It's like all the puzzle pieces of your disaster life just clicked into place! 🧩🔥",
    "\"{confession}\" - You didn't have to destroy yourself this thoroughly. I was going to do that for you, but you're clearly an overachiever in self-sabotage! 🏆💀",
    "Thanks for confessing \"{confession}\" - That's not just embarrassing, that's a complete character assassination. You've done my job for me! 📝⚰️",
    "\"{confession}\" - I'm genuinely impressed by your ability to make questionable choices. It's like a superpower, if superpowers were completely useless! 🦸‍♂️💸",
];

const REFUSAL_ROASTS: &[&str] = &[
    "Oh, you want to be difficult? FINE. You've just unlocked NUCLEAR MODE because you're too cheap to pay and too cowardly to confess. Hope your feelings weren't attached to anything important! 💥🔥",
    "Too broke to pay AND too scared to confess? That's peak cowardice right there. Congratulations, you've earned yourself the full nuclear treatment. This is going to hurt. 🚀💀",
    "Wow, refusing both options? That's actually impressive in the worst possible way. You've unlocked the 'Stubborn Disaster' achievement and nuclear-grade roasting. Buckle up, buttercup! ⚡💥",
];

/// Builds a paywall offering both payment and confession.
pub fn generate_paywall_prompt(rng: &dyn RandomSource) -> PaywallPrompt {
    PaywallPrompt {
        kind: PaywallKind::Both,
        message: pick(rng, PAYWALL_MESSAGES),
        confession_prompt: pick(rng, CONFESSION_PROMPTS),
        payment_amount: PAYMENT_AMOUNT.to_string(),
    }
}

/// Classifies a paywall reply into exactly one outcome.
///
/// Precedence: payment (button or keyword) > confession (keyword or long
/// reply) > refusal.
pub fn classify(reply: &str, is_payment_button: bool) -> PaywallOutcome {
    let lower = reply.to_lowercase();

    if is_payment_button || mentions_payment(&lower) {
        PaywallOutcome::Paid
    } else if CONFESSION_KEYWORDS.iter().any(|kw| lower.contains(kw))
        || lower.chars().count() > CONFESSION_MIN_CHARS
    {
        PaywallOutcome::Confessed
    } else {
        PaywallOutcome::Refused
    }
}

/// Classifies a reply and produces the roast and session update for it.
///
/// `has_hit_paywall` is set in every branch.
pub fn classify_and_respond(
    reply: &str,
    is_payment_button: bool,
    rng: &dyn RandomSource,
) -> PaywallResolution {
    let outcome = classify(reply, is_payment_button);

    let (roast, update) = match outcome {
        PaywallOutcome::Paid => (
            pick(rng, PAYMENT_ROASTS),
            SessionUpdate {
                has_hit_paywall: true,
                has_paid: true,
                has_confessed: false,
                tier_floor: Some(RoastTier::Medium),
            },
        ),
        PaywallOutcome::Confessed => (
            pick(rng, CONFESSION_ROASTS).replace("{confession}", reply),
            SessionUpdate {
                has_hit_paywall: true,
                has_paid: false,
                has_confessed: true,
                tier_floor: Some(RoastTier::Medium),
            },
        ),
        PaywallOutcome::Refused => (
            pick(rng, REFUSAL_ROASTS),
            SessionUpdate {
                has_hit_paywall: true,
                has_paid: false,
                has_confessed: false,
                tier_floor: Some(RoastTier::Nuclear),
            },
        ),
    };

    PaywallResolution {
        outcome,
        roast,
        update,
    }
}

/// Status line reminding the user how they got past the paywall.
pub fn post_paywall_message(session: &Session) -> &'static str {
    if session.has_paid {
        "Welcome back, you magnificent disaster! Since you 'paid' for premium service, let's continue destroying your self-esteem! 💸✨"
    } else if session.has_confessed {
        "Thanks again for that embarrassing confession. Now, where were we in dismantling your life choices? 😈"
    } else {
        "Nuclear mode is still active. Hope you're ready for some brutally honest feedback! 💥"
    }
}

fn mentions_payment(lower: &str) -> bool {
    PAYMENT_KEYWORDS.iter().any(|kw| lower.contains(kw))
        || lower.contains(PAYMENT_AMOUNT_DIGITS)
        || lower.chars().any(|c| CURRENCY_SYMBOLS.contains(&c))
}

fn pick(rng: &dyn RandomSource, lines: &[&str]) -> String {
    choose(rng, lines).copied().unwrap_or_default().to_string()
}
