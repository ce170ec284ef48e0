//! Paywall domain module.
//!
//! A short sub-dialogue offered once the message threshold is reached:
//! fake payment, a confession, or refusal.

mod flow;
mod model;

pub use flow::{
    PAYMENT_AMOUNT, classify, classify_and_respond, generate_paywall_prompt, post_paywall_message,
};
pub use model::{PaywallKind, PaywallOutcome, PaywallPrompt, PaywallResolution};
