//! Paywall domain types.

use crate::session::SessionUpdate;
use serde::{Deserialize, Serialize};

/// Which unlock options a paywall offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaywallKind {
    Payment,
    Confession,
    Both,
}

/// The active paywall. At most one exists at a time; it is discarded once
/// resolved or dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaywallPrompt {
    pub kind: PaywallKind,
    pub message: String,
    pub confession_prompt: String,
    pub payment_amount: String,
}

/// How the user answered the paywall. Exactly one per resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaywallOutcome {
    Paid,
    Confessed,
    Refused,
}

/// Result of classifying a paywall reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaywallResolution {
    pub outcome: PaywallOutcome,
    pub roast: String,
    pub update: SessionUpdate,
}
