//! Probabilistic task trigger.

use crate::random::RandomSource;

/// Tasks can only fire once the count is strictly above this.
pub const TASK_MIN_MESSAGES: u32 = 3;
/// Per-message increase of the trigger probability.
pub const TASK_PROBABILITY_STEP: f64 = 0.05;
/// Task type reported when the gate fires.
pub const TASK_TYPE_CONFESSION: &str = "confession";

/// Trigger probability for a message count: `min(1, count * 0.05)` above
/// the minimum, zero otherwise.
pub fn task_probability(message_count: u32) -> f64 {
    if message_count <= TASK_MIN_MESSAGES {
        0.0
    } else {
        (f64::from(message_count) * TASK_PROBABILITY_STEP).min(1.0)
    }
}

/// One Bernoulli draw of the task gate.
pub fn should_trigger_task(message_count: u32, rng: &dyn RandomSource) -> bool {
    let p = task_probability(message_count);
    p > 0.0 && rng.chance(p)
}
