//! Roast severity tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of AI replies. Ordered: `Mild < Medium < Nuclear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoastTier {
    #[default]
    Mild,
    Medium,
    Nuclear,
}

impl RoastTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoastTier::Mild => "mild",
            RoastTier::Medium => "medium",
            RoastTier::Nuclear => "nuclear",
        }
    }

    /// Short description used in the generation prompt.
    pub fn guidance(&self) -> &'static str {
        match self {
            RoastTier::Mild => "Gentle sarcasm, light teasing, playful criticism",
            RoastTier::Medium => "Sharper wit, more direct criticism, obvious judgment",
            RoastTier::Nuclear => "Brutal honesty, devastating insights, no mercy (but still satirical)",
        }
    }
}

impl fmt::Display for RoastTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
