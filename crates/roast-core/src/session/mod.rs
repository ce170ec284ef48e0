//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`, `SessionUpdate`)
//! - `message`: Transcript entries (`Message`, `Sender`)
//! - `tier`: Roast severity (`RoastTier`)
//! - `lifecycle`: Pure state machine rules (creation, counting, paywall
//!   trigger, tier escalation)
//! - `repository`: Repository trait for session persistence

mod lifecycle;
mod message;
mod model;
mod repository;
mod tier;

pub use lifecycle::{
    MEDIUM_AFTER, NUCLEAR_AFTER, PAYWALL_THRESHOLD, create_session, escalate_tier,
    is_returning_user, record_user_message, should_trigger_paywall,
};
pub use message::{Message, Sender};
pub use model::{DEFAULT_USERNAME, INFO_MAIN_PROBLEM, INFO_NAME, Session, SessionUpdate};
pub use repository::SessionRepository;
pub use tier::RoastTier;
