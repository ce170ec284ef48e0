pub mod conversation;
pub mod roast_engine;
pub mod status;

pub use conversation::{ConversationController, ConversationEvent, StartKind, TurnOutcome};
pub use roast_engine::RoastEngine;
pub use status::StatusReport;
