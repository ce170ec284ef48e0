pub mod config;
pub mod conversation;
pub mod error;
pub mod generation;
pub mod paywall;
pub mod random;
pub mod roast;
pub mod session;
pub mod storage;
pub mod task;

// Re-export common error type
pub use error::RoastError;
