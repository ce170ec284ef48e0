//! Session repository trait.
//!
//! Defines the interface for mirroring the session and its transcript to
//! storage. The repository never owns the data; the controller does.

use super::message::Message;
use super::model::Session;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for session persistence.
///
/// # Implementation Notes
///
/// - A missing record is `Ok(None)` / `Ok(vec![])`, not an error.
/// - Corrupt records are reported as `Err`; callers decide whether that
///   means "start fresh".
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Loads the stored session.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: Session found
    /// - `Ok(None)`: No stored session
    /// - `Err(_)`: Storage or decode failure
    async fn load_session(&self) -> Result<Option<Session>>;

    /// Overwrites the stored session.
    async fn save_session(&self, session: &Session) -> Result<()>;

    /// Loads the stored transcript in rendering order.
    async fn load_messages(&self) -> Result<Vec<Message>>;

    /// Overwrites the stored transcript.
    async fn save_messages(&self, messages: &[Message]) -> Result<()>;

    /// Removes both records.
    async fn clear(&self) -> Result<()>;
}
