//! Session repository over a key-value store.

use crate::dto::{MessageDTO, SessionDTO};
use async_trait::async_trait;
use roast_core::error::{Result, RoastError};
use roast_core::session::{Message, Session, SessionRepository};
use roast_core::storage::KeyValueStore;
use std::sync::Arc;
use tokio::task;

pub const SESSION_KEY: &str = "therapist_session";
pub const MESSAGES_KEY: &str = "therapist_messages";

/// Stores the session and the transcript as two JSON blobs.
///
/// # Storage Layout
///
/// ```text
/// therapist_session   -> SessionDTO
/// therapist_messages  -> [MessageDTO, ...]
/// ```
///
/// Store calls run on the blocking pool; the file store locks and fsyncs.
pub struct KvSessionRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvSessionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn with_store<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn KeyValueStore) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| RoastError::io(format!("Failed to spawn blocking task: {}", e)))?
    }
}

#[async_trait]
impl SessionRepository for KvSessionRepository {
    async fn load_session(&self) -> Result<Option<Session>> {
        let Some(raw) = self.with_store(|store| store.get(SESSION_KEY)).await? else {
            return Ok(None);
        };
        let dto: SessionDTO = serde_json::from_str(&raw)?;
        Ok(Some(Session::try_from(dto)?))
    }

    async fn save_session(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string(&SessionDTO::from(session))?;
        self.with_store(move |store| store.set(SESSION_KEY, &json))
            .await
    }

    async fn load_messages(&self) -> Result<Vec<Message>> {
        let Some(raw) = self.with_store(|store| store.get(MESSAGES_KEY)).await? else {
            return Ok(Vec::new());
        };
        let dtos: Vec<MessageDTO> = serde_json::from_str(&raw)?;
        dtos.into_iter().map(Message::try_from).collect()
    }

    async fn save_messages(&self, messages: &[Message]) -> Result<()> {
        let dtos: Vec<MessageDTO> = messages.iter().map(MessageDTO::from).collect();
        let json = serde_json::to_string(&dtos)?;
        self.with_store(move |store| store.set(MESSAGES_KEY, &json))
            .await
    }

    async fn clear(&self) -> Result<()> {
        self.with_store(|store| {
            store.remove(SESSION_KEY)?;
            store.remove(MESSAGES_KEY)
        })
        .await
    }
}
