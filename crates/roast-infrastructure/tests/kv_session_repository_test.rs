use chrono::Utc;
use roast_core::session::{Message, RoastTier, SessionRepository, create_session};
use roast_core::storage::KeyValueStore;
use roast_infrastructure::kv_session_repository::{MESSAGES_KEY, SESSION_KEY};
use roast_infrastructure::{FileKeyValueStore, InMemoryKeyValueStore, KvSessionRepository};
use std::sync::{Arc, Mutex};
use std::thread::ThreadId;
use tempfile::TempDir;

#[tokio::test]
async fn test_empty_store_is_fresh_start() {
    let repo = KvSessionRepository::new(Arc::new(InMemoryKeyValueStore::new()));
    assert!(repo.load_session().await.unwrap().is_none());
    assert!(repo.load_messages().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_file_store_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let now = Utc::now();

    let mut session = create_session(Some("Sam"), now);
    session.message_count = 3;
    session.current_tier = RoastTier::Medium;
    let messages = vec![
        Message::user("I hate my job", now),
        Message::ai("Your job hates you too", now).with_tier(RoastTier::Mild),
        Message::ai("Spell it", now).for_task("task_spell_therapist"),
    ];

    {
        let store = Arc::new(FileKeyValueStore::new(temp_dir.path().to_path_buf()));
        let repo = KvSessionRepository::new(store);
        repo.save_session(&session).await.unwrap();
        repo.save_messages(&messages).await.unwrap();
    }

    let store = Arc::new(FileKeyValueStore::new(temp_dir.path().to_path_buf()));
    let repo = KvSessionRepository::new(store);
    let restored = repo.load_session().await.unwrap().unwrap();
    assert_eq!(restored.id, session.id);
    assert_eq!(restored.message_count, 3);
    assert_eq!(restored.current_tier, RoastTier::Medium);
    assert_eq!(restored.name(), Some("Sam"));

    let restored_messages = repo.load_messages().await.unwrap();
    assert_eq!(restored_messages.len(), 3);
    assert_eq!(restored_messages[0].content, "I hate my job");
    assert_eq!(restored_messages[1].roast_tier, Some(RoastTier::Mild));
    assert_eq!(
        restored_messages[2].task_id.as_deref(),
        Some("task_spell_therapist")
    );
}

#[tokio::test]
async fn test_malformed_session_is_error() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    store.set(SESSION_KEY, "{ not json").unwrap();
    store.set(MESSAGES_KEY, "[{\"id\":1}]").unwrap();

    let repo = KvSessionRepository::new(store);
    assert!(repo.load_session().await.is_err());
    assert!(repo.load_messages().await.is_err());
}

#[tokio::test]
async fn test_clear_removes_both_records() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let repo = KvSessionRepository::new(store.clone());
    let now = Utc::now();
    repo.save_session(&create_session(None, now)).await.unwrap();
    repo.save_messages(&[Message::user("hi", now)]).await.unwrap();

    repo.clear().await.unwrap();
    assert!(store.get(SESSION_KEY).unwrap().is_none());
    assert!(store.get(MESSAGES_KEY).unwrap().is_none());
    // clearing twice is fine
    repo.clear().await.unwrap();
}

/// Wraps an in-memory store and records the thread serving each call.
struct ThreadRecordingStore {
    inner: InMemoryKeyValueStore,
    threads: Mutex<Vec<ThreadId>>,
}

impl ThreadRecordingStore {
    fn record(&self) {
        self.threads.lock().unwrap().push(std::thread::current().id());
    }
}

impl KeyValueStore for ThreadRecordingStore {
    fn get(&self, key: &str) -> roast_core::error::Result<Option<String>> {
        self.record();
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> roast_core::error::Result<()> {
        self.record();
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> roast_core::error::Result<()> {
        self.record();
        self.inner.remove(key)
    }
}

#[tokio::test]
async fn test_store_calls_leave_the_runtime_thread() {
    let store = Arc::new(ThreadRecordingStore {
        inner: InMemoryKeyValueStore::new(),
        threads: Mutex::new(Vec::new()),
    });
    let repo = KvSessionRepository::new(store.clone());
    let now = Utc::now();

    repo.save_session(&create_session(None, now)).await.unwrap();
    repo.save_messages(&[Message::user("hi", now)]).await.unwrap();
    assert!(repo.load_session().await.unwrap().is_some());
    assert_eq!(repo.load_messages().await.unwrap().len(), 1);
    repo.clear().await.unwrap();

    // current_thread runtime: the test body runs on this thread
    let runtime_thread = std::thread::current().id();
    let threads = store.threads.lock().unwrap();
    assert_eq!(threads.len(), 6);
    assert!(threads.iter().all(|id| *id != runtime_thread));
}
