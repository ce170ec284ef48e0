use async_trait::async_trait;
use roast_application::{ConversationController, ConversationEvent, RoastEngine, StartKind};
use roast_core::conversation::{ConversationMode, IgnoreReason};
use roast_core::generation::{GenerationError, Generator};
use roast_core::random::{RandomSource, ScriptedRandom};
use roast_core::roast::{WELCOME_MESSAGE, fallback_lines};
use roast_core::session::{RoastTier, Sender, SessionRepository};
use roast_core::task::SKIP_ROAST;
use roast_infrastructure::{InMemoryKeyValueStore, KvSessionRepository};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, mpsc};

/// Replays scripted results; once exhausted every call fails.
struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String, GenerationError>>>,
}

impl ScriptedGenerator {
    fn new(script: Vec<Result<String, GenerationError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
        })
    }

    fn always_failing() -> Arc<Self> {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GenerationError::NotConfigured))
    }
}

/// Blocks every call until released.
struct GatedGenerator {
    started: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl Generator for GatedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok("finally".to_string())
    }
}

struct Harness {
    controller: ConversationController,
    repository: Arc<KvSessionRepository>,
    events: mpsc::UnboundedReceiver<ConversationEvent>,
}

async fn start(
    generator: Arc<dyn Generator>,
    rng: Arc<dyn RandomSource>,
    repository: Arc<KvSessionRepository>,
    username: Option<&str>,
) -> (Harness, StartKind) {
    let (tx, rx) = mpsc::unbounded_channel();
    let engine = RoastEngine::new(generator).unwrap();
    let (controller, kind) = ConversationController::initialize(
        repository.clone(),
        engine,
        rng,
        Duration::from_secs(30),
        Some(tx),
        username,
    )
    .await;
    (
        Harness {
            controller,
            repository,
            events: rx,
        },
        kind,
    )
}

fn memory_repository() -> Arc<KvSessionRepository> {
    Arc::new(KvSessionRepository::new(Arc::new(InMemoryKeyValueStore::new())))
}

#[tokio::test]
async fn test_fresh_start_greets_and_persists() {
    let (h, kind) = start(
        ScriptedGenerator::new(vec![Ok("What fresh disaster brings you here?".to_string())]),
        Arc::new(ScriptedRandom::constant(0.9)),
        memory_repository(),
        None,
    )
    .await;

    assert_eq!(kind, StartKind::Fresh);
    let messages = h.controller.messages().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, WELCOME_MESSAGE);
    assert_eq!(messages[1].content, "What fresh disaster brings you here?");

    let stored = h.repository.load_messages().await.unwrap();
    assert_eq!(stored.len(), 2);
    assert!(h.repository.load_session().await.unwrap().is_some());
}

#[tokio::test]
async fn test_first_message_is_roasted_mild() {
    let (h, _) = start(
        ScriptedGenerator::new(vec![
            Ok("Opening?".to_string()),
            Ok("Your job called. It wants a better employee. Why stay?".to_string()),
        ]),
        Arc::new(ScriptedRandom::constant(0.9)),
        memory_repository(),
        None,
    )
    .await;

    let outcome = h.controller.submit_user_text("I hate my job").await;
    assert!(outcome.ignored.is_none());
    assert_eq!(outcome.messages.len(), 2);
    assert_eq!(outcome.messages[0].sender, Sender::User);
    assert_eq!(outcome.messages[1].roast_tier, Some(RoastTier::Mild));
    assert!(outcome.messages[1].content.starts_with("Your job called"));

    let session = h.controller.session().await;
    assert_eq!(session.message_count, 1);
    assert_eq!(session.main_problem(), Some("I hate my job"));
    assert_eq!(session.current_tier, RoastTier::Mild);

    let stored = h.repository.load_session().await.unwrap().unwrap();
    assert_eq!(stored.message_count, 1);
    assert_eq!(h.repository.load_messages().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_generation_failure_uses_fallback() {
    let (h, _) = start(
        ScriptedGenerator::always_failing(),
        Arc::new(ScriptedRandom::constant(0.9)),
        memory_repository(),
        None,
    )
    .await;

    let outcome = h.controller.submit_user_text("hello?").await;
    let reply = outcome.messages.last().unwrap();
    assert_eq!(reply.roast_tier, Some(RoastTier::Mild));
    assert!(fallback_lines(RoastTier::Mild).contains(&reply.content.as_str()));
}

#[tokio::test]
async fn test_fifth_message_paywall_then_payment() {
    let (h, _) = start(
        ScriptedGenerator::always_failing(),
        Arc::new(ScriptedRandom::constant(0.9)),
        memory_repository(),
        None,
    )
    .await;

    for n in 1..=4 {
        let outcome = h.controller.submit_user_text(&format!("message {n}")).await;
        assert!(outcome.paywall.is_none());
    }
    let outcome = h.controller.submit_user_text("message 5").await;
    assert!(outcome.paywall.is_some());
    assert_eq!(outcome.messages.len(), 1);
    assert!(matches!(
        h.controller.mode().await,
        ConversationMode::PaywallPending { .. }
    ));

    let outcome = h.controller.submit_payment().await;
    assert_eq!(outcome.messages.len(), 1);
    assert!(outcome.messages[0].is_paywall_response);

    let session = h.controller.session().await;
    assert!(session.has_paid);
    assert!(session.has_hit_paywall);
    assert!(session.current_tier >= RoastTier::Medium);
    assert!(h.controller.mode().await.is_normal());

    let stored = h.repository.load_session().await.unwrap().unwrap();
    assert!(stored.has_paid);

    // the paywall never comes back
    let outcome = h.controller.submit_user_text("message 6").await;
    assert!(outcome.paywall.is_none());
    assert_eq!(outcome.messages.last().unwrap().roast_tier, Some(RoastTier::Nuclear));
}

#[tokio::test]
async fn test_paywall_text_reply_is_classified() {
    let (h, _) = start(
        ScriptedGenerator::always_failing(),
        Arc::new(ScriptedRandom::constant(0.9)),
        memory_repository(),
        None,
    )
    .await;
    for n in 1..=5 {
        h.controller.submit_user_text(&format!("message {n}")).await;
    }

    let outcome = h.controller.submit_user_text("nope").await;
    assert_eq!(outcome.messages.len(), 2);
    let session = h.controller.session().await;
    assert_eq!(session.current_tier, RoastTier::Nuclear);
    assert!(!session.has_paid);
    assert!(!session.has_confessed);
    assert_eq!(session.message_count, 5);
}

#[tokio::test]
async fn test_dismissed_paywall_changes_nothing() {
    let (h, _) = start(
        ScriptedGenerator::always_failing(),
        Arc::new(ScriptedRandom::constant(0.9)),
        memory_repository(),
        None,
    )
    .await;
    for n in 1..=5 {
        h.controller.submit_user_text(&format!("message {n}")).await;
    }
    let before = h.controller.session().await;
    assert!(h.controller.dismiss_paywall().await);
    assert_eq!(h.controller.session().await, before);
    assert!(!h.controller.dismiss_paywall().await);
}

#[tokio::test]
async fn test_busy_input_is_rejected() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let generator = Arc::new(GatedGenerator {
        started: started.clone(),
        release: release.clone(),
    });

    // the opening question also goes through the generator
    let repository = memory_repository();
    let opening = {
        let started = started.clone();
        let release = release.clone();
        tokio::spawn(async move {
            started.notified().await;
            release.notify_one();
        })
    };
    let (h, _) = start(
        generator,
        Arc::new(ScriptedRandom::constant(0.9)),
        repository,
        None,
    )
    .await;
    opening.await.unwrap();

    let controller = h.controller.clone();
    let pending = tokio::spawn(async move { controller.submit_user_text("first").await });
    started.notified().await;

    assert!(h.controller.is_processing().await);
    let outcome = h.controller.submit_user_text("second").await;
    assert_eq!(outcome.ignored, Some(IgnoreReason::Busy));

    release.notify_one();
    let first = pending.await.unwrap();
    assert_eq!(first.messages.last().unwrap().content, "finally");
    assert_eq!(h.controller.session().await.message_count, 1);
    assert!(!h.controller.is_processing().await);
}

#[tokio::test(start_paused = true)]
async fn test_task_countdown_expires_once() {
    // 0.0 opens the task gate and picks the first catalog task
    let (mut h, _) = start(
        ScriptedGenerator::always_failing(),
        Arc::new(ScriptedRandom::constant(0.0)),
        memory_repository(),
        None,
    )
    .await;
    for n in 1..=3 {
        let outcome = h.controller.submit_user_text(&format!("message {n}")).await;
        assert!(outcome.task.is_none());
    }
    let outcome = h.controller.submit_user_text("message 4").await;
    let task = outcome.task.expect("task assigned at message 4");

    match h.events.recv().await {
        Some(ConversationEvent::TaskExpired { task_id, messages }) => {
            assert_eq!(task_id, task.id);
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].content, SKIP_ROAST);
        }
        None => panic!("event channel closed"),
    }

    assert!(h.controller.mode().await.is_normal());
    let session = h.controller.session().await;
    assert!(session.completed_tasks.is_empty());

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert!(h.events.try_recv().is_err());
    let skips = h
        .controller
        .messages()
        .await
        .iter()
        .filter(|m| m.content == SKIP_ROAST)
        .count();
    assert_eq!(skips, 1);
}

#[tokio::test(start_paused = true)]
async fn test_text_after_expiry_is_a_normal_message() {
    let (mut h, _) = start(
        ScriptedGenerator::always_failing(),
        Arc::new(ScriptedRandom::constant(0.0)),
        memory_repository(),
        None,
    )
    .await;
    for n in 1..=4 {
        h.controller.submit_user_text(&format!("message {n}")).await;
    }
    // the answer was typed while the task was open but arrives after expiry
    assert!(matches!(
        h.events.recv().await,
        Some(ConversationEvent::TaskExpired { .. })
    ));

    let outcome = h
        .controller
        .submit_user_text("I am worthy of love and respect")
        .await;
    assert!(outcome.ignored.is_none());
    assert_eq!(outcome.messages[0].sender, Sender::User);
    assert!(!outcome.messages[0].is_task);
    // counted as the 5th message, which raises the paywall
    assert!(outcome.paywall.is_some());
    let session = h.controller.session().await;
    assert_eq!(session.message_count, 5);
    assert!(session.completed_tasks.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_answered_task_cancels_countdown() {
    let (mut h, _) = start(
        ScriptedGenerator::always_failing(),
        Arc::new(ScriptedRandom::constant(0.0)),
        memory_repository(),
        None,
    )
    .await;
    for n in 1..=4 {
        h.controller.submit_user_text(&format!("message {n}")).await;
    }
    assert!(matches!(
        h.controller.mode().await,
        ConversationMode::TaskPending { .. }
    ));

    let outcome = h
        .controller
        .submit_user_text("I am worthy of love and respect!")
        .await;
    assert_eq!(outcome.messages.len(), 2);
    assert!(outcome.messages.iter().all(|m| m.is_task));
    assert!(
        h.controller
            .session()
            .await
            .completed_tasks
            .contains("task_affirmation_fail")
    );
    // task answers are not counted
    assert_eq!(h.controller.session().await.message_count, 4);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(h.events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_skip_task() {
    let (h, _) = start(
        ScriptedGenerator::always_failing(),
        Arc::new(ScriptedRandom::constant(0.0)),
        memory_repository(),
        None,
    )
    .await;
    for n in 1..=4 {
        h.controller.submit_user_text(&format!("message {n}")).await;
    }
    let outcome = h.controller.skip_task().await;
    assert_eq!(outcome.messages[0].content, SKIP_ROAST);
    assert!(h.controller.session().await.completed_tasks.is_empty());

    let outcome = h.controller.skip_task().await;
    assert_eq!(outcome.ignored, Some(IgnoreReason::NothingPending));
}

#[tokio::test]
async fn test_restart_restores_and_welcomes_back() {
    let repository = memory_repository();
    {
        let (h, _) = start(
            ScriptedGenerator::always_failing(),
            Arc::new(ScriptedRandom::constant(0.9)),
            repository.clone(),
            Some("Sam"),
        )
        .await;
        h.controller.submit_user_text("I hate my job").await;
    }

    let (h, kind) = start(
        ScriptedGenerator::always_failing(),
        Arc::new(ScriptedRandom::constant(0.0)),
        repository,
        None,
    )
    .await;
    assert_eq!(kind, StartKind::Restored);
    let session = h.controller.session().await;
    assert_eq!(session.message_count, 1);
    assert_eq!(session.name(), Some("Sam"));

    let messages = h.controller.messages().await;
    assert_eq!(messages.len(), 5);
    assert!(messages[4].content.starts_with("Back for more pain, Sam?"));
}

#[tokio::test]
async fn test_anonymous_restore_has_no_welcome_back() {
    let repository = memory_repository();
    {
        let (h, _) = start(
            ScriptedGenerator::always_failing(),
            Arc::new(ScriptedRandom::constant(0.9)),
            repository.clone(),
            None,
        )
        .await;
        h.controller.submit_user_text("hi").await;
    }
    let (h, _) = start(
        ScriptedGenerator::always_failing(),
        Arc::new(ScriptedRandom::constant(0.9)),
        repository,
        None,
    )
    .await;
    assert_eq!(h.controller.messages().await.len(), 4);
}

#[tokio::test]
async fn test_corrupt_store_starts_fresh() {
    use roast_core::storage::KeyValueStore;

    let store = Arc::new(InMemoryKeyValueStore::new());
    store.set("therapist_session", "{ broken").unwrap();
    let repository = Arc::new(KvSessionRepository::new(store));

    let (h, kind) = start(
        ScriptedGenerator::always_failing(),
        Arc::new(ScriptedRandom::constant(0.9)),
        repository,
        None,
    )
    .await;
    assert_eq!(kind, StartKind::Fresh);
    assert_eq!(h.controller.session().await.message_count, 0);
    assert!(h.repository.load_session().await.unwrap().is_some());
}

#[tokio::test]
async fn test_reset_clears_everything() {
    let (h, _) = start(
        ScriptedGenerator::always_failing(),
        Arc::new(ScriptedRandom::constant(0.9)),
        memory_repository(),
        None,
    )
    .await;
    h.controller.submit_user_text("hi").await;
    let old_id = h.controller.session().await.id;

    h.controller.reset(None).await;
    let session = h.controller.session().await;
    assert_ne!(session.id, old_id);
    assert_eq!(session.message_count, 0);
    assert_eq!(h.controller.messages().await.len(), 2);
    assert_eq!(h.repository.load_session().await.unwrap().unwrap().id, session.id);
}
