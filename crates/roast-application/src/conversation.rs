//! Conversation controller.
//!
//! Wraps the pure [`Conversation`] state machine with the effects it needs:
//! the roast engine, persistence after every mutation, and the task
//! countdown.

use crate::roast_engine::RoastEngine;
use crate::status::StatusReport;
use chrono::Utc;
use roast_core::conversation::{Conversation, ConversationMode, IgnoreReason, Turn, TurnStep};
use roast_core::paywall::PaywallPrompt;
use roast_core::random::RandomSource;
use roast_core::roast::{WELCOME_MESSAGE, welcome_back_message};
use roast_core::session::{Message, Session, SessionRepository, create_session, is_returning_user};
use roast_core::task::TherapyTask;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Something that happened without a user action.
#[derive(Debug, Clone)]
pub enum ConversationEvent {
    /// The task countdown ran out; `messages` were appended.
    TaskExpired { task_id: String, messages: Vec<Message> },
}

/// What one user action produced, for rendering.
#[derive(Debug, Clone, Default)]
pub struct TurnOutcome {
    /// Messages appended, in order.
    pub messages: Vec<Message>,
    /// Paywall raised by this action.
    pub paywall: Option<PaywallPrompt>,
    /// Task assigned by this action.
    pub task: Option<TherapyTask>,
    /// Set when the action was not acted upon.
    pub ignored: Option<IgnoreReason>,
}

impl TurnOutcome {
    fn ignored(reason: IgnoreReason) -> Self {
        Self {
            ignored: Some(reason),
            ..Self::default()
        }
    }
}

/// How `initialize` found things.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartKind {
    Fresh,
    Restored,
}

struct Inner {
    state: Mutex<Conversation>,
    /// Serializes snapshot+save so an older snapshot never overwrites a newer one.
    persist_lock: Mutex<()>,
    repository: Arc<dyn SessionRepository>,
    engine: RoastEngine,
    rng: Arc<dyn RandomSource>,
    countdown: Duration,
    countdown_token: StdMutex<Option<CancellationToken>>,
    events: Option<mpsc::UnboundedSender<ConversationEvent>>,
}

/// Single-client conversation controller.
///
/// Cheap to clone; clones share state. All user actions are serialized on
/// an internal lock, and the lock is released while the generator runs so
/// that input arriving meanwhile can be rejected as busy.
#[derive(Clone)]
pub struct ConversationController {
    inner: Arc<Inner>,
}

impl ConversationController {
    /// Restores the stored session or starts a fresh one.
    ///
    /// A stored session that fails to load is logged and replaced. Returns
    /// the controller and whether the session was restored.
    pub async fn initialize(
        repository: Arc<dyn SessionRepository>,
        engine: RoastEngine,
        rng: Arc<dyn RandomSource>,
        countdown: Duration,
        events: Option<mpsc::UnboundedSender<ConversationEvent>>,
        username: Option<&str>,
    ) -> (Self, StartKind) {
        let now = Utc::now();
        let restored = Self::load_stored(repository.as_ref()).await;

        let (conversation, kind) = match restored {
            Some((session, messages)) => {
                info!(session_id = %session.id, messages = messages.len(), "Restored session");
                let returning = is_returning_user(&session);
                let mut conversation = Conversation::new(session, messages);
                if returning {
                    let greeting =
                        welcome_back_message(conversation.session(), now, rng.as_ref());
                    conversation.push_ai_line(greeting, now);
                }
                (conversation, StartKind::Restored)
            }
            None => (
                Self::fresh_conversation(&engine, rng.as_ref(), username).await,
                StartKind::Fresh,
            ),
        };

        let controller = Self {
            inner: Arc::new(Inner {
                state: Mutex::new(conversation),
                persist_lock: Mutex::new(()),
                repository,
                engine,
                rng,
                countdown,
                countdown_token: StdMutex::new(None),
                events,
            }),
        };
        controller.persist().await;
        (controller, kind)
    }

    async fn load_stored(repository: &dyn SessionRepository) -> Option<(Session, Vec<Message>)> {
        let session = match repository.load_session().await {
            Ok(Some(session)) => session,
            Ok(None) => return None,
            Err(e) => {
                warn!("Stored session unreadable, starting fresh: {}", e);
                return None;
            }
        };
        match repository.load_messages().await {
            Ok(messages) => Some((session, messages)),
            Err(e) => {
                warn!("Stored messages unreadable, starting fresh: {}", e);
                None
            }
        }
    }

    async fn fresh_conversation(
        engine: &RoastEngine,
        rng: &dyn RandomSource,
        username: Option<&str>,
    ) -> Conversation {
        let now = Utc::now();
        let session = create_session(username, now);
        info!(session_id = %session.id, "Created new session");

        let mut conversation = Conversation::new(session, Vec::new());
        conversation.push_ai_line(WELCOME_MESSAGE, now);
        let question = engine.opening_question(rng).await;
        conversation.push_ai_line(question, Utc::now());
        conversation
    }

    /// Clears storage and starts over with a fresh session.
    pub async fn reset(&self, username: Option<&str>) {
        self.cancel_countdown();
        if let Err(e) = self.inner.repository.clear().await {
            warn!("Failed to clear stored session: {}", e);
        }
        let conversation =
            Self::fresh_conversation(&self.inner.engine, self.inner.rng.as_ref(), username).await;
        *self.inner.state.lock().await = conversation;
        self.persist().await;
    }

    /// Free text from the input box.
    pub async fn submit_user_text(&self, text: &str) -> TurnOutcome {
        let rng = self.inner.rng.as_ref();
        let first = {
            let mut state = self.inner.state.lock().await;
            debug!(mode = state.mode().label(), "Routing user text");
            state.submit_user_text(text, Utc::now(), rng)
        };

        let request = match first.step {
            TurnStep::NeedsRoast(request) => request,
            _ => return self.finish(first).await,
        };
        self.persist().await;

        let response = self.inner.engine.respond(request, rng).await;
        let second = {
            let mut state = self.inner.state.lock().await;
            state.complete_roast(response, Utc::now(), rng)
        };

        let mut outcome = self.finish(second).await;
        let mut messages = first.appended;
        messages.append(&mut outcome.messages);
        outcome.messages = messages;
        outcome
    }

    /// Payment button on the paywall.
    pub async fn submit_payment(&self) -> TurnOutcome {
        let turn = {
            let mut state = self.inner.state.lock().await;
            state.submit_payment(Utc::now(), self.inner.rng.as_ref())
        };
        self.finish(turn).await
    }

    /// Confession form on the paywall.
    pub async fn submit_confession(&self, text: &str) -> TurnOutcome {
        let turn = {
            let mut state = self.inner.state.lock().await;
            state.submit_confession(text, Utc::now(), self.inner.rng.as_ref())
        };
        self.finish(turn).await
    }

    /// Closes the paywall without answering. Returns false if none was open.
    pub async fn dismiss_paywall(&self) -> bool {
        self.inner.state.lock().await.dismiss_paywall()
    }

    /// Answer to the pending task.
    pub async fn submit_task_response(&self, text: &str) -> TurnOutcome {
        let turn = {
            let mut state = self.inner.state.lock().await;
            state.submit_task_response(text, Utc::now())
        };
        self.finish(turn).await
    }

    /// Skip button on the pending task.
    pub async fn skip_task(&self) -> TurnOutcome {
        let turn = {
            let mut state = self.inner.state.lock().await;
            state.skip_task(Utc::now())
        };
        self.finish(turn).await
    }

    pub async fn session(&self) -> Session {
        self.inner.state.lock().await.session().clone()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.inner.state.lock().await.messages().to_vec()
    }

    pub async fn mode(&self) -> ConversationMode {
        self.inner.state.lock().await.mode().clone()
    }

    pub async fn is_processing(&self) -> bool {
        self.inner.state.lock().await.is_processing()
    }

    pub async fn status(&self) -> StatusReport {
        let state = self.inner.state.lock().await;
        StatusReport::from_session(state.session(), Utc::now(), self.inner.rng.as_ref())
    }

    pub fn countdown(&self) -> Duration {
        self.inner.countdown
    }

    /// Persists, arms or disarms the countdown, and converts the turn.
    async fn finish(&self, turn: Turn) -> TurnOutcome {
        let Turn { appended, step } = turn;
        let mut outcome = match step {
            TurnStep::Ignored(reason) => {
                debug!(?reason, "Input ignored");
                return TurnOutcome::ignored(reason);
            }
            TurnStep::Done => TurnOutcome::default(),
            TurnStep::PaywallRaised(prompt) => TurnOutcome {
                paywall: Some(prompt),
                ..TurnOutcome::default()
            },
            TurnStep::TaskAssigned { task, ticket } => {
                info!(task_id = %task.id, "Task assigned");
                self.start_countdown(ticket);
                TurnOutcome {
                    task: Some(task),
                    ..TurnOutcome::default()
                }
            }
            TurnStep::NeedsRoast(_) => {
                warn!("Roast request reached finish; dropping");
                TurnOutcome::default()
            }
        };

        if outcome.task.is_none() && self.inner.state.lock().await.active_task().is_none() {
            self.cancel_countdown();
        }
        self.persist().await;
        outcome.messages = appended;
        outcome
    }

    fn start_countdown(&self, ticket: u64) {
        let token = CancellationToken::new();
        self.replace_countdown(Some(token.clone()));

        let controller = self.clone();
        let countdown = self.inner.countdown;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(countdown) => controller.expire_task(ticket).await,
            }
        });
    }

    fn cancel_countdown(&self) {
        self.replace_countdown(None);
    }

    fn replace_countdown(&self, next: Option<CancellationToken>) {
        let previous = match self.inner.countdown_token.lock() {
            Ok(mut slot) => std::mem::replace(&mut *slot, next),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), next),
        };
        if let Some(token) = previous {
            token.cancel();
        }
    }

    async fn expire_task(&self, ticket: u64) {
        let (turn, task_id) = {
            let mut state = self.inner.state.lock().await;
            let task_id = state.active_task().map(|task| task.id.clone());
            (state.expire_task(ticket, Utc::now()), task_id)
        };
        if !turn.is_mutation() {
            return;
        }

        let task_id = task_id.unwrap_or_default();
        info!(task_id = %task_id, "Task countdown expired");
        self.persist().await;
        if let Some(events) = &self.inner.events {
            let _ = events.send(ConversationEvent::TaskExpired {
                task_id,
                messages: turn.appended,
            });
        }
    }

    /// Writes both records; failures are logged and otherwise ignored.
    async fn persist(&self) {
        let _guard = self.inner.persist_lock.lock().await;
        let (session, messages) = {
            let state = self.inner.state.lock().await;
            (state.session().clone(), state.messages().to_vec())
        };

        if let Err(e) = self.inner.repository.save_session(&session).await {
            warn!("Failed to save session: {}", e);
        }
        if let Err(e) = self.inner.repository.save_messages(&messages).await {
            warn!("Failed to save messages: {}", e);
        }
    }
}
