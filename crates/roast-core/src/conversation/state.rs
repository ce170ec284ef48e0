//! The conversation state machine.
//!
//! `Conversation` owns the session, the transcript and the current mode.
//! Every operation is synchronous: `(state, event) -> (state', turn)`.
//! The one step that needs the generator is split in two:
//! [`Conversation::submit_user_text`] hands back a [`RoastRequest`] and sets
//! the processing flag, and [`Conversation::complete_roast`] applies the
//! answer. New input is ignored while the flag is set.

use super::mode::ConversationMode;
use crate::paywall::{self, PaywallPrompt};
use crate::random::RandomSource;
use crate::roast::{RoastRequest, RoastResponse};
use crate::session::{
    INFO_MAIN_PROBLEM, Message, Session, record_user_message, should_trigger_paywall,
};
use crate::task::{self, SKIP_ROAST, TherapyTask};
use chrono::{DateTime, Utc};

/// Why an input was not acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A generation call is in flight.
    Busy,
    /// Blank input.
    EmptyInput,
    /// The operation needs a pending paywall/task/roast that isn't there.
    NothingPending,
}

/// What happens after a turn's messages were appended.
#[derive(Debug, Clone)]
pub enum TurnStep {
    Ignored(IgnoreReason),
    /// Nothing further; mode is whatever the turn left it in.
    Done,
    /// The paywall fired; mode is now `PaywallPending`.
    PaywallRaised(PaywallPrompt),
    /// The caller must produce a roast and pass it to `complete_roast`.
    NeedsRoast(RoastRequest),
    /// A task was assigned; mode is now `TaskPending`.
    TaskAssigned { task: TherapyTask, ticket: u64 },
}

/// Result of one event.
#[derive(Debug, Clone)]
pub struct Turn {
    /// Messages appended to the transcript by this event, in order.
    pub appended: Vec<Message>,
    pub step: TurnStep,
}

impl Turn {
    fn ignored(reason: IgnoreReason) -> Self {
        Self {
            appended: Vec::new(),
            step: TurnStep::Ignored(reason),
        }
    }

    /// True when the event changed state and should be persisted.
    pub fn is_mutation(&self) -> bool {
        !matches!(self.step, TurnStep::Ignored(_))
    }
}

/// Session + transcript + mode for a single client.
#[derive(Debug, Clone)]
pub struct Conversation {
    session: Session,
    messages: Vec<Message>,
    mode: ConversationMode,
    processing: bool,
    next_ticket: u64,
}

impl Conversation {
    pub fn new(session: Session, messages: Vec<Message>) -> Self {
        Self {
            session,
            messages,
            mode: ConversationMode::Normal,
            processing: false,
            next_ticket: 1,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn mode(&self) -> &ConversationMode {
        &self.mode
    }

    /// True while a generation call is outstanding.
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn active_paywall(&self) -> Option<&PaywallPrompt> {
        match &self.mode {
            ConversationMode::PaywallPending { prompt } => Some(prompt),
            _ => None,
        }
    }

    pub fn active_task(&self) -> Option<&TherapyTask> {
        match &self.mode {
            ConversationMode::TaskPending { task, .. } => Some(task),
            _ => None,
        }
    }

    /// Appends an AI line that is not a roast (greetings, opening question).
    pub fn push_ai_line(&mut self, content: impl Into<String>, now: DateTime<Utc>) -> Message {
        let message = Message::ai(content, now);
        self.messages.push(message.clone());
        message
    }

    /// Routes free text according to the current mode.
    pub fn submit_user_text(
        &mut self,
        text: &str,
        now: DateTime<Utc>,
        rng: &dyn RandomSource,
    ) -> Turn {
        if self.processing {
            return Turn::ignored(IgnoreReason::Busy);
        }
        let text = text.trim();
        if text.is_empty() {
            return Turn::ignored(IgnoreReason::EmptyInput);
        }

        match self.mode {
            ConversationMode::PaywallPending { .. } => {
                self.resolve_paywall(Some(text), false, now, rng)
            }
            ConversationMode::TaskPending { .. } => self.resolve_task(text, now),
            ConversationMode::Normal => self.start_roast_turn(text, now, rng),
        }
    }

    /// Applies the selection engine's answer to a `NeedsRoast` turn.
    pub fn complete_roast(
        &mut self,
        response: RoastResponse,
        now: DateTime<Utc>,
        rng: &dyn RandomSource,
    ) -> Turn {
        if !self.processing {
            return Turn::ignored(IgnoreReason::NothingPending);
        }
        self.processing = false;

        let reply = Message::ai(response.content, now).with_tier(response.tier);
        self.messages.push(reply.clone());
        self.session.raise_tier(response.tier);
        self.session.touch(now);

        let step = if response.should_trigger_task && self.mode.is_normal() {
            let task = task::pick_task(rng);
            let ticket = self.next_ticket;
            self.next_ticket += 1;
            self.mode = ConversationMode::TaskPending {
                task: task.clone(),
                ticket,
            };
            TurnStep::TaskAssigned { task, ticket }
        } else {
            TurnStep::Done
        };

        Turn {
            appended: vec![reply],
            step,
        }
    }

    /// Payment button on the pending paywall.
    pub fn submit_payment(&mut self, now: DateTime<Utc>, rng: &dyn RandomSource) -> Turn {
        if self.active_paywall().is_none() {
            return Turn::ignored(IgnoreReason::NothingPending);
        }
        self.resolve_paywall(None, true, now, rng)
    }

    /// Confession form on the pending paywall.
    pub fn submit_confession(
        &mut self,
        text: &str,
        now: DateTime<Utc>,
        rng: &dyn RandomSource,
    ) -> Turn {
        if self.active_paywall().is_none() {
            return Turn::ignored(IgnoreReason::NothingPending);
        }
        self.resolve_paywall(Some(text.trim()), false, now, rng)
    }

    /// Discards the pending paywall without touching the session.
    pub fn dismiss_paywall(&mut self) -> bool {
        if self.active_paywall().is_some() {
            self.mode = ConversationMode::Normal;
            true
        } else {
            false
        }
    }

    /// Answer to the pending task.
    pub fn submit_task_response(&mut self, text: &str, now: DateTime<Utc>) -> Turn {
        if self.active_task().is_none() {
            return Turn::ignored(IgnoreReason::NothingPending);
        }
        self.resolve_task(text.trim(), now)
    }

    /// Explicit skip of the pending task.
    pub fn skip_task(&mut self, now: DateTime<Utc>) -> Turn {
        if self.active_task().is_none() {
            return Turn::ignored(IgnoreReason::NothingPending);
        }
        self.skip_pending_task(now)
    }

    /// Countdown expiry for the assignment identified by `ticket`.
    ///
    /// Does nothing if that assignment was already answered, skipped or
    /// replaced, so a late or repeated expiry never fires twice.
    pub fn expire_task(&mut self, ticket: u64, now: DateTime<Utc>) -> Turn {
        let is_current = matches!(
            self.mode,
            ConversationMode::TaskPending { ticket: pending, .. } if pending == ticket
        );
        if is_current {
            self.skip_pending_task(now)
        } else {
            Turn::ignored(IgnoreReason::NothingPending)
        }
    }

    fn start_roast_turn(&mut self, text: &str, now: DateTime<Utc>, rng: &dyn RandomSource) -> Turn {
        let user_message = Message::user(text, now);
        self.messages.push(user_message.clone());
        self.session = record_user_message(&self.session, now);

        if self.session.message_count == 1 {
            self.session
                .personal_info
                .insert(INFO_MAIN_PROBLEM.to_string(), text.to_string());
        }

        if should_trigger_paywall(self.session.message_count, self.session.has_hit_paywall) {
            let prompt = paywall::generate_paywall_prompt(rng);
            self.session.has_hit_paywall = true;
            self.mode = ConversationMode::PaywallPending {
                prompt: prompt.clone(),
            };
            return Turn {
                appended: vec![user_message],
                step: TurnStep::PaywallRaised(prompt),
            };
        }

        self.processing = true;
        let request = RoastRequest {
            user_message: text.to_string(),
            session: self.session.clone(),
            history: self.messages.clone(),
        };
        Turn {
            appended: vec![user_message],
            step: TurnStep::NeedsRoast(request),
        }
    }

    fn resolve_paywall(
        &mut self,
        reply: Option<&str>,
        is_payment_button: bool,
        now: DateTime<Utc>,
        rng: &dyn RandomSource,
    ) -> Turn {
        let mut appended = Vec::new();
        if let Some(text) = reply.filter(|text| !text.is_empty()) {
            let echo = Message::user(text, now);
            self.messages.push(echo.clone());
            appended.push(echo);
        }

        let resolution = paywall::classify_and_respond(reply.unwrap_or(""), is_payment_button, rng);
        self.session.apply(&resolution.update);
        self.session.touch(now);

        let roast = Message::ai(resolution.roast, now)
            .with_tier(self.session.current_tier)
            .as_paywall_response();
        self.messages.push(roast.clone());
        appended.push(roast);

        self.mode = ConversationMode::Normal;
        Turn {
            appended,
            step: TurnStep::Done,
        }
    }

    fn resolve_task(&mut self, text: &str, now: DateTime<Utc>) -> Turn {
        let task = match &self.mode {
            ConversationMode::TaskPending { task, .. } => task.clone(),
            _ => return Turn::ignored(IgnoreReason::NothingPending),
        };

        let resolution = task::resolve(&task, text);
        if resolution.completed {
            self.session.mark_task_completed(&task.id);
        }
        self.session.touch(now);

        let echo = Message::user(text, now).for_task(&task.id);
        let roast = Message::ai(resolution.roast, now).for_task(&task.id);
        self.messages.push(echo.clone());
        self.messages.push(roast.clone());

        self.mode = ConversationMode::Normal;
        Turn {
            appended: vec![echo, roast],
            step: TurnStep::Done,
        }
    }

    fn skip_pending_task(&mut self, now: DateTime<Utc>) -> Turn {
        let task_id = match &self.mode {
            ConversationMode::TaskPending { task, .. } => task.id.clone(),
            _ => return Turn::ignored(IgnoreReason::NothingPending),
        };

        let roast = Message::ai(SKIP_ROAST, now).for_task(task_id);
        self.messages.push(roast.clone());
        self.mode = ConversationMode::Normal;
        Turn {
            appended: vec![roast],
            step: TurnStep::Done,
        }
    }
}
