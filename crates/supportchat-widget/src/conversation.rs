// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The active conversation: session identity, message log and the send protocol.
//!
//! Sending is a two-phase write. [`ConversationStore::begin_send`] appends the
//! user's message and takes the in-flight lock; [`PendingSend::complete`]
//! performs the network round trip and appends exactly one bot message built
//! from its result. Phase two never removes what phase one wrote.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use supportchat_config::model::{WidgetConfig, DEFAULT_CONNECTION_ERROR_NOTICE};
use supportchat_core::{
    BackendGateway, Message, Sender, SessionId, StaleReplyPolicy, SupportChatError,
};
use tracing::{debug, info, warn};

use crate::registry::SessionRegistry;

/// Behavioural knobs for a [`ConversationStore`].
#[derive(Debug, Clone)]
pub struct ConversationOptions {
    /// Bot text shown when a chat request fails.
    pub connection_error_notice: String,
    /// Handling of replies that land after a session switch.
    pub stale_replies: StaleReplyPolicy,
}

impl Default for ConversationOptions {
    fn default() -> Self {
        Self {
            connection_error_notice: DEFAULT_CONNECTION_ERROR_NOTICE.to_string(),
            stale_replies: StaleReplyPolicy::default(),
        }
    }
}

impl From<&WidgetConfig> for ConversationOptions {
    fn from(config: &WidgetConfig) -> Self {
        Self {
            connection_error_notice: config.connection_error_notice.clone(),
            stale_replies: config.stale_replies,
        }
    }
}

/// How a send attempt resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing happened: blank text, or another send was already in flight.
    Skipped,
    /// The backend answered and the answer was appended.
    Answered,
    /// The backend escalated and the escalation notice was appended.
    Escalated,
    /// The request failed and the connection-error notice was appended.
    Failed,
    /// The log was replaced (new or reopened session) before the reply
    /// arrived, so the reply was dropped.
    Stale,
}

#[derive(Debug)]
struct ConversationState {
    active: SessionId,
    selected: Option<SessionId>,
    messages: Vec<Message>,
    /// Bumped whenever the log is replaced wholesale.
    generation: u64,
    in_flight: bool,
}

/// Handle to the active conversation.
///
/// Clones share the same state. Only this type mutates the active session id
/// and the message log; the lock is never held across an `.await`.
#[derive(Clone)]
pub struct ConversationStore {
    gateway: Arc<dyn BackendGateway>,
    state: Arc<Mutex<ConversationState>>,
    options: Arc<ConversationOptions>,
    catalogue: Option<SessionRegistry>,
}

impl ConversationStore {
    /// Creates a store positioned on a fresh, empty session.
    pub fn new(gateway: Arc<dyn BackendGateway>, options: ConversationOptions) -> Self {
        Self {
            gateway,
            state: Arc::new(Mutex::new(ConversationState {
                active: SessionId::generate(),
                selected: None,
                messages: Vec::new(),
                generation: 0,
                in_flight: false,
            })),
            options: Arc::new(options),
            catalogue: None,
        }
    }

    /// Refresh `registry` in the background after every completed send.
    pub fn with_catalogue_refresh(mut self, registry: SessionRegistry) -> Self {
        self.catalogue = Some(registry);
        self
    }

    fn lock(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn active_session(&self) -> SessionId {
        self.lock().active.clone()
    }

    /// The session most recently opened from history, if the user has not
    /// started a new conversation since.
    pub fn selected_session(&self) -> Option<SessionId> {
        self.lock().selected.clone()
    }

    /// Snapshot of the message log, oldest first.
    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    pub fn message_count(&self) -> usize {
        self.lock().messages.len()
    }

    /// True while a chat request is awaiting its reply.
    pub fn is_sending(&self) -> bool {
        self.lock().in_flight
    }

    /// Switches to a brand-new session with an empty log. No network call.
    pub fn start_new_session(&self) -> SessionId {
        let mut state = self.lock();
        let mut fresh = SessionId::generate();
        while fresh == state.active {
            fresh = SessionId::generate();
        }
        state.active = fresh.clone();
        state.selected = None;
        state.messages.clear();
        state.generation += 1;
        drop(state);

        info!(session_id = %fresh, "started new session");
        fresh
    }

    /// Loads a stored session and makes it active.
    ///
    /// The transcript replaces the log wholesale, one user/bot pair per turn.
    /// On failure the current session and log are left exactly as they were.
    pub async fn select_session(&self, id: &SessionId) -> Result<(), SupportChatError> {
        let turns = self.gateway.get_transcript(id).await.map_err(|e| {
            warn!(session_id = %id, error = %e, "failed to load session transcript");
            SupportChatError::LoadFailed {
                session_id: id.to_string(),
                source: Box::new(e),
            }
        })?;

        // Transcripts carry no send times; every message is stamped with the load time.
        let loaded_at = Utc::now();
        let messages: Vec<Message> = turns
            .into_iter()
            .flat_map(|turn| {
                [
                    Message::at(Sender::User, turn.user, loaded_at),
                    Message::at(Sender::Bot, turn.bot, loaded_at),
                ]
            })
            .collect();

        let mut state = self.lock();
        state.active = id.clone();
        state.selected = Some(id.clone());
        state.messages = messages;
        state.generation += 1;
        info!(session_id = %id, messages = state.messages.len(), "session loaded");
        Ok(())
    }

    /// Sends `text` and waits for the reply to be reconciled into the log.
    ///
    /// Never returns an error: a failed request becomes a bot message.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        match self.begin_send(text) {
            Some(pending) => pending.complete().await,
            None => SendOutcome::Skipped,
        }
    }

    /// Phase one of a send: append the user's message and take the in-flight lock.
    ///
    /// Returns `None` without touching the log when `text` is blank or another
    /// send is in flight.
    pub fn begin_send(&self, text: &str) -> Option<PendingSend> {
        if text.trim().is_empty() {
            debug!("ignoring blank message");
            return None;
        }

        let mut state = self.lock();
        if state.in_flight {
            debug!(session_id = %state.active, "send rejected, another send is in flight");
            return None;
        }
        state.messages.push(Message::user(text));
        state.in_flight = true;

        Some(PendingSend {
            store: self.clone(),
            session_id: state.active.clone(),
            generation: state.generation,
            text: text.to_string(),
            finished: false,
        })
    }

    fn spawn_catalogue_refresh(&self) {
        let Some(registry) = self.catalogue.clone() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("no async runtime, skipping session list refresh");
            return;
        };
        runtime.spawn(async move {
            if let Err(e) = registry.refresh().await {
                warn!(error = %e, "background session list refresh failed");
            }
        });
    }
}

/// A send whose user message is already in the log and whose reply is pending.
///
/// Dropping it without calling [`PendingSend::complete`] releases the
/// in-flight lock without appending a reply.
#[must_use = "the reply is only reconciled by calling `complete`"]
pub struct PendingSend {
    store: ConversationStore,
    session_id: SessionId,
    generation: u64,
    text: String,
    finished: bool,
}

impl PendingSend {
    /// The session the message was sent under.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Phase two: perform the round trip and append the resulting bot message.
    pub async fn complete(mut self) -> SendOutcome {
        let result = self
            .store
            .gateway
            .send_chat_message(&self.session_id, &self.text)
            .await;

        let (reply, mut outcome) = match result {
            Ok(reply) => {
                let outcome = if reply.is_escalated() {
                    SendOutcome::Escalated
                } else {
                    SendOutcome::Answered
                };
                (Message::from_reply(reply), outcome)
            }
            Err(e) => {
                warn!(
                    session_id = %self.session_id,
                    gateway = self.store.gateway.name(),
                    error = %e,
                    "chat request failed"
                );
                (
                    Message::bot(self.store.options.connection_error_notice.clone()),
                    SendOutcome::Failed,
                )
            }
        };

        {
            let mut state = self.store.lock();
            state.in_flight = false;
            // Reopening the same session replaces the log too, so ids alone can't tell.
            let stale = state.generation != self.generation;
            if stale && self.store.options.stale_replies == StaleReplyPolicy::Discard {
                info!(
                    origin = %self.session_id,
                    active = %state.active,
                    "dropping reply for a conversation that has been replaced"
                );
                outcome = SendOutcome::Stale;
            } else {
                state.messages.push(reply);
            }
        }
        self.finished = true;

        self.store.spawn_catalogue_refresh();
        outcome
    }
}

impl Drop for PendingSend {
    fn drop(&mut self) {
        if !self.finished {
            debug!(session_id = %self.session_id, "pending send abandoned, releasing lock");
            self.store.lock().in_flight = false;
        }
    }
}
