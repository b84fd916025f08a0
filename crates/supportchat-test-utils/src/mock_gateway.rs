// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock backend gateway with scripted replies and an in-flight gate.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use supportchat_core::{
    BackendGateway, ChatReply, FaqEntry, Session, SessionId, SupportChatError, TranscriptTurn,
};
use tokio::sync::{Mutex, Notify, Semaphore};

/// Builds a catalogue entry with a fixed timestamp.
pub fn session(id: &str, name: &str) -> Session {
    Session {
        id: SessionId::from(id),
        display_name: name.to_string(),
        updated_at: "2025-01-01 12:00:00".to_string(),
        created_at: None,
    }
}

/// Builds one transcript turn.
pub fn turn(user: &str, bot: &str) -> TranscriptTurn {
    TranscriptTurn {
        user: user.to_string(),
        bot: bot.to_string(),
    }
}

#[derive(Default)]
struct MockState {
    chat_replies: VecDeque<Result<ChatReply, String>>,
    chat_requests: Vec<(SessionId, String)>,
    sessions: Vec<Session>,
    transcripts: HashMap<SessionId, Vec<TranscriptTurn>>,
    faqs: Vec<FaqEntry>,
    failing_deletes: HashSet<SessionId>,
    fail_list_sessions: bool,
    fail_faqs: bool,
    park_next_list_sessions: bool,
    list_sessions_calls: usize,
    list_sessions_returns: usize,
    transcript_calls: usize,
    delete_calls: usize,
    faq_calls: usize,
}

/// A scripted [`BackendGateway`].
///
/// Chat replies pop from a FIFO queue; when it is empty the reply is
/// `Answer("mock response")`. With [`MockGateway::hold_chat_replies`] every
/// chat request parks until the test calls [`MockGateway::release_chat_reply`],
/// which keeps a send observably in flight. A single session listing can be
/// parked the same way with [`MockGateway::hold_next_list_sessions`].
pub struct MockGateway {
    state: Mutex<MockState>,
    chat_gate: Option<Arc<Semaphore>>,
    chat_arrived: Notify,
    list_gate: Semaphore,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            chat_gate: None,
            chat_arrived: Notify::new(),
            list_gate: Semaphore::new(0),
        }
    }

    /// Park every chat request until released.
    pub fn hold_chat_replies(mut self) -> Self {
        self.chat_gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn with_sessions(mut self, sessions: Vec<Session>) -> Self {
        self.state.get_mut().sessions = sessions;
        self
    }

    pub fn with_transcript(mut self, id: &str, turns: Vec<TranscriptTurn>) -> Self {
        self.state
            .get_mut()
            .transcripts
            .insert(SessionId::from(id), turns);
        self
    }

    pub fn with_faqs(mut self, faqs: Vec<FaqEntry>) -> Self {
        self.state.get_mut().faqs = faqs;
        self
    }

    /// Queue a normal answer.
    pub async fn push_answer(&self, text: &str) {
        self.state
            .lock()
            .await
            .chat_replies
            .push_back(Ok(ChatReply::Answer(text.to_string())));
    }

    /// Queue an escalation.
    pub async fn push_escalation(&self, text: &str) {
        self.state
            .lock()
            .await
            .chat_replies
            .push_back(Ok(ChatReply::Escalated(text.to_string())));
    }

    /// Queue a transport failure for the next chat request.
    pub async fn push_chat_failure(&self, message: &str) {
        self.state
            .lock()
            .await
            .chat_replies
            .push_back(Err(message.to_string()));
    }

    pub async fn set_sessions(&self, sessions: Vec<Session>) {
        self.state.lock().await.sessions = sessions;
    }

    pub async fn set_faqs(&self, faqs: Vec<FaqEntry>) {
        self.state.lock().await.faqs = faqs;
    }

    pub async fn fail_list_sessions(&self, fail: bool) {
        self.state.lock().await.fail_list_sessions = fail;
    }

    /// Park the next session listing, after it has read the catalogue,
    /// until [`MockGateway::release_list_sessions`].
    pub async fn hold_next_list_sessions(&self) {
        self.state.lock().await.park_next_list_sessions = true;
    }

    pub fn release_list_sessions(&self) {
        self.list_gate.add_permits(1);
    }

    pub async fn fail_faqs(&self, fail: bool) {
        self.state.lock().await.fail_faqs = fail;
    }

    pub async fn fail_delete_of(&self, id: &str) {
        self.state
            .lock()
            .await
            .failing_deletes
            .insert(SessionId::from(id));
    }

    /// Let one parked chat request proceed.
    pub fn release_chat_reply(&self) {
        if let Some(gate) = &self.chat_gate {
            gate.add_permits(1);
        }
    }

    /// Every chat request received so far, as `(session_id, text)`.
    pub async fn chat_requests(&self) -> Vec<(SessionId, String)> {
        self.state.lock().await.chat_requests.clone()
    }

    pub async fn list_sessions_calls(&self) -> usize {
        self.state.lock().await.list_sessions_calls
    }

    /// Session listings that have returned to the caller.
    pub async fn list_sessions_returns(&self) -> usize {
        self.state.lock().await.list_sessions_returns
    }

    pub async fn transcript_calls(&self) -> usize {
        self.state.lock().await.transcript_calls
    }

    pub async fn delete_calls(&self) -> usize {
        self.state.lock().await.delete_calls
    }

    pub async fn faq_calls(&self) -> usize {
        self.state.lock().await.faq_calls
    }

    /// Waits until at least `n` chat requests have arrived.
    ///
    /// Panics after five seconds so a broken test fails instead of hanging.
    pub async fn wait_for_chat_requests(&self, n: usize) {
        let wait = async {
            loop {
                let arrived = self.chat_arrived.notified();
                if self.state.lock().await.chat_requests.len() >= n {
                    return;
                }
                arrived.await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("timed out waiting for chat requests");
    }

    /// Waits until at least `n` catalogue fetches have happened.
    pub async fn wait_for_list_sessions_calls(&self, n: usize) {
        let wait = async {
            while self.list_sessions_calls().await < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("timed out waiting for session list refresh");
    }

    /// Waits until at least `n` session listings have returned.
    pub async fn wait_for_list_sessions_returns(&self, n: usize) {
        let wait = async {
            while self.list_sessions_returns().await < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("timed out waiting for session listings to return");
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendGateway for MockGateway {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send_chat_message(
        &self,
        session_id: &SessionId,
        text: &str,
    ) -> Result<ChatReply, SupportChatError> {
        let reply = {
            let mut state = self.state.lock().await;
            state
                .chat_requests
                .push((session_id.clone(), text.to_string()));
            state
                .chat_replies
                .pop_front()
                .unwrap_or_else(|| Ok(ChatReply::Answer("mock response".to_string())))
        };
        self.chat_arrived.notify_waiters();

        if let Some(gate) = &self.chat_gate {
            gate.acquire()
                .await
                .map_err(|e| SupportChatError::Internal(e.to_string()))?
                .forget();
        }

        reply.map_err(SupportChatError::network)
    }

    async fn list_sessions(&self) -> Result<Vec<Session>, SupportChatError> {
        let (listing, park) = {
            let mut state = self.state.lock().await;
            state.list_sessions_calls += 1;
            let listing = if state.fail_list_sessions {
                Err(SupportChatError::network("GET /sessions returned 503"))
            } else {
                Ok(state.sessions.clone())
            };
            (listing, std::mem::take(&mut state.park_next_list_sessions))
        };

        if park {
            self.list_gate
                .acquire()
                .await
                .map_err(|e| SupportChatError::Internal(e.to_string()))?
                .forget();
        }

        self.state.lock().await.list_sessions_returns += 1;
        listing
    }

    async fn get_transcript(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<TranscriptTurn>, SupportChatError> {
        let mut state = self.state.lock().await;
        state.transcript_calls += 1;
        state
            .transcripts
            .get(session_id)
            .cloned()
            .ok_or_else(|| {
                SupportChatError::network(format!("GET /session/{session_id} returned 404"))
            })
    }

    async fn delete_session(&self, session_id: &SessionId) -> Result<(), SupportChatError> {
        let mut state = self.state.lock().await;
        state.delete_calls += 1;
        if state.failing_deletes.contains(session_id) {
            return Err(SupportChatError::network(format!(
                "DELETE /session/{session_id} returned 500"
            )));
        }
        state.sessions.retain(|s| &s.id != session_id);
        state.transcripts.remove(session_id);
        Ok(())
    }

    async fn list_faqs(&self) -> Result<Vec<FaqEntry>, SupportChatError> {
        let mut state = self.state.lock().await;
        state.faq_calls += 1;
        if state.fail_faqs {
            return Err(SupportChatError::network("GET /faqs returned 500"));
        }
        Ok(state.faqs.clone())
    }
}
