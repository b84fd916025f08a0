// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend gateway trait for the remote support service.

use async_trait::async_trait;

use crate::error::SupportChatError;
use crate::types::{ChatReply, FaqEntry, Session, SessionId, TranscriptTurn};

/// Request/response mapping onto the support backend.
///
/// Implementations carry no widget logic. Every failure, whether the
/// transport broke or the backend answered with a non-success status, is
/// reported as [`SupportChatError::Network`]; error bodies are not parsed.
#[async_trait]
pub trait BackendGateway: Send + Sync + 'static {
    /// Returns a short name for this gateway, used in log fields.
    fn name(&self) -> &str;

    /// Sends one user message under `session_id` and returns the backend's reply.
    async fn send_chat_message(
        &self,
        session_id: &SessionId,
        text: &str,
    ) -> Result<ChatReply, SupportChatError>;

    /// Lists every session the backend knows about, in backend order.
    async fn list_sessions(&self) -> Result<Vec<Session>, SupportChatError>;

    /// Fetches the stored turn history for a session.
    async fn get_transcript(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<TranscriptTurn>, SupportChatError>;

    /// Deletes a session and its transcript.
    async fn delete_session(&self, session_id: &SessionId) -> Result<(), SupportChatError>;

    /// Lists the FAQ reference entries.
    async fn list_faqs(&self) -> Result<Vec<FaqEntry>, SupportChatError>;
}
