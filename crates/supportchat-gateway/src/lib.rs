// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the SupportChat backend.
//!
//! This crate implements [`BackendGateway`] over the backend's REST contract:
//!
//! | Operation | Request |
//! |---|---|
//! | send message | `POST /chat` |
//! | list sessions | `GET /sessions` |
//! | get transcript | `GET /session/{id}` |
//! | delete session | `DELETE /session/{id}` |
//! | list FAQs | `GET /faqs` |

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use supportchat_config::model::BackendConfig;
use supportchat_core::{
    BackendGateway, ChatReply, FaqEntry, Session, SessionId, SupportChatError, TranscriptTurn,
};
use tracing::{debug, info};

use crate::client::BackendClient;
use crate::types::{ChatRequest, ChatResponseBody};

/// [`BackendGateway`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: BackendClient,
}

impl HttpGateway {
    /// Creates a gateway from the `[backend]` configuration section.
    pub fn new(config: &BackendConfig) -> Result<Self, SupportChatError> {
        let client = BackendClient::new(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(base_url = %client.base_url(), "support backend gateway initialized");
        Ok(Self { client })
    }

    /// Creates a gateway for an explicit base URL with the default timeout.
    pub fn with_base_url(base_url: &str) -> Result<Self, SupportChatError> {
        Self::new(&BackendConfig {
            base_url: base_url.to_string(),
            ..BackendConfig::default()
        })
    }
}

#[async_trait]
impl BackendGateway for HttpGateway {
    fn name(&self) -> &str {
        "http"
    }

    async fn send_chat_message(
        &self,
        session_id: &SessionId,
        text: &str,
    ) -> Result<ChatReply, SupportChatError> {
        let request = ChatRequest {
            session_id: session_id.as_str(),
            message: text,
        };
        let body: ChatResponseBody = self.client.post_json(&["chat"], &request).await?;
        let reply = ChatReply::try_from(body)?;
        debug!(
            session_id = %session_id,
            escalated = reply.is_escalated(),
            "chat reply received"
        );
        Ok(reply)
    }

    async fn list_sessions(&self) -> Result<Vec<Session>, SupportChatError> {
        let sessions: Vec<Session> = self.client.get_json(&["sessions"]).await?;
        debug!(count = sessions.len(), "session catalogue fetched");
        Ok(sessions)
    }

    async fn get_transcript(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<TranscriptTurn>, SupportChatError> {
        let turns: Vec<TranscriptTurn> = self
            .client
            .get_json(&["session", session_id.as_str()])
            .await?;
        debug!(session_id = %session_id, turns = turns.len(), "transcript fetched");
        Ok(turns)
    }

    async fn delete_session(&self, session_id: &SessionId) -> Result<(), SupportChatError> {
        self.client
            .delete(&["session", session_id.as_str()])
            .await?;
        debug!(session_id = %session_id, "session deleted on backend");
        Ok(())
    }

    async fn list_faqs(&self) -> Result<Vec<FaqEntry>, SupportChatError> {
        let faqs: Vec<FaqEntry> = self.client.get_json(&["faqs"]).await?;
        debug!(count = faqs.len(), "faqs fetched");
        Ok(faqs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> HttpGateway {
        HttpGateway::with_base_url(&server.uri()).unwrap()
    }

    #[tokio::test]
    async fn send_chat_message_posts_session_and_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "session_id": "s1",
                "message": "What are your hours?"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"response": "9-5 Mon-Fri"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let reply = gateway(&server)
            .send_chat_message(&SessionId::from("s1"), "What are your hours?")
            .await
            .unwrap();
        assert_eq!(reply, ChatReply::Answer("9-5 Mon-Fri".into()));
    }

    #[tokio::test]
    async fn send_chat_message_maps_escalation() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "escalated": true,
                "message": "Please contact support team."
            })))
            .mount(&server)
            .await;

        let reply = gateway(&server)
            .send_chat_message(&SessionId::from("s1"), "refund my order")
            .await
            .unwrap();
        assert!(reply.is_escalated());
        assert_eq!(reply.text(), "Please contact support team.");
    }

    #[tokio::test]
    async fn non_success_status_is_network_error_without_retry() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(serde_json::json!({
                    "error": "No message provided"
                })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = gateway(&server)
            .send_chat_message(&SessionId::from("s1"), "x")
            .await
            .unwrap_err();
        assert!(err.is_network());
        assert!(err.to_string().contains("400"), "got: {err}");
    }

    #[tokio::test]
    async fn transport_failure_is_network_error() {
        // Nothing listens on the reserved discard port.
        let gateway = HttpGateway::with_base_url("http://127.0.0.1:9").unwrap();
        let err = gateway.list_faqs().await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn list_sessions_preserves_backend_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"session_id": "b", "session_name": "Second", "created_at": "2025-01-01 10:00:00", "updated_at": "2025-01-02 10:00:00"},
                {"session_id": "a", "session_name": "First", "created_at": "2025-01-01 09:00:00", "updated_at": "2025-01-01 09:00:00"}
            ])))
            .mount(&server)
            .await;

        let sessions = gateway(&server).list_sessions().await.unwrap();
        let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(sessions[0].display_name, "Second");
    }

    #[tokio::test]
    async fn get_transcript_reads_turns() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/session/s42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"user": "hi", "bot": "hello"},
                {"user": "refund?", "bot": "30 days"}
            ])))
            .mount(&server)
            .await;

        let turns = gateway(&server)
            .get_transcript(&SessionId::from("s42"))
            .await
            .unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].bot, "30 days");
    }

    #[tokio::test]
    async fn delete_session_accepts_any_success_body() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/session/s42"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .expect(1)
            .mount(&server)
            .await;

        gateway(&server)
            .delete_session(&SessionId::from("s42"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_session_failure_status() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/session/s42"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "success": false, "message": "database is locked"
            })))
            .mount(&server)
            .await;

        let err = gateway(&server)
            .delete_session(&SessionId::from("s42"))
            .await
            .unwrap_err();
        assert!(err.is_network());
        // Error bodies are not parsed.
        assert!(!err.to_string().contains("database is locked"));
    }

    #[tokio::test]
    async fn list_faqs_decodes_entries() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/faqs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"question": "Refunds?", "answer": "30 days"}
            ])))
            .mount(&server)
            .await;

        let faqs = gateway(&server).list_faqs().await.unwrap();
        assert_eq!(faqs, vec![FaqEntry::new("Refunds?", "30 days")]);
    }

    #[tokio::test]
    async fn malformed_success_body_is_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/faqs"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = gateway(&server).list_faqs().await.unwrap_err();
        assert!(err.is_network());
    }
}
