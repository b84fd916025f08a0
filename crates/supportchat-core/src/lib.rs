// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the SupportChat widget.
//!
//! This crate provides the domain types, the error taxonomy and the
//! [`BackendGateway`] trait that the HTTP gateway and the widget state
//! machine are written against.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SupportChatError;
pub use traits::BackendGateway;
pub use types::{
    ChatReply, FaqEntry, Message, Sender, Session, SessionId, StaleReplyPolicy, TranscriptTurn,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_session_ids_are_base36_and_distinct() {
        let a = SessionId::generate();
        let b = SessionId::generate();

        assert_eq!(a.as_str().len(), 13);
        assert!(a
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(a, b);
    }

    #[test]
    fn session_deserializes_from_backend_payload() {
        let json = r#"{
            "session_id": "k3j2h1",
            "session_name": "Where is my order?",
            "created_at": "2025-01-02 09:00:00",
            "updated_at": "2025-01-02 09:15:30"
        }"#;
        let session: Session = serde_json::from_str(json).expect("should deserialize");

        assert_eq!(session.id, SessionId::from("k3j2h1"));
        assert_eq!(session.display_name, "Where is my order?");
        assert_eq!(session.created_at.as_deref(), Some("2025-01-02 09:00:00"));

        let updated = session.updated_at_utc().expect("sql timestamp should parse");
        assert_eq!(updated.to_rfc3339(), "2025-01-02T09:15:30+00:00");
    }

    #[test]
    fn backend_timestamp_accepts_rfc3339_and_rejects_garbage() {
        assert!(types::parse_backend_timestamp("2025-01-02T09:15:30Z").is_some());
        assert!(types::parse_backend_timestamp("yesterday").is_none());
    }

    #[test]
    fn sender_displays_lowercase() {
        use std::str::FromStr;

        assert_eq!(Sender::User.to_string(), "user");
        assert_eq!(Sender::from_str("bot").expect("should parse"), Sender::Bot);
        assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), "\"bot\"");
    }

    #[test]
    fn reply_conversion_sets_escalation_flag() {
        let answer = Message::from_reply(ChatReply::Answer("30 days".into()));
        assert_eq!(answer.sender, Sender::Bot);
        assert_eq!(answer.text, "30 days");
        assert!(!answer.escalated);

        let escalated = Message::from_reply(ChatReply::Escalated("A human will help".into()));
        assert!(escalated.escalated);
        assert_eq!(escalated.text, "A human will help");
    }

    #[test]
    fn faq_matching_is_case_insensitive_on_both_fields() {
        let faq = FaqEntry::new("Refunds?", "Within 30 Days");
        assert!(faq.matches_lowercase("refund"));
        assert!(faq.matches_lowercase("30 days"));
        assert!(!faq.matches_lowercase("shipping"));
    }

    #[test]
    fn error_variants_render() {
        let err = SupportChatError::network("API returned 500");
        assert!(err.is_network());
        assert_eq!(err.to_string(), "network error: API returned 500");

        let load = SupportChatError::LoadFailed {
            session_id: "abc".into(),
            source: Box::new(SupportChatError::network("timeout")),
        };
        assert!(load.to_string().contains("abc"));
        assert!(!load.is_network());
    }

    #[test]
    fn gateway_trait_is_object_safe() {
        fn _assert_dyn(_: &dyn BackendGateway) {}
    }
}
