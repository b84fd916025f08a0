// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the gateway and the widget state machine.

use chrono::{DateTime, NaiveDateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Length of a generated session token.
const SESSION_TOKEN_LEN: usize = 13;

const SESSION_TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque identifier for a conversation session.
///
/// Ids are minted on the client when a new conversation starts; the backend
/// learns about a session the first time a message is sent under its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generates a fresh random base-36 token.
    ///
    /// Collisions are negligible but the token carries no cryptographic weight.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let token: String = (0..SESSION_TOKEN_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..SESSION_TOKEN_ALPHABET.len());
                SESSION_TOKEN_ALPHABET[idx] as char
            })
            .collect();
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Catalogue entry for one backend-tracked session.
///
/// Field names follow the backend's `GET /sessions` payload. The display name
/// and timestamps are assigned by the backend and kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "session_id")]
    pub id: SessionId,
    #[serde(rename = "session_name", default)]
    pub display_name: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Session {
    /// Parses `updated_at` as a UTC timestamp.
    ///
    /// Accepts SQL-style `YYYY-MM-DD HH:MM:SS` (what the reference backend
    /// emits) and RFC 3339. Returns `None` for anything else.
    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_backend_timestamp(&self.updated_at)
    }
}

/// Parses a backend timestamp string.
pub fn parse_backend_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Who authored a message in the conversation log.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One entry in the active session's message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    /// Client-side clock reading. Not authoritative across transcript reloads.
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub escalated: bool,
}

impl Message {
    /// A user-authored message stamped with the current time.
    pub fn user(text: impl Into<String>) -> Self {
        Self::at(Sender::User, text, Utc::now())
    }

    /// A bot message carrying a regular answer.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::at(Sender::Bot, text, Utc::now())
    }

    /// A bot message carrying an escalation notice.
    pub fn escalation(text: impl Into<String>) -> Self {
        Self {
            escalated: true,
            ..Self::bot(text)
        }
    }

    /// Builds a non-escalated message with an explicit timestamp.
    pub fn at(sender: Sender, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp,
            escalated: false,
        }
    }

    /// Converts a backend reply into the bot message shown to the user.
    pub fn from_reply(reply: ChatReply) -> Self {
        match reply {
            ChatReply::Answer(text) => Self::bot(text),
            ChatReply::Escalated(text) => Self::escalation(text),
        }
    }
}

/// One stored turn of a session transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub user: String,
    pub bot: String,
}

/// A read-only FAQ reference entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Case-insensitive substring match against question or answer.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.question.to_lowercase().contains(needle) || self.answer.to_lowercase().contains(needle)
    }
}

/// The backend's reply to a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// A normal answer.
    Answer(String),
    /// The backend handed the conversation off; the text is the escalation notice.
    Escalated(String),
}

impl ChatReply {
    pub fn text(&self) -> &str {
        match self {
            ChatReply::Answer(text) | ChatReply::Escalated(text) => text,
        }
    }

    pub fn is_escalated(&self) -> bool {
        matches!(self, ChatReply::Escalated(_))
    }
}

/// What to do with a chat reply that arrives after the user switched sessions.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StaleReplyPolicy {
    /// Drop the reply; the log it belonged to is no longer on screen.
    #[default]
    Discard,
    /// Append the reply to whatever session is active when it lands.
    Append,
}
