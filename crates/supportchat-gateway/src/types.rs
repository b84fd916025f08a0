// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the chat endpoint.
//!
//! Sessions, transcripts and FAQs deserialize straight into the core types;
//! only `POST /chat` needs a dedicated request and response shape.

use serde::{Deserialize, Serialize};
use supportchat_core::{ChatReply, SupportChatError};

/// Body of `POST /chat`.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub session_id: &'a str,
    pub message: &'a str,
}

/// Success body of `POST /chat`: either `{response}` or `{escalated: true, message}`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatResponseBody {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub escalated: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl TryFrom<ChatResponseBody> for ChatReply {
    type Error = SupportChatError;

    fn try_from(body: ChatResponseBody) -> Result<Self, Self::Error> {
        match body {
            ChatResponseBody {
                escalated: true,
                message: Some(message),
                ..
            } => Ok(ChatReply::Escalated(message)),
            ChatResponseBody {
                escalated: true,
                message: None,
                ..
            } => Err(SupportChatError::network(
                "escalated chat reply is missing `message`",
            )),
            ChatResponseBody {
                response: Some(response),
                ..
            } => Ok(ChatReply::Answer(response)),
            ChatResponseBody { response: None, .. } => Err(SupportChatError::network(
                "chat reply is missing `response`",
            )),
        }
    }
}
