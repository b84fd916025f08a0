// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the SupportChat widget.

use thiserror::Error;

/// Boxed error source carried by the failure variants.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// The error type shared by the gateway, the conversation store and the
/// session registry.
///
/// A failed chat send is deliberately absent here: it is reported as a
/// synthetic bot message in the conversation log, never as an `Err`.
#[derive(Debug, Error)]
pub enum SupportChatError {
    /// Transport failure or non-success HTTP status on any gateway call.
    #[error("network error: {message}")]
    Network {
        message: String,
        source: Option<BoxedSource>,
    },

    /// A session transcript could not be loaded. The active conversation is unchanged.
    #[error("failed to load session {session_id}: {source}")]
    LoadFailed {
        session_id: String,
        source: BoxedSource,
    },

    /// A session could not be deleted. The catalogue is unchanged.
    #[error("failed to delete session {session_id}: {source}")]
    DeleteFailed {
        session_id: String,
        source: BoxedSource,
    },

    /// Invalid client configuration (bad base URL, unusable HTTP client settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// The operation belongs to an optional widget feature that is switched off.
    #[error("{0} is disabled for this widget")]
    FeatureDisabled(&'static str),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SupportChatError {
    /// Builds a [`SupportChatError::Network`] without an underlying source.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true for errors raised by the transport layer.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}
