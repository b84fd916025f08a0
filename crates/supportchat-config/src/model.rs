// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the SupportChat widget.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use supportchat_core::StaleReplyPolicy;

/// Notice shown in place of a bot reply when the chat request fails.
pub const DEFAULT_CONNECTION_ERROR_NOTICE: &str =
    "❌ Connection error. Please ensure the backend server is running.";

/// Top-level SupportChat configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SupportChatConfig {
    /// Support backend connection settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Widget behaviour and optional sub-features.
    #[serde(default)]
    pub widget: WidgetConfig,
}

/// Support backend connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL of the support backend (scheme, host, optional port and path prefix).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Widget behaviour configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WidgetConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable the session history browser.
    #[serde(default = "default_enabled")]
    pub history: bool,

    /// Enable FAQ browsing and search.
    #[serde(default = "default_enabled")]
    pub faq: bool,

    /// Handling of chat replies that land after a session switch.
    #[serde(default)]
    pub stale_replies: StaleReplyPolicy,

    /// Bot message shown when a chat request fails.
    #[serde(default = "default_connection_error_notice")]
    pub connection_error_notice: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            history: default_enabled(),
            faq: default_enabled(),
            stale_replies: StaleReplyPolicy::default(),
            connection_error_notice: default_connection_error_notice(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_connection_error_notice() -> String {
    DEFAULT_CONNECTION_ERROR_NOTICE.to_string()
}
