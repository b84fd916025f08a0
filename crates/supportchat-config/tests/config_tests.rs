// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the SupportChat configuration system.

use supportchat_config::diagnostic::ConfigError;
use supportchat_config::model::SupportChatConfig;
use supportchat_config::{load_and_validate_str, load_config_from_str};
use supportchat_core::StaleReplyPolicy;

#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[backend]
base_url = "https://support.example.com/api"
timeout_secs = 10

[widget]
log_level = "debug"
history = false
faq = true
stale_replies = "append"
connection_error_notice = "Backend unreachable."
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.backend.base_url, "https://support.example.com/api");
    assert_eq!(config.backend.timeout_secs, 10);
    assert_eq!(config.widget.log_level, "debug");
    assert!(!config.widget.history);
    assert!(config.widget.faq);
    assert_eq!(config.widget.stale_replies, StaleReplyPolicy::Append);
    assert_eq!(config.widget.connection_error_notice, "Backend unreachable.");
}

#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("empty config is valid");
    let defaults = SupportChatConfig::default();
    assert_eq!(config.backend.base_url, defaults.backend.base_url);
    assert_eq!(config.widget.stale_replies, defaults.widget.stale_replies);
}

#[test]
fn unknown_key_produces_suggestion() {
    let toml = r#"
[backend]
base_ur = "http://localhost:5000"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown key");
    let suggestion = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } if key == "base_ur" => suggestion.clone(),
        _ => None,
    });
    assert_eq!(suggestion.as_deref(), Some("base_url"));
}

#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telemetry]
enabled = true
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown section");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::UnknownKey { key, .. } if key == "telemetry")));
}

#[test]
fn wrong_type_produces_invalid_type_error() {
    let toml = r#"
[backend]
timeout_secs = "thirty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject wrong type");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::InvalidType { .. })));
}

#[test]
fn semantic_errors_surface_through_load_and_validate() {
    let toml = r#"
[backend]
base_url = "ftp://support.example.com"
"#;

    let errors = load_and_validate_str(toml).expect_err("ftp is not a valid scheme");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("base_url"))));
}
