// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::SupportChatConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &SupportChatConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.backend.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "backend.base_url must not be empty".to_string(),
        });
    } else {
        let host = base_url
            .strip_prefix("http://")
            .or_else(|| base_url.strip_prefix("https://"));
        match host {
            None => errors.push(ConfigError::Validation {
                message: format!(
                    "backend.base_url `{base_url}` must start with http:// or https://"
                ),
            }),
            Some(rest) if rest.is_empty() || rest.starts_with('/') => {
                errors.push(ConfigError::Validation {
                    message: format!("backend.base_url `{base_url}` has no host"),
                })
            }
            Some(_) => {}
        }
    }

    if config.backend.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "backend.timeout_secs must be at least 1".to_string(),
        });
    }

    let level = config.widget.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "widget.log_level `{}` is not one of {}",
                config.widget.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.widget.connection_error_notice.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "widget.connection_error_notice must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
