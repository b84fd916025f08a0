// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./supportchat.toml` > `~/.config/supportchat/supportchat.toml`
//! > `/etc/supportchat/supportchat.toml` with environment variable overrides via
//! the `SUPPORTCHAT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SupportChatConfig;

/// File name looked up in every layer of the hierarchy.
pub const CONFIG_FILE_NAME: &str = "supportchat.toml";

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/supportchat/supportchat.toml";

/// Returns the per-user configuration file path, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("supportchat").join(CONFIG_FILE_NAME))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/supportchat/supportchat.toml` (system-wide)
/// 3. `~/.config/supportchat/supportchat.toml` (user XDG config)
/// 4. `./supportchat.toml` (local directory)
/// 5. `SUPPORTCHAT_*` environment variables
pub fn load_config() -> Result<SupportChatConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<SupportChatConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SupportChatConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SupportChatConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SupportChatConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SupportChatConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `SUPPORTCHAT_BACKEND_BASE_URL` must map to `backend.base_url`,
/// not `backend.base.url`.
fn env_provider() -> Env {
    Env::prefixed("SUPPORTCHAT_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("backend_", "backend.", 1)
            .replacen("widget_", "widget.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_map_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SUPPORTCHAT_BACKEND_BASE_URL", "https://support.example.com");
            jail.set_env("SUPPORTCHAT_WIDGET_CONNECTION_ERROR_NOTICE", "offline");
            jail.create_file(CONFIG_FILE_NAME, "[backend]\ntimeout_secs = 5\n")?;

            let config = load_config_from_path(Path::new(CONFIG_FILE_NAME))?;
            assert_eq!(config.backend.base_url, "https://support.example.com");
            assert_eq!(config.backend.timeout_secs, 5);
            assert_eq!(config.widget.connection_error_notice, "offline");
            Ok(())
        });
    }

    #[test]
    fn local_file_is_picked_up_by_hierarchy() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE_NAME, "[widget]\nhistory = false\n")?;

            let config = load_config()?;
            assert!(!config.widget.history);
            Ok(())
        });
    }
}
