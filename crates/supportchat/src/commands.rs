// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot subcommands: list, show and delete without entering the shell.

use std::fmt::Write as _;

use supportchat_core::{SessionId, SupportChatError};
use supportchat_widget::SupportWidget;

use crate::render;

/// `supportchat sessions`
pub async fn sessions(widget: &SupportWidget) -> Result<String, SupportChatError> {
    let registry = history(widget)?;
    registry.refresh().await?;

    let mut out = String::new();
    for (i, session) in registry.sessions().iter().enumerate() {
        let _ = writeln!(out, "{}", render::session_line(i, session, None));
    }
    Ok(out)
}

/// `supportchat faqs [query]`
pub async fn faqs(widget: &SupportWidget, query: &str) -> Result<String, SupportChatError> {
    let index = widget
        .faq()
        .ok_or(SupportChatError::FeatureDisabled("FAQ"))?;
    index.load().await?;

    let mut out = String::new();
    for (i, entry) in index.search(query).iter().enumerate() {
        let _ = writeln!(out, "{}", render::faq_lines(i, entry));
    }
    Ok(out)
}

/// `supportchat transcript <id>`
pub async fn transcript(widget: &SupportWidget, id: &SessionId) -> Result<String, SupportChatError> {
    widget.open_session(id).await?;

    let mut out = String::new();
    for message in widget.conversation().messages() {
        let _ = writeln!(out, "{}", render::message_line(&message));
    }
    Ok(out)
}

/// `supportchat delete <id> --yes`
pub async fn delete(widget: &SupportWidget, id: &SessionId) -> Result<String, SupportChatError> {
    widget.delete_session(id).await?;
    Ok(format!("deleted {id}\n"))
}

fn history(widget: &SupportWidget) -> Result<&supportchat_widget::SessionRegistry, SupportChatError> {
    widget
        .history()
        .ok_or(SupportChatError::FeatureDisabled("session history"))
}
