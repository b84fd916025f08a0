// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering for messages, sessions and FAQ entries.

use colored::Colorize;
use supportchat_core::{FaqEntry, Message, Sender, Session, SessionId};

/// One chat bubble as a single line.
pub fn message_line(message: &Message) -> String {
    let time = message.timestamp.format("%H:%M").to_string().dimmed();
    match message.sender {
        Sender::User => format!("{time} {} {}", "you>".cyan().bold(), message.text),
        Sender::Bot if message.escalated => format!(
            "{time} {} {} {}",
            "bot>".green().bold(),
            "[escalated]".yellow().bold(),
            message.text.yellow()
        ),
        Sender::Bot => format!("{time} {} {}", "bot>".green().bold(), message.text),
    }
}

/// A numbered catalogue row; the active session is starred.
pub fn session_line(index: usize, session: &Session, active: Option<&SessionId>) -> String {
    let marker = if active == Some(&session.id) { "*" } else { " " };
    let name = if session.display_name.trim().is_empty() {
        "(untitled)".italic().to_string()
    } else {
        session.display_name.clone()
    };
    let updated = session
        .updated_at_utc()
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| session.updated_at.clone());
    format!(
        "{marker}{:>3}. {name}  {}  {}",
        index + 1,
        session.id.as_str().dimmed(),
        updated.dimmed()
    )
}

/// A numbered FAQ row with its answer indented underneath.
pub fn faq_lines(index: usize, entry: &FaqEntry) -> String {
    format!(
        "{:>3}. {}\n     {}",
        index + 1,
        entry.question.bold(),
        entry.answer
    )
}
