// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `supportchat shell` command implementation.
//!
//! An interactive REPL that drives one [`SupportWidget`] the way the
//! embedded widget's UI would: plain lines are chat messages, slash
//! commands browse history and FAQs.

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use supportchat_core::{FaqEntry, Message, Session, SessionId, SupportChatError};
use supportchat_widget::{SendOutcome, SupportWidget};
use tracing::debug;

use crate::render;

/// A parsed line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Send(String),
    New,
    History,
    Open(String),
    Delete(String),
    Faq(String),
    Ask(usize),
    Help,
    Quit,
    Invalid(String),
}

impl ShellCommand {
    /// Parses one input line. Returns `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Some(Self::Send(line.to_string()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        let command = match (name, arg) {
            ("new", _) => Self::New,
            ("history", _) => Self::History,
            ("open", "") => Self::Invalid("usage: /open <n|session-id>".into()),
            ("open", arg) => Self::Open(arg.to_string()),
            ("delete", "") => Self::Invalid("usage: /delete <n|session-id>".into()),
            ("delete", arg) => Self::Delete(arg.to_string()),
            ("faq", arg) => Self::Faq(arg.to_string()),
            ("ask", arg) => match arg.parse::<usize>() {
                Ok(n) if n > 0 => Self::Ask(n),
                _ => Self::Invalid("usage: /ask <n> (number from the last /faq list)".into()),
            },
            ("help" | "?", _) => Self::Help,
            ("quit" | "exit", _) => Self::Quit,
            (other, _) => Self::Invalid(format!("unknown command: /{other} (try /help)")),
        };
        Some(command)
    }
}

/// Resolves a `/open` or `/delete` argument: a 1-based row number from the
/// last listing, otherwise a literal session id.
pub fn resolve_session(arg: &str, listed: &[Session]) -> SessionId {
    arg.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| listed.get(i))
        .map(|s| s.id.clone())
        .unwrap_or_else(|| SessionId::from(arg))
}

/// True for an explicit yes to a confirmation prompt.
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

const HELP: &str = "\
  <text>            send a message
  /new              start a new conversation
  /history          list stored sessions
  /open <n|id>      load a stored session
  /delete <n|id>    delete a stored session
  /faq [query]      list or search FAQs
  /ask <n>          send FAQ n from the last list as a question
  /quit             exit";

/// Runs the `supportchat shell` interactive REPL.
pub async fn run_shell(widget: SupportWidget) -> Result<(), SupportChatError> {
    widget.open().await;

    let mut rl = DefaultEditor::new()
        .map_err(|e| SupportChatError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "supportchat shell".bold().green());
    println!(
        "session {}. Type {} for commands, {} to exit.\n",
        widget.conversation().active_session().as_str().dimmed(),
        "/help".yellow(),
        "/quit".yellow()
    );

    let mut shell = Shell {
        widget,
        listed_sessions: Vec::new(),
        listed_faqs: Vec::new(),
    };
    let prompt = format!("{}> ", "support".green());

    loop {
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };
        let Some(command) = ShellCommand::parse(&line) else {
            continue;
        };
        let _ = rl.add_history_entry(line.trim());

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Delete(arg) => {
                let id = resolve_session(&arg, &shell.listed_sessions);
                let answer = rl
                    .readline(&format!("Delete session {id}? This cannot be undone. [y/N] "))
                    .unwrap_or_default();
                if is_confirmation(&answer) {
                    shell.delete(&id).await;
                } else {
                    println!("{}", "kept".dimmed());
                }
            }
            other => shell.handle(other).await,
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

struct Shell {
    widget: SupportWidget,
    listed_sessions: Vec<Session>,
    listed_faqs: Vec<FaqEntry>,
}

impl Shell {
    async fn handle(&mut self, command: ShellCommand) {
        debug!(?command, "shell command");
        match command {
            ShellCommand::Send(text) => {
                let outcome = self.widget.send(&text).await;
                self.print_reply(outcome);
            }
            ShellCommand::New => {
                let id = self.widget.new_session();
                println!("{} {}", "new session".green(), id.as_str().dimmed());
            }
            ShellCommand::History => self.history(),
            ShellCommand::Open(arg) => {
                let id = resolve_session(&arg, &self.listed_sessions);
                match self.widget.open_session(&id).await {
                    Ok(()) => {
                        let messages = self.widget.conversation().messages();
                        if messages.is_empty() {
                            println!("{}", "(empty conversation)".dimmed());
                        }
                        for message in &messages {
                            println!("{}", render::message_line(message));
                        }
                    }
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            ShellCommand::Faq(query) => self.faqs(&query),
            ShellCommand::Ask(n) => {
                let Some(entry) = self.listed_faqs.get(n - 1).cloned() else {
                    eprintln!("{}: no FAQ #{n}, run /faq first", "error".red());
                    return;
                };
                println!("{}", render::message_line(&Message::user(entry.question.clone())));
                let outcome = self.widget.ask_faq(&entry).await;
                self.print_reply(outcome);
            }
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Invalid(message) => eprintln!("{}", message.yellow()),
            ShellCommand::Delete(_) | ShellCommand::Quit => {}
        }
    }

    fn print_reply(&self, outcome: SendOutcome) {
        match outcome {
            SendOutcome::Skipped => {}
            SendOutcome::Stale => println!("{}", "(reply arrived for another session)".dimmed()),
            SendOutcome::Answered | SendOutcome::Escalated | SendOutcome::Failed => {
                if let Some(reply) = self.widget.conversation().messages().last() {
                    println!("{}", render::message_line(reply));
                }
            }
        }
    }

    fn history(&mut self) {
        let Some(registry) = self.widget.history() else {
            eprintln!("{}", "session history is disabled".yellow());
            return;
        };
        let sessions = registry.sessions();
        if sessions.is_empty() {
            println!("{}", "no stored sessions".dimmed());
        }
        let active = self.widget.conversation().active_session();
        for (i, session) in sessions.iter().enumerate() {
            println!("{}", render::session_line(i, session, Some(&active)));
        }
        self.listed_sessions = sessions.to_vec();
    }

    async fn delete(&mut self, id: &SessionId) {
        match self.widget.delete_session(id).await {
            Ok(()) => {
                println!("{} {}", "deleted".green(), id.as_str().dimmed());
                self.listed_sessions.retain(|s| &s.id != id);
            }
            Err(e) => eprintln!("{}: {e}", "error".red()),
        }
    }

    fn faqs(&mut self, query: &str) {
        if self.widget.faq().is_none() {
            eprintln!("{}", "FAQ is disabled".yellow());
            return;
        }
        let entries = self.widget.search_faqs(query);
        if entries.is_empty() {
            println!("{}", "no matching FAQs".dimmed());
        }
        for (i, entry) in entries.iter().enumerate() {
            println!("{}", render::faq_lines(i, entry));
        }
        self.listed_faqs = entries;
    }
}
