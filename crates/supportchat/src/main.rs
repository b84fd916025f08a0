// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SupportChat - a customer-support chat widget for the terminal.
//!
//! This is the binary entry point. It loads configuration, connects the
//! widget to the support backend and either runs the interactive shell or a
//! one-shot command.

mod commands;
mod render;
mod shell;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use supportchat_config::SupportChatConfig;
use supportchat_core::{SessionId, SupportChatError};
use supportchat_gateway::HttpGateway;
use supportchat_widget::{SupportWidget, WidgetOptions};

/// SupportChat - a customer-support chat widget for the terminal.
#[derive(Parser, Debug)]
#[command(name = "supportchat", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Chat interactively (default).
    Shell,
    /// List stored sessions.
    Sessions,
    /// List FAQs, optionally filtered by a search query.
    Faqs {
        /// Case-insensitive substring matched against questions and answers.
        query: Option<String>,
    },
    /// Print the transcript of a stored session.
    Transcript {
        /// Session id.
        id: String,
    },
    /// Delete a stored session.
    Delete {
        /// Session id.
        id: String,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => supportchat_config::load_and_validate_path(path),
        None => supportchat_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            supportchat_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.widget.log_level);

    if let Err(e) = run(cli.command.unwrap_or(Commands::Shell), &config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &SupportChatConfig) -> Result<(), SupportChatError> {
    let gateway = Arc::new(HttpGateway::new(&config.backend)?);
    let options = WidgetOptions::from(&config.widget);

    // One-shot commands work regardless of which sub-features the embedded widget shows.
    let full_widget = || {
        SupportWidget::new(
            gateway.clone(),
            WidgetOptions {
                history: true,
                faq: true,
                ..options.clone()
            },
        )
    };

    let output = match command {
        Commands::Shell => {
            return shell::run_shell(SupportWidget::new(gateway.clone(), options.clone())).await;
        }
        Commands::Sessions => commands::sessions(&full_widget()).await?,
        Commands::Faqs { query } => {
            commands::faqs(&full_widget(), query.as_deref().unwrap_or_default()).await?
        }
        Commands::Transcript { id } => {
            commands::transcript(&full_widget(), &SessionId::from(id)).await?
        }
        Commands::Delete { id, yes } => {
            if !yes {
                eprintln!("refusing to delete session {id} without --yes");
                std::process::exit(2);
            }
            commands::delete(&full_widget(), &SessionId::from(id)).await?
        }
    };
    print!("{output}");
    Ok(())
}

/// Initialize the tracing subscriber. Logs go to stderr so they never mix
/// with chat output.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("supportchat={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
