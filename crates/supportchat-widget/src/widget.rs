// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One widget instance: the conversation plus its optional sub-features.

use std::sync::Arc;

use supportchat_config::model::WidgetConfig;
use supportchat_core::{BackendGateway, FaqEntry, SessionId, SupportChatError};
use tracing::{info, warn};

use crate::conversation::{ConversationOptions, ConversationStore, SendOutcome};
use crate::faq::FaqIndex;
use crate::registry::SessionRegistry;

/// Which sub-features a widget carries and how its conversation behaves.
#[derive(Debug, Clone)]
pub struct WidgetOptions {
    /// Session history browser.
    pub history: bool,
    /// FAQ browsing and search.
    pub faq: bool,
    pub conversation: ConversationOptions,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            history: true,
            faq: true,
            conversation: ConversationOptions::default(),
        }
    }
}

impl From<&WidgetConfig> for WidgetOptions {
    fn from(config: &WidgetConfig) -> Self {
        Self {
            history: config.history,
            faq: config.faq,
            conversation: ConversationOptions::from(config),
        }
    }
}

/// A support chat widget.
///
/// The conversation is always present. The session history and the FAQ
/// index exist only when enabled; without history, sends do not trigger a
/// catalogue refresh.
pub struct SupportWidget {
    conversation: ConversationStore,
    history: Option<SessionRegistry>,
    faq: Option<FaqIndex>,
}

impl SupportWidget {
    pub fn new(gateway: Arc<dyn BackendGateway>, options: WidgetOptions) -> Self {
        let history = options
            .history
            .then(|| SessionRegistry::new(gateway.clone()));
        let faq = options.faq.then(|| FaqIndex::new(gateway.clone()));

        let mut conversation = ConversationStore::new(gateway, options.conversation);
        if let Some(registry) = &history {
            conversation = conversation.with_catalogue_refresh(registry.clone());
        }

        Self {
            conversation,
            history,
            faq,
        }
    }

    /// Initial loads for the enabled sub-features.
    ///
    /// Failures are logged and leave the widget usable with empty lists.
    pub async fn open(&self) {
        if let Some(registry) = &self.history {
            if let Err(e) = registry.refresh().await {
                warn!(error = %e, "could not load session history");
            }
        }
        if let Some(faq) = &self.faq {
            if let Err(e) = faq.load().await {
                warn!(error = %e, "could not load faqs");
            }
        }
        info!(
            session_id = %self.conversation.active_session(),
            history = self.history.is_some(),
            faq = self.faq.is_some(),
            "support widget opened"
        );
    }

    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    pub fn history(&self) -> Option<&SessionRegistry> {
        self.history.as_ref()
    }

    pub fn faq(&self) -> Option<&FaqIndex> {
        self.faq.as_ref()
    }

    pub async fn send(&self, text: &str) -> SendOutcome {
        self.conversation.send_message(text).await
    }

    pub fn new_session(&self) -> SessionId {
        self.conversation.start_new_session()
    }

    /// Opens a stored session from history.
    pub async fn open_session(&self, id: &SessionId) -> Result<(), SupportChatError> {
        self.require_history()?;
        self.conversation.select_session(id).await
    }

    /// Deletes a session the user has confirmed should go.
    pub async fn delete_session(&self, id: &SessionId) -> Result<(), SupportChatError> {
        self.require_history()?.remove(id, &self.conversation).await
    }

    /// FAQ entries matching `query`; empty when the FAQ feature is off.
    pub fn search_faqs(&self, query: &str) -> Vec<FaqEntry> {
        self.faq
            .as_ref()
            .map(|faq| faq.search(query))
            .unwrap_or_default()
    }

    /// Asks the question of a picked FAQ entry as a regular user message.
    pub async fn ask_faq(&self, entry: &FaqEntry) -> SendOutcome {
        self.conversation.send_message(&entry.question).await
    }

    fn require_history(&self) -> Result<&SessionRegistry, SupportChatError> {
        self.history
            .as_ref()
            .ok_or(SupportChatError::FeatureDisabled("session history"))
    }
}
