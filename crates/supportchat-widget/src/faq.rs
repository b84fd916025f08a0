// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only FAQ reference list with substring search.

use std::sync::Arc;

use arc_swap::ArcSwap;
use supportchat_core::{BackendGateway, FaqEntry, SupportChatError};
use tracing::debug;

/// FAQ entries fetched from the backend.
///
/// Reloading swaps in a new list; snapshots already handed out keep the
/// entries they were taken with.
pub struct FaqIndex {
    gateway: Arc<dyn BackendGateway>,
    entries: ArcSwap<Vec<FaqEntry>>,
}

impl FaqIndex {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self {
            gateway,
            entries: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Fetches the FAQ list. Returns how many entries were loaded.
    ///
    /// On failure the previously loaded entries stay in place.
    pub async fn load(&self) -> Result<usize, SupportChatError> {
        let entries = self.gateway.list_faqs().await?;
        let count = entries.len();
        self.entries.store(Arc::new(entries));
        debug!(count, "faq index loaded");
        Ok(count)
    }

    /// Snapshot of every entry in original order.
    pub fn entries(&self) -> Arc<Vec<FaqEntry>> {
        self.entries.load_full()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    /// Entries whose question or answer contains `query`, ignoring case.
    ///
    /// Pure filter: original order is kept and an empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<FaqEntry> {
        let needle = query.to_lowercase();
        self.entries
            .load()
            .iter()
            .filter(|entry| entry.matches_lowercase(&needle))
            .cloned()
            .collect()
    }
}
