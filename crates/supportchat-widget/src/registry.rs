// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session catalogue for the history browser.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use supportchat_core::{BackendGateway, Session, SessionId, SupportChatError};
use tracing::{debug, info, warn};

use crate::conversation::ConversationStore;

/// A catalogue snapshot tagged with the refresh that produced it.
#[derive(Debug, Default)]
struct Catalogue {
    ticket: u64,
    sessions: Arc<Vec<Session>>,
}

/// The catalogue of backend sessions.
///
/// The catalogue is only ever replaced wholesale by [`SessionRegistry::refresh`];
/// readers hold an immutable snapshot. Clones share the same catalogue.
#[derive(Clone)]
pub struct SessionRegistry {
    gateway: Arc<dyn BackendGateway>,
    catalogue: Arc<ArcSwap<Catalogue>>,
    tickets: Arc<AtomicU64>,
}

impl SessionRegistry {
    /// Creates a registry with an empty catalogue.
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self {
            gateway,
            catalogue: Arc::new(ArcSwap::from_pointee(Catalogue::default())),
            tickets: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current catalogue snapshot, in backend order.
    pub fn sessions(&self) -> Arc<Vec<Session>> {
        self.catalogue.load().sessions.clone()
    }

    pub fn get(&self, id: &SessionId) -> Option<Session> {
        self.catalogue
            .load()
            .sessions
            .iter()
            .find(|s| &s.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.catalogue.load().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogue.load().sessions.is_empty()
    }

    /// Replaces the catalogue with the backend's current session list.
    ///
    /// On failure the previous catalogue stays in place. A listing requested
    /// before one that has already been stored is dropped, so overlapping
    /// refreshes never roll the catalogue back.
    pub async fn refresh(&self) -> Result<(), SupportChatError> {
        let ticket = self.tickets.fetch_add(1, Ordering::Relaxed) + 1;
        let sessions = Arc::new(self.gateway.list_sessions().await?);
        let count = sessions.len();

        let previous = self.catalogue.rcu(|current| {
            if current.ticket < ticket {
                Arc::new(Catalogue {
                    ticket,
                    sessions: sessions.clone(),
                })
            } else {
                current.clone()
            }
        });
        if previous.ticket < ticket {
            debug!(count, ticket, "session catalogue refreshed");
        } else {
            debug!(ticket, newer = previous.ticket, "dropping outdated session listing");
        }
        Ok(())
    }

    /// Deletes a session the user has already confirmed should go.
    ///
    /// If `id` is the conversation's active session, the conversation moves to
    /// a fresh session so a deleted transcript is never left on screen. A
    /// failed delete leaves both the catalogue and the conversation untouched.
    pub async fn remove(
        &self,
        id: &SessionId,
        conversation: &ConversationStore,
    ) -> Result<(), SupportChatError> {
        self.gateway.delete_session(id).await.map_err(|e| {
            warn!(session_id = %id, error = %e, "failed to delete session");
            SupportChatError::DeleteFailed {
                session_id: id.to_string(),
                source: Box::new(e),
            }
        })?;
        info!(session_id = %id, "session deleted");

        if conversation.active_session() == *id {
            conversation.start_new_session();
        }

        // The delete itself succeeded; a stale catalogue is only cosmetic.
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "session list refresh after delete failed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::ConversationOptions;
    use supportchat_test_utils::{session, turn, MockGateway};
    use tracing_test::traced_test;

    fn setup(mock: MockGateway) -> (Arc<MockGateway>, SessionRegistry, ConversationStore) {
        let mock = Arc::new(mock);
        let registry = SessionRegistry::new(mock.clone());
        let store = ConversationStore::new(mock.clone(), ConversationOptions::default());
        (mock, registry, store)
    }

    #[tokio::test]
    async fn refresh_replaces_catalogue_wholesale() {
        let (mock, registry, _) = setup(
            MockGateway::new().with_sessions(vec![session("a", "A"), session("b", "B")]),
        );
        registry.refresh().await.unwrap();
        assert_eq!(registry.len(), 2);

        mock.set_sessions(vec![session("c", "C")]).await;
        registry.refresh().await.unwrap();

        let ids: Vec<_> = registry.sessions().iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec![SessionId::from("c")]);
        assert!(registry.get(&SessionId::from("a")).is_none());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_catalogue() {
        let (mock, registry, _) = setup(MockGateway::new().with_sessions(vec![session("a", "A")]));
        registry.refresh().await.unwrap();

        mock.fail_list_sessions(true).await;
        assert!(registry.refresh().await.unwrap_err().is_network());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn snapshot_is_unaffected_by_later_refresh() {
        let (mock, registry, _) = setup(MockGateway::new().with_sessions(vec![session("a", "A")]));
        registry.refresh().await.unwrap();
        let snapshot = registry.sessions();

        mock.set_sessions(Vec::new()).await;
        registry.refresh().await.unwrap();

        assert_eq!(snapshot.len(), 1);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn outdated_listing_does_not_bring_back_deleted_session() {
        let (mock, registry, store) = setup(MockGateway::new().with_sessions(vec![session("a", "A")]));
        mock.hold_next_list_sessions().await;

        let early = tokio::spawn({
            let registry = registry.clone();
            async move { registry.refresh().await }
        });
        // The early listing has read [a] and is parked.
        mock.wait_for_list_sessions_calls(1).await;

        registry.remove(&SessionId::from("a"), &store).await.unwrap();
        assert!(registry.is_empty());

        mock.release_list_sessions();
        early.await.unwrap().unwrap();

        assert!(registry.is_empty(), "catalogue: {:?}", registry.sessions());
    }

    #[tokio::test]
    async fn send_refresh_overtaken_by_delete_is_dropped() {
        let mock = Arc::new(MockGateway::new().with_sessions(vec![session("a", "A")]));
        mock.hold_next_list_sessions().await;
        let registry = SessionRegistry::new(mock.clone());
        let store = ConversationStore::new(mock.clone(), ConversationOptions::default())
            .with_catalogue_refresh(registry.clone());

        store.send_message("hi").await;
        mock.wait_for_list_sessions_calls(1).await;
        registry.remove(&SessionId::from("a"), &store).await.unwrap();

        mock.release_list_sessions();
        mock.wait_for_list_sessions_returns(2).await;

        assert!(registry.is_empty(), "catalogue: {:?}", registry.sessions());
    }

    #[tokio::test]
    async fn removing_other_session_leaves_conversation_alone() {
        let (mock, registry, store) = setup(
            MockGateway::new().with_sessions(vec![session("a", "A"), session("b", "B")]),
        );
        store.send_message("hello").await;
        let active = store.active_session();

        registry.remove(&SessionId::from("a"), &store).await.unwrap();

        assert_eq!(store.active_session(), active);
        assert_eq!(store.message_count(), 2);
        assert_eq!(registry.sessions().as_slice(), &[session("b", "B")]);
        assert_eq!(mock.delete_calls().await, 1);
    }

    #[tokio::test]
    async fn removing_active_session_starts_fresh_one() {
        let (_, registry, store) = setup(
            MockGateway::new()
                .with_sessions(vec![session("a", "A")])
                .with_transcript("a", vec![turn("hi", "hello"), turn("bye", "ciao")]),
        );
        store.select_session(&SessionId::from("a")).await.unwrap();
        assert_eq!(store.message_count(), 4);

        registry.remove(&SessionId::from("a"), &store).await.unwrap();

        assert_ne!(store.active_session(), SessionId::from("a"));
        assert_eq!(store.message_count(), 0);
        assert_eq!(store.selected_session(), None);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn failed_delete_changes_nothing() {
        let (mock, registry, store) = setup(MockGateway::new().with_sessions(vec![session("a", "A")]));
        registry.refresh().await.unwrap();
        mock.fail_delete_of("a").await;
        let active = store.active_session();

        let err = registry
            .remove(&SessionId::from("a"), &store)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SupportChatError::DeleteFailed { ref session_id, .. } if session_id == "a"
        ));
        assert_eq!(registry.len(), 1);
        assert_eq!(store.active_session(), active);
        // No refresh after a failed delete.
        assert_eq!(mock.list_sessions_calls().await, 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn refresh_failure_after_delete_is_only_logged() {
        let (mock, registry, store) = setup(MockGateway::new().with_sessions(vec![session("a", "A")]));
        mock.fail_list_sessions(true).await;

        registry.remove(&SessionId::from("a"), &store).await.unwrap();

        assert!(logs_contain("session list refresh after delete failed"));
    }
}
