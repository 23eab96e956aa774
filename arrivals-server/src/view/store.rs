//! Live board views, keyed by session id.
//!
//! Views are kept in memory only and dropped after sitting idle; a browser
//! that comes back later simply opens a fresh view.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::mbta::TransitApi;

use super::session::{SessionId, ViewSession};

/// Configuration for the session store.
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    /// Views untouched for this long are dropped.
    pub idle_timeout: Duration,

    /// Maximum number of live views.
    pub max_capacity: u64,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(30 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Store of live board views.
#[derive(Clone)]
pub struct SessionStore {
    sessions: MokaCache<SessionId, Arc<ViewSession>>,
    api: Arc<dyn TransitApi>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn TransitApi>, config: &SessionStoreConfig) -> Self {
        let sessions = MokaCache::builder()
            .time_to_idle(config.idle_timeout)
            .max_capacity(config.max_capacity)
            .build();

        Self { sessions, api }
    }

    /// Open a new, not yet activated view.
    pub async fn create(&self) -> Arc<ViewSession> {
        let session = ViewSession::new(SessionId::new(), Arc::clone(&self.api));
        self.sessions.insert(session.id(), Arc::clone(&session)).await;
        session
    }

    /// Find a live view.
    pub async fn get(&self, id: &SessionId) -> Option<Arc<ViewSession>> {
        self.sessions.get(id).await
    }

    /// Number of live views (approximate, for logging).
    pub fn len(&self) -> u64 {
        self.sessions.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mbta::MockTransitApi;

    fn store() -> SessionStore {
        SessionStore::new(
            Arc::new(MockTransitApi::new(vec![])),
            &SessionStoreConfig::default(),
        )
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = store();
        let session = store.create().await;

        let found = store.get(&session.id()).await.unwrap();
        assert_eq!(found.id(), session.id());
    }

    #[tokio::test]
    async fn unknown_session_is_none() {
        let store = store();
        assert!(store.get(&SessionId::new()).await.is_none());
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let store = store();
        let a = store.create().await;
        let b = store.create().await;
        assert_ne!(a.id(), b.id());

        let sstat = crate::domain::StationId::parse("place-sstat").unwrap();
        if let Some(handle) = a.dispatch(crate::view::ViewEvent::SelectionChanged(Some(sstat))) {
            handle.await.unwrap();
        }

        assert!(a.snapshot().selection().is_some());
        assert!(b.snapshot().selection().is_none());
    }
}
