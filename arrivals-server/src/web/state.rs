//! Application state for the web layer.

use std::sync::Arc;

use crate::mbta::TransitApi;
use crate::view::{SessionStore, SessionStoreConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Live or mock transit API
    pub api: Arc<dyn TransitApi>,

    /// Open board views
    pub sessions: SessionStore,
}

impl AppState {
    /// Create a new app state.
    pub fn new(api: Arc<dyn TransitApi>, sessions: &SessionStoreConfig) -> Self {
        Self {
            sessions: SessionStore::new(Arc::clone(&api), sessions),
            api,
        }
    }
}
