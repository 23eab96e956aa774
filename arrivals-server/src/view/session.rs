//! One live board view and the fetches it drives.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::mbta::TransitApi;

use super::state::{Command, ViewEvent, ViewState};

/// Opaque identifier of a board view, carried in its URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(SessionId)
    }
}

/// A board view: its state plus the API it fetches from.
///
/// Events are applied under a lock that is never held across an await, so
/// each transition is atomic. Fetches run as separate tasks and report back
/// through [`dispatch`](Self::dispatch).
pub struct ViewSession {
    id: SessionId,
    state: Mutex<ViewState>,
    api: Arc<dyn TransitApi>,
}

impl ViewSession {
    pub fn new(id: SessionId, api: Arc<dyn TransitApi>) -> Arc<Self> {
        Arc::new(Self {
            id,
            state: Mutex::new(ViewState::new()),
            api,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> ViewState {
        self.lock().clone()
    }

    /// Apply an event and start whatever fetch it calls for.
    ///
    /// Returns the handle of the spawned fetch, if any. Must be called from
    /// within a tokio runtime.
    pub fn dispatch(self: &Arc<Self>, event: ViewEvent) -> Option<JoinHandle<()>> {
        let command = {
            let mut state = self.lock();
            let transition = state.apply(event);
            *state = transition.state;
            transition.command
        };

        command.map(|command| self.spawn(command))
    }

    fn spawn(self: &Arc<Self>, command: Command) -> JoinHandle<()> {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            let event = session.run(command).await;
            session.dispatch(event);
        })
    }

    async fn run(&self, command: Command) -> ViewEvent {
        match command {
            Command::FetchStations => match self.api.fetch_stations().await {
                Ok(stations) => {
                    info!(session = %self.id, count = stations.len(), "loaded stations");
                    ViewEvent::StationsLoaded(stations)
                }
                Err(e) => {
                    warn!(session = %self.id, error = %e, "failed to load stations");
                    ViewEvent::StationsFailed
                }
            },
            Command::FetchPredictions {
                station,
                generation,
            } => match self.api.fetch_predictions(&station).await {
                Ok(predictions) => {
                    info!(
                        session = %self.id,
                        %station,
                        count = predictions.len(),
                        "loaded predictions"
                    );
                    ViewEvent::PredictionsLoaded {
                        generation,
                        predictions,
                    }
                }
                Err(e) => {
                    warn!(session = %self.id, %station, error = %e, "failed to load predictions");
                    ViewEvent::PredictionsFailed { generation }
                }
            },
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ViewState> {
        // Transitions are pure, so a panic elsewhere can't leave the state half-written.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ViewSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewSession").field("id", &self.id).finish()
    }
}
