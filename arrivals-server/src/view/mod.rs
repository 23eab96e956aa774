//! Board views.
//!
//! Each browser page gets its own [`ViewSession`], whose [`ViewState`] moves
//! through [`ViewEvent`]s: activation, the station list arriving, the user
//! picking a station, and that station's predictions arriving. Prediction
//! fetches are tagged with a [`Generation`] so a slow response for an
//! earlier pick can never replace the board for the current one.

mod session;
mod state;
mod store;

pub use session::{SessionId, ViewSession};
pub use state::{
    Command, Generation, NO_ARRIVALS_NOTICE, PREDICTIONS_ERROR, PredictionsView, STATIONS_ERROR,
    Transition, ViewEvent, ViewState,
};
pub use store::{SessionStore, SessionStoreConfig};
