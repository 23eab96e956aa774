//! Board view state and its transitions.
//!
//! The whole view is one immutable value. Every event produces a new value
//! (and possibly a fetch to start), so a renderer reading a snapshot never
//! sees a half-applied update.

use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use tracing::debug;

use crate::domain::{DisplayPrediction, RawPrediction, Station, StationId, select_display_predictions};
use crate::stations::StationDirectory;

/// Shown when the station list could not be fetched.
pub const STATIONS_ERROR: &str = "Failed to load stops.";

/// Shown when predictions for the selected station could not be fetched.
pub const PREDICTIONS_ERROR: &str = "Could not fetch live predictions.";

/// Shown when a station has nothing arriving inside the window.
pub const NO_ARRIVALS_NOTICE: &str = "No trains arriving in the next hour.";

/// Identifies one predictions request of a view.
///
/// Bumped on every selection change; completions carrying an older
/// generation are discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// Progress of the station list fetch.
#[derive(Debug, Clone, Default)]
pub enum StationsState {
    #[default]
    NotRequested,
    Loading,
    Loaded(Arc<StationDirectory>),
    Failed,
}

/// Predictions for the current selection.
#[derive(Debug, Clone, Default)]
pub enum PredictionsState {
    /// Nothing selected.
    #[default]
    Idle,
    Loading,
    Loaded(Arc<[RawPrediction]>),
    Failed,
}

/// Something that happened to the view.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// The page was opened.
    Activated,
    StationsLoaded(Vec<Station>),
    StationsFailed,
    /// The user picked a station, or cleared the dropdown.
    SelectionChanged(Option<StationId>),
    PredictionsLoaded {
        generation: Generation,
        predictions: Vec<RawPrediction>,
    },
    PredictionsFailed {
        generation: Generation,
    },
}

/// A fetch the view wants started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchStations,
    FetchPredictions {
        station: StationId,
        generation: Generation,
    },
}

/// Result of applying an event.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: ViewState,
    pub command: Option<Command>,
}

impl Transition {
    fn to(state: ViewState) -> Self {
        Self {
            state,
            command: None,
        }
    }

    fn with(state: ViewState, command: Command) -> Self {
        Self {
            state,
            command: Some(command),
        }
    }
}

/// What the predictions section should show.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionsView {
    NoSelection,
    Loading,
    Failed { message: &'static str },
    Empty { notice: &'static str },
    Arrivals(Vec<DisplayPrediction>),
}

/// State of one board view.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    stations: StationsState,
    selection: Option<StationId>,
    generation: Generation,
    predictions: PredictionsState,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<&StationId> {
        self.selection.as_ref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The station list, once loaded.
    pub fn directory(&self) -> Option<&StationDirectory> {
        match &self.stations {
            StationsState::Loaded(directory) => Some(directory.as_ref()),
            _ => None,
        }
    }

    /// The selected station, if it is in the directory.
    pub fn selected_station(&self) -> Option<&Station> {
        let id = self.selection.as_ref()?;
        self.directory()?.get(id)
    }

    pub fn stations_loading(&self) -> bool {
        matches!(self.stations, StationsState::Loading)
    }

    /// Error banner for the station section.
    pub fn stations_error(&self) -> Option<&'static str> {
        match self.stations {
            StationsState::Failed => Some(STATIONS_ERROR),
            _ => None,
        }
    }

    pub fn predictions_loading(&self) -> bool {
        matches!(self.predictions, PredictionsState::Loading)
    }

    /// Apply an event, returning the next state and any fetch to start.
    pub fn apply(&self, event: ViewEvent) -> Transition {
        match event {
            ViewEvent::Activated => Transition::with(
                ViewState {
                    stations: StationsState::Loading,
                    ..self.clone()
                },
                Command::FetchStations,
            ),

            ViewEvent::StationsLoaded(stations) => Transition::to(ViewState {
                stations: StationsState::Loaded(Arc::new(StationDirectory::from_stations(
                    stations,
                ))),
                ..self.clone()
            }),

            ViewEvent::StationsFailed => Transition::to(ViewState {
                stations: StationsState::Failed,
                ..self.clone()
            }),

            ViewEvent::SelectionChanged(selection) => {
                if selection == self.selection {
                    return Transition::to(self.clone());
                }

                let generation = self.generation.next();
                match selection {
                    Some(station) => Transition::with(
                        ViewState {
                            selection: Some(station.clone()),
                            generation,
                            predictions: PredictionsState::Loading,
                            ..self.clone()
                        },
                        Command::FetchPredictions {
                            station,
                            generation,
                        },
                    ),
                    None => Transition::to(ViewState {
                        selection: None,
                        generation,
                        predictions: PredictionsState::Idle,
                        ..self.clone()
                    }),
                }
            }

            ViewEvent::PredictionsLoaded {
                generation,
                predictions,
            } => {
                if !self.is_current(generation) {
                    return Transition::to(self.clone());
                }
                Transition::to(ViewState {
                    predictions: PredictionsState::Loaded(predictions.into()),
                    ..self.clone()
                })
            }

            ViewEvent::PredictionsFailed { generation } => {
                if !self.is_current(generation) {
                    return Transition::to(self.clone());
                }
                Transition::to(ViewState {
                    predictions: PredictionsState::Failed,
                    ..self.clone()
                })
            }
        }
    }

    fn is_current(&self, generation: Generation) -> bool {
        let current = generation == self.generation && self.selection.is_some();
        if !current {
            debug!(
                ?generation,
                current = ?self.generation,
                "discarding stale predictions response"
            );
        }
        current
    }

    /// Project the predictions section, using a single `now` reading.
    pub fn predictions_view<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> PredictionsView {
        match &self.predictions {
            PredictionsState::Idle => PredictionsView::NoSelection,
            PredictionsState::Loading => PredictionsView::Loading,
            PredictionsState::Failed => PredictionsView::Failed {
                message: PREDICTIONS_ERROR,
            },
            PredictionsState::Loaded(raw) => {
                let selected = select_display_predictions(raw, now);
                if selected.is_empty() {
                    PredictionsView::Empty {
                        notice: NO_ARRIVALS_NOTICE,
                    }
                } else {
                    PredictionsView::Arrivals(selected)
                }
            }
        }
    }
}
