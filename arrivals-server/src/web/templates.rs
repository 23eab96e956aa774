//! Askama templates for the web frontend.

use askama::Template;
use chrono::{DateTime, TimeZone};

use crate::domain::{DisplayPrediction, format_clock};
use crate::view::{PredictionsView, SessionId, ViewState};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Board page with the station dropdown.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub session_id: String,
    pub stations: Vec<StationOption>,
    pub stations_error: Option<String>,
    pub board: BoardView,
}

impl IndexTemplate {
    /// Render a view snapshot as of `now`.
    pub fn new<Tz: TimeZone>(session: SessionId, state: &ViewState, now: &DateTime<Tz>) -> Self {
        let selected = state.selection();
        let stations = state
            .directory()
            .map(|d| {
                d.stations()
                    .iter()
                    .map(|s| StationOption {
                        id: s.id.to_string(),
                        name: s.name.clone(),
                        selected: selected == Some(&s.id),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            session_id: session.to_string(),
            stations,
            stations_error: state.stations_error().map(str::to_string),
            board: BoardView::from_state(state, now),
        }
    }
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Predictions board fragment.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub board: BoardView,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Dropdown entry.
#[derive(Debug, Clone)]
pub struct StationOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// Predictions board view model.
///
/// At most one of `loading`, `error`, `notice` and a non-empty `cards` is set.
#[derive(Debug, Clone, Default)]
pub struct BoardView {
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub station_name: Option<String>,
    pub cards: Vec<PredictionCardView>,
}

impl BoardView {
    pub fn from_state<Tz: TimeZone>(state: &ViewState, now: &DateTime<Tz>) -> Self {
        let mut board = Self::from_view(&state.predictions_view(now));
        board.station_name = state.selected_station().map(|s| s.name.clone());
        board
    }

    pub fn from_view(view: &PredictionsView) -> Self {
        match view {
            PredictionsView::NoSelection => Self::default(),
            PredictionsView::Loading => Self {
                loading: true,
                ..Self::default()
            },
            PredictionsView::Failed { message } => Self {
                error: Some(message.to_string()),
                ..Self::default()
            },
            PredictionsView::Empty { notice } => Self {
                notice: Some(notice.to_string()),
                ..Self::default()
            },
            PredictionsView::Arrivals(list) => Self {
                cards: list.iter().map(PredictionCardView::from_prediction).collect(),
                ..Self::default()
            },
        }
    }
}

/// One arrival card.
#[derive(Debug, Clone)]
pub struct PredictionCardView {
    pub id: String,
    pub approaching: bool,
    pub status: String,
    pub arrival: String,
    pub departure: Option<String>,
    /// Whole minutes until arrival, rounded up.
    pub minutes_away: i64,
}

impl PredictionCardView {
    pub fn from_prediction(p: &DisplayPrediction) -> Self {
        Self {
            id: p.id.clone(),
            approaching: p.is_approaching(),
            status: p
                .status
                .clone()
                .unwrap_or_else(|| "In Transit".to_string()),
            arrival: format_clock(&p.arrival_time),
            departure: p.departure_time.as_ref().map(format_clock),
            minutes_away: p.minutes_until_arrival.ceil() as i64,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.approaching {
            "🚨 Approaching"
        } else {
            "Upcoming Train"
        }
    }

    pub fn minutes_label(&self) -> String {
        format!("{} min", self.minutes_away)
    }
}
