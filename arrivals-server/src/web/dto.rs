//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{DisplayPrediction, Station, Urgency};
use crate::view::PredictionsView;

/// Form posted when the dropdown changes.
#[derive(Debug, Deserialize)]
pub struct SelectionForm {
    /// Stop id; empty when "-- Choose a Stop --" is picked
    #[serde(default)]
    pub stop: String,
}

/// Query for the stateless predictions endpoint.
#[derive(Debug, Deserialize)]
pub struct PredictionsQuery {
    /// Stop id
    pub stop: String,
}

/// A station in the directory.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub id: String,
    pub name: String,
}

impl StationResult {
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.to_string(),
            name: station.name.clone(),
        }
    }
}

/// Response for the station list.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<StationResult>,
}

/// A prediction on the board.
#[derive(Debug, Serialize)]
pub struct PredictionResult {
    pub id: String,

    /// API status, if any
    pub status: Option<String>,

    /// RFC 3339 arrival time
    pub arrival_time: String,

    /// RFC 3339 departure time
    pub departure_time: Option<String>,

    /// Fractional minutes until arrival
    pub minutes_until_arrival: f64,

    pub urgency: Urgency,
}

impl PredictionResult {
    pub fn from_prediction(p: &DisplayPrediction) -> Self {
        Self {
            id: p.id.clone(),
            status: p.status.clone(),
            arrival_time: p.arrival_time.to_rfc3339(),
            departure_time: p.departure_time.map(|t| t.to_rfc3339()),
            minutes_until_arrival: p.minutes_until_arrival,
            urgency: p.urgency,
        }
    }
}

/// Which of the board's mutually exclusive states is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardStatus {
    NoSelection,
    Loading,
    Failed,
    Empty,
    Arrivals,
}

/// The predictions board as JSON.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub status: BoardStatus,

    /// Error or notice text to show instead of arrivals
    pub message: Option<String>,

    /// The selected station, when known
    pub station: Option<StationResult>,

    /// Arrivals, soonest first
    pub predictions: Vec<PredictionResult>,
}

impl BoardResponse {
    pub fn from_view(view: &PredictionsView, station: Option<&Station>) -> Self {
        let station = station.map(StationResult::from_station);
        let (status, message, predictions) = match view {
            PredictionsView::NoSelection => (BoardStatus::NoSelection, None, vec![]),
            PredictionsView::Loading => (BoardStatus::Loading, None, vec![]),
            PredictionsView::Failed { message } => {
                (BoardStatus::Failed, Some(message.to_string()), vec![])
            }
            PredictionsView::Empty { notice } => {
                (BoardStatus::Empty, Some(notice.to_string()), vec![])
            }
            PredictionsView::Arrivals(list) => (
                BoardStatus::Arrivals,
                None,
                list.iter().map(PredictionResult::from_prediction).collect(),
            ),
        };

        Self {
            status,
            message,
            station,
            predictions,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
