//! The seam between the board and its data source.

use async_trait::async_trait;

use crate::domain::{RawPrediction, Station, StationId};

use super::error::MbtaError;

/// A source of stations and live predictions.
///
/// Implemented by [`MbtaClient`](super::MbtaClient) for the live API and by
/// [`MockTransitApi`](super::MockTransitApi) for development and tests.
#[async_trait]
pub trait TransitApi: Send + Sync {
    /// Fetch every selectable station, in API order and possibly with
    /// repeated names.
    async fn fetch_stations(&self) -> Result<Vec<Station>, MbtaError>;

    /// Fetch the current predictions for one station.
    async fn fetch_predictions(&self, station: &StationId)
    -> Result<Vec<RawPrediction>, MbtaError>;
}
