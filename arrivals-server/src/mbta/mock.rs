//! Mock transit API for running without network access.
//!
//! Predictions are stored as offsets from the moment they are fetched, so a
//! fixture stays "live" no matter when the server is started.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::domain::{RawPrediction, Station, StationId};

use super::api::TransitApi;
use super::error::MbtaError;

/// A prediction relative to fetch time.
#[derive(Debug, Clone, Deserialize)]
pub struct MockPrediction {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    /// Seconds from fetch time until arrival; absent for departures-only.
    #[serde(default)]
    pub arrival_in_secs: Option<i64>,
    /// Seconds from fetch time until departure.
    #[serde(default)]
    pub departure_in_secs: Option<i64>,
}

impl MockPrediction {
    pub fn arriving_in(id: impl Into<String>, secs: i64) -> Self {
        Self {
            id: id.into(),
            status: None,
            arrival_in_secs: Some(secs),
            departure_in_secs: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// On-disk fixture format.
#[derive(Debug, Deserialize)]
struct Fixture {
    stations: Vec<FixtureStation>,
    #[serde(default)]
    predictions: HashMap<String, Vec<MockPrediction>>,
}

#[derive(Debug, Deserialize)]
struct FixtureStation {
    id: String,
    name: String,
}

/// Mock transit API serving fixed stations and relative predictions.
#[derive(Debug, Clone, Default)]
pub struct MockTransitApi {
    stations: Vec<Station>,
    predictions: HashMap<StationId, Vec<MockPrediction>>,
    fail_stations: bool,
    failing_predictions: HashSet<StationId>,
}

impl MockTransitApi {
    /// Create a mock with the given stations and no predictions.
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            stations,
            ..Default::default()
        }
    }

    /// Load a fixture file.
    ///
    /// The file holds `{"stations": [{"id", "name"}], "predictions": {stop_id: [...]}}`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MbtaError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| MbtaError::Api {
            status: 0,
            message: format!("Failed to read {:?}: {}", path, e),
        })?;

        let fixture: Fixture = serde_json::from_str(&json).map_err(|e| MbtaError::Json {
            message: format!("Failed to parse {:?}: {}", path, e),
            body: None,
        })?;

        let invalid_id = |id: &str, e: crate::domain::InvalidStationId| MbtaError::Api {
            status: 0,
            message: format!("Invalid stop id {:?} in {:?}: {}", id, path, e),
        };

        let mut mock = Self::default();
        for s in fixture.stations {
            let id = StationId::parse(&s.id).map_err(|e| invalid_id(&s.id, e))?;
            mock.stations.push(Station::new(id, s.name));
        }
        for (stop, predictions) in fixture.predictions {
            let id = StationId::parse(&stop).map_err(|e| invalid_id(&stop, e))?;
            mock.predictions.insert(id, predictions);
        }

        Ok(mock)
    }

    /// Set the predictions served for a station.
    pub fn with_predictions(mut self, station: StationId, predictions: Vec<MockPrediction>) -> Self {
        self.predictions.insert(station, predictions);
        self
    }

    /// Make the station list fetch fail.
    pub fn failing_stations(mut self) -> Self {
        self.fail_stations = true;
        self
    }

    /// Make predictions fetches for a station fail.
    pub fn failing_predictions_for(mut self, station: StationId) -> Self {
        self.failing_predictions.insert(station);
        self
    }

    /// Stations known to the mock.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }
}

#[async_trait]
impl TransitApi for MockTransitApi {
    async fn fetch_stations(&self) -> Result<Vec<Station>, MbtaError> {
        if self.fail_stations {
            return Err(MbtaError::Api {
                status: 503,
                message: "mock station list unavailable".to_string(),
            });
        }
        Ok(self.stations.clone())
    }

    async fn fetch_predictions(
        &self,
        station: &StationId,
    ) -> Result<Vec<RawPrediction>, MbtaError> {
        if self.failing_predictions.contains(station) {
            return Err(MbtaError::Api {
                status: 503,
                message: format!("mock predictions unavailable for {}", station),
            });
        }

        let now = Utc::now().fixed_offset();
        let at = |secs: Option<i64>| secs.map(|s| now + Duration::seconds(s));

        Ok(self
            .predictions
            .get(station)
            .map(|list| {
                list.iter()
                    .map(|p| RawPrediction {
                        id: p.id.clone(),
                        status: p.status.clone(),
                        arrival_time: at(p.arrival_in_secs),
                        departure_time: at(p.departure_in_secs),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sstat() -> StationId {
        StationId::parse("place-sstat").unwrap()
    }

    #[tokio::test]
    async fn serves_relative_predictions() {
        let mock = MockTransitApi::new(vec![Station::new(sstat(), "South Station")])
            .with_predictions(sstat(), vec![MockPrediction::arriving_in("p1", 120)]);

        let before = Utc::now();
        let predictions = mock.fetch_predictions(&sstat()).await.unwrap();
        let after = Utc::now();

        assert_eq!(predictions.len(), 1);
        let arrival = predictions[0].arrival_time.unwrap();
        assert!(arrival >= before + Duration::seconds(120));
        assert!(arrival <= after + Duration::seconds(120));
    }

    #[tokio::test]
    async fn unknown_station_has_no_predictions() {
        let mock = MockTransitApi::new(vec![]);
        let predictions = mock.fetch_predictions(&sstat()).await.unwrap();
        assert!(predictions.is_empty());
    }

    #[tokio::test]
    async fn configured_failures() {
        let mock = MockTransitApi::new(vec![])
            .failing_stations()
            .failing_predictions_for(sstat());

        assert!(mock.fetch_stations().await.is_err());
        assert!(mock.fetch_predictions(&sstat()).await.is_err());
    }

    #[tokio::test]
    async fn load_fixture_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "stations": [
                    {{"id": "place-sstat", "name": "South Station"}},
                    {{"id": "place-north", "name": "North Station"}}
                ],
                "predictions": {{
                    "place-sstat": [
                        {{"id": "p1", "status": "Boarding", "arrival_in_secs": 60}},
                        {{"id": "p2", "departure_in_secs": 300}}
                    ]
                }}
            }}"#
        )
        .unwrap();

        let mock = MockTransitApi::from_file(file.path()).unwrap();
        assert_eq!(mock.stations().len(), 2);

        let predictions = mock.fetch_predictions(&sstat()).await.unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].status.as_deref(), Some("Boarding"));
        assert!(predictions[1].arrival_time.is_none());
        assert!(predictions[1].departure_time.is_some());
    }

    #[test]
    fn fixture_with_bad_stop_id_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"stations": [{{"id": "bad id", "name": "Bad"}}]}}"#).unwrap();

        assert!(MockTransitApi::from_file(file.path()).is_err());
    }

    #[tokio::test]
    async fn bundled_fixture_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/mock_board.json");
        let mock = MockTransitApi::from_file(path).unwrap();

        let directory = crate::stations::StationDirectory::fetch(&mock).await.unwrap();
        // The two Alewife entries collapse into one.
        assert_eq!(directory.len(), mock.stations().len() - 1);

        let predictions = mock.fetch_predictions(&sstat()).await.unwrap();
        let shown = crate::domain::select_display_predictions(&predictions, &Utc::now());
        assert_eq!(shown.len(), 3);
        assert!(shown[0].is_approaching());
    }

    #[test]
    fn missing_fixture_is_an_error() {
        assert!(MockTransitApi::from_file("/nonexistent/fixture.json").is_err());
    }
}
