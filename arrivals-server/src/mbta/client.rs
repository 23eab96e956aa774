//! MBTA v3 API HTTP client.
//!
//! Provides async methods for the two endpoints the board needs: the list of
//! rail and subway stops, and live predictions for a single stop.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{RawPrediction, Station, StationId};

use super::api::TransitApi;
use super::convert::{convert_predictions, convert_stops};
use super::error::MbtaError;
use super::types::{PredictionsDocument, StopsDocument};

/// Default base URL for the MBTA v3 API.
pub const DEFAULT_BASE_URL: &str = "https://api-v3.mbta.com";

/// Light rail (0) and heavy rail / subway (1).
const DEFAULT_ROUTE_TYPES: [u8; 2] = [0, 1];

/// How much of an unparsable body to keep in the error.
const BODY_EXCERPT_CHARS: usize = 500;

/// Configuration for the MBTA client.
#[derive(Debug, Clone)]
pub struct MbtaConfig {
    /// Optional API key; the API works without one at a lower rate limit.
    pub api_key: Option<String>,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Route types whose stops appear in the station list
    pub route_types: Vec<u8>,
}

impl MbtaConfig {
    /// Create a config for the production API without a key.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            route_types: DEFAULT_ROUTE_TYPES.to_vec(),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the route types listed as stations.
    pub fn with_route_types(mut self, route_types: impl Into<Vec<u8>>) -> Self {
        self.route_types = route_types.into();
        self
    }

    /// The `filter[route_type]` query value, e.g. `0,1`.
    fn route_type_filter(&self) -> String {
        self.route_types
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for MbtaConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// MBTA v3 API client.
#[derive(Debug, Clone)]
pub struct MbtaClient {
    http: reqwest::Client,
    base_url: String,
    route_type_filter: String,
}

impl MbtaClient {
    /// Create a new MBTA client with the given configuration.
    pub fn new(config: MbtaConfig) -> Result<Self, MbtaError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|_| MbtaError::Config("invalid API key format".to_string()))?;
            headers.insert("x-api-key", value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            route_type_filter: config.route_type_filter(),
            http,
            base_url: config.base_url,
        })
    }

    /// Fetch all stops of the configured route types.
    pub async fn get_stops(&self) -> Result<StopsDocument, MbtaError> {
        self.get_document(
            "stops",
            &[("filter[route_type]", self.route_type_filter.as_str())],
        )
        .await
    }

    /// Fetch live predictions for a stop.
    pub async fn get_predictions(&self, stop: &StationId) -> Result<PredictionsDocument, MbtaError> {
        self.get_document("predictions", &[("filter[stop]", stop.as_str())])
            .await
    }

    async fn get_document<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MbtaError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, ?query, "requesting");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(MbtaError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MbtaError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MbtaError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| MbtaError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_EXCERPT_CHARS).collect()),
        })
    }
}

#[async_trait]
impl TransitApi for MbtaClient {
    async fn fetch_stations(&self) -> Result<Vec<Station>, MbtaError> {
        Ok(convert_stops(self.get_stops().await?))
    }

    async fn fetch_predictions(
        &self,
        station: &StationId,
    ) -> Result<Vec<RawPrediction>, MbtaError> {
        Ok(convert_predictions(self.get_predictions(station).await?))
    }
}
