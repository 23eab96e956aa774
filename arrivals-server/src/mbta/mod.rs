//! MBTA v3 API client.
//!
//! The board needs two endpoints:
//! - `GET /stops?filter[route_type]=0,1` for the rail and subway station list
//! - `GET /predictions?filter[stop]=<id>` for live predictions at one stop
//!
//! Responses are JSON:API documents. Times are ISO-8601 strings or null.

mod api;
mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use api::TransitApi;
pub use client::{DEFAULT_BASE_URL, MbtaClient, MbtaConfig};
pub use convert::{convert_predictions, convert_stops};
pub use error::MbtaError;
pub use mock::{MockPrediction, MockTransitApi};
pub use types::{
    Document, PredictionAttributes, PredictionsDocument, Resource, StopAttributes, StopsDocument,
};
