//! MBTA v3 API response DTOs.
//!
//! The API speaks JSON:API: every response is a document whose `data` member
//! holds resources with an `id`, a `type`, and an `attributes` object. Only
//! the attributes the board uses are modelled; unknown members are ignored.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// A JSON:API document holding a list of resources.
#[derive(Debug, Clone, Deserialize)]
pub struct Document<A> {
    pub data: Vec<Resource<A>>,
}

/// A single JSON:API resource.
#[derive(Debug, Clone, Deserialize)]
pub struct Resource<A> {
    pub id: String,
    pub attributes: A,
}

/// Attributes of a `stop` resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopAttributes {
    /// Display name, e.g. "South Station".
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

/// Attributes of a `prediction` resource.
///
/// A field of the wrong JSON type is read as absent, so one odd record
/// can't sink the rest of the document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionAttributes {
    /// Free-text status such as "Boarding" or "Delayed".
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,

    /// ISO-8601 predicted arrival, null at the first stop of a trip.
    #[serde(default, deserialize_with = "lenient_string")]
    pub arrival_time: Option<String>,

    /// ISO-8601 predicted departure, null at the last stop of a trip.
    #[serde(default, deserialize_with = "lenient_string")]
    pub departure_time: Option<String>,
}

/// Response from `GET /stops`.
pub type StopsDocument = Document<StopAttributes>;

/// Response from `GET /predictions`.
pub type PredictionsDocument = Document<PredictionAttributes>;

/// A string, or `None` for null or any other JSON type.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        Value::Null => Ok(None),
        other => {
            debug!(value = %other, "ignoring non-string attribute");
            Ok(None)
        }
    }
}
