//! Conversion from MBTA DTOs to domain types.
//!
//! Conversion never fails as a whole: a stop without a usable id or name is
//! dropped, and a prediction time that doesn't parse becomes `None`, which
//! the board treats exactly like a missing time.

use tracing::debug;

use crate::domain::{RawPrediction, Station, StationId, parse_timestamp};

use super::types::{PredictionsDocument, Resource, StopAttributes, StopsDocument};

/// Convert a stops document into stations, in API order.
pub fn convert_stops(doc: StopsDocument) -> Vec<Station> {
    doc.data.into_iter().filter_map(convert_stop).collect()
}

fn convert_stop(resource: Resource<StopAttributes>) -> Option<Station> {
    let id = match StationId::parse(&resource.id) {
        Ok(id) => id,
        Err(e) => {
            debug!(stop = %resource.id, error = %e, "dropping stop with unusable id");
            return None;
        }
    };

    let name = resource
        .attributes
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    match name {
        Some(name) => Some(Station::new(id, name)),
        None => {
            debug!(stop = %id, "dropping stop without a name");
            None
        }
    }
}

/// Convert a predictions document into raw predictions, in API order.
pub fn convert_predictions(doc: PredictionsDocument) -> Vec<RawPrediction> {
    doc.data
        .into_iter()
        .map(|resource| {
            let attrs = resource.attributes;
            RawPrediction {
                arrival_time: parse_field(&resource.id, "arrival_time", attrs.arrival_time),
                departure_time: parse_field(&resource.id, "departure_time", attrs.departure_time),
                status: attrs.status.filter(|s| !s.trim().is_empty()),
                id: resource.id,
            }
        })
        .collect()
}

fn parse_field(
    id: &str,
    field: &'static str,
    value: Option<String>,
) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    let value = value?;
    let parsed = parse_timestamp(&value);
    if parsed.is_none() {
        debug!(prediction = id, field, value = %value, "ignoring unparsable time");
    }
    parsed
}
