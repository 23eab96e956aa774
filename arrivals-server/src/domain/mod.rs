//! Domain types for the arrivals board.
//!
//! Types here are independent of the MBTA wire format and of the web layer.
//! Station ids are validated at construction; prediction times are already
//! parsed, with unparsable values folded into `None`.

mod prediction;
mod station;
mod time;

pub use prediction::{
    APPROACHING_MINUTES, DisplayPrediction, RawPrediction, Urgency, WINDOW_MINUTES,
    select_display_predictions,
};
pub use station::{InvalidStationId, Station, StationId};
pub use time::{format_clock, minutes_until, parse_timestamp};
