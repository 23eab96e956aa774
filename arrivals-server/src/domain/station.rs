//! Station identifier and station types.

use std::fmt;

/// Maximum accepted length of a stop id, in bytes.
const MAX_ID_LEN: usize = 64;

/// Error returned when parsing an invalid station id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// An MBTA stop id, such as `place-sstat` or `70061`.
///
/// Ids are opaque to us, but they are substituted into request URLs and
/// echoed into HTML, so we insist on a short, printable, whitespace-free
/// string.
///
/// # Examples
///
/// ```
/// use arrivals_server::domain::StationId;
///
/// let south = StationId::parse("place-sstat").unwrap();
/// assert_eq!(south.as_str(), "place-sstat");
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("place sstat").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(String);

impl StationId {
    /// Parse a station id from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }

        if s.len() > MAX_ID_LEN {
            return Err(InvalidStationId {
                reason: "must be at most 64 bytes",
            });
        }

        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(InvalidStationId {
                reason: "must not contain whitespace or control characters",
            });
        }

        Ok(StationId(s.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A rail or subway station that can be selected on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
}

impl Station {
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
