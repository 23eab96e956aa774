//! Timestamp handling for MBTA predictions.
//!
//! The MBTA API sends times as ISO-8601 strings with a local offset, e.g.
//! `2026-10-18T14:05:00-04:00`. We keep the offset so times can be shown in
//! the station's local time without pulling in a time zone database.

use chrono::{DateTime, FixedOffset, TimeZone};

/// Milliseconds in one minute.
const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Nanoseconds in one minute.
const NANOS_PER_MINUTE: f64 = 60_000_000_000.0;

/// Parse an API timestamp.
///
/// Anything that isn't valid RFC 3339 yields `None`; callers treat an
/// unparsable time the same as a missing one.
///
/// # Examples
///
/// ```
/// use arrivals_server::domain::parse_timestamp;
///
/// assert!(parse_timestamp("2026-10-18T14:05:00-04:00").is_some());
/// assert!(parse_timestamp("14:05").is_none());
/// assert!(parse_timestamp("").is_none());
/// ```
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s.trim()).ok()
}

/// Signed, fractional minutes from `now` until `at`.
///
/// Negative when `at` is in the past. Sub-millisecond differences are kept,
/// so an instant just after `now` is never rounded down to zero.
pub fn minutes_until<Tz: TimeZone>(at: &DateTime<FixedOffset>, now: &DateTime<Tz>) -> f64 {
    let delta = at.signed_duration_since(now.clone());
    match delta.num_nanoseconds() {
        Some(nanos) => nanos as f64 / NANOS_PER_MINUTE,
        // Only overflows for spans of centuries.
        None => delta.num_milliseconds() as f64 / MILLIS_PER_MINUTE,
    }
}

/// Format a timestamp as a wall-clock time in its own offset, e.g. `2:05 PM`.
pub fn format_clock(at: &DateTime<FixedOffset>) -> String {
    at.format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn parse_with_offset() {
        let t = parse_timestamp("2026-10-18T14:05:00-04:00").unwrap();
        assert_eq!(t.offset().local_minus_utc(), -4 * 3600);
        assert_eq!(t.to_rfc3339(), "2026-10-18T14:05:00-04:00");
    }

    #[test]
    fn parse_utc_and_fractional_seconds() {
        assert!(parse_timestamp("2026-10-18T18:05:00Z").is_some());
        assert!(parse_timestamp("2026-10-18T18:05:00.250Z").is_some());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_timestamp("not a time").is_none());
        assert!(parse_timestamp("2026-10-18").is_none());
        assert!(parse_timestamp("2026-13-40T99:00:00Z").is_none());
    }

    #[test]
    fn minutes_until_future_and_past() {
        let now = Utc::now();
        let later = (now + Duration::minutes(3)).fixed_offset();
        let earlier = (now - Duration::seconds(90)).fixed_offset();

        assert_eq!(minutes_until(&later, &now), 3.0);
        assert_eq!(minutes_until(&earlier, &now), -1.5);
    }

    #[test]
    fn minutes_until_ignores_offsets() {
        let a = parse_timestamp("2026-10-18T14:05:00-04:00").unwrap();
        let now = parse_timestamp("2026-10-18T18:00:00Z").unwrap();
        assert_eq!(minutes_until(&a, &now), 5.0);
    }

    #[test]
    fn minutes_until_keeps_sub_millisecond_part() {
        let now = parse_timestamp("2026-10-18T18:00:00.0004Z").unwrap();
        let just_after = parse_timestamp("2026-10-18T18:00:00.001Z").unwrap();
        let just_before = parse_timestamp("2026-10-18T18:00:00Z").unwrap();

        assert!(minutes_until(&just_after, &now) > 0.0);
        assert!(minutes_until(&just_before, &now) < 0.0);
    }

    #[test]
    fn format_clock_uses_local_offset() {
        let t = parse_timestamp("2026-10-18T14:05:00-04:00").unwrap();
        assert_eq!(format_clock(&t), "2:05 PM");

        let t = parse_timestamp("2026-10-18T09:30:00-04:00").unwrap();
        assert_eq!(format_clock(&t), "9:30 AM");
    }
}
