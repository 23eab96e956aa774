//! Arrival predictions and the selection of what to show on the board.

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::Serialize;

use super::time::minutes_until;

/// Predictions arriving within this many minutes are shown.
pub const WINDOW_MINUTES: f64 = 60.0;

/// Predictions arriving within this many minutes are flagged as approaching.
pub const APPROACHING_MINUTES: f64 = 5.0;

/// A prediction as received from the transit API.
///
/// Times that were missing or unparsable are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPrediction {
    pub id: String,
    pub status: Option<String>,
    pub arrival_time: Option<DateTime<FixedOffset>>,
    pub departure_time: Option<DateTime<FixedOffset>>,
}

/// How imminent an arrival is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Approaching,
    Upcoming,
}

impl Urgency {
    /// Classify an arrival `minutes` from now.
    pub fn classify(minutes: f64) -> Self {
        if minutes > 0.0 && minutes <= APPROACHING_MINUTES {
            Urgency::Approaching
        } else {
            Urgency::Upcoming
        }
    }
}

/// A prediction selected for display.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayPrediction {
    pub id: String,
    pub status: Option<String>,
    pub arrival_time: DateTime<FixedOffset>,
    pub departure_time: Option<DateTime<FixedOffset>>,
    /// Fractional minutes between `now` and `arrival_time`.
    pub minutes_until_arrival: f64,
    pub urgency: Urgency,
}

impl DisplayPrediction {
    pub fn is_approaching(&self) -> bool {
        self.urgency == Urgency::Approaching
    }
}

/// Select the predictions to show on the board, soonest first.
///
/// Keeps records arriving strictly after `now` and no more than
/// [`WINDOW_MINUTES`] later, tagging each with its [`Urgency`]. Records
/// without an arrival time are dropped. `now` is read exactly once by the
/// caller so filtering and classification always agree.
pub fn select_display_predictions<Tz: TimeZone>(
    raw: &[RawPrediction],
    now: &DateTime<Tz>,
) -> Vec<DisplayPrediction> {
    let mut selected: Vec<DisplayPrediction> = raw
        .iter()
        .filter_map(|p| {
            let arrival_time = p.arrival_time?;
            let minutes = minutes_until(&arrival_time, now);
            if minutes <= 0.0 || minutes > WINDOW_MINUTES {
                return None;
            }

            Some(DisplayPrediction {
                id: p.id.clone(),
                status: p.status.clone(),
                arrival_time,
                departure_time: p.departure_time,
                minutes_until_arrival: minutes,
                urgency: Urgency::classify(minutes),
            })
        })
        .collect();

    // Stable, so equal arrival times keep their input order.
    selected.sort_by_key(|p| p.arrival_time);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use proptest::prelude::*;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-10-18T14:00:00-04:00").unwrap()
    }

    fn at_millis(id: &str, millis: i64) -> RawPrediction {
        RawPrediction {
            id: id.to_string(),
            status: None,
            arrival_time: Some(now() + Duration::milliseconds(millis)),
            departure_time: None,
        }
    }

    fn at_minutes(id: &str, minutes: i64) -> RawPrediction {
        at_millis(id, minutes * 60_000)
    }

    fn ids(selected: &[DisplayPrediction]) -> Vec<&str> {
        selected.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(select_display_predictions(&[], &now()).is_empty());
    }

    #[test]
    fn missing_arrival_is_excluded() {
        let raw = vec![
            RawPrediction {
                id: "1".into(),
                status: Some("Boarding".into()),
                arrival_time: None,
                departure_time: Some(now() + Duration::minutes(2)),
            },
            at_minutes("2", 10),
        ];

        let selected = select_display_predictions(&raw, &now());
        assert_eq!(ids(&selected), vec!["2"]);
    }

    #[test]
    fn window_boundaries() {
        let raw = vec![
            at_minutes("now", 0),
            at_minutes("past", -2),
            at_minutes("sixty", 60),
            at_millis("just-over", 60 * 60_000 + 6),
            at_minutes("ninety", 90),
        ];

        let selected = select_display_predictions(&raw, &now());
        assert_eq!(ids(&selected), vec!["sixty"]);
        assert_eq!(selected[0].minutes_until_arrival, 60.0);
    }

    #[test]
    fn sub_millisecond_now() {
        // `now` sits 0.4ms past the second; each arrival is 0.6ms past a boundary.
        let now = DateTime::parse_from_rfc3339("2026-10-18T18:00:00.0004Z").unwrap();
        let at = |id: &str, t: &str| RawPrediction {
            id: id.to_string(),
            status: None,
            arrival_time: Some(DateTime::parse_from_rfc3339(t).unwrap()),
            departure_time: None,
        };
        let raw = vec![
            at("just-after", "2026-10-18T18:00:00.001Z"),
            at("just-over-5", "2026-10-18T18:05:00.001Z"),
            at("just-over-60", "2026-10-18T19:00:00.001Z"),
        ];

        let selected = select_display_predictions(&raw, &now);
        assert_eq!(ids(&selected), vec!["just-after", "just-over-5"]);
        assert_eq!(selected[0].urgency, Urgency::Approaching);
        assert!(selected[1].minutes_until_arrival > APPROACHING_MINUTES);
        assert_eq!(selected[1].urgency, Urgency::Upcoming);
    }

    #[test]
    fn urgency_boundaries() {
        let raw = vec![
            at_minutes("five", 5),
            at_millis("just-over-five", 5 * 60_000 + 6),
            at_millis("just-after-now", 6),
        ];

        let selected = select_display_predictions(&raw, &now());
        let by_id = |id: &str| selected.iter().find(|p| p.id == id).unwrap().urgency;

        assert_eq!(by_id("five"), Urgency::Approaching);
        assert_eq!(by_id("just-over-five"), Urgency::Upcoming);
        assert_eq!(by_id("just-after-now"), Urgency::Approaching);
    }

    #[test]
    fn sorted_by_arrival() {
        let raw = vec![
            at_minutes("50", 50),
            at_minutes("10", 10),
            at_minutes("30", 30),
        ];

        let selected = select_display_predictions(&raw, &now());
        assert_eq!(ids(&selected), vec!["10", "30", "50"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let raw = vec![at_minutes("b", 7), at_minutes("a", 7), at_minutes("c", 3)];

        let selected = select_display_predictions(&raw, &now());
        assert_eq!(ids(&selected), vec!["c", "b", "a"]);
    }

    #[test]
    fn station_board_scenario() {
        let mut delayed = at_minutes("delayed", 45);
        delayed.status = Some("Delayed".into());
        let raw = vec![at_minutes("soon", 3), delayed, at_minutes("gone", -2)];

        let selected = select_display_predictions(&raw, &now());

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].id, "soon");
        assert_eq!(selected[0].status, None);
        assert_eq!(selected[0].urgency, Urgency::Approaching);
        assert_eq!(selected[1].id, "delayed");
        assert_eq!(selected[1].status.as_deref(), Some("Delayed"));
        assert_eq!(selected[1].urgency, Urgency::Upcoming);
    }

    #[test]
    fn now_in_a_different_offset() {
        let utc_now = now().with_timezone(&Utc);
        let selected = select_display_predictions(&[at_minutes("a", 4)], &utc_now);
        assert_eq!(selected[0].minutes_until_arrival, 4.0);
        assert!(selected[0].is_approaching());
    }

    #[test]
    fn carries_departure_and_status() {
        let raw = vec![RawPrediction {
            id: "x".into(),
            status: Some("Boarding".into()),
            arrival_time: Some(now() + Duration::minutes(1)),
            departure_time: Some(now() + Duration::minutes(2)),
        }];

        let selected = select_display_predictions(&raw, &now());
        assert_eq!(selected[0].status.as_deref(), Some("Boarding"));
        assert_eq!(
            selected[0].departure_time,
            Some(now() + Duration::minutes(2))
        );
    }

    /// Arbitrary prediction with an arrival between -2h and +2h of `now`, or none.
    fn arb_prediction() -> impl Strategy<Value = RawPrediction> {
        (
            "[a-z0-9]{6}",
            prop::option::of(-7_200_000i64..7_200_000),
            prop::option::of("[A-Za-z ]{1,12}"),
        )
            .prop_map(|(id, offset, status)| RawPrediction {
                id,
                status,
                arrival_time: offset.map(|ms| now() + Duration::milliseconds(ms)),
                departure_time: None,
            })
    }

    proptest! {
        /// Every selected prediction lies inside the window.
        #[test]
        fn output_within_window(raw in prop::collection::vec(arb_prediction(), 0..30)) {
            for p in select_display_predictions(&raw, &now()) {
                prop_assert!(p.minutes_until_arrival > 0.0);
                prop_assert!(p.minutes_until_arrival <= WINDOW_MINUTES);
            }
        }

        /// Exactly the in-window records with an arrival time are selected.
        #[test]
        fn selects_all_in_window(raw in prop::collection::vec(arb_prediction(), 0..30)) {
            let expected = raw
                .iter()
                .filter(|p| {
                    p.arrival_time.is_some_and(|t| {
                        let m = minutes_until(&t, &now());
                        m > 0.0 && m <= WINDOW_MINUTES
                    })
                })
                .count();
            prop_assert_eq!(select_display_predictions(&raw, &now()).len(), expected);
        }

        /// Output is sorted by arrival time.
        #[test]
        fn output_sorted(raw in prop::collection::vec(arb_prediction(), 0..30)) {
            let selected = select_display_predictions(&raw, &now());
            for pair in selected.windows(2) {
                prop_assert!(pair[0].arrival_time <= pair[1].arrival_time);
            }
        }

        /// Urgency agrees with the computed minutes.
        #[test]
        fn urgency_matches_minutes(raw in prop::collection::vec(arb_prediction(), 0..30)) {
            for p in select_display_predictions(&raw, &now()) {
                let approaching = p.minutes_until_arrival <= APPROACHING_MINUTES;
                prop_assert_eq!(p.is_approaching(), approaching);
            }
        }

        /// Same inputs, same output.
        #[test]
        fn idempotent(raw in prop::collection::vec(arb_prediction(), 0..30)) {
            let first = select_display_predictions(&raw, &now());
            let second = select_display_predictions(&raw, &now());
            prop_assert_eq!(first, second);
        }
    }
}
