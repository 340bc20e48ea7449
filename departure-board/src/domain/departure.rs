//! Departure records.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Delays above this many seconds mark a departure as delayed.
pub const DELAY_THRESHOLD_SECS: f64 = 120.0;

/// A transit line serving a departure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    /// Line number as shown to passengers (e.g. "12", "N3").
    pub number: String,
    /// Badge colour as sent upstream (usually a CSS hex colour).
    pub color: Option<String>,
}

/// One upcoming departure from the configured stop.
///
/// `is_realtime` and `is_delayed` are derived from `delay_seconds` by
/// [`Departure::new`] and always agree with it. Times the API sent in an
/// unreadable form are `None`; the record itself is kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Departure {
    pub trip_id: String,
    pub destination: String,
    pub line: Line,
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Predicted time. May be earlier than `scheduled_time` when a vehicle runs early.
    pub actual_time: Option<DateTime<Utc>>,
    /// Delay reported by live tracking, as sent; `None` for schedule-only departures.
    pub delay_seconds: Option<f64>,
    pub is_realtime: bool,
    pub is_delayed: bool,
    pub vehicle_id: Option<String>,
}

impl Departure {
    /// Build a departure, deriving the realtime and delay flags.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use departure_board::domain::{Departure, Line};
    ///
    /// let at = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).single();
    /// let line = Line { number: "12".into(), color: None };
    ///
    /// let dep = Departure::new("t1", "Centrum", line.clone(), at, at, Some(300.0), None);
    /// assert!(dep.is_realtime && dep.is_delayed);
    ///
    /// let dep = Departure::new("t2", "Centrum", line, at, at, None, None);
    /// assert!(!dep.is_realtime && !dep.is_delayed);
    /// ```
    pub fn new(
        trip_id: impl Into<String>,
        destination: impl Into<String>,
        line: Line,
        scheduled_time: Option<DateTime<Utc>>,
        actual_time: Option<DateTime<Utc>>,
        delay_seconds: Option<f64>,
        vehicle_id: Option<String>,
    ) -> Self {
        let is_realtime = delay_seconds.is_some();
        let is_delayed = delay_seconds.is_some_and(|d| d > DELAY_THRESHOLD_SECS);

        Self {
            trip_id: trip_id.into(),
            destination: destination.into(),
            line,
            scheduled_time,
            actual_time,
            delay_seconds,
            is_realtime,
            is_delayed,
            vehicle_id,
        }
    }

    /// Realtime status of this departure.
    pub fn status(&self) -> DepartureStatus {
        match (self.is_realtime, self.is_delayed) {
            (false, _) => DepartureStatus::Scheduled,
            (true, true) => DepartureStatus::Delayed,
            (true, false) => DepartureStatus::Live,
        }
    }
}

/// How much to trust a departure's time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartureStatus {
    /// Timetable only, no live tracking.
    Scheduled,
    /// Tracked and within the delay threshold.
    Live,
    /// Tracked and more than two minutes late.
    Delayed,
}

impl DepartureStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DepartureStatus::Scheduled => "Scheduled",
            DepartureStatus::Live => "Live",
            DepartureStatus::Delayed => "Delayed",
        }
    }
}
