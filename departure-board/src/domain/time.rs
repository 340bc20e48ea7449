//! Time arithmetic and formatting for departure display.
//!
//! Upstream times are absolute instants (UTC). The board shows two things
//! derived from them: a countdown ("5 min", "1 h 10 min") and the local
//! 24-hour clock time.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Text shown when a departure is due now or already in the past.
pub const NOW_TEXT: &str = "now";

/// Whole minutes from `now` until `target`, clamped at zero.
///
/// Partial minutes are truncated, so a departure 59 seconds away is
/// reported as `0`. Departures in the past also report `0`.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use departure_board::domain::minutes_until;
///
/// let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
///
/// assert_eq!(minutes_until(now + Duration::seconds(150), now), 2);
/// assert_eq!(minutes_until(now + Duration::seconds(59), now), 0);
/// assert_eq!(minutes_until(now - Duration::minutes(5), now), 0);
/// ```
pub fn minutes_until(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = target.signed_duration_since(now).num_seconds();
    seconds.div_euclid(60).max(0)
}

/// Render a minute countdown for display.
///
/// # Examples
///
/// ```
/// use departure_board::domain::format_minutes;
///
/// assert_eq!(format_minutes(0), "now");
/// assert_eq!(format_minutes(1), "1 min");
/// assert_eq!(format_minutes(45), "45 min");
/// assert_eq!(format_minutes(120), "2 h");
/// assert_eq!(format_minutes(61), "1 h 1 min");
/// ```
pub fn format_minutes(minutes: i64) -> String {
    if minutes <= 0 {
        return NOW_TEXT.to_string();
    }
    if minutes == 1 {
        return "1 min".to_string();
    }
    if minutes >= 60 {
        let hours = minutes / 60;
        let mins = minutes % 60;
        if mins == 0 {
            return format!("{hours} h");
        }
        return format!("{hours} h {mins} min");
    }
    format!("{minutes} min")
}

/// Format an instant as `HH:MM` in the system's local time zone.
pub fn format_clock_time(instant: DateTime<Utc>) -> String {
    format_clock_time_in(instant, &Local)
}

/// Format an instant as 24-hour `HH:MM` in the given time zone.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeZone, Utc};
/// use departure_board::domain::format_clock_time_in;
///
/// let instant = Utc.with_ymd_and_hms(2024, 3, 15, 22, 5, 0).unwrap();
/// let cet = FixedOffset::east_opt(3600).unwrap();
///
/// assert_eq!(format_clock_time_in(instant, &Utc), "22:05");
/// assert_eq!(format_clock_time_in(instant, &cet), "23:05");
/// ```
pub fn format_clock_time_in<Tz>(instant: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    instant.with_timezone(tz).format("%H:%M").to_string()
}
