//! Domain types for the departure board.
//!
//! Plain data describing a stop and its upcoming departures, plus the
//! pure time helpers used to present them.

mod departure;
mod stop;
mod time;

pub use departure::{DELAY_THRESHOLD_SECS, Departure, DepartureStatus, Line};
pub use stop::{Coordinates, StopInfo};
pub use time::{NOW_TEXT, format_clock_time, format_clock_time_in, format_minutes, minutes_until};
