//! Decoding of the positional `getDepartures` payload.
//!
//! The API sends arrays without field names:
//!
//! ```text
//! [
//!   [stop_id, city, name, [coord, coord], ...],
//!   [
//!     [trip_id, destination, [_, _, line, _, _, color], _, _, vehicle, _, [scheduled, actual, delay]],
//!     ...
//!   ]
//! ]
//! ```
//!
//! Every index is treated as optional. Only a missing stop descriptor fails
//! the whole response; a departure with bad fields decodes with defaults.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tracing::debug;

use crate::domain::{Coordinates, Departure, Line, StopInfo};

use super::error::DecodeError;

/// Position of each field inside a departure descriptor.
mod dep {
    pub const TRIP_ID: usize = 0;
    pub const DESTINATION: usize = 1;
    pub const LINE: usize = 2;
    pub const VEHICLE_ID: usize = 5;
    pub const TIMES: usize = 7;
}

/// Position of each field inside the line descriptor.
mod line {
    pub const NUMBER: usize = 2;
    pub const COLOR: usize = 5;
}

/// Position of each field inside the time descriptor.
mod times {
    pub const SCHEDULED: usize = 0;
    pub const ACTUAL: usize = 1;
    pub const DELAY: usize = 2;
}

/// A decoded departures response.
#[derive(Debug, Clone, PartialEq)]
pub struct StopDepartures {
    pub stop: StopInfo,
    /// In upstream order; never re-sorted.
    pub departures: Vec<Departure>,
}

/// Decode a full `getDepartures` response.
pub fn decode_response(data: &Value) -> Result<StopDepartures, DecodeError> {
    let items = data.as_array().ok_or(DecodeError::NotAnArray)?;

    let stop = match items.first() {
        None | Some(Value::Null) => return Err(DecodeError::MissingStop),
        Some(stop) => decode_stop(stop)?,
    };

    let raw_departures = items.get(1).and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]);

    let departures: Vec<Departure> = raw_departures.iter().map(decode_departure).collect();

    let untimed = departures.iter().filter(|d| d.actual_time.is_none()).count();
    if untimed > 0 {
        debug!(untimed, "departures without a readable predicted time");
    }

    Ok(StopDepartures { stop, departures })
}

/// Decode the stop descriptor (index 0 of the response).
pub fn decode_stop(stop: &Value) -> Result<StopInfo, DecodeError> {
    if !stop.is_array() {
        return Err(DecodeError::StopNotArray);
    }

    // The API only sends one name; full_name mirrors it.
    let name = text(at(stop, 2));

    Ok(StopInfo {
        stop_id: text(at(stop, 0)),
        city: text(at(stop, 1)),
        full_name: name.clone(),
        name,
        coordinates: coordinates(at(stop, 3)),
    })
}

/// Decode one departure descriptor.
///
/// Never fails: missing or malformed fields take empty defaults, and a time
/// that cannot be read is `None`.
pub fn decode_departure(raw: &Value) -> Departure {
    let line_info = at(raw, dep::LINE);
    let time_info = at(raw, dep::TIMES);

    let scheduled_time = parse_instant(time_info.and_then(|t| at(t, times::SCHEDULED)));
    let actual_time = parse_instant(time_info.and_then(|t| at(t, times::ACTUAL)));

    // Realtime means "the API sent a number", regardless of its value.
    let delay_seconds = time_info
        .and_then(|t| at(t, times::DELAY))
        .and_then(Value::as_f64);

    let line = Line {
        number: text(line_info.and_then(|l| at(l, line::NUMBER))),
        color: line_info
            .and_then(|l| at(l, line::COLOR))
            .map(|c| text(Some(c)))
            .filter(|c| !c.is_empty()),
    };

    let vehicle_id = at(raw, dep::VEHICLE_ID)
        .filter(|v| is_truthy(v))
        .map(|v| text(Some(v)));

    Departure::new(
        text(at(raw, dep::TRIP_ID)),
        text(at(raw, dep::DESTINATION)),
        line,
        scheduled_time,
        actual_time,
        delay_seconds,
        vehicle_id,
    )
}

/// Parse an upstream timestamp: epoch milliseconds or an RFC 3339 string.
///
/// Fractional milliseconds round to the nearest millisecond.
pub fn parse_instant(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::Number(n) => {
            let millis = match n.as_i64() {
                Some(ms) => ms,
                None => n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)?,
            };
            Utc.timestamp_millis_opt(millis).single()
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}

/// Element `index` of an array, treating `null` as absent.
fn at(value: &Value, index: usize) -> Option<&Value> {
    value.as_array()?.get(index).filter(|v| !v.is_null())
}

/// Scalar as display text; anything else is empty.
fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn coordinates(value: Option<&Value>) -> Option<Coordinates> {
    let pair = value?.as_array()?;
    match pair.as_slice() {
        [a, b, ..] => Some([a.as_f64()?, b.as_f64()?]),
        _ => None,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn delay_strategy() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i32>().prop_map(|d| json!(d)),
            (-600.0f64..600.0).prop_map(|d| json!(d)),
            Just(json!(null)),
            "[a-z0-9]{0,4}".prop_map(|s| json!(s)),
        ]
    }

    proptest! {
        #[test]
        fn flags_follow_raw_delay(delay in delay_strategy()) {
            let raw = json!(["t", "X", [], null, null, null, null, [1_710_496_800_000i64, 1_710_496_800_000i64, delay.clone()]]);
            let dep = decode_departure(&raw);

            prop_assert_eq!(dep.is_realtime, delay.is_number());
            prop_assert!(!dep.is_delayed || dep.is_realtime);
            prop_assert_eq!(dep.is_delayed, delay.as_f64().is_some_and(|d| d > 120.0));
            prop_assert_eq!(dep.delay_seconds, delay.as_f64());
        }

        #[test]
        fn decoding_is_deterministic(delays in proptest::collection::vec(delay_strategy(), 0..8)) {
            let departures: Vec<Value> = delays
                .into_iter()
                .enumerate()
                .map(|(i, d)| json!([format!("t{i}"), "X", [], null, null, null, null, [1_710_496_800_000i64, 1_710_496_860_000i64, d]]))
                .collect();
            let data = json!([["s", "kielce", "Stop"], departures]);

            let first = decode_response(&data).unwrap();
            let second = decode_response(&data).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
