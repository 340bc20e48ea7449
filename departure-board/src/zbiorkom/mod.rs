//! zbiorkom.live departures API.
//!
//! This module fetches and decodes departure boards from the zbiorkom.live
//! transit API.
//!
//! Key characteristics of the API:
//! - Responses are positional JSON arrays with no field names
//! - Times are epoch milliseconds
//! - A numeric delay means the vehicle is tracked live; anything else
//!   means timetable only

mod client;
mod decode;
mod error;
mod fetch;
mod mock;

pub use client::{ZbiorkomClient, departures_url};
pub use decode::{StopDepartures, decode_departure, decode_response, decode_stop, parse_instant};
pub use error::{DecodeError, FetchError, ZbiorkomError};
pub use fetch::{Fetch, FetchResponse, HttpFetcher, HttpFetcherConfig};
pub use mock::{MockFetcher, MockReply};
