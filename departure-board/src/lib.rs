//! Departure board for a single public-transit stop.
//!
//! Polls the zbiorkom.live API for upcoming departures, decodes its
//! positional response format, and keeps a live feed state with realtime
//! delay information for a renderer to display.

pub mod board;
pub mod config;
pub mod domain;
pub mod feed;
pub mod web;
pub mod zbiorkom;
