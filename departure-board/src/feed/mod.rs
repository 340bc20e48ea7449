//! Periodic departure refresh.
//!
//! A [`DepartureFeed`] fetches the configured stop immediately, then on a
//! fixed interval, and keeps the last good data visible across failed
//! refreshes.

mod departure_feed;
mod poller;
mod state;


pub use departure_feed::DepartureFeed;
pub use poller::Poller;
pub use state::{FeedPhase, FeedState};
