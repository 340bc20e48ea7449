//! Web layer for the departure board.
//!
//! Serves the feed state and the rendered board as JSON for an external
//! renderer.

mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
