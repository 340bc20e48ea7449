//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::watch;

use crate::board::BoardOptions;
use crate::config::StopConfiguration;
use crate::feed::FeedState;

/// Shared application state.
///
/// Read-only view of a running feed plus what is needed to render it.
#[derive(Clone)]
pub struct AppState {
    /// Latest feed state
    pub feed: watch::Receiver<FeedState>,

    /// Configuration the feed was started with
    pub config: Arc<StopConfiguration>,

    /// Board display options
    pub options: Arc<BoardOptions>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        feed: watch::Receiver<FeedState>,
        config: StopConfiguration,
        options: BoardOptions,
    ) -> Self {
        Self {
            feed,
            config: Arc::new(config),
            options: Arc::new(options),
        }
    }

    pub fn snapshot(&self) -> FeedState {
        self.feed.borrow().clone()
    }
}
