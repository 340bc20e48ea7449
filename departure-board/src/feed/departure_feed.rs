//! The departure feed orchestrator.
//!
//! Ties a [`Poller`] to a [`ZbiorkomClient`] and publishes the resulting
//! [`FeedState`] on a `watch` channel.
//!
//! Each tick runs as its own task so a slow response never holds up the
//! schedule. That means ticks can overlap. Two counters keep late results
//! from clobbering newer ones:
//! - the session generation, bumped by `configure` and `teardown`, so
//!   results for a previous stop or a torn-down feed are dropped;
//! - a tick sequence number, so a tick that finishes after a later tick has
//!   already committed is dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, StopConfiguration};
use crate::zbiorkom::{Fetch, StopDepartures, ZbiorkomClient, ZbiorkomError};

use super::poller::Poller;
use super::state::FeedState;

/// State shared between the feed handle and its in-flight ticks.
struct Shared<F> {
    client: ZbiorkomClient<F>,
    state: watch::Sender<FeedState>,
    generation: AtomicU64,
    next_tick: AtomicU64,
    /// Sequence number of the newest tick whose result was committed.
    committed_tick: AtomicU64,
}

impl<F: Fetch> Shared<F> {
    /// Schedule one tick: publish `loading`, then fetch in the background.
    fn tick(self: &Arc<Self>, config: &Arc<StopConfiguration>, generation: u64) {
        let tick = self.next_tick.fetch_add(1, Ordering::SeqCst) + 1;

        if !self.begin(generation) {
            return;
        }

        let shared = Arc::clone(self);
        let config = Arc::clone(config);
        tokio::spawn(async move {
            let outcome = shared.client.get_departures(&config).await;
            shared.finish(generation, tick, outcome);
        });
    }

    fn begin(&self, generation: u64) -> bool {
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            state.loading = true;
            true
        })
    }

    fn finish(
        &self,
        generation: u64,
        tick: u64,
        outcome: Result<StopDepartures, ZbiorkomError>,
    ) {
        let committed = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation
                || tick <= self.committed_tick.load(Ordering::SeqCst)
            {
                return false;
            }
            self.committed_tick.store(tick, Ordering::SeqCst);

            state.loading = false;
            match &outcome {
                Ok(board) => {
                    state.stop_info = Some(board.stop.clone());
                    state.departures = board.departures.clone();
                    state.error = None;
                }
                Err(e) => state.error = Some(e.to_string()),
            }
            true
        });

        match (&outcome, committed) {
            (Ok(board), true) => {
                debug!(tick, departures = board.departures.len(), "departures refreshed")
            }
            (Err(e), true) => warn!(tick, error = %e, "failed to refresh departures"),
            (_, false) => debug!(tick, "discarding superseded tick result"),
        }
    }
}

/// Polls one stop and publishes its departures.
///
/// Create with [`DepartureFeed::new`], then [`configure`](Self::configure)
/// to start polling. Readers either take a [`snapshot`](Self::snapshot) or
/// [`subscribe`](Self::subscribe) for change notifications.
pub struct DepartureFeed<F> {
    shared: Arc<Shared<F>>,
    poller: Poller,
    config: Option<Arc<StopConfiguration>>,
}

impl<F: Fetch> DepartureFeed<F> {
    pub fn new(fetcher: F) -> Self {
        let (state, _) = watch::channel(FeedState::default());

        Self {
            shared: Arc::new(Shared {
                client: ZbiorkomClient::new(fetcher),
                state,
                generation: AtomicU64::new(0),
                next_tick: AtomicU64::new(0),
                committed_tick: AtomicU64::new(0),
            }),
            poller: Poller::new(),
            config: None,
        }
    }

    /// Start a new session for `config` and begin polling.
    ///
    /// An invalid config is rejected before anything changes: the previous
    /// session, if any, keeps running. On success the state is reset, the
    /// first fetch starts immediately and the previous schedule is replaced.
    /// Must be called from within a tokio runtime.
    pub fn configure(&mut self, config: StopConfiguration) -> Result<(), ConfigError> {
        config.validate()?;

        info!(
            stop_id = %config.stop_id,
            city = %config.city,
            interval_secs = config.poll_interval_secs,
            "configuring departure feed"
        );

        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        self.shared.state.send_replace(FeedState::default());
        self.config = Some(Arc::new(config));
        self.start_polling();

        Ok(())
    }

    /// Stop polling and end the session.
    ///
    /// In-flight fetches are not cancelled, but their results are dropped.
    /// The last published state stays readable.
    pub fn teardown(&mut self) {
        self.poller.stop();
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        self.shared.state.send_if_modified(|state| {
            let was_loading = state.loading;
            state.loading = false;
            was_loading
        });

        if self.config.take().is_some() {
            info!("departure feed torn down");
        }
    }

    /// Stop polling but keep the session, e.g. while the board is hidden.
    pub fn pause(&mut self) {
        self.poller.stop();
    }

    /// Restart polling with the current configuration, fetching immediately.
    ///
    /// No-op when not configured.
    pub fn resume(&mut self) {
        if self.config.is_some() {
            self.start_polling();
        }
    }

    fn start_polling(&mut self) {
        let Some(config) = self.config.clone() else {
            return;
        };
        let shared = Arc::clone(&self.shared);
        let generation = shared.generation.load(Ordering::SeqCst);
        let interval = config.poll_interval();

        self.poller
            .start(interval, move || shared.tick(&config, generation));
    }
}

impl<F> DepartureFeed<F> {
    /// Current state.
    pub fn snapshot(&self) -> FeedState {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.shared.state.subscribe()
    }

    /// Configuration of the current session.
    pub fn config(&self) -> Option<&StopConfiguration> {
        self.config.as_deref()
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }
}

impl<F> Drop for DepartureFeed<F> {
    fn drop(&mut self) {
        self.poller.stop();
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
    }
}
