//! Fixed-interval tick scheduling.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Runs a callback immediately and then every `interval`.
///
/// Ticks are wall-clock periodic: the callback is expected to hand off any
/// slow work (e.g. spawn a fetch) so it never delays the next tick. At most
/// one schedule exists per poller; starting again replaces it. Dropping the
/// poller stops it.
#[derive(Debug, Default)]
pub struct Poller {
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the schedule.
    ///
    /// `on_tick` runs once before this returns, then on every interval.
    /// Must be called from within a tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero, or so large that the first deadline
    /// overflows. [`StopConfiguration::validate`](crate::config::StopConfiguration::validate)
    /// bounds the interval before it gets here.
    pub fn start<F>(&mut self, interval: Duration, mut on_tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.stop();

        on_tick();

        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.handle = Some(tokio::spawn(async move {
            loop {
                ticker.tick().await;
                on_tick();
            }
        }));
    }

    /// Cancel the schedule. No-op when not running.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
