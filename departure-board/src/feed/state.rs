//! Observable feed state.

use serde::Serialize;

use crate::domain::{Departure, StopInfo};

/// Snapshot of everything the presentation layer may show.
///
/// `departures` and `stop_info` always come from the same successful
/// response. A failed refresh leaves them as they were and only sets
/// `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedState {
    pub loading: bool,
    pub error: Option<String>,
    pub stop_info: Option<StopInfo>,
    pub departures: Vec<Departure>,
}

/// Coarse lifecycle phase derived from a [`FeedState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedPhase {
    /// Not configured, or torn down before any response.
    Idle,
    Loading,
    /// Last refresh succeeded.
    Ready,
    /// Last refresh failed; earlier data may still be present.
    Failed,
}

impl FeedState {
    /// State at the start of a session: loading, nothing fetched yet.
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> FeedPhase {
        if self.loading {
            FeedPhase::Loading
        } else if self.error.is_some() {
            FeedPhase::Failed
        } else if self.stop_info.is_some() {
            FeedPhase::Ready
        } else {
            FeedPhase::Idle
        }
    }

    /// Whether there is fetched data to show, possibly stale.
    pub fn has_data(&self) -> bool {
        !self.departures.is_empty()
    }
}
