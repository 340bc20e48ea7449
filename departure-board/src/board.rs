//! Board view model.
//!
//! Turns a [`FeedState`] snapshot into exactly what a renderer needs to draw
//! the board: which panel to show, and for each visible departure its
//! badge, countdown and realtime status. Nothing here touches markup.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::config::StopConfiguration;
use crate::domain::{Departure, DepartureStatus, format_clock_time_in, format_minutes, minutes_until};
use crate::feed::FeedState;

/// Badge colour used when a line has none of its own.
pub const DEFAULT_LINE_COLOR: &str = "#44739e";

/// Departures this close (in minutes) are highlighted as soon.
const SOON_MINUTES: i64 = 3;

/// Clock text for a time the API sent in an unreadable form.
pub const UNKNOWN_CLOCK_TIME: &str = "--:--";

/// Countdown text when the predicted time is unknown.
pub const UNKNOWN_COUNTDOWN: &str = "--";

/// Display options that do not affect fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardOptions {
    pub title: String,
    pub show_stop_name: bool,
    /// When false, badges use the renderer's theme colour.
    pub show_line_colors: bool,
    pub show_realtime_indicator: bool,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            title: "Bus Departures".to_string(),
            show_stop_name: true,
            show_line_colors: true,
            show_realtime_indicator: true,
        }
    }
}

/// How imminent a departure is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Now,
    Soon,
    Later,
}

impl Urgency {
    pub fn from_minutes(minutes: i64) -> Self {
        match minutes {
            m if m <= 0 => Urgency::Now,
            m if m <= SOON_MINUTES => Urgency::Soon,
            _ => Urgency::Later,
        }
    }
}

/// Realtime indicator for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusIndicator {
    pub status: DepartureStatus,
    pub label: &'static str,
}

/// One rendered departure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardRow {
    pub line_number: String,
    /// `None` means "use the theme colour".
    pub line_color: Option<String>,
    pub destination: String,
    /// Timetabled departure as local `HH:MM`, or [`UNKNOWN_CLOCK_TIME`].
    pub scheduled: String,
    /// Whole minutes until the predicted departure, if it is known.
    pub minutes: Option<i64>,
    pub countdown: String,
    pub urgency: Urgency,
    pub indicator: Option<StatusIndicator>,
}

impl BoardRow {
    fn new<Tz>(departure: &Departure, options: &BoardOptions, now: DateTime<Utc>, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let minutes = departure.actual_time.map(|t| minutes_until(t, now));

        let line_color = options.show_line_colors.then(|| {
            departure
                .line
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_LINE_COLOR.to_string())
        });

        let indicator = options.show_realtime_indicator.then(|| {
            let status = departure.status();
            StatusIndicator {
                status,
                label: status.label(),
            }
        });

        Self {
            line_number: departure.line.number.clone(),
            line_color,
            destination: departure.destination.clone(),
            scheduled: departure
                .scheduled_time
                .map(|t| format_clock_time_in(t, tz))
                .unwrap_or_else(|| UNKNOWN_CLOCK_TIME.to_string()),
            minutes,
            countdown: minutes
                .map(format_minutes)
                .unwrap_or_else(|| UNKNOWN_COUNTDOWN.to_string()),
            urgency: minutes.map_or(Urgency::Later, Urgency::from_minutes),
            indicator,
        }
    }
}

/// Main panel of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardPanel {
    /// First load still in progress.
    Loading,
    /// Refresh failed and there is nothing older to show.
    Error { message: String },
    /// Loaded, but no upcoming departures.
    Empty,
    Departures { rows: Vec<BoardRow> },
}

/// Everything needed to draw the board once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub title: String,
    pub stop_name: Option<String>,
    pub panel: BoardPanel,
    /// Set while a refresh runs over already displayed data.
    pub refreshing: bool,
    /// Error from the last refresh, even when stale rows are still shown.
    pub last_error: Option<String>,
}

impl Board {
    /// Build the board from a feed snapshot.
    ///
    /// Rows are trimmed to `config.max_departures`, in feed order. Loading
    /// and error panels only replace the rows when there are no rows to
    /// keep showing.
    pub fn build<Tz>(
        state: &FeedState,
        config: &StopConfiguration,
        options: &BoardOptions,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let stop_name = state
            .stop_info
            .as_ref()
            .filter(|_| options.show_stop_name)
            .map(|stop| stop.display_name().to_string())
            .filter(|name| !name.is_empty());

        let visible = state
            .departures
            .iter()
            .take(config.max_departures as usize);

        let panel = if state.loading && state.departures.is_empty() {
            BoardPanel::Loading
        } else if let (Some(message), true) = (&state.error, state.departures.is_empty()) {
            BoardPanel::Error {
                message: message.clone(),
            }
        } else if state.departures.is_empty() {
            BoardPanel::Empty
        } else {
            BoardPanel::Departures {
                rows: visible.map(|d| BoardRow::new(d, options, now, tz)).collect(),
            }
        };

        Self {
            title: options.title.clone(),
            stop_name,
            panel,
            refreshing: state.loading && state.has_data(),
            last_error: state.error.clone(),
        }
    }
}
