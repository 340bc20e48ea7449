//! Board configuration.
//!
//! [`StopConfiguration`] is what the feed needs to poll one stop.
//! [`BoardConfig`] is the flat, card-style document users write (JSON file
//! or `DEPARTURE_BOARD_*` environment variables); it fills gaps with named
//! defaults and splits into a validated `StopConfiguration` plus the
//! display-only [`BoardOptions`].

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::board::BoardOptions;

/// Default zbiorkom API base URL.
pub const DEFAULT_API_URL: &str = "https://api.zbiorkom.live/4.8";

/// Default city slug.
pub const DEFAULT_CITY: &str = "kielce";

/// Default number of departures shown.
pub const DEFAULT_MAX_DEPARTURES: u32 = 5;

/// Default refresh interval in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Longest accepted refresh interval in seconds (one day).
pub const MAX_POLL_INTERVAL_SECS: u64 = 86_400;

/// Extra departures requested beyond what is shown, so rows filtered out
/// at render time still leave a full board.
pub const REQUEST_MARGIN: u32 = 5;

/// Environment variable prefix used by [`BoardConfig::from_env`].
const ENV_PREFIX: &str = "DEPARTURE_BOARD_";

/// Errors from building or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("stop_id is required")]
    MissingStopId,

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} must be at least 1")]
    Zero(&'static str),

    #[error("{name} must be at most {max}")]
    TooLarge { name: &'static str, max: u64 },

    #[error("failed to read config file: {0}")]
    Read(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: String, value: String },
}

/// What to poll and how often.
///
/// Immutable for the lifetime of one feed session; configuring the feed
/// with a new value starts a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopConfiguration {
    /// API base URL, without trailing slash
    pub api_base_url: String,
    /// Stop identifier as used by zbiorkom (e.g. "dworzec-kolejowy102")
    pub stop_id: String,
    /// City slug (first path segment after the base URL)
    pub city: String,
    /// Departures shown on the board
    pub max_departures: u32,
    /// Seconds between refreshes
    pub poll_interval_secs: u64,
}

impl StopConfiguration {
    /// Create a config for the given stop with default API, city and timings.
    pub fn new(stop_id: impl Into<String>) -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            stop_id: stop_id.into(),
            city: DEFAULT_CITY.to_string(),
            max_departures: DEFAULT_MAX_DEPARTURES,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }

    /// Set a custom base URL (for testing or a self-hosted API).
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    pub fn with_max_departures(mut self, n: u32) -> Self {
        self.max_departures = n;
        self
    }

    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Check the config can be polled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stop_id.trim().is_empty() {
            return Err(ConfigError::MissingStopId);
        }
        if self.city.trim().is_empty() {
            return Err(ConfigError::Empty("city"));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Empty("api_url"));
        }
        if self.max_departures == 0 {
            return Err(ConfigError::Zero("max_departures"));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Zero("update_interval"));
        }
        if self.poll_interval_secs > MAX_POLL_INTERVAL_SECS {
            return Err(ConfigError::TooLarge {
                name: "update_interval",
                max: MAX_POLL_INTERVAL_SECS,
            });
        }
        Ok(())
    }

    /// Number of departures to request from the API.
    pub fn request_limit(&self) -> u32 {
        self.max_departures.saturating_add(REQUEST_MARGIN)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

fn default_title() -> String {
    "Bus Departures".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_departures() -> u32 {
    DEFAULT_MAX_DEPARTURES
}

fn default_update_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

/// User-facing board configuration with defaults for every key but `stop_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub stop_id: String,
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_true")]
    pub show_stop_name: bool,
    #[serde(default = "default_true")]
    pub show_line_colors: bool,
    #[serde(default = "default_true")]
    pub show_realtime_indicator: bool,
    #[serde(default = "default_max_departures")]
    pub max_departures: u32,
    /// Seconds between refreshes
    #[serde(default = "default_update_interval")]
    pub update_interval: u64,
}

impl BoardConfig {
    /// Load from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Read(e.to_string()))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read `DEPARTURE_BOARD_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from a variable lookup. Unset variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(&format!("{ENV_PREFIX}{key}"));

        let mut config = Self::from_json("{}")?;

        if let Some(v) = get("API_URL") {
            config.api_url = v;
        }
        if let Some(v) = get("STOP_ID") {
            config.stop_id = v;
        }
        if let Some(v) = get("CITY") {
            config.city = v;
        }
        if let Some(v) = get("TITLE") {
            config.title = v;
        }
        if let Some(v) = get("SHOW_STOP_NAME") {
            config.show_stop_name = parse_env("SHOW_STOP_NAME", &v)?;
        }
        if let Some(v) = get("SHOW_LINE_COLORS") {
            config.show_line_colors = parse_env("SHOW_LINE_COLORS", &v)?;
        }
        if let Some(v) = get("SHOW_REALTIME_INDICATOR") {
            config.show_realtime_indicator = parse_env("SHOW_REALTIME_INDICATOR", &v)?;
        }
        if let Some(v) = get("MAX_DEPARTURES") {
            config.max_departures = parse_env("MAX_DEPARTURES", &v)?;
        }
        if let Some(v) = get("UPDATE_INTERVAL") {
            config.update_interval = parse_env("UPDATE_INTERVAL", &v)?;
        }

        Ok(config)
    }

    /// Split into the validated stop config and the display options.
    pub fn into_parts(self) -> Result<(StopConfiguration, BoardOptions), ConfigError> {
        let stop = StopConfiguration {
            api_base_url: self.api_url.trim_end_matches('/').to_string(),
            stop_id: self.stop_id,
            city: self.city,
            max_departures: self.max_departures,
            poll_interval_secs: self.update_interval,
        };
        stop.validate()?;

        let options = BoardOptions {
            title: self.title,
            show_stop_name: self.show_stop_name,
            show_line_colors: self.show_line_colors,
            show_realtime_indicator: self.show_realtime_indicator,
        };

        Ok((stop, options))
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name: format!("{ENV_PREFIX}{key}"),
        value: value.to_string(),
    })
}
