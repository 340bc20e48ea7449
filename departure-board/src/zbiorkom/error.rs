//! Zbiorkom client error types.

/// Transport-level failure: no HTTP response was received.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (connection refused, DNS, timeout, ...)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failure reported by a non-reqwest transport
    #[error("network error: {0}")]
    Transport(String),
}

/// The payload did not have the positional shape of a departures response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Top-level value is not an array
    #[error("response is not an array")]
    NotAnArray,

    /// Index 0 is absent or null
    #[error("response has no stop descriptor")]
    MissingStop,

    /// Index 0 is present but not an array
    #[error("stop descriptor is not an array")]
    StopNotArray,
}

/// Errors from one departures request, end to end.
///
/// The `Display` text is what the board shows to users.
#[derive(Debug, thiserror::Error)]
pub enum ZbiorkomError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// API returned a non-2xx status
    #[error("HTTP {0}")]
    HttpStatus(u16),

    /// Body was not valid JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
