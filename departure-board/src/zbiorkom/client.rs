//! zbiorkom.live departures client.
//!
//! Builds the `getDepartures` request for a configured stop, runs it through
//! the injected [`Fetch`] capability and decodes the result.

use tracing::debug;

use crate::config::StopConfiguration;

use super::decode::{StopDepartures, decode_response};
use super::error::ZbiorkomError;
use super::fetch::Fetch;

/// Build the departures URL for a stop.
///
/// # Examples
///
/// ```
/// use departure_board::config::StopConfiguration;
/// use departure_board::zbiorkom::departures_url;
///
/// let config = StopConfiguration::new("dworzec kolejowy/102");
/// assert_eq!(
///     departures_url(&config),
///     "https://api.zbiorkom.live/4.8/kielce/stops/getDepartures?id=dworzec%20kolejowy%2F102&limit=10"
/// );
/// ```
pub fn departures_url(config: &StopConfiguration) -> String {
    format!(
        "{}/{}/stops/getDepartures?id={}&limit={}",
        config.api_base_url,
        config.city,
        urlencoding::encode(&config.stop_id),
        config.request_limit()
    )
}

/// Departures client over any [`Fetch`] implementation.
#[derive(Debug, Clone)]
pub struct ZbiorkomClient<F> {
    fetcher: F,
}

impl<F: Fetch> ZbiorkomClient<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Fetch and decode the departures for the configured stop.
    ///
    /// The result is exactly what upstream sent: not trimmed to
    /// `max_departures`, not re-sorted.
    pub async fn get_departures(
        &self,
        config: &StopConfiguration,
    ) -> Result<StopDepartures, ZbiorkomError> {
        let url = departures_url(config);
        debug!(%url, "requesting departures");

        let response = self.fetcher.fetch(&url).await?;

        if !response.ok() {
            return Err(ZbiorkomError::HttpStatus(response.status));
        }

        let payload = response.json().map_err(|e| ZbiorkomError::Json {
            message: e.to_string(),
            body: Some(response.body.chars().take(500).collect()),
        })?;

        Ok(decode_response(&payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zbiorkom::{MockFetcher, MockReply};
    use serde_json::json;

    fn config() -> StopConfiguration {
        StopConfiguration::new("dworzec-kolejowy102").with_api_base_url("http://localhost:9000")
    }

    #[test]
    fn url_uses_city_and_limit() {
        let config = config().with_city("warszawa").with_max_departures(12);
        assert_eq!(
            departures_url(&config),
            "http://localhost:9000/warszawa/stops/getDepartures?id=dworzec-kolejowy102&limit=17"
        );
    }

    #[tokio::test]
    async fn decodes_successful_response() {
        let fetcher = MockFetcher::new();
        fetcher.push(MockReply::json(json!([
            ["dworzec-kolejowy102", "kielce", "Dworzec Kolejowy"],
            [["t1", "Centrum", [null, null, "4"], null, null, null, null, [1_710_496_800_000i64]]]
        ])));
        let client = ZbiorkomClient::new(fetcher.clone());

        let result = client.get_departures(&config()).await.unwrap();

        assert_eq!(result.stop.name, "Dworzec Kolejowy");
        assert_eq!(result.departures.len(), 1);
        assert_eq!(fetcher.requests(), [departures_url(&config())]);
    }

    #[tokio::test]
    async fn non_success_status_is_error() {
        let fetcher = MockFetcher::new();
        fetcher.push(MockReply::status(502));
        let client = ZbiorkomClient::new(fetcher);

        let err = client.get_departures(&config()).await.unwrap_err();
        assert!(matches!(err, ZbiorkomError::HttpStatus(502)));
        assert_eq!(err.to_string(), "HTTP 502");
    }

    #[tokio::test]
    async fn invalid_json_is_error() {
        let fetcher = MockFetcher::new();
        fetcher.push(MockReply::body(200, "<html>maintenance</html>"));
        let client = ZbiorkomClient::new(fetcher);

        let err = client.get_departures(&config()).await.unwrap_err();
        assert!(matches!(err, ZbiorkomError::Json { body: Some(_), .. }));
    }

    #[tokio::test]
    async fn decode_failure_is_error() {
        let fetcher = MockFetcher::new();
        fetcher.push(MockReply::json(json!([null, []])));
        let client = ZbiorkomClient::new(fetcher);

        let err = client.get_departures(&config()).await.unwrap_err();
        assert!(matches!(err, ZbiorkomError::Decode(_)));
    }

    #[tokio::test]
    async fn network_failure_is_error() {
        let fetcher = MockFetcher::new();
        fetcher.push(MockReply::network_error("connection refused"));
        let client = ZbiorkomClient::new(fetcher);

        let err = client.get_departures(&config()).await.unwrap_err();
        assert_eq!(err.to_string(), "network error: connection refused");
    }
}
