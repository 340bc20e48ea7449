//! Mock fetcher for testing without API access.
//!
//! Serves scripted replies in order and records every requested URL. Once
//! the script runs out, the last reply keeps being served, so a poller can
//! keep ticking against a fixed response. Only the most recent URLs are
//! kept, so a long offline run does not grow without bound.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use super::error::FetchError;
use super::fetch::{Fetch, FetchResponse};

/// Number of recent request URLs kept.
const REQUEST_LOG_LIMIT: usize = 100;

/// One scripted reply.
#[derive(Debug, Clone)]
pub struct MockReply {
    outcome: Result<FetchResponse, String>,
    delay: Duration,
}

impl MockReply {
    /// 200 with the given JSON body.
    pub fn json(value: Value) -> Self {
        Self::body(200, value.to_string())
    }

    /// Given status with an empty body.
    pub fn status(status: u16) -> Self {
        Self::body(status, "")
    }

    pub fn body(status: u16, body: impl Into<String>) -> Self {
        Self {
            outcome: Ok(FetchResponse::new(status, body)),
            delay: Duration::ZERO,
        }
    }

    /// The request fails before any response arrives.
    pub fn network_error(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            delay: Duration::ZERO,
        }
    }

    /// Resolve only after `delay` (tokio time, so paused clocks apply).
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<MockReply>,
    last: Option<MockReply>,
    requests: VecDeque<String>,
    request_count: usize,
}

/// Scripted [`Fetch`] implementation. Clones share the same script.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    script: Arc<Mutex<Script>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fetcher that always answers with the JSON stored at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path)
            .map_err(|e| FetchError::Transport(format!("failed to read {path:?}: {e}")))?;

        let fetcher = Self::new();
        fetcher.push(MockReply::body(200, body));
        Ok(fetcher)
    }

    /// Queue a reply.
    pub fn push(&self, reply: MockReply) {
        self.lock().replies.push_back(reply);
    }

    /// Most recent requested URLs, oldest first.
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.iter().cloned().collect()
    }

    /// Total number of requests, including ones no longer in [`requests`](Self::requests).
    pub fn request_count(&self) -> usize {
        self.lock().request_count
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        // A panicking test thread must not hide the script from the others.
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_reply(&self, url: &str) -> Option<MockReply> {
        let mut script = self.lock();
        if script.requests.len() == REQUEST_LOG_LIMIT {
            script.requests.pop_front();
        }
        script.requests.push_back(url.to_string());
        script.request_count += 1;

        match script.replies.pop_front() {
            Some(reply) => {
                script.last = Some(reply.clone());
                Some(reply)
            }
            None => script.last.clone(),
        }
    }
}

impl Fetch for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let reply = self
            .next_reply(url)
            .ok_or_else(|| FetchError::Transport(format!("no mock reply scripted for {url}")))?;

        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }

        reply.outcome.map_err(FetchError::Transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn serves_replies_in_order_then_repeats_last() {
        let mock = MockFetcher::new();
        mock.push(MockReply::status(500));
        mock.push(MockReply::json(json!([["s"]])));

        assert_eq!(mock.fetch("a").await.unwrap().status, 500);
        assert_eq!(mock.fetch("b").await.unwrap().body, r#"[["s"]]"#);
        assert_eq!(mock.fetch("c").await.unwrap().body, r#"[["s"]]"#);
        assert_eq!(mock.requests(), ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn request_log_keeps_most_recent() {
        let mock = MockFetcher::new();
        mock.push(MockReply::status(204));

        for i in 0..REQUEST_LOG_LIMIT + 50 {
            mock.fetch(&format!("u{i}")).await.unwrap();
        }

        let requests = mock.requests();
        assert_eq!(mock.request_count(), REQUEST_LOG_LIMIT + 50);
        assert_eq!(requests.len(), REQUEST_LOG_LIMIT);
        assert_eq!(requests.first().map(String::as_str), Some("u50"));
        assert_eq!(requests.last().map(String::as_str), Some("u149"));
    }

    #[tokio::test]
    async fn empty_script_is_network_error() {
        let mock = MockFetcher::new();
        assert!(mock.fetch("a").await.is_err());
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_reply_waits() {
        let mock = MockFetcher::new();
        mock.push(MockReply::status(204).delayed(Duration::from_secs(5)));

        let start = tokio::time::Instant::now();
        mock.fetch("a").await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn serves_sample_file() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample_departures.json");
        let mock = MockFetcher::from_file(path).unwrap();

        let response = mock.fetch("a").await.unwrap();
        assert!(response.ok());
        assert!(response.json().unwrap().is_array());
    }

    #[test]
    fn missing_file_is_error() {
        assert!(MockFetcher::from_file("/nonexistent/departures.json").is_err());
    }
}
