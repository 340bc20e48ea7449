//! HTTP route handlers.

use axum::{Json, Router, extract::State, routing::get};
use chrono::{Local, Utc};

use crate::board::Board;
use crate::feed::FeedState;

use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/state", get(feed_state))
        .route("/api/board", get(board))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Raw feed state.
async fn feed_state(State(state): State<AppState>) -> Json<FeedState> {
    Json(state.snapshot())
}

/// Board view model in the server's local time zone.
async fn board(State(state): State<AppState>) -> Json<Board> {
    let snapshot = state.snapshot();
    Json(Board::build(
        &snapshot,
        &state.config,
        &state.options,
        Utc::now(),
        &Local,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use chrono::TimeZone;
    use serde_json::Value;
    use tokio::sync::watch;
    use tower::ServiceExt;

    use crate::board::BoardOptions;
    use crate::config::StopConfiguration;
    use crate::domain::{Departure, Line, StopInfo};

    fn app(state: FeedState) -> Router {
        let (_tx, rx) = watch::channel(state);
        create_router(AppState::new(
            rx,
            StopConfiguration::new("dworzec-kolejowy102"),
            BoardOptions::default(),
        ))
    }

    fn loaded() -> FeedState {
        let far_future = Utc.with_ymd_and_hms(2099, 1, 1, 12, 0, 0).unwrap();
        FeedState {
            loading: false,
            error: None,
            stop_info: Some(StopInfo {
                stop_id: "dworzec-kolejowy102".into(),
                city: "kielce".into(),
                name: "Dworzec Kolejowy".into(),
                full_name: "Dworzec Kolejowy".into(),
                coordinates: Some([50.8736, 20.6185]),
            }),
            departures: vec![Departure::new(
                "t1",
                "Centrum",
                Line {
                    number: "12".into(),
                    color: None,
                },
                Some(far_future),
                Some(far_future),
                Some(37.0),
                None,
            )],
        }
    }

    async fn get_json(app: Router, uri: &str) -> Value {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_ok() {
        let response = app(FeedState::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn state_endpoint_serializes_feed() {
        let json = get_json(app(loaded()), "/api/state").await;

        assert_eq!(json["loading"], false);
        assert_eq!(json["stop_info"]["name"], "Dworzec Kolejowy");
        assert_eq!(json["departures"][0]["delay_seconds"], 37.0);
        assert_eq!(json["departures"][0]["is_realtime"], true);
        assert_eq!(json["departures"][0]["scheduled_time"], "2099-01-01T12:00:00Z");
    }

    #[tokio::test]
    async fn board_endpoint_renders_rows() {
        let json = get_json(app(loaded()), "/api/board").await;

        assert_eq!(json["title"], "Bus Departures");
        assert_eq!(json["stop_name"], "Dworzec Kolejowy");
        assert_eq!(json["panel"]["kind"], "departures");
        assert_eq!(json["panel"]["rows"][0]["line_number"], "12");
        assert_eq!(json["panel"]["rows"][0]["indicator"]["status"], "live");
    }

    #[tokio::test]
    async fn board_endpoint_while_loading() {
        let json = get_json(app(FeedState::loading()), "/api/board").await;
        assert_eq!(json["panel"]["kind"], "loading");
    }
}
