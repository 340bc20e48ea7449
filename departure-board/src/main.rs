use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use departure_board::board::BoardOptions;
use departure_board::config::{BoardConfig, StopConfiguration};
use departure_board::feed::DepartureFeed;
use departure_board::web::{AppState, create_router};
use departure_board::zbiorkom::{Fetch, HttpFetcher, HttpFetcherConfig, MockFetcher};

/// Address the board listens on unless `DEPARTURE_BOARD_ADDR` is set.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "departure_board=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // A config file wins over individual environment variables
    let board_config = match std::env::var("DEPARTURE_BOARD_CONFIG") {
        Ok(path) => {
            info!(%path, "loading board config from file");
            BoardConfig::load(path)?
        }
        Err(_) => BoardConfig::from_env()?,
    };
    let (stop_config, options) = board_config.into_parts()?;

    let addr: SocketAddr = std::env::var("DEPARTURE_BOARD_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()?;

    // Serve a recorded response instead of calling the API
    match std::env::var("DEPARTURE_BOARD_MOCK_FILE") {
        Ok(path) => {
            warn!(%path, "using mock departures, no API calls will be made");
            run(MockFetcher::from_file(path)?, stop_config, options, addr).await
        }
        Err(_) => {
            let fetcher = HttpFetcher::new(HttpFetcherConfig::default())?;
            run(fetcher, stop_config, options, addr).await
        }
    }
}

async fn run<F: Fetch>(
    fetcher: F,
    stop_config: StopConfiguration,
    options: BoardOptions,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut feed = DepartureFeed::new(fetcher);
    feed.configure(stop_config.clone())?;

    let state = AppState::new(feed.subscribe(), stop_config, options);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "departure board listening");
    info!("  GET  /health      - Health check");
    info!("  GET  /api/state   - Raw feed state");
    info!("  GET  /api/board   - Board view model");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    feed.teardown();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}
