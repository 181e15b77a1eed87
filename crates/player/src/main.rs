use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ringside_player::cache::StateCache;
use ringside_player::config::PlayerConfig;
use ringside_player::fetch::HttpFetcher;
use ringside_player::runtime::Runtime;
use ringside_player::sink::LogSink;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ringside_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = PlayerConfig::from_env();
    tracing::info!(
        server = %config.server_url,
        cache = %config.cache_path.display(),
        "Loaded player configuration"
    );

    // --- Runtime ---
    let fetcher = Arc::new(HttpFetcher::new(&config.server_url, &config.access_token));
    let cache = StateCache::new(&config.cache_path);
    let runtime = Runtime::new(fetcher, cache, Arc::new(LogSink));

    // --- Shutdown wiring ---
    let cancel = CancellationToken::new();
    let stopper = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        stopper.cancel();
    });

    runtime.run(cancel).await;
    tracing::info!("Player stopped");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the player
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, a kiosk supervisor).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
