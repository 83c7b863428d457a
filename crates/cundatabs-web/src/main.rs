mod api;
mod config;
mod dto;
mod error;
mod middleware;
mod state;
mod static_files;
mod sweeper;

use std::sync::Arc;

use cundatabs_core::{Clock, SystemClock, TabStore, Tier};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cundatabs_web=debug,cundatabs_core=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load()?;
    let bind_addr = config.bind_addr;

    let store = TabStore::open(&config.storage.tabs_dir)?;
    let limiters = Arc::new(config.rate_limit.build_tiers());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let shutdown = CancellationToken::new();
    let sweeper = sweeper::spawn_sweeper(
        limiters.clone(),
        clock.clone(),
        config.rate_limit.sweep_interval(),
        shutdown.clone(),
    );

    for tier in Tier::ALL {
        let tier_config = limiters.limiter(tier).config();
        tracing::info!(
            "Rate limit {tier}: {} requests per {}s",
            tier_config.max_requests,
            tier_config.window.as_secs(),
        );
    }
    tracing::info!("Tablatures stored in {}", store.dir().display());

    let state = AppState {
        config: Arc::new(config),
        limiters,
        store: Arc::new(store),
        clock,
    };
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("cundatabs-web listening on http://{}", bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    sweeper.await?;
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => tracing::info!("Shutting down"),
            Err(e) => {
                tracing::error!("Failed to listen for shutdown signal: {e}");
                shutdown.cancelled().await;
            }
        },
        _ = shutdown.cancelled() => {}
    }
    shutdown.cancel();
}
