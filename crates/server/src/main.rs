//! HTTP API over the mod statistics scraper.

mod config;
mod error;
mod routes;
mod shutdown;

use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use routes::AppState;

/// Extra time granted to a request on top of the upstream timeout, so an
/// upstream timeout is reported as such rather than cut off.
const REQUEST_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env()?;
    let state = AppState::from_config(&config).context("failed to set up upstream clients")?;
    let app = routes::router(state, &config.img_dir, Duration::from_secs(config.timeout) + REQUEST_GRACE);

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    info!(addr = %config.addr, img_dir = %config.img_dir.display(), "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}
