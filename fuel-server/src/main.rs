use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fuel_server::cache::{CacheError, PriceCache};
use fuel_server::config::{ConfigError, ServerConfig};
use fuel_server::upstream::{MockPriceSource, PriceSource, UpstreamClient, UpstreamError};
use fuel_server::web::{AppState, create_router};

/// Errors that stop the server from starting or serving.
#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "fuel server stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::from_env()?;

    match &config.offline_data {
        Some(path) => {
            info!(path = %path.display(), "serving offline price data");
            serve(MockPriceSource::from_file(path)?, &config).await
        }
        None => {
            let client = UpstreamClient::new(config.upstream()?)?;
            serve(client, &config).await
        }
    }
}

async fn serve<S: PriceSource>(source: S, config: &ServerConfig) -> Result<(), ServerError> {
    let cache = PriceCache::load(source, &config.cache).await?;

    let state = AppState::new(Arc::new(cache), config.diagnostics);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        refresh_mins = config.cache.refresh_interval.as_secs() / 60,
        diagnostics = config.diagnostics,
        "fuel price server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
