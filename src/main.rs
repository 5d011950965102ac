use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use clubscout_api::api::{create_router, AppState};
use clubscout_api::config::Config;
use clubscout_api::middleware::RateLimiter;
use clubscout_api::services::providers::HttpAiProvider;
use clubscout_api::services::Catalog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let catalog = Catalog::from_path(&config.catalog_path)?;

    let provider = Arc::new(HttpAiProvider::new(
        config.ai_api_url.clone(),
        config.ai_api_key.clone(),
        Duration::from_secs(config.ai_timeout_secs),
    ));

    let state = AppState::new(catalog, provider);
    let limiter = RateLimiter::new(
        config.rate_limit_max_requests,
        Duration::from_secs(config.rate_limit_window_secs),
    )
    .trust_forwarded_for(config.trust_forwarded_for);
    let app = create_router(state, limiter);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server running");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
