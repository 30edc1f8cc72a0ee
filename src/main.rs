use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use ticker_stats::server::{self, AppState, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialise tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = ServerConfig::from_env()?;
    let addr = cfg.socket_addr()?;

    if cfg.access_token.is_none() {
        tracing::warn!("ACCESS_TOKEN is not set; upstream requests will be unauthenticated");
    }

    let client = cfg.build_client()?;
    let app = server::router(AppState::new(client));

    tracing::info!(
        upstream = %cfg.upstream_base_url,
        cache_ttl_ms = cfg.cache_ttl.as_millis() as u64,
        fallback = cfg.fallback_policy.as_str(),
        "ticker-stats listening on http://{addr}"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, gracefully stopping…");
}
