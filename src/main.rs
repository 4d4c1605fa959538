use anyhow::Context;
use std::sync::Arc;
use steel_power_api::{routes, services::UsageService, Config, Dataset};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("Starting steel-power-api");

    let cfg_path = std::env::var("APP_CONFIG").unwrap_or_else(|_| "config/config.yaml".into());
    let cfg = Config::load(&cfg_path)?;
    info!(path = %cfg_path, "Configuration loaded");

    // The dataset is read once, before the listener accepts traffic.
    let dataset = Dataset::load(&cfg.dataset.path)
        .with_context(|| format!("Failed to load dataset {}", cfg.dataset.path.display()))?;
    info!(
        path = %cfg.dataset.path.display(),
        records = dataset.len(),
        missing_timestamps = dataset.missing_timestamps(),
        "Dataset loaded"
    );
    for (day, count) in dataset.weekend_day_counts() {
        info!(day = %day, count, "Weekend rows");
    }

    let service = UsageService::new(Arc::new(dataset));
    let app = routes::create_router(service, &cfg.cors);

    let addr = cfg.api_bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Application shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
