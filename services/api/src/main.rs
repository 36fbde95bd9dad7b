use std::time::Duration;

use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use stillwater_api::config::ApiConfig;
use stillwater_api::jobs::JobRunner;
use stillwater_api::router::build_router;
use stillwater_api::state::AppState;
use stillwater_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine; real deployments set the variables directly.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = ApiConfig::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let state = AppState::new(db, &config);

    JobRunner::from_state(&state, Duration::from_secs(config.job_interval_secs)).start();
    info!(
        interval_secs = config.job_interval_secs,
        "background jobs started"
    );

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("api service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received, draining connections");
}
