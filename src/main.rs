use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::info;

use coursehub::router::init_router;
use coursehub::state::AppState;
use coursehub_config::{CorsConfig, DatabaseConfig, JwtConfig, MediaConfig, ServerConfig};
use coursehub_db::{close_db_pool, init_db_pool, run_migrations};
use coursehub_observability::{init_tracing, shutdown_tracer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing(env!("CARGO_CRATE_NAME"));

    let server_config = ServerConfig::from_env();
    let db_config = DatabaseConfig::from_env()?;

    let db = init_db_pool(&db_config)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&db)
        .await
        .context("Failed to run database migrations")?;

    #[cfg(feature = "observability")]
    spawn_metrics_server(&server_config).await?;

    let state = AppState::new(
        db.clone(),
        JwtConfig::from_env(),
        CorsConfig::from_env(),
        MediaConfig::from_env(),
    );
    let app = init_router(state);

    let addr = server_config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🚀 Server running on http://{addr}");
    info!("📚 Swagger UI available at http://{addr}/swagger-ui");
    info!("📖 Scalar UI available at http://{addr}/scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    close_db_pool(db).await;
    shutdown_tracer().await;
    Ok(())
}

/// Serves `/metrics` on its own port so it can stay off the public ingress.
#[cfg(feature = "observability")]
async fn spawn_metrics_server(config: &ServerConfig) -> anyhow::Result<()> {
    use coursehub_observability::{init_metrics, metrics_app};

    let Some(handle) = init_metrics()? else {
        return Ok(());
    };

    let addr = config.metrics_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind metrics listener on {addr}"))?;
    info!("📈 Metrics available at http://{addr}/metrics");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
            tracing::error!(error = %e, "metrics server stopped");
        }
    });

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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}
