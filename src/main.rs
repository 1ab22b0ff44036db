mod config;
mod delivery;
mod domain;
mod repository;
mod telemetry;
mod usecase;

use std::sync::Arc;

use anyhow::Context;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::EnvFilter;

use crate::config::AppEnv;
use crate::repository::postgres::{create_pool, PostgresBookmarkRepository};
use crate::usecase::bookmarks::BookmarksUseCase;
use crate::usecase::contracts::BookmarkRepository;

pub struct AppState<R>
where
    R: BookmarkRepository,
{
    pub bookmarks_usecase: BookmarksUseCase<R>,
    pub api_token: Arc<str>,
    pub app_env: AppEnv,
    pub metrics_handle: PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::AppConfig::from_env().context("failed to load configuration")?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Initialize tracing subscriber with optional OpenTelemetry layer
    let tracer_provider = if config.telemetry_enabled {
        let telemetry_config = telemetry::TelemetryConfig::from(&config);
        let provider = telemetry::init_telemetry_with_subscriber(&telemetry_config, env_filter)
            .map_err(|e| anyhow::anyhow!("failed to initialize telemetry: {e}"))?;
        Some(provider)
    } else {
        telemetry::init_subscriber_without_telemetry(env_filter, config.app_env);
        None
    };

    tracing::info!(app_env = config.app_env.as_str(), "starting the bookmarks service");

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;
    metrics_process::Collector::default().describe();
    tracing::info!("prometheus metrics initialized");

    let pool = create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("failed to create database pool")?;
    tracing::info!("database pool created");

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("database migrations applied");

    let bookmark_repository = PostgresBookmarkRepository::new(pool);
    let bookmarks_usecase = BookmarksUseCase::new(bookmark_repository);

    let shared_state = Arc::new(AppState {
        bookmarks_usecase,
        api_token: Arc::from(config.api_token),
        app_env: config.app_env,
        metrics_handle,
    });

    let router = delivery::http::router(shared_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("bookmarks service running on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(provider) = tracer_provider {
        if let Err(e) = provider.shutdown() {
            tracing::warn!(error = %e, "failed to flush telemetry");
        }
    }

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

    tracing::info!("shutdown signal received, stopping the bookmarks service");
}
