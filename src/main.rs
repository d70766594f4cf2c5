use anyhow::Result;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::Region;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;
mod state;
mod storage;
#[cfg(test)]
mod testutil;

const DB_CONNECT_ATTEMPTS: u32 = 5;
const DB_CONNECT_DELAY: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<()> {
    // --- Parse config + migrate flag ---
    let (cfg, migrate_only) = config::AppConfig::from_env_and_args()?;

    // --- Logging setup (RUST_LOG wins over the APP_ENV default) ---
    let default_filter = if cfg.is_production() { "info" } else { "debug" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    tracing::info!(addr = %cfg.addr(), bucket = %cfg.bucket, env = %cfg.env, "starting filedrop");

    // --- Database: blocking connectivity check with a fixed retry budget ---
    let pool = connect_with_retry(&cfg).await?;
    sqlx::migrate!().run(&pool).await?;
    if migrate_only {
        tracing::info!("database migration complete");
        return Ok(());
    }

    // --- Object store client ---
    let aws_cfg = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(cfg.region.clone()))
        .load()
        .await;
    let s3 = S3Client::new(&aws_cfg);

    // --- Wire collaborators into shared state ---
    let store = Arc::new(storage::object_store::S3Gateway::new(s3, cfg.bucket.clone()));
    let repo = Arc::new(storage::repository::PgRepository::new(pool.clone()));
    let state = state::AppState::new(
        services::file_service::FileService::new(store, repo.clone()),
        repo,
    );

    let app = routes::routes::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    // --- Start server ---
    let listener = TcpListener::bind(cfg.addr()).await?;
    tracing::info!("server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    Ok(())
}

/// Connect to Postgres, retrying a fixed number of times before giving up.
/// Exhausting the budget is fatal to startup.
async fn connect_with_retry(cfg: &config::AppConfig) -> Result<PgPool> {
    let url = cfg.database_url();
    for attempt in 1..=DB_CONNECT_ATTEMPTS {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&url)
            .await
        {
            Ok(pool) => {
                tracing::info!("connected to database");
                return Ok(pool);
            }
            Err(err) => {
                tracing::warn!(attempt, error = %err, "database connection failed");
            }
        }
        if attempt < DB_CONNECT_ATTEMPTS {
            tokio::time::sleep(DB_CONNECT_DELAY).await;
        }
    }
    anyhow::bail!("failed to connect to the database after {DB_CONNECT_ATTEMPTS} attempts")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
    }
}
