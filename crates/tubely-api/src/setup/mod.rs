//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::FfmpegToolkit;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_json())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let toolkit = FfmpegToolkit::new(
        config.ffmpeg_path().to_string(),
        config.ffprobe_path().to_string(),
    )
    .context("Failed to configure media tooling")?;

    let pipeline_config = config.pipeline_config();
    tokio::fs::create_dir_all(&pipeline_config.staging_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create staging directory {}",
                pipeline_config.staging_dir.display()
            )
        })?;

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(VideoRepository::new(pool)),
        storage,
        Arc::new(toolkit),
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
