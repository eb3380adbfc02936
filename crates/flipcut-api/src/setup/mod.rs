//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use flipcut_core::Config;
use flipcut_infra::LogFormat;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration, before anything else is built
    config
        .validate()
        .context("Configuration validation failed")?;

    let log_format: LogFormat = config.log_format().parse()?;
    flipcut_infra::init_telemetry(config.environment(), log_format)
        .context("Failed to initialize telemetry")?;

    tracing::info!("Configuration loaded and validated successfully");

    let storage = flipcut_storage::create_storage(&config)
        .await
        .context("Failed to initialize storage backend")?;
    let remover = services::background_remover(&config)?;

    let state = services::initialize_services(&config, remover, storage);

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
