//! Service wiring

use std::sync::Arc;

use anyhow::{Context, Result};
use flipcut_core::Config;
use flipcut_db::{InMemoryWorkItemRepository, WorkItemRepository};
use flipcut_processing::{FlipTransformer, ProcessingOrchestrator};
use flipcut_services::{BackgroundRemover, PhotoroomClient};
use flipcut_storage::{Storage, StorageClient};

use crate::state::AppState;

pub fn background_remover(config: &Config) -> Result<Arc<dyn BackgroundRemover>> {
    let client =
        PhotoroomClient::from_config(config).context("Failed to initialize Photoroom client")?;
    Ok(Arc::new(client))
}

/// Build the application state around the given remote collaborators.
pub fn initialize_services(
    config: &Config,
    remover: Arc<dyn BackgroundRemover>,
    storage: Arc<dyn Storage>,
) -> Arc<AppState> {
    let items: Arc<dyn WorkItemRepository> = Arc::new(InMemoryWorkItemRepository::new());
    let storage_client = StorageClient::from_config(storage, config);

    tracing::info!(
        storage_backend = %storage_client.backend_type(),
        jpeg_quality = config.jpeg_quality(),
        "Processing services initialized"
    );

    let orchestrator = ProcessingOrchestrator::new(
        remover,
        FlipTransformer::new(config.jpeg_quality()),
        storage_client,
        items,
    );

    Arc::new(AppState::new(config.clone(), orchestrator))
}
