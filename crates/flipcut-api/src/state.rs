//! Application state shared by the handlers.

use flipcut_core::Config;
use flipcut_processing::{MediaValidator, ProcessingOrchestrator};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub orchestrator: ProcessingOrchestrator,
    pub validator: MediaValidator,
}

impl AppState {
    pub fn new(config: Config, orchestrator: ProcessingOrchestrator) -> Self {
        let validator = MediaValidator::new(
            config.max_file_size_bytes(),
            config.allowed_content_types().to_vec(),
        );

        Self {
            config,
            orchestrator,
            validator,
        }
    }
}
