use jobhound_core::{Config, RunController, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    controller: RunController,
}

impl AppState {
    pub fn new(config: Config, controller: RunController) -> Self {
        Self { config, controller }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn controller(&self) -> &RunController {
        &self.controller
    }
}
