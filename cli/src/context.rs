use std::sync::Arc;

use edgeline_core::sensitivity::DEFAULT_INSET_SCALE;
use edgeline_core::{AppConfig, AppConfigExt};
use edgeline_overlay::OverlayController;
use edgeline_types::Edge;
use tokio::sync::{Mutex, RwLock};

/// Holds all shared state for the CLI application.
/// This is a lightweight container - logic lives in the commands.
#[derive(Clone)]
pub struct CliContext {
    pub config: Arc<RwLock<AppConfig>>,
    pub overlay: Arc<Mutex<OverlayController>>,
    /// Back-gesture inset scale per edge, as the settings screen would hold
    /// it. Session-only; never written to the config file.
    scales: Arc<RwLock<[f32; 2]>>,
}

impl CliContext {
    pub fn new() -> Self {
        let config = AppConfig::load();
        let overlay = OverlayController::native(config.indicator.clone());
        Self {
            config: Arc::new(RwLock::new(config)),
            overlay: Arc::new(Mutex::new(overlay)),
            scales: Arc::new(RwLock::new([DEFAULT_INSET_SCALE; 2])),
        }
    }

    pub async fn scale(&self, edge: Edge) -> f32 {
        self.scales.read().await[edge.index()]
    }

    pub async fn set_scale(&self, edge: Edge, scale: f32) {
        self.scales.write().await[edge.index()] = scale;
    }
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}
