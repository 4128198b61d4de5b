//! Application state and shared resources.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use raster_engine::LayerRegistry;

/// Shared application state.
///
/// The registry is built once before the server accepts requests and is
/// read-only afterward, so concurrent handlers need no locking.
pub struct AppState {
    pub registry: Arc<LayerRegistry>,
}

impl AppState {
    pub fn new(layers_dir: &Path) -> Result<Self> {
        let registry = LayerRegistry::discover(layers_dir)?;
        info!(
            layers = registry.len(),
            directory = %layers_dir.display(),
            "Layer registry built"
        );
        Ok(Self {
            registry: Arc::new(registry),
        })
    }
}
