//! Density layer synchronization.

use crate::core::{config::EngineConfig, incident::Incident};
use crate::data::geojson::heatmap_collection;
use crate::renderer::Renderer;
use crate::Result;
use once_cell::sync::Lazy;

/// Color ramp over heatmap density, transparent blue through deep red
static HEATMAP_COLOR_RAMP: Lazy<serde_json::Value> = Lazy::new(|| {
    serde_json::json!([
        "interpolate",
        ["linear"],
        ["heatmap-density"],
        0.0,
        "rgba(33, 102, 172, 0)",
        0.2,
        "rgba(103, 169, 207, 0.5)",
        0.4,
        "rgba(209, 229, 240, 0.6)",
        0.6,
        "rgba(253, 219, 199, 0.7)",
        0.8,
        "rgba(239, 138, 98, 0.8)",
        1.0,
        "rgba(178, 24, 43, 0.9)"
    ])
});

const HEATMAP_RADIUS: f64 = 30.0;
const HEATMAP_OPACITY: f64 = 0.8;

/// Keeps the named density layer consistent with the incident collection.
///
/// The dataset is recomputed wholesale on every pass; the layer definition
/// is installed once per renderer instance.
pub struct HeatmapSync {
    source_id: String,
    layer_id: String,
    layer_installed: bool,
}

impl HeatmapSync {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            source_id: config.heatmap_source_id.clone(),
            layer_id: config.heatmap_layer_id.clone(),
            layer_installed: false,
        }
    }

    /// Forgets per-instance renderer state; call after the owning renderer
    /// was replaced
    pub fn reset(&mut self) {
        self.layer_installed = false;
    }

    /// Recomputes the dataset and upserts it into the renderer.
    ///
    /// A no-op when `incidents` is empty: a previously synced layer keeps
    /// its last non-empty dataset.
    pub fn sync(&mut self, renderer: &mut (dyn Renderer + 'static), incidents: &[Incident]) -> Result<()> {
        if incidents.is_empty() {
            log::trace!("heatmap sync skipped: empty incident collection");
            return Ok(());
        }

        let data = heatmap_collection(incidents);
        renderer.upsert_source(&self.source_id, &data)?;

        if !self.layer_installed {
            renderer.upsert_layer(&self.layer_id, &self.source_id, &Self::paint())?;
            self.layer_installed = true;
        }

        log::debug!("heatmap synced: {} features", data.len());
        Ok(())
    }

    /// Fixed paint parameters of the density layer
    fn paint() -> serde_json::Value {
        serde_json::json!({
            "heatmap-weight": ["get", "intensity"],
            "heatmap-intensity": 1,
            "heatmap-color": HEATMAP_COLOR_RAMP.clone(),
            "heatmap-radius": HEATMAP_RADIUS,
            "heatmap-opacity": HEATMAP_OPACITY,
        })
    }
}
