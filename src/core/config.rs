//! Engine configuration and view policy

use crate::core::geo::LatLng;
use std::time::Duration;

/// Configuration for the map engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Initial map center
    pub center: LatLng,
    /// Initial zoom level
    pub zoom: f64,
    /// Style identifier handed to the renderer at construction
    pub style: String,
    /// Id of the GeoJSON source backing the density layer
    pub heatmap_source_id: String,
    /// Id of the density layer itself
    pub heatmap_layer_id: String,
    /// Delay between the surface becoming visible and the forced resize,
    /// letting host layout settle before the viewport is measured
    pub resize_settle_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(24.4359, 77.1589),
            zoom: 5.0,
            style: "streets-v11".to_string(),
            heatmap_source_id: "incidents".to_string(),
            heatmap_layer_id: "incidents-heat".to_string(),
            resize_settle_delay: Duration::from_millis(200),
        }
    }
}
