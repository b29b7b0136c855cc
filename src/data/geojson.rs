use crate::core::incident::Incident;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// GeoJSON geometry types emitted by this crate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: HashMap<String, serde_json::Value>,
}

impl Feature {
    /// Creates a point feature at (lng, lat), GeoJSON axis order
    pub fn point(lng: f64, lat: f64) -> Self {
        Self {
            geometry: Geometry::Point {
                coordinates: [lng, lat],
            },
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: serde_json::Value) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }
}

/// Root feature collection object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Derives the density dataset: one point feature per incident carrying an
/// `intensity` property equal to the severity weight.
///
/// Recomputed wholesale on every sync; never patched in place.
pub fn heatmap_collection(incidents: &[Incident]) -> FeatureCollection {
    let features = incidents
        .iter()
        .map(|incident| {
            Feature::point(incident.longitude, incident.latitude).with_property(
                "intensity",
                serde_json::json!(incident.severity.weight()),
            )
        })
        .collect();

    FeatureCollection { features }
}
