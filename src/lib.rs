//! # Beacon Map
//!
//! An incident-map synchronization engine.
//!
//! The engine owns a map renderer's lifecycle, keeps a severity-weighted
//! density layer and a set of per-incident markers consistent with an
//! incident collection that can change at any time, and runs a
//! location-picking state machine while a report is being authored.
//!
//! The renderer itself is an injected capability (see [`Renderer`]); an
//! in-memory implementation is provided for headless use and testing.

pub mod core;
pub mod data;
pub mod engine;
pub mod notify;
pub mod renderer;
pub mod token;

pub mod prelude;

// Re-export public API
pub use crate::core::{
    config::EngineConfig,
    geo::LatLng,
    incident::{Incident, IncidentCategory, IncidentSeverity},
};

pub use crate::data::geojson::{heatmap_collection, Feature, FeatureCollection, Geometry};

pub use crate::engine::{MapEngine, PickerState};

pub use crate::renderer::{
    memory::{MemoryHandle, MemoryRenderer, MemoryRendererFactory},
    Container, MarkerContent, MarkerId, Renderer, RendererEvent, RendererFactory,
};

pub use crate::notify::{LogNotifier, MemoryNotifier, Notice, NoticeLevel, Notifier};

pub use crate::token::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Renderer initialization failed: {0}")]
    Init(String),

    #[error("Renderer error: {0}")]
    Renderer(String),

    #[error("Layer error: {0}")]
    Layer(String),
}

/// Error type alias for convenience
pub type Error = MapError;
