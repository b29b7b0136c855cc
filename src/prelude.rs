//! Prelude module for common beacon-map types and traits
//!
//! Re-exports the most commonly used types for easy importing with
//! `use beacon_map::prelude::*;`

pub use crate::core::{
    config::EngineConfig,
    geo::LatLng,
    incident::{Incident, IncidentCategory, IncidentSeverity},
};

pub use crate::data::geojson::{heatmap_collection, Feature, FeatureCollection, Geometry};

pub use crate::engine::{
    HeatmapSync, LifecycleManager, LocationPicker, MapEngine, MarkerReconciler, PickerState,
    VisibilityWatcher,
};

pub use crate::renderer::{
    memory::{MemoryHandle, MemoryRenderer, MemoryRendererFactory},
    Container, MarkerContent, MarkerId, Renderer, RendererEvent, RendererFactory,
};

pub use crate::notify::{LogNotifier, MemoryNotifier, Notice, NoticeLevel, Notifier};

pub use crate::token::{FileTokenStore, MemoryTokenStore, TokenStore};

pub use crate::{Error as MapError, Result};

pub use std::time::{Duration, Instant};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
