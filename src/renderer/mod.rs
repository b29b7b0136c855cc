//! The rendering capability consumed by the engine.
//!
//! The third-party map SDK has a large surface; the engine only needs the
//! minimal contract below, so it stays testable without a real rendering
//! surface. Callback registrations in SDK land (`onReady`, `onClick`,
//! `onDragEnd`) are modeled as a polled event queue, the natural shape for
//! a single-owner, single-threaded engine.

pub mod memory;

use crate::core::{config::EngineConfig, geo::LatLng};
use crate::data::geojson::FeatureCollection;
use crate::Result;

/// Opaque handle to a renderer-owned marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

/// Display surface a renderer binds to
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

impl Container {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }
}

/// Structured popup content attached to a marker
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkerContent {
    /// Popup heading
    pub title: String,
    /// Free-text body, empty when the popup is detail lines only
    pub body: String,
    /// Badge color next to the title, e.g. the severity color
    pub badge_color: Option<String>,
    /// Additional lines rendered below the body
    pub detail_lines: Vec<String>,
}

/// Events emitted by a renderer and drained by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum RendererEvent {
    /// The renderer finished loading; layer and marker operations are safe.
    /// Emitted exactly once per instance.
    Ready,
    /// Pointer click on the map surface
    Click { position: LatLng },
    /// A draggable marker finished a drag
    MarkerDragEnd { marker: MarkerId, position: LatLng },
}

/// Minimal rendering capability the engine drives.
///
/// Implementations own the visual objects; the engine owns their lifetimes
/// through the ids handed back here and must retire every id it created.
pub trait Renderer {
    /// Whether the ready signal has fired
    fn is_ready(&self) -> bool;

    /// Drains pending events in arrival order
    fn poll_events(&mut self) -> Vec<RendererEvent>;

    /// Creates or replaces the GeoJSON source with the given id
    fn upsert_source(&mut self, id: &str, data: &FeatureCollection) -> Result<()>;

    /// Creates or replaces the layer definition with the given id
    fn upsert_layer(&mut self, id: &str, source_id: &str, paint: &serde_json::Value)
        -> Result<()>;

    /// Adds a marker and returns its handle
    fn add_marker(
        &mut self,
        position: LatLng,
        content: MarkerContent,
        draggable: bool,
    ) -> Result<MarkerId>;

    /// Removes a marker; unknown ids are an error
    fn remove_marker(&mut self, id: MarkerId) -> Result<()>;

    /// Replaces the popup content of an existing marker
    fn set_marker_content(&mut self, id: MarkerId, content: MarkerContent) -> Result<()>;

    /// Re-measures the viewport against the container. Idempotent.
    fn resize(&mut self);

    /// Releases the renderer and every visual object it owns. Further
    /// operations on this instance are invalid.
    fn dispose(&mut self);
}

/// Constructs renderer instances bound to a display surface
pub trait RendererFactory {
    fn create(
        &mut self,
        container: &Container,
        credential: &str,
        config: &EngineConfig,
    ) -> Result<Box<dyn Renderer>>;
}
