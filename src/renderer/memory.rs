//! In-memory renderer used for headless operation and tests.
//!
//! Records every source, layer and marker handed to it, supports deferred
//! readiness, and lets a driver inject pointer events through a shared
//! [`MemoryHandle`].

use crate::core::{config::EngineConfig, geo::LatLng};
use crate::data::geojson::FeatureCollection;
use crate::prelude::HashMap;
use crate::renderer::{
    Container, MarkerContent, MarkerId, Renderer, RendererEvent, RendererFactory,
};
use crate::{MapError, Result};
use std::cell::RefCell;
use std::rc::Rc;

/// Recorded layer definition
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRecord {
    pub source_id: String,
    pub paint: serde_json::Value,
}

/// Recorded marker
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRecord {
    pub id: MarkerId,
    pub position: LatLng,
    pub content: MarkerContent,
    pub draggable: bool,
}

#[derive(Debug, Default)]
struct MemoryState {
    ready: bool,
    ready_announced: bool,
    pending_events: Vec<RendererEvent>,
    sources: HashMap<String, FeatureCollection>,
    layers: HashMap<String, LayerRecord>,
    markers: HashMap<u64, MarkerRecord>,
    next_marker_id: u64,
    resize_count: u32,
    disposed: bool,
    container: Option<Container>,
    credential: String,
    style: String,
}

/// Shared view onto one [`MemoryRenderer`] instance.
///
/// The renderer side mutates the state through [`Renderer`]; the driving
/// side (host code or a test) uses this handle to complete loading, inject
/// pointer events, and inspect what the engine did.
#[derive(Clone, Default)]
pub struct MemoryHandle {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryHandle {
    /// Marks loading complete: `is_ready` flips and a `Ready` event is
    /// queued for the next poll
    pub fn complete_load(&self) {
        let mut state = self.state.borrow_mut();
        if state.ready {
            return;
        }
        state.ready = true;
        if !state.ready_announced {
            state.ready_announced = true;
            state.pending_events.push(RendererEvent::Ready);
        }
    }

    /// Injects a pointer click at the given coordinates
    pub fn click(&self, lat: f64, lng: f64) {
        self.state.borrow_mut().pending_events.push(RendererEvent::Click {
            position: LatLng::new(lat, lng),
        });
    }

    /// Drags a marker to the given coordinates and queues the drag-end event
    pub fn drag_marker(&self, id: MarkerId, lat: f64, lng: f64) {
        let mut state = self.state.borrow_mut();
        let position = LatLng::new(lat, lng);
        if let Some(marker) = state.markers.get_mut(&id.0) {
            marker.position = position;
        }
        state.pending_events.push(RendererEvent::MarkerDragEnd {
            marker: id,
            position,
        });
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().ready
    }

    pub fn is_disposed(&self) -> bool {
        self.state.borrow().disposed
    }

    pub fn resize_count(&self) -> u32 {
        self.state.borrow().resize_count
    }

    pub fn source(&self, id: &str) -> Option<FeatureCollection> {
        self.state.borrow().sources.get(id).cloned()
    }

    pub fn source_count(&self) -> usize {
        self.state.borrow().sources.len()
    }

    pub fn layer(&self, id: &str) -> Option<LayerRecord> {
        self.state.borrow().layers.get(id).cloned()
    }

    pub fn layer_count(&self) -> usize {
        self.state.borrow().layers.len()
    }

    pub fn marker_count(&self) -> usize {
        self.state.borrow().markers.len()
    }

    pub fn marker(&self, id: MarkerId) -> Option<MarkerRecord> {
        self.state.borrow().markers.get(&id.0).cloned()
    }

    /// Live markers in creation order
    pub fn markers(&self) -> Vec<MarkerRecord> {
        let state = self.state.borrow();
        let mut markers: Vec<MarkerRecord> = state.markers.values().cloned().collect();
        markers.sort_by_key(|m| m.id);
        markers
    }

    /// Live draggable markers in creation order
    pub fn draggable_markers(&self) -> Vec<MarkerRecord> {
        self.markers().into_iter().filter(|m| m.draggable).collect()
    }

    pub fn credential(&self) -> String {
        self.state.borrow().credential.clone()
    }

    pub fn container(&self) -> Option<Container> {
        self.state.borrow().container.clone()
    }

    pub fn style(&self) -> String {
        self.state.borrow().style.clone()
    }
}

impl std::fmt::Debug for MemoryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MemoryHandle")
            .field("ready", &state.ready)
            .field("disposed", &state.disposed)
            .field("markers", &state.markers.len())
            .finish()
    }
}

/// A renderer backed entirely by in-memory state
pub struct MemoryRenderer {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryRenderer {
    pub fn new(
        container: &Container,
        credential: &str,
        config: &EngineConfig,
        ready: bool,
    ) -> (Self, MemoryHandle) {
        let state = Rc::new(RefCell::new(MemoryState {
            ready,
            // An instance born ready never emits the event; callers are
            // expected to check is_ready synchronously
            ready_announced: ready,
            container: Some(container.clone()),
            credential: credential.to_string(),
            style: config.style.clone(),
            ..MemoryState::default()
        }));
        let handle = MemoryHandle {
            state: Rc::clone(&state),
        };
        (Self { state }, handle)
    }

    fn guard(&self) -> Result<()> {
        if self.state.borrow().disposed {
            return Err(MapError::Renderer("renderer already disposed".to_string()).into());
        }
        Ok(())
    }
}

impl Renderer for MemoryRenderer {
    fn is_ready(&self) -> bool {
        let state = self.state.borrow();
        state.ready && !state.disposed
    }

    fn poll_events(&mut self) -> Vec<RendererEvent> {
        std::mem::take(&mut self.state.borrow_mut().pending_events)
    }

    fn upsert_source(&mut self, id: &str, data: &FeatureCollection) -> Result<()> {
        self.guard()?;
        self.state
            .borrow_mut()
            .sources
            .insert(id.to_string(), data.clone());
        Ok(())
    }

    fn upsert_layer(
        &mut self,
        id: &str,
        source_id: &str,
        paint: &serde_json::Value,
    ) -> Result<()> {
        self.guard()?;
        let mut state = self.state.borrow_mut();
        if !state.sources.contains_key(source_id) {
            return Err(
                MapError::Layer(format!("layer {id} references unknown source {source_id}"))
                    .into(),
            );
        }
        state.layers.insert(
            id.to_string(),
            LayerRecord {
                source_id: source_id.to_string(),
                paint: paint.clone(),
            },
        );
        Ok(())
    }

    fn add_marker(
        &mut self,
        position: LatLng,
        content: MarkerContent,
        draggable: bool,
    ) -> Result<MarkerId> {
        self.guard()?;
        let mut state = self.state.borrow_mut();
        let id = MarkerId(state.next_marker_id);
        state.next_marker_id += 1;
        state.markers.insert(
            id.0,
            MarkerRecord {
                id,
                position,
                content,
                draggable,
            },
        );
        Ok(id)
    }

    fn remove_marker(&mut self, id: MarkerId) -> Result<()> {
        self.guard()?;
        match self.state.borrow_mut().markers.remove(&id.0) {
            Some(_) => Ok(()),
            None => Err(MapError::Renderer(format!("unknown marker {}", id.0)).into()),
        }
    }

    fn set_marker_content(&mut self, id: MarkerId, content: MarkerContent) -> Result<()> {
        self.guard()?;
        let mut state = self.state.borrow_mut();
        match state.markers.get_mut(&id.0) {
            Some(marker) => {
                marker.content = content;
                Ok(())
            }
            None => Err(MapError::Renderer(format!("unknown marker {}", id.0)).into()),
        }
    }

    fn resize(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.disposed {
            return;
        }
        state.resize_count += 1;
    }

    fn dispose(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.disposed {
            return;
        }
        state.disposed = true;
        state.ready = false;
        state.markers.clear();
        state.sources.clear();
        state.layers.clear();
        state.pending_events.clear();
        log::debug!("memory renderer disposed");
    }
}

#[derive(Debug, Default)]
struct FactoryState {
    ready_immediately: bool,
    fail_next_create: bool,
    created: Vec<MemoryHandle>,
}

/// Factory producing [`MemoryRenderer`] instances.
///
/// Clones share state, so a driver can keep one clone and inspect every
/// renderer the engine creates.
#[derive(Clone, Default)]
pub struct MemoryRendererFactory {
    state: Rc<RefCell<FactoryState>>,
}

impl MemoryRendererFactory {
    /// Renderers report ready at construction time
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(FactoryState {
                ready_immediately: true,
                ..FactoryState::default()
            })),
        }
    }

    /// Renderers stay loading until `MemoryHandle::complete_load`
    pub fn deferred() -> Self {
        Self {
            state: Rc::new(RefCell::new(FactoryState::default())),
        }
    }

    /// Makes the next `create` call fail with an initialization error
    pub fn fail_next_create(&self) {
        self.state.borrow_mut().fail_next_create = true;
    }

    /// Handle onto the most recently created renderer
    pub fn last_handle(&self) -> Option<MemoryHandle> {
        self.state.borrow().created.last().cloned()
    }

    /// Handles onto every renderer created so far, in creation order
    pub fn handles(&self) -> Vec<MemoryHandle> {
        self.state.borrow().created.clone()
    }

    pub fn created_count(&self) -> usize {
        self.state.borrow().created.len()
    }
}

impl RendererFactory for MemoryRendererFactory {
    fn create(
        &mut self,
        container: &Container,
        credential: &str,
        config: &EngineConfig,
    ) -> Result<Box<dyn Renderer>> {
        let mut state = self.state.borrow_mut();
        if state.fail_next_create {
            state.fail_next_create = false;
            return Err(MapError::Init("invalid access token".to_string()).into());
        }
        if credential.is_empty() {
            return Err(MapError::Init("missing access token".to_string()).into());
        }
        let (renderer, handle) =
            MemoryRenderer::new(container, credential, config, state.ready_immediately);
        state.created.push(handle);
        Ok(Box::new(renderer))
    }
}
