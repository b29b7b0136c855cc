//! The map synchronization engine.
//!
//! [`MapEngine`] wires the lifecycle manager, the density layer sync, the
//! marker reconciler, the location picker and the visibility watcher into
//! one façade driven by the host UI loop: entry points for state changes,
//! [`MapEngine::pump`] for renderer events, [`MapEngine::tick`] for timers.

pub mod heatmap;
pub mod lifecycle;
pub mod markers;
pub mod picker;
pub mod visibility;

pub use heatmap::HeatmapSync;
pub use lifecycle::LifecycleManager;
pub use markers::MarkerReconciler;
pub use picker::{LocationPicker, PickerState};
pub use visibility::VisibilityWatcher;

use crate::core::{config::EngineConfig, geo::LatLng, incident::Incident};
use crate::notify::{Notice, Notifier};
use crate::renderer::{Container, RendererEvent, RendererFactory};
use crate::token::TokenStore;
use std::time::Instant;

/// Owns the renderer and keeps its density layer and marker set consistent
/// with the incident collection.
///
/// Single-threaded and event-driven: every entry point runs to completion;
/// the host pumps renderer events and timers from its UI loop. Operations
/// requested before the renderer is ready are deferred and flushed when the
/// ready signal arrives.
pub struct MapEngine {
    config: EngineConfig,
    factory: Box<dyn RendererFactory>,
    token_store: Box<dyn TokenStore>,
    notifier: Box<dyn Notifier>,
    lifecycle: LifecycleManager,
    heatmap: HeatmapSync,
    markers: MarkerReconciler,
    picker: LocationPicker,
    visibility: VisibilityWatcher,
    incidents: Vec<Incident>,
    credential: Option<String>,
    container: Option<Container>,
    reporting: bool,
    sync_pending: bool,
}

impl MapEngine {
    /// Creates an engine. A previously persisted credential is loaded right
    /// away; renderer construction happens on [`MapEngine::attach`].
    pub fn new(
        config: EngineConfig,
        factory: Box<dyn RendererFactory>,
        token_store: Box<dyn TokenStore>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let credential = token_store.load().unwrap_or_else(|e| {
            log::error!("failed to load persisted credential: {e}");
            None
        });

        let heatmap = HeatmapSync::new(&config);
        let visibility = VisibilityWatcher::new(config.resize_settle_delay);

        Self {
            config,
            factory,
            token_store,
            notifier,
            lifecycle: LifecycleManager::new(),
            heatmap,
            markers: MarkerReconciler::new(),
            picker: LocationPicker::new(),
            visibility,
            incidents: Vec::new(),
            credential,
            container: None,
            reporting: false,
            sync_pending: false,
        }
    }

    /// Whether a credential must be supplied before the map can initialize
    pub fn needs_credential(&self) -> bool {
        self.credential.is_none()
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle.is_initialized()
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle.is_ready()
    }

    pub fn picker_state(&self) -> PickerState {
        self.picker.state()
    }

    /// The current location pick, if one was made
    pub fn selection(&self) -> Option<LatLng> {
        self.picker.selection()
    }

    /// Registers the collaborator notified synchronously on every pick
    pub fn on_location_selected(&mut self, callback: impl FnMut(LatLng) + 'static) {
        self.picker.on_location_selected(callback);
    }

    /// Supplies and persists a credential, then (re)initializes the
    /// renderer if a surface is attached
    pub fn set_credential(&mut self, token: &str) {
        match self.token_store.save(token) {
            Ok(()) => self.notifier.notify(Notice::success(
                "Map token saved",
                "Your token has been saved and will be used for future sessions",
            )),
            Err(e) => {
                log::error!("failed to persist credential: {e}");
                self.notifier.notify(Notice::error(
                    "Could not save map token",
                    "The token will be used for this session only",
                ));
            }
        }
        self.credential = Some(token.to_string());
        if self.container.is_some() {
            self.reinitialize();
        }
    }

    /// Binds the engine to a display surface and initializes the renderer
    /// when a credential is available
    pub fn attach(&mut self, container: Container) {
        self.container = Some(container);
        self.reinitialize();
    }

    /// Replaces the engine's view of the incident collection and re-syncs
    /// the density layer and the marker set
    pub fn set_incidents(&mut self, incidents: &[Incident]) {
        self.incidents = incidents.to_vec();
        self.request_sync();
    }

    /// Turns reporting mode on or off. Changing the flag on an initialized
    /// engine recreates the renderer instance; the pick state machine is
    /// re-armed against the new instance.
    pub fn set_reporting_mode(&mut self, reporting: bool) {
        if reporting == self.reporting {
            return;
        }
        self.reporting = reporting;

        if self.lifecycle.is_initialized() {
            self.reinitialize();
        }

        let renderer = self.lifecycle.renderer_mut();
        if let Err(e) = self.picker.set_active(reporting, renderer) {
            log::error!("failed to switch reporting mode: {e}");
        }
    }

    /// Marks the surface visible after being hidden; a deferred resize and
    /// heatmap re-sync follow. A no-op while uninitialized.
    pub fn set_active(&mut self, active: bool) {
        if active && self.lifecycle.is_initialized() {
            self.visibility.on_visible();
        }
    }

    /// Drains renderer events. Call from the host UI loop.
    pub fn pump(&mut self) {
        for event in self.lifecycle.poll_events() {
            match event {
                RendererEvent::Ready => {
                    if self.lifecycle.mark_ready() {
                        log::debug!("renderer ready");
                        self.flush_pending();
                    }
                }
                RendererEvent::Click { position } => {
                    if let Some(renderer) = self.lifecycle.renderer_mut() {
                        if let Err(e) = self.picker.handle_click(
                            renderer,
                            self.notifier.as_mut(),
                            position,
                        ) {
                            log::error!("location pick failed: {e}");
                        }
                    }
                }
                RendererEvent::MarkerDragEnd { marker, position } => {
                    if let Some(renderer) = self.lifecycle.renderer_mut() {
                        if let Err(e) = self.picker.handle_drag_end(
                            renderer,
                            self.notifier.as_mut(),
                            marker,
                            position,
                        ) {
                            log::error!("pick drag update failed: {e}");
                        }
                    }
                }
            }
        }
    }

    /// Applies due timers. Call from the host UI loop.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Applies due timers against the supplied clock
    pub fn tick_at(&mut self, now: Instant) {
        if !self.visibility.take_due(now) {
            return;
        }
        if let Some(renderer) = self.lifecycle.renderer_mut() {
            renderer.resize();
        }
        if self.lifecycle.is_ready() {
            if let Some(renderer) = self.lifecycle.renderer_mut() {
                if let Err(e) = self.heatmap.sync(renderer, &self.incidents) {
                    log::error!("heatmap re-sync after resize failed: {e}");
                }
            }
        }
    }

    /// Disposes the renderer and every marker it owns. Safe to call
    /// repeatedly; engine drop tears down as well.
    pub fn teardown(&mut self) {
        self.release_renderer();
    }

    fn reinitialize(&mut self) {
        self.release_renderer();

        let (Some(container), Some(credential)) =
            (self.container.clone(), self.credential.clone())
        else {
            log::debug!("initialization deferred: surface or credential missing");
            return;
        };

        match self.lifecycle.initialize(
            self.factory.as_mut(),
            &container,
            &credential,
            &self.config,
        ) {
            Ok(()) => {
                self.sync_pending = true;
                // The instance may already be ready; don't wait for an
                // event that fired before we could observe it
                if self.lifecycle.is_ready() {
                    self.flush_pending();
                }
            }
            Err(e) => {
                log::error!("renderer initialization failed: {e}");
                self.credential = None;
                self.notifier.notify(Notice::error(
                    "Error initializing map",
                    "Please check your map token and try again",
                ));
            }
        }
    }

    /// Drops the renderer instance along with every handle bound to it
    fn release_renderer(&mut self) {
        self.markers.forget();
        self.picker.forget();
        self.heatmap.reset();
        self.lifecycle.teardown();
    }

    fn request_sync(&mut self) {
        if self.lifecycle.is_ready() {
            self.sync_now();
        } else {
            // deferred until the ready event arrives
            self.sync_pending = true;
        }
    }

    fn flush_pending(&mut self) {
        if self.sync_pending {
            self.sync_now();
        }
    }

    fn sync_now(&mut self) {
        self.sync_pending = false;
        let Some(renderer) = self.lifecycle.renderer_mut() else {
            return;
        };
        if let Err(e) = self.heatmap.sync(renderer, &self.incidents) {
            log::error!("heatmap sync failed: {e}");
        }
        if let Err(e) = self.markers.sync(renderer, &self.incidents) {
            log::error!("marker reconciliation failed: {e}");
        }
    }
}
