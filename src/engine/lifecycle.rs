//! Renderer lifecycle ownership.

use crate::core::config::EngineConfig;
use crate::renderer::{Container, Renderer, RendererEvent, RendererFactory};
use crate::{MapError, Result};

/// Owns the single renderer instance: creation through a factory, the
/// one-shot ready latch, and disposal on every exit path.
pub struct LifecycleManager {
    renderer: Option<Box<dyn Renderer>>,
    ready: bool,
}

impl LifecycleManager {
    pub fn new() -> Self {
        Self {
            renderer: None,
            ready: false,
        }
    }

    /// Creates a renderer bound to `container`. Any previous instance is
    /// torn down first; construction failure leaves the manager empty.
    pub fn initialize(
        &mut self,
        factory: &mut dyn RendererFactory,
        container: &Container,
        credential: &str,
        config: &EngineConfig,
    ) -> Result<()> {
        self.teardown();
        match factory.create(container, credential, config) {
            Ok(renderer) => {
                // The instance may already be past its load phase, in which
                // case no Ready event will ever arrive
                self.ready = renderer.is_ready();
                self.renderer = Some(renderer);
                log::debug!("renderer initialized (ready: {})", self.ready);
                Ok(())
            }
            Err(e) => Err(MapError::Init(e.to_string()).into()),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.renderer.is_some()
    }

    /// Ready means layer and marker operations are safe
    pub fn is_ready(&self) -> bool {
        self.renderer.is_some() && self.ready
    }

    /// Latches the ready state; returns true only on the first transition
    pub fn mark_ready(&mut self) -> bool {
        if self.renderer.is_none() || self.ready {
            return false;
        }
        self.ready = true;
        true
    }

    pub fn renderer_mut(&mut self) -> Option<&mut (dyn Renderer + 'static)> {
        self.renderer.as_deref_mut()
    }

    /// Drains pending renderer events
    pub fn poll_events(&mut self) -> Vec<RendererEvent> {
        self.renderer
            .as_deref_mut()
            .map(|renderer| renderer.poll_events())
            .unwrap_or_default()
    }

    /// Disposes the renderer. Safe to call repeatedly and while
    /// initialization is still pending; the second call is a no-op.
    pub fn teardown(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.dispose();
            log::debug!("renderer disposed");
        }
        self.ready = false;
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LifecycleManager {
    fn drop(&mut self) {
        self.teardown();
    }
}
