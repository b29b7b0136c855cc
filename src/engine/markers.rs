//! Incident marker reconciliation.

use crate::core::incident::Incident;
use crate::renderer::{MarkerContent, MarkerId, Renderer};
use crate::Result;

/// Maintains one marker per incident by full rebuild on every pass.
///
/// After a completed pass exactly one marker exists per live incident and
/// no handle from a previous pass survives.
pub struct MarkerReconciler {
    markers: Vec<MarkerId>,
}

impl MarkerReconciler {
    pub fn new() -> Self {
        Self {
            markers: Vec::new(),
        }
    }

    /// Number of live markers from the last pass
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Removes every marker from the previous pass, then creates one marker
    /// per incident in collection order. An empty collection simply leaves
    /// zero markers.
    pub fn sync(&mut self, renderer: &mut (dyn Renderer + 'static), incidents: &[Incident]) -> Result<()> {
        self.clear(renderer)?;
        for incident in incidents {
            let id = renderer.add_marker(
                incident.position(),
                Self::popup_content(incident),
                false,
            )?;
            self.markers.push(id);
        }
        log::debug!("reconciled {} incident markers", self.markers.len());
        Ok(())
    }

    /// Removes all markers owned by this reconciler
    pub fn clear(&mut self, renderer: &mut (dyn Renderer + 'static)) -> Result<()> {
        for id in self.markers.drain(..) {
            renderer.remove_marker(id)?;
        }
        Ok(())
    }

    /// Forgets marker handles without touching the renderer; call after the
    /// owning renderer instance was disposed
    pub fn forget(&mut self) {
        self.markers.clear();
    }

    fn popup_content(incident: &Incident) -> MarkerContent {
        MarkerContent {
            title: incident.category.label().to_string(),
            body: incident.description.clone(),
            badge_color: Some(incident.severity.color().to_string()),
            detail_lines: vec![
                format!("Severity: {}", incident.severity.label()),
                format!("Location: {}", incident.resolved_location()),
                format!("Time: {}", incident.timestamp.format("%Y-%m-%d, %H:%M")),
            ],
        }
    }
}

impl Default for MarkerReconciler {
    fn default() -> Self {
        Self::new()
    }
}
