//! Location selection during reporting mode.

use crate::core::geo::LatLng;
use crate::notify::{Notice, Notifier};
use crate::renderer::{MarkerContent, MarkerId, Renderer};
use crate::Result;

/// Callback invoked with every confirmed location pick
pub type LocationCallback = Box<dyn FnMut(LatLng)>;

/// Reporting-mode state: off, armed, or holding one active pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerState {
    /// Reporting mode off; pointer input is ignored
    Inactive,
    /// Reporting mode on, no pick yet
    Idle,
    /// One selected location and its pick marker exist
    Picked,
}

/// State machine turning pointer input into a single selected location.
///
/// At most one pick marker and one selection exist at any time; entering a
/// new pick retires the previous marker before the next one is created.
/// Re-entrant across reporting-mode toggles.
pub struct LocationPicker {
    state: PickerState,
    selection: Option<LatLng>,
    marker: Option<MarkerId>,
    callback: Option<LocationCallback>,
}

impl LocationPicker {
    pub fn new() -> Self {
        Self {
            state: PickerState::Inactive,
            selection: None,
            marker: None,
            callback: None,
        }
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    /// The current selection, if a pick was made
    pub fn selection(&self) -> Option<LatLng> {
        self.selection
    }

    /// Registers the collaborator notified synchronously on every pick
    pub fn on_location_selected(&mut self, callback: impl FnMut(LatLng) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// Arms or disarms reporting mode. Disarming clears the active pick;
    /// `renderer` may be absent when the owning instance is already gone.
    pub fn set_active(
        &mut self,
        active: bool,
        renderer: Option<&mut (dyn Renderer + 'static)>,
    ) -> Result<()> {
        if active {
            if self.state == PickerState::Inactive {
                self.state = PickerState::Idle;
                log::debug!("reporting mode armed");
            }
        } else if self.state != PickerState::Inactive {
            self.remove_pick(renderer)?;
            self.state = PickerState::Inactive;
            log::debug!("reporting mode disarmed");
        }
        Ok(())
    }

    /// Handles a click on the map surface while reporting mode is armed
    pub fn handle_click(
        &mut self,
        renderer: &mut (dyn Renderer + 'static),
        notifier: &mut dyn Notifier,
        position: LatLng,
    ) -> Result<()> {
        if self.state == PickerState::Inactive {
            return Ok(());
        }

        // Retire the previous pick before the new marker exists
        if let Some(id) = self.marker.take() {
            renderer.remove_marker(id)?;
        }

        let id = renderer.add_marker(position, Self::popup_content(position), true)?;
        self.marker = Some(id);
        self.selection = Some(position);
        self.state = PickerState::Picked;

        self.emit(position);
        notifier.notify(Notice::success(
            "Location selected",
            format!("Selected position: {position}"),
        ));
        Ok(())
    }

    /// Handles the end of a drag of the pick marker: coordinates update in
    /// place, the collaborator is re-notified, no state transition
    pub fn handle_drag_end(
        &mut self,
        renderer: &mut (dyn Renderer + 'static),
        notifier: &mut dyn Notifier,
        marker: MarkerId,
        position: LatLng,
    ) -> Result<()> {
        if self.marker != Some(marker) {
            return Ok(());
        }

        self.selection = Some(position);
        renderer.set_marker_content(marker, Self::popup_content(position))?;

        self.emit(position);
        notifier.notify(Notice::success(
            "Location updated",
            format!("Selected position: {position}"),
        ));
        Ok(())
    }

    /// Forgets the pick without touching the renderer; call after the
    /// owning renderer instance was disposed
    pub fn forget(&mut self) {
        self.marker = None;
        self.selection = None;
        if self.state == PickerState::Picked {
            self.state = PickerState::Idle;
        }
    }

    fn remove_pick(&mut self, renderer: Option<&mut (dyn Renderer + 'static)>) -> Result<()> {
        if let (Some(id), Some(renderer)) = (self.marker.take(), renderer) {
            renderer.remove_marker(id)?;
        }
        self.marker = None;
        self.selection = None;
        Ok(())
    }

    fn emit(&mut self, position: LatLng) {
        if let Some(callback) = self.callback.as_mut() {
            callback(position);
        }
    }

    fn popup_content(position: LatLng) -> MarkerContent {
        MarkerContent {
            title: "Selected Location".to_string(),
            body: String::new(),
            badge_color: None,
            detail_lines: vec![
                format!("Latitude: {:.4}", position.lat),
                format!("Longitude: {:.4}", position.lng),
                "Drag pin to adjust location".to_string(),
            ],
        }
    }
}

impl Default for LocationPicker {
    fn default() -> Self {
        Self::new()
    }
}
