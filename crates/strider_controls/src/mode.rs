//! Switching between orbit and first-person control.
//!
//! Only one of the two may drive the camera at a time.  The host checks
//! [`ControlModeSwitch::mode`] every frame and updates only the active one.

use strider_core::{ControlError, KeyCode, PointerSurface};

use crate::first_person::OrientationController;

/// Prompt shown while first-person control waits for pointer capture.
pub const CAPTURE_PROMPT: &str = "Click to take control...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlMode {
    #[default]
    Orbit,
    FirstPerson,
}

impl ControlMode {
    pub fn toggled(self) -> Self {
        match self {
            ControlMode::Orbit => ControlMode::FirstPerson,
            ControlMode::FirstPerson => ControlMode::Orbit,
        }
    }
}

/// Text overlay drawn over the viewport.
///
/// The host attaches it once its UI layer exists; until then any attempt
/// to show or hide it is an error.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    attached: bool,
    text: Option<String>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn show(&mut self, text: &str) -> Result<(), ControlError> {
        if !self.attached {
            return Err(ControlError::OverlayDetached);
        }
        self.text = Some(text.to_owned());
        Ok(())
    }

    pub fn hide(&mut self) -> Result<(), ControlError> {
        if !self.attached {
            return Err(ControlError::OverlayDetached);
        }
        self.text = None;
        Ok(())
    }

    /// Text currently on screen, if visible.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.text.is_some()
    }
}

/// Owns the current mode and the capture prompt.
#[derive(Debug, Clone)]
pub struct ControlModeSwitch {
    mode: ControlMode,
    pub overlay: Overlay,
    pub toggle_key: KeyCode,
}

impl Default for ControlModeSwitch {
    fn default() -> Self {
        Self {
            mode: ControlMode::Orbit,
            overlay: Overlay::new(),
            toggle_key: KeyCode::KeyQ,
        }
    }
}

impl ControlModeSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn orbit_enabled(&self) -> bool {
        self.mode == ControlMode::Orbit
    }

    pub fn first_person_enabled(&self) -> bool {
        self.mode == ControlMode::FirstPerson
    }

    /// Flip the mode and bring `controls` and the overlay in line with it.
    ///
    /// Nothing changes when the overlay is not attached yet.
    pub fn toggle(&mut self, controls: &mut OrientationController) -> Result<ControlMode, ControlError> {
        if !self.overlay.is_attached() {
            return Err(ControlError::OverlayDetached);
        }

        self.mode = self.mode.toggled();
        controls.settings.enabled = self.first_person_enabled();
        log::debug!("control mode switched to {:?}", self.mode);

        let surface = controls.input().surface();
        if self.orbit_enabled() {
            surface.release_pointer_capture();
        }
        if self.first_person_enabled() && !surface.has_pointer_capture() {
            self.overlay.show(CAPTURE_PROMPT)?;
        } else {
            self.overlay.hide()?;
        }
        Ok(self.mode)
    }

    /// Toggle when `key` is the toggle key.  Returns whether it was.
    pub fn handle_key(
        &mut self,
        key: KeyCode,
        controls: &mut OrientationController,
    ) -> Result<bool, ControlError> {
        if key != self.toggle_key {
            return Ok(false);
        }
        self.toggle(controls)?;
        Ok(true)
    }

    /// Keep the prompt in sync with pointer capture while first-person.
    pub fn on_pointer_capture_changed(&mut self, captured: bool) -> Result<(), ControlError> {
        if !self.first_person_enabled() {
            return Ok(());
        }
        if captured {
            self.overlay.hide()
        } else {
            self.overlay.show(CAPTURE_PROMPT)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use strider_core::input::{EventHub, VirtualSurface};
    use strider_core::Camera;

    fn setup() -> (Rc<VirtualSurface>, OrientationController, ControlModeSwitch) {
        let hub = EventHub::new();
        let surface = Rc::new(VirtualSurface::new());
        let controls = OrientationController::new(&Camera::default(), &hub, surface.clone());
        let mut switch = ControlModeSwitch::new();
        switch.overlay.attach();
        (surface, controls, switch)
    }

    #[test]
    fn starts_in_orbit() {
        let switch = ControlModeSwitch::new();
        assert!(switch.orbit_enabled());
        assert!(!switch.first_person_enabled());
    }

    #[test]
    fn toggle_without_capture_shows_prompt() {
        let (_, mut controls, mut switch) = setup();
        assert_eq!(switch.toggle(&mut controls).unwrap(), ControlMode::FirstPerson);
        assert!(controls.settings.enabled);
        assert_eq!(switch.overlay.text(), Some(CAPTURE_PROMPT));

        switch.on_pointer_capture_changed(true).unwrap();
        assert!(!switch.overlay.is_visible());
        switch.on_pointer_capture_changed(false).unwrap();
        assert!(switch.overlay.is_visible());
    }

    #[test]
    fn toggle_back_releases_capture() {
        let (surface, mut controls, mut switch) = setup();
        switch.toggle(&mut controls).unwrap();
        surface.request_pointer_capture();

        assert_eq!(switch.toggle(&mut controls).unwrap(), ControlMode::Orbit);
        assert!(!controls.settings.enabled);
        assert!(!surface.has_pointer_capture());
        assert!(!switch.overlay.is_visible());

        // capture changes are ignored while orbiting
        switch.on_pointer_capture_changed(false).unwrap();
        assert!(!switch.overlay.is_visible());
    }

    #[test]
    fn toggle_with_capture_hides_prompt() {
        let (surface, mut controls, mut switch) = setup();
        surface.request_pointer_capture();
        switch.toggle(&mut controls).unwrap();
        assert!(!switch.overlay.is_visible());
    }

    #[test]
    fn only_toggle_key_switches() {
        let (_, mut controls, mut switch) = setup();
        assert!(!switch.handle_key(KeyCode::KeyW, &mut controls).unwrap());
        assert!(switch.orbit_enabled());
        assert!(switch.handle_key(KeyCode::KeyQ, &mut controls).unwrap());
        assert!(switch.first_person_enabled());
    }

    #[test]
    fn detached_overlay_is_an_error() {
        let hub = EventHub::new();
        let mut controls =
            OrientationController::new(&Camera::default(), &hub, Rc::new(VirtualSurface::new()));
        let mut switch = ControlModeSwitch::new();
        assert_eq!(switch.toggle(&mut controls), Err(ControlError::OverlayDetached));
        assert!(switch.orbit_enabled());
        assert_eq!(Overlay::new().show("x"), Err(ControlError::OverlayDetached));
    }
}
