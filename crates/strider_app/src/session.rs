//! Everything the viewer drives once a window exists.
//!
//! The runner translates winit events into the calls below; the session
//! owns the camera, the controls and the mode switch.  It only sees the
//! window through [`PointerSurface`], so it also runs headless.

use std::collections::HashMap;
use std::rc::Rc;

use strider_controls::{ControlModeSwitch, OrientationController, RigJoint, RigPoseController};
use strider_core::glam::{Quat, Vec3};
use strider_core::input::{EventHub, InputEvent};
use strider_core::{Camera, CameraRig, KeyCode, MouseButton, PointerSurface};

use crate::config::StriderConfig;

/// Where the camera starts, in world units.
pub const START_POSITION: Vec3 = Vec3::new(0.0, 1.6, 5.0);

pub struct Session {
    hub: EventHub,
    surface: Rc<dyn PointerSurface>,
    pub camera: Camera,
    pub controls: OrientationController,
    pub rig: RigPoseController,
    pub pose: HashMap<String, Quat>,
    pub switch: ControlModeSwitch,
    captured: bool,
    base_title: String,
    shown_prompt: Option<String>,
}

impl Session {
    pub fn new(config: &StriderConfig, surface: Rc<dyn PointerSurface>) -> Self {
        let hub = EventHub::new();
        let mut camera = Camera::at(START_POSITION);

        let mut controls = OrientationController::with_settings(
            &camera,
            &hub,
            surface.clone(),
            config.first_person.clone(),
        );
        controls.input_mut().gamepad_layout = config.gamepad.clone();
        if let Err(err) = controls.look_at(&mut camera, Vec3::ZERO) {
            log::warn!("initial look_at failed: {err}");
        }

        let mut switch = ControlModeSwitch::new();
        switch.overlay.attach();
        controls.settings.enabled = switch.first_person_enabled();

        let rig = RigPoseController::with_bindings(
            &hub,
            strider_controls::RigKeyBindings::with_default_layout(),
            config.rig.clone(),
        );
        let pose = RigJoint::ALL
            .iter()
            .map(|joint| (joint.bone_name().to_string(), Quat::IDENTITY))
            .collect();

        Self {
            hub,
            surface,
            camera,
            controls,
            rig,
            pose,
            switch,
            captured: false,
            base_title: config.window.title.clone(),
            shown_prompt: None,
        }
    }

    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    /// Title for the window: the base title plus the overlay prompt, if any.
    pub fn window_title(&self) -> String {
        match self.switch.overlay.text() {
            Some(prompt) => format!("{} - {}", self.base_title, prompt),
            None => self.base_title.clone(),
        }
    }

    // ── Event translation ──────────────────────────────────────────────────

    pub fn key(&mut self, key: KeyCode, pressed: bool) {
        if !pressed {
            self.hub.dispatch(&InputEvent::KeyUp(key));
            return;
        }
        if key == KeyCode::Escape && self.surface.has_pointer_capture() {
            self.surface.release_pointer_capture();
        }
        match self.switch.handle_key(key, &mut self.controls) {
            Ok(true) => log::info!("control mode: {:?}", self.switch.mode()),
            Ok(false) => {}
            Err(err) => log::warn!("mode toggle failed: {err}"),
        }
        self.hub.dispatch(&InputEvent::KeyDown(key));
    }

    // clicks only grab the pointer while flying
    pub fn mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if !self.switch.first_person_enabled() {
            return;
        }
        let event = if pressed {
            InputEvent::MouseDown(button)
        } else {
            InputEvent::MouseUp(button)
        };
        self.hub.dispatch(&event);
    }

    /// Raw device motion; ignored unless the pointer is captured.
    pub fn mouse_motion(&mut self, dx: f64, dy: f64) {
        if self.surface.has_pointer_capture() {
            self.hub.dispatch(&InputEvent::MouseMove {
                dx: dx as f32,
                dy: dy as f32,
            });
        }
    }

    pub fn focus_lost(&mut self) {
        if self.surface.has_pointer_capture() {
            self.surface.release_pointer_capture();
        }
    }

    // ── Frame ──────────────────────────────────────────────────────────────

    /// Advance one frame.  Returns `true` when the window title changed.
    pub fn frame(&mut self, dt: f32) -> bool {
        let captured = self.surface.has_pointer_capture();
        if captured != self.captured {
            self.captured = captured;
            log::debug!("pointer capture {}", if captured { "gained" } else { "lost" });
            if let Err(err) = self.switch.on_pointer_capture_changed(captured) {
                log::warn!("overlay update failed: {err}");
            }
        }

        if self.switch.first_person_enabled() {
            self.controls.update(&mut self.camera, dt);
        }

        let moved = self.rig.apply(&mut self.pose);
        if moved > 0 {
            log::trace!("rig: {moved} joints moved");
        }

        log::trace!(
            "camera at {} facing {} (lat {:.2}, lon {:.2})",
            self.camera.position(),
            self.camera.transform.forward(),
            self.controls.latitude(),
            self.controls.longitude()
        );

        let prompt = self.switch.overlay.text().map(str::to_owned);
        if prompt != self.shown_prompt {
            self.shown_prompt = prompt;
            true
        } else {
            false
        }
    }

    pub fn dispose(&mut self) {
        self.focus_lost();
        self.controls.dispose();
        self.rig.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strider_controls::CAPTURE_PROMPT;
    use strider_core::input::VirtualSurface;

    fn session() -> (Rc<VirtualSurface>, Session) {
        let surface = Rc::new(VirtualSurface::new());
        let session = Session::new(&StriderConfig::default(), surface.clone());
        (surface, session)
    }

    #[test]
    fn starts_orbiting_and_still() {
        let (_, mut s) = session();
        assert!(s.switch.orbit_enabled());
        assert!(!s.controls.settings.enabled);

        s.key(KeyCode::KeyW, true);
        s.frame(1.0);
        assert!(s.camera.position().abs_diff_eq(START_POSITION, 1e-6));
    }

    #[test]
    fn toggle_prompts_until_captured() {
        let (surface, mut s) = session();
        s.key(KeyCode::KeyQ, true);
        s.key(KeyCode::KeyQ, false);
        assert!(s.switch.first_person_enabled());
        assert!(s.frame(0.0));
        assert_eq!(s.window_title(), format!("Strider - {CAPTURE_PROMPT}"));

        s.mouse_button(MouseButton::Left, true);
        assert!(surface.has_pointer_capture());
        assert!(s.frame(0.0));
        assert_eq!(s.window_title(), "Strider");

        s.key(KeyCode::Escape, true);
        assert!(!surface.has_pointer_capture());
        s.frame(0.0);
        assert_eq!(s.switch.overlay.text(), Some(CAPTURE_PROMPT));
    }

    #[test]
    fn flying_moves_camera_forward() {
        let (_, mut s) = session();
        s.key(KeyCode::KeyQ, true);
        let forward = s.camera.transform.forward();
        s.key(KeyCode::KeyW, true);
        s.frame(1.0);
        let expected = START_POSITION + forward;
        assert!(s.camera.position().abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn motion_needs_capture() {
        let (_, mut s) = session();
        s.key(KeyCode::KeyQ, true);
        s.mouse_motion(40.0, 0.0);
        assert_eq!(s.controls.input().look().mouse_x, 0.0);

        s.mouse_button(MouseButton::Left, true);
        s.mouse_motion(40.0, 0.0);
        assert_eq!(s.controls.input().look().mouse_x, 40.0);
    }

    #[test]
    fn rig_keys_pose_bones() {
        let (_, mut s) = session();
        s.key(KeyCode::KeyT, true);
        s.frame(0.016);
        assert_ne!(s.pose["base"], Quat::IDENTITY);
        assert_eq!(s.pose["arm1"], Quat::IDENTITY);
    }

    #[test]
    fn dispose_detaches_everything() {
        let (_, mut s) = session();
        s.dispose();
        assert_eq!(s.hub().listener_count(), 0);
    }
}
