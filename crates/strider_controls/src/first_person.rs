//! First-person camera controls driven by an [`InputAggregator`].
//!
//! Orientation is kept as two angles in degrees: `latitude` (pitch, clamped
//! to ±85° so the view never flips over the poles) and `longitude` (yaw,
//! unbounded).  Every frame the angles are turned into a point one unit in
//! front of the camera and the camera is told to look at it.
//!
//! The camera itself is owned by the host and passed into each call; the
//! controller never stores it.
//!
//! # Example
//! ```rust,ignore
//! use std::rc::Rc;
//! use strider_controls::OrientationController;
//! use strider_core::{Camera, EventHub};
//! use strider_core::input::VirtualSurface;
//!
//! let hub = EventHub::new();
//! let mut camera = Camera::default();
//! let mut controls = OrientationController::new(&camera, &hub, Rc::new(VirtualSurface::new()));
//! controls.settings.movement_speed = 10.0;
//!
//! // every frame
//! controls.update(&mut camera, 1.0 / 60.0);
//! ```

use std::f32::consts::PI;
use std::rc::Rc;

use glam::Vec3;
use serde::Deserialize;
use strider_core::input::{EventHub, InputAggregator, KeyBindings, LookIntent, MovementIntent, PointerSurface};
use strider_core::math::{direction_from_spherical, map_linear, spherical_from_direction};
use strider_core::{CameraRig, ControlError, LocalAxis};

/// Latitude limit in degrees.
pub const MAX_LATITUDE: f32 = 85.0;

/// User-tunable behaviour of [`OrientationController`].
///
/// All fields can be changed between frames; the next `update` picks them up.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    /// Master switch.  While `false`, `update` does nothing at all.
    ///
    /// Default: `true`
    pub enabled: bool,

    /// Translation speed in world units per second.
    ///
    /// Default: `1.0`
    pub movement_speed: f32,

    /// Degrees of rotation per unit of mouse motion per second.
    ///
    /// Default: `0.005`
    pub mouse_look_speed: f32,

    /// Extra multiplier on top of `mouse_look_speed` for the gamepad stick.
    ///
    /// Default: `1.0`
    pub controller_look_speed: f32,

    /// Scale forward speed with the camera's altitude.
    pub height_speed: bool,
    pub height_coefficient: f32,
    pub height_min: f32,
    pub height_max: f32,

    /// Keep moving forward when no forward/back intent is given.
    pub auto_forward: bool,

    /// Read the first connected gamepad.
    ///
    /// Default: `true`
    pub use_controller: bool,

    /// When `false`, mouse and stick motion do not rotate the view (motion is
    /// still consumed).
    pub active_look: bool,

    /// When `false`, only yaw is integrated.
    pub look_vertical: bool,

    /// Remap the polar angle into `[vertical_min, vertical_max]` (radians).
    pub constrain_vertical: bool,
    pub vertical_min: f32,
    pub vertical_max: f32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            movement_speed: 1.0,
            mouse_look_speed: 0.005,
            controller_look_speed: 1.0,
            height_speed: false,
            height_coefficient: 1.0,
            height_min: 0.0,
            height_max: 1.0,
            auto_forward: false,
            use_controller: true,
            active_look: true,
            look_vertical: true,
            constrain_vertical: false,
            vertical_min: 0.0,
            vertical_max: PI,
        }
    }
}

impl ControllerSettings {
    /// Reject values the update step cannot work with.
    pub fn validate(&self) -> Result<(), ControlError> {
        let scalars = [
            ("movement_speed", self.movement_speed),
            ("mouse_look_speed", self.mouse_look_speed),
            ("controller_look_speed", self.controller_look_speed),
            ("height_coefficient", self.height_coefficient),
            ("height_min", self.height_min),
            ("height_max", self.height_max),
            ("vertical_min", self.vertical_min),
            ("vertical_max", self.vertical_max),
        ];
        if let Some((name, _)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ControlError::Config(format!("{name} must be finite")));
        }
        if self.height_max < self.height_min {
            return Err(ControlError::Config(
                "height_max must not be below height_min".into(),
            ));
        }
        if self.constrain_vertical && self.vertical_max <= self.vertical_min {
            return Err(ControlError::Config(
                "vertical_max must be greater than vertical_min".into(),
            ));
        }
        Ok(())
    }
}

/// Copy of everything the controller tracks, for inspection and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState {
    pub settings: ControllerSettings,
    pub latitude: f32,
    pub longitude: f32,
    pub movement: MovementIntent,
    pub look: LookIntent,
}

/// First-person camera controller.
pub struct OrientationController {
    pub settings: ControllerSettings,
    input: InputAggregator,
    latitude: f32,
    longitude: f32,
    look_target: Vec3,
    gamepad_warned: bool,
}

impl OrientationController {
    /// Bind to `hub` and `surface`, starting from `camera`'s current
    /// orientation.
    pub fn new(camera: &impl CameraRig, hub: &EventHub, surface: Rc<dyn PointerSurface>) -> Self {
        Self::with_settings(camera, hub, surface, ControllerSettings::default())
    }

    pub fn with_settings(
        camera: &impl CameraRig,
        hub: &EventHub,
        surface: Rc<dyn PointerSurface>,
        settings: ControllerSettings,
    ) -> Self {
        Self::with_input(camera, InputAggregator::new(hub, surface), settings)
    }

    /// Same as [`with_settings`](Self::with_settings) with a custom key table.
    pub fn with_bindings(
        camera: &impl CameraRig,
        hub: &EventHub,
        surface: Rc<dyn PointerSurface>,
        settings: ControllerSettings,
        keys: KeyBindings,
    ) -> Self {
        Self::with_input(camera, InputAggregator::with_bindings(hub, surface, keys), settings)
    }

    fn with_input(camera: &impl CameraRig, input: InputAggregator, settings: ControllerSettings) -> Self {
        let mut controls = Self {
            settings,
            input,
            latitude: 0.0,
            longitude: 0.0,
            look_target: camera.position() + camera.orientation() * Vec3::NEG_Z,
            gamepad_warned: false,
        };
        controls.sync_angles(camera);
        controls
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    /// Pitch in degrees, within `[-85, 85]` after any update.
    pub fn latitude(&self) -> f32 {
        self.latitude
    }

    /// Yaw in degrees, unbounded.
    pub fn longitude(&self) -> f32 {
        self.longitude
    }

    /// Point the camera was last told to look at.
    pub fn look_target(&self) -> Vec3 {
        self.look_target
    }

    pub fn input(&self) -> &InputAggregator {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputAggregator {
        &mut self.input
    }

    pub fn state(&self) -> ControllerState {
        ControllerState {
            settings: self.settings.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            movement: self.input.movement(),
            look: self.input.look(),
        }
    }

    // Width of the constrained polar band, when it is usable.
    fn vertical_span(&self) -> Option<f32> {
        let s = &self.settings;
        let span = s.vertical_max - s.vertical_min;
        (s.constrain_vertical && span > 0.0 && span.is_finite()).then_some(span)
    }

    /// `(phi, theta)` in radians for the current angles: polar angle from
    /// `+Y` (remapped when the vertical range is constrained) and azimuth.
    pub fn look_angles(&self) -> (f32, f32) {
        let mut phi = (90.0 - self.latitude).to_radians();
        let theta = self.longitude.to_radians();
        if self.settings.constrain_vertical {
            phi = map_linear(phi, 0.0, PI, self.settings.vertical_min, self.settings.vertical_max);
        }
        (phi, theta)
    }

    // ── Frame update ───────────────────────────────────────────────────────

    /// Advance one frame of `dt` seconds and write the new pose to `camera`.
    pub fn update(&mut self, camera: &mut impl CameraRig, dt: f32) {
        if !self.settings.enabled {
            return;
        }

        if self.settings.use_controller {
            self.merge_gamepad();
        }

        let s = &self.settings;
        let movement = self.input.movement();
        let look = self.input.look();

        // ── translation ───────────────────────────────────────────────────
        let auto_speed = if s.height_speed {
            let y = camera.position().y.max(s.height_min).min(s.height_max);
            dt * (y - s.height_min) * s.height_coefficient
        } else {
            0.0
        };
        let move_speed = dt * s.movement_speed;

        let mut z = movement.z.value();
        if z == 0.0 && s.auto_forward {
            z = -1.0;
        }
        if z != 0.0 {
            camera.translate_local(LocalAxis::Z, (move_speed + auto_speed) * z);
        }
        let x = movement.x.value();
        if x != 0.0 {
            camera.translate_local(LocalAxis::X, move_speed * x);
        }
        let y = movement.y.value();
        if y != 0.0 {
            camera.translate_local(LocalAxis::Y, move_speed * y);
        }

        // ── rotation ──────────────────────────────────────────────────────
        let look_speed = if s.active_look { dt * s.mouse_look_speed } else { 0.0 };
        // an empty band has nothing to scale against
        let vertical_ratio = self.vertical_span().map_or(1.0, |span| PI / span);
        let (pad_x, pad_y) = if s.use_controller { (look.pad_x, look.pad_y) } else { (0.0, 0.0) };

        // idle terms are skipped so a huge ratio never meets a zero intent
        // screen origin is top-left, so mouse motion is subtracted
        if look.mouse_x != 0.0 {
            self.longitude -= look.mouse_x * look_speed;
        }
        if pad_x != 0.0 {
            self.longitude += pad_x * look_speed * s.controller_look_speed;
        }

        if s.look_vertical {
            if look.mouse_y != 0.0 {
                self.latitude -= look.mouse_y * look_speed * vertical_ratio;
            }
            if pad_y != 0.0 {
                self.latitude += pad_y * look_speed * vertical_ratio * s.controller_look_speed;
            }
        }

        self.latitude = self.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE);

        let (phi, theta) = self.look_angles();
        let target = camera.position() + direction_from_spherical(phi, theta);
        if camera.look_at(target) {
            self.look_target = target;
        }

        // consumed, whether or not it rotated anything
        self.input.clear_mouse_delta();
    }

    fn merge_gamepad(&mut self) {
        match self.input.merge_first_gamepad() {
            Ok(_) => self.gamepad_warned = false,
            Err(err) => {
                if !self.gamepad_warned {
                    log::warn!("skipping gamepad input: {err}");
                    self.gamepad_warned = true;
                }
            }
        }
    }

    // ── Imperative orientation ─────────────────────────────────────────────

    /// Turn `camera` towards `point` and continue from there on the next
    /// update.
    ///
    /// Fails without touching anything when `point` is the camera position.
    pub fn look_at(&mut self, camera: &mut impl CameraRig, point: Vec3) -> Result<(), ControlError> {
        if !camera.look_at(point) {
            log::warn!("look_at ignored: target {point} coincides with the camera");
            return Err(ControlError::DegenerateLookDirection);
        }
        self.look_target = point;
        self.sync_angles(camera);
        Ok(())
    }

    pub fn look_at_xyz(
        &mut self,
        camera: &mut impl CameraRig,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), ControlError> {
        self.look_at(camera, Vec3::new(x, y, z))
    }

    /// Re-derive latitude/longitude from the camera's forward vector.
    ///
    /// With a constrained vertical band the polar angle is mapped back out
    /// of the band first, so the next update reproduces the same direction.
    fn sync_angles(&mut self, camera: &impl CameraRig) -> bool {
        let forward = camera.orientation() * Vec3::NEG_Z;
        match spherical_from_direction(forward) {
            Some((mut phi, theta)) => {
                if self.vertical_span().is_some() {
                    let (min, max) = (self.settings.vertical_min, self.settings.vertical_max);
                    phi = map_linear(phi.clamp(min, max), min, max, 0.0, PI);
                }
                self.latitude = 90.0 - phi.to_degrees();
                self.longitude = theta.to_degrees();
                true
            }
            None => {
                log::warn!("camera orientation has no forward direction; keeping previous angles");
                false
            }
        }
    }

    /// Release every input subscription.  Safe to call more than once.
    pub fn dispose(&mut self) {
        self.input.dispose();
    }
}
