use glam::{Quat, Vec3};

use crate::transform::{LocalAxis, Transform};

/// What the controls need from a camera.
///
/// The camera itself belongs to the host (scene graph, renderer, editor);
/// controls only ever talk to it through this trait.  `look_at` must orient
/// the camera so its forward axis (`-Z`) points at `point` with world `+Y`
/// as the up hint, and report `false` when no direction can be derived.
pub trait CameraRig {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn orientation(&self) -> Quat;
    fn set_orientation(&mut self, orientation: Quat);

    /// Move `distance` units along the camera's own `axis`.
    fn translate_local(&mut self, axis: LocalAxis, distance: f32);

    /// Turn the camera towards `point`.
    fn look_at(&mut self, point: Vec3) -> bool;
}

/// Camera pose with a fixed world up hint.
///
/// The struct lives in core so hosts without their own camera type (tests,
/// the headless viewer) can drive the controls directly; hosts with a scene
/// graph implement [`CameraRig`] on their node type instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub transform: Transform,
    /// Up hint used by `look_at`.
    pub up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            up: Vec3::Y,
        }
    }
}

impl Camera {
    /// Camera at `position` looking down `-Z`.
    pub fn at(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            ..Default::default()
        }
    }
}

impl CameraRig for Camera {
    fn position(&self) -> Vec3 {
        self.transform.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    fn orientation(&self) -> Quat {
        self.transform.rotation
    }

    fn set_orientation(&mut self, orientation: Quat) {
        self.transform.rotation = orientation;
    }

    fn translate_local(&mut self, axis: LocalAxis, distance: f32) {
        self.transform.translate_local(axis, distance);
    }

    fn look_at(&mut self, point: Vec3) -> bool {
        let up = self.up;
        self.transform.look_at(point, up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_moves_follow_orientation() {
        let mut cam = Camera::at(Vec3::new(0.0, 0.0, 30.0));
        assert!(cam.look_at(Vec3::new(30.0, 0.0, 30.0)));
        cam.translate_local(LocalAxis::Z, -2.0);
        assert!(cam.position().abs_diff_eq(Vec3::new(2.0, 0.0, 30.0), 1e-4));
    }

    #[test]
    fn rig_look_at_reports_degenerate_target() {
        let mut cam = Camera::at(Vec3::ONE);
        assert!(!cam.look_at(Vec3::ONE));
        assert!(cam.look_at(Vec3::ZERO));
        assert!(cam.transform.forward().abs_diff_eq(-Vec3::ONE.normalize(), 1e-5));
    }
}
