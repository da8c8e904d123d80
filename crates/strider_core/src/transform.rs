//! World-space pose: position plus orientation.
//!
//! `Transform` is `Copy` and `Default`.  Translations can be expressed in
//! world space or along the object's own axes, which is what a first-person
//! camera needs ("move forward" means "along where I'm looking").

use glam::{Quat, Vec3};

use crate::math::look_rotation;

/// Local axis of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalAxis {
    X,
    Y,
    Z,
}

impl LocalAxis {
    /// Unit vector of the axis in local space.
    pub fn unit(self) -> Vec3 {
        match self {
            LocalAxis::X => Vec3::X,
            LocalAxis::Y => Vec3::Y,
            LocalAxis::Z => Vec3::Z,
        }
    }
}

/// World-space position and orientation.
///
/// # Example
/// ```rust,ignore
/// use strider_core::{LocalAxis, Transform};
/// use glam::Vec3;
///
/// let mut t = Transform::from_position(Vec3::new(0.0, 2.0, 10.0));
/// t.look_at(Vec3::ZERO, Vec3::Y);
/// t.translate_local(LocalAxis::Z, -1.0); // one unit towards the origin
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// Orientation as a unit quaternion.
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Origin, no rotation.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Construct with a world-space position and identity rotation.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Move `distance` units along one of the object's own axes.
    pub fn translate_local(&mut self, axis: LocalAxis, distance: f32) {
        self.position += self.rotation * axis.unit() * distance;
    }

    /// Turn so the forward axis (`-Z`) points at `target`.
    ///
    /// Returns `false` and leaves the rotation untouched when `target`
    /// coincides with the position.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) -> bool {
        match look_rotation(target - self.position, up) {
            Some(rotation) => {
                self.rotation = rotation;
                true
            }
            None => false,
        }
    }

    /// Forward direction in world space (`−Z` rotated by the quaternion).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Up direction in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}
