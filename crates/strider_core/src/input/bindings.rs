use std::collections::HashMap;

use glam::Vec3;

use super::KeyCode;
use crate::math::apply_dead_zone;
use crate::transform::LocalAxis;

/// Which way along an axis a key pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Negative,
    Positive,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Negative => -1.0,
            Direction::Positive => 1.0,
        }
    }
}

/// Intent on one movement axis for the current frame.
///
/// Keys and sticks feed the same model: a key produces a full-scale
/// [`AxisIntent::Key`], a stick an [`AxisIntent::Stick`] that has already
/// been dead-zoned.  Whoever wrote last owns the axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AxisIntent {
    #[default]
    Idle,
    Key(Direction),
    Stick(f32),
}

impl AxisIntent {
    /// Stick reading filtered through `dead_zone`; collapses to `Idle`
    /// when the reading is inside it.
    pub fn stick(value: f32, dead_zone: f32) -> Self {
        let v = apply_dead_zone(value, dead_zone).clamp(-1.0, 1.0);
        if v == 0.0 {
            AxisIntent::Idle
        } else {
            AxisIntent::Stick(v)
        }
    }

    /// Signed scalar in `[-1, 1]`.
    #[inline]
    pub fn value(self) -> f32 {
        match self {
            AxisIntent::Idle => 0.0,
            AxisIntent::Key(dir) => dir.sign(),
            AxisIntent::Stick(v) => v,
        }
    }

    #[inline]
    pub fn is_idle(self) -> bool {
        self.value() == 0.0
    }
}

/// Per-axis movement intent in camera space.
///
/// `z` is negative for "forward" because the camera looks down `-Z`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementIntent {
    pub x: AxisIntent,
    pub y: AxisIntent,
    pub z: AxisIntent,
}

impl MovementIntent {
    pub fn axis(&self, axis: LocalAxis) -> AxisIntent {
        match axis {
            LocalAxis::X => self.x,
            LocalAxis::Y => self.y,
            LocalAxis::Z => self.z,
        }
    }

    pub fn axis_mut(&mut self, axis: LocalAxis) -> &mut AxisIntent {
        match axis {
            LocalAxis::X => &mut self.x,
            LocalAxis::Y => &mut self.y,
            LocalAxis::Z => &mut self.z,
        }
    }

    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.x.value(), self.y.value(), self.z.value())
    }
}

/// Look intent.  Mouse fields are one-shot, pad fields are level-valued.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LookIntent {
    pub mouse_x: f32,
    pub mouse_y: f32,
    pub pad_x: f32,
    pub pad_y: f32,
}

/// A key bound to one end of a movement axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisBinding {
    pub axis: LocalAxis,
    pub direction: Direction,
}

impl AxisBinding {
    pub const fn new(axis: LocalAxis, direction: Direction) -> Self {
        Self { axis, direction }
    }
}

/// Maps keys to movement axes.
///
/// # Example
/// ```rust,ignore
/// use strider_core::input::{AxisBinding, Direction, KeyBindings, KeyCode};
/// use strider_core::LocalAxis;
///
/// let mut keys = KeyBindings::with_default_layout();
/// // fly down with Ctrl instead of Shift
/// keys.unbind(KeyCode::ShiftLeft);
/// keys.bind(KeyCode::ControlLeft, AxisBinding::new(LocalAxis::Y, Direction::Negative));
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    mappings: HashMap<KeyCode, AxisBinding>,
}

impl KeyBindings {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// WASD + arrows for the ground plane, Space / left Shift for up / down.
    pub fn with_default_layout() -> Self {
        use Direction::{Negative, Positive};
        use LocalAxis::{X, Y, Z};

        let mut keys = Self::new();
        keys.bind(KeyCode::KeyW, AxisBinding::new(Z, Negative));
        keys.bind(KeyCode::ArrowUp, AxisBinding::new(Z, Negative));
        keys.bind(KeyCode::KeyS, AxisBinding::new(Z, Positive));
        keys.bind(KeyCode::ArrowDown, AxisBinding::new(Z, Positive));
        keys.bind(KeyCode::KeyA, AxisBinding::new(X, Negative));
        keys.bind(KeyCode::ArrowLeft, AxisBinding::new(X, Negative));
        keys.bind(KeyCode::KeyD, AxisBinding::new(X, Positive));
        keys.bind(KeyCode::ArrowRight, AxisBinding::new(X, Positive));
        keys.bind(KeyCode::Space, AxisBinding::new(Y, Positive));
        keys.bind(KeyCode::ShiftLeft, AxisBinding::new(Y, Negative));
        keys
    }

    /// Binds `key`, overwriting any previous binding for it.
    pub fn bind(&mut self, key: KeyCode, binding: AxisBinding) {
        self.mappings.insert(key, binding);
    }

    /// Removes the binding for `key`, if any.
    pub fn unbind(&mut self, key: KeyCode) {
        self.mappings.remove(&key);
    }

    /// Removes all key bindings.
    pub fn clear_bindings(&mut self) {
        self.mappings.clear();
    }

    pub fn get(&self, key: KeyCode) -> Option<AxisBinding> {
        self.mappings.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_maps_forward_to_negative_z() {
        let keys = KeyBindings::with_default_layout();
        let w = keys.get(KeyCode::KeyW).unwrap();
        assert_eq!(w.axis, LocalAxis::Z);
        assert_eq!(w.direction, Direction::Negative);
        assert_eq!(keys.get(KeyCode::ArrowUp), Some(w));
        assert_eq!(keys.len(), 10);
        assert!(keys.get(KeyCode::KeyQ).is_none());
    }

    #[test]
    fn rebinding_overwrites() {
        let mut keys = KeyBindings::with_default_layout();
        keys.bind(KeyCode::KeyW, AxisBinding::new(LocalAxis::Y, Direction::Positive));
        assert_eq!(keys.get(KeyCode::KeyW).unwrap().axis, LocalAxis::Y);
        keys.clear_bindings();
        assert!(keys.is_empty());
    }

    #[test]
    fn stick_intent_respects_dead_zone() {
        assert_eq!(AxisIntent::stick(0.04, 0.05), AxisIntent::Idle);
        assert_eq!(AxisIntent::stick(-0.5, 0.05), AxisIntent::Stick(-0.5));
        assert_eq!(AxisIntent::stick(1.7, 0.05).value(), 1.0);
        assert_eq!(AxisIntent::Key(Direction::Negative).value(), -1.0);
    }
}
