//! Gamepad bookkeeping.
//!
//! Pads are not event-driven for their analog state: the host pushes a
//! [`GamepadSnapshot`] when a pad connects and whenever it has fresher
//! readings, and the controls sample the registry once per frame.  Only the
//! first pad that connected is ever read.

use serde::Deserialize;

use crate::error::ControlError;
use crate::math::{apply_dead_zone, CubicBezier};

/// Last known state of one pad.
///
/// Axis and button indices follow the host's raw layout; [`GamepadLayout`]
/// says which index means what.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GamepadSnapshot {
    pub index: u32,
    pub id: String,
    pub axes: Vec<f32>,
    pub buttons: Vec<bool>,
}

impl GamepadSnapshot {
    pub fn new(index: u32, id: impl Into<String>, axes: Vec<f32>, buttons: Vec<bool>) -> Self {
        Self {
            index,
            id: id.into(),
            axes,
            buttons,
        }
    }

    fn axis(&self, i: usize) -> Result<f32, ControlError> {
        self.axes
            .get(i)
            .copied()
            .ok_or_else(|| ControlError::MalformedGamepad {
                index: self.index,
                needed: format!("axis {i} (has {})", self.axes.len()),
            })
    }

    fn button(&self, i: usize) -> Result<bool, ControlError> {
        self.buttons
            .get(i)
            .copied()
            .ok_or_else(|| ControlError::MalformedGamepad {
                index: self.index,
                needed: format!("button {i} (has {})", self.buttons.len()),
            })
    }
}

/// Connected pads in connection order.
#[derive(Debug, Clone, Default)]
pub struct GamepadRegistry {
    entries: Vec<GamepadSnapshot>,
}

impl GamepadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pad.  A reconnect under an index that is still present
    /// replaces the snapshot but keeps the original position.
    pub fn connect(&mut self, snapshot: GamepadSnapshot) {
        match self.entries.iter_mut().find(|e| e.index == snapshot.index) {
            Some(entry) => *entry = snapshot,
            None => self.entries.push(snapshot),
        }
    }

    /// Forget the pad at `index`.  Returns whether it was registered.
    pub fn disconnect(&mut self, index: u32) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.index != index);
        self.entries.len() != before
    }

    /// Refresh the readings of a registered pad; unknown pads are ignored.
    pub fn refresh(&mut self, snapshot: GamepadSnapshot) -> bool {
        match self.entries.iter_mut().find(|e| e.index == snapshot.index) {
            Some(entry) => {
                *entry = snapshot;
                true
            }
            None => false,
        }
    }

    /// The pad that connected first among those still connected.
    pub fn first(&self) -> Option<&GamepadSnapshot> {
        self.entries.first()
    }

    pub fn get(&self, index: u32) -> Option<&GamepadSnapshot> {
        self.entries.iter().find(|e| e.index == index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One frame's worth of normalized pad input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GamepadSample {
    pub move_x: f32,
    pub move_z: f32,
    pub move_y: f32,
    pub look_x: f32,
    pub look_y: f32,
}

/// Which raw indices drive what, plus the analog filtering.
///
/// The defaults match a typical XInput pad exposed without the standard
/// mapping: left stick on axes 0/1, right stick on 3/4, face button 0 to
/// rise and button 11 to sink.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GamepadLayout {
    pub move_x_axis: usize,
    pub move_z_axis: usize,
    pub look_x_axis: usize,
    pub look_y_axis: usize,
    pub ascend_button: usize,
    pub descend_button: usize,
    /// Readings with a smaller magnitude count as exactly zero.
    ///
    /// Default: `0.05`
    pub dead_zone: f32,
    /// Flip the look axes so pushing the stick right/down turns right/down.
    ///
    /// Default: `true`
    pub invert_look: bool,
    #[serde(skip)]
    pub look_curve: CubicBezier,
}

impl Default for GamepadLayout {
    fn default() -> Self {
        Self {
            move_x_axis: 0,
            move_z_axis: 1,
            look_x_axis: 3,
            look_y_axis: 4,
            ascend_button: 0,
            descend_button: 11,
            dead_zone: 0.05,
            invert_look: true,
            look_curve: CubicBezier::STICK_RESPONSE,
        }
    }
}

impl GamepadLayout {
    /// Normalize `snapshot` into a [`GamepadSample`].
    ///
    /// Movement axes are dead-zoned; look axes are dead-zoned, eased and
    /// optionally inverted; the two vertical buttons add up (both pressed
    /// cancel out).  Fails if the snapshot lacks any index the layout uses.
    pub fn sample(&self, snapshot: &GamepadSnapshot) -> Result<GamepadSample, ControlError> {
        let move_x = apply_dead_zone(snapshot.axis(self.move_x_axis)?, self.dead_zone);
        let move_z = apply_dead_zone(snapshot.axis(self.move_z_axis)?, self.dead_zone);
        let look_x = apply_dead_zone(snapshot.axis(self.look_x_axis)?, self.dead_zone);
        let look_y = apply_dead_zone(snapshot.axis(self.look_y_axis)?, self.dead_zone);

        let mut move_y = 0.0;
        if snapshot.button(self.descend_button)? {
            move_y -= 1.0;
        }
        if snapshot.button(self.ascend_button)? {
            move_y += 1.0;
        }

        let flip = if self.invert_look { -1.0 } else { 1.0 };
        Ok(GamepadSample {
            move_x,
            move_z,
            move_y,
            look_x: flip * self.look_curve.ease_signed(look_x),
            look_y: flip * self.look_curve.ease_signed(look_y),
        })
    }
}
