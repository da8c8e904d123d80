//! Keyboard-driven pose control for a six-joint articulated rig.
//!
//! Each joint turns about one local axis.  A pair of keys drives each joint
//! in the positive or negative direction; [`RigPoseController::apply`] then
//! nudges every active bone by a small fixed rotation per frame.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::{Quat, Vec3};
use serde::Deserialize;
use strider_core::input::{Direction, EventHub, EventKind, Flow, InputEvent, Subscription};
use strider_core::{KeyCode, LocalAxis};

/// Rotation step applied per frame to an active joint.
pub const DEFAULT_STEP: f32 = 0.01;

/// The rig's joints, base first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RigJoint {
    Base,
    Arm1,
    Arm2,
    Arm3,
    Arm4,
    Arm5,
}

impl RigJoint {
    pub const ALL: [RigJoint; 6] = [
        RigJoint::Base,
        RigJoint::Arm1,
        RigJoint::Arm2,
        RigJoint::Arm3,
        RigJoint::Arm4,
        RigJoint::Arm5,
    ];

    /// Name of the bone in the host's pose table.
    pub fn bone_name(self) -> &'static str {
        match self {
            RigJoint::Base => "base",
            RigJoint::Arm1 => "arm1",
            RigJoint::Arm2 => "arm2",
            RigJoint::Arm3 => "arm3",
            RigJoint::Arm4 => "arm4",
            RigJoint::Arm5 => "arm5",
        }
    }

    /// Local axis the joint turns about.
    pub fn axis(self) -> LocalAxis {
        match self {
            RigJoint::Base | RigJoint::Arm2 | RigJoint::Arm4 => LocalAxis::Z,
            RigJoint::Arm1 => LocalAxis::X,
            RigJoint::Arm3 | RigJoint::Arm5 => LocalAxis::Y,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Bone lookup supplied by the host.
///
/// The rig is usually loaded asynchronously; until every bone resolves the
/// controller leaves the pose alone.
pub trait BonePose {
    fn bone_rotation_mut(&mut self, name: &str) -> Option<&mut Quat>;
}

impl BonePose for HashMap<String, Quat> {
    fn bone_rotation_mut(&mut self, name: &str) -> Option<&mut Quat> {
        self.get_mut(name)
    }
}

/// Which keys drive which joint.
#[derive(Debug, Clone, Default)]
pub struct RigKeyBindings {
    map: HashMap<KeyCode, (RigJoint, Direction)>,
}

impl RigKeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// T/G, Y/H, U/J, I/K, O/L, P/; for joints one to six.
    pub fn with_default_layout() -> Self {
        let mut keys = Self::new();
        let pairs = [
            (KeyCode::KeyT, KeyCode::KeyG),
            (KeyCode::KeyY, KeyCode::KeyH),
            (KeyCode::KeyU, KeyCode::KeyJ),
            (KeyCode::KeyI, KeyCode::KeyK),
            (KeyCode::KeyO, KeyCode::KeyL),
            (KeyCode::KeyP, KeyCode::Semicolon),
        ];
        for (joint, (plus, minus)) in RigJoint::ALL.into_iter().zip(pairs) {
            keys.bind(plus, joint, Direction::Positive);
            keys.bind(minus, joint, Direction::Negative);
        }
        keys
    }

    pub fn bind(&mut self, key: KeyCode, joint: RigJoint, direction: Direction) {
        self.map.insert(key, (joint, direction));
    }

    pub fn get(&self, key: KeyCode) -> Option<(RigJoint, Direction)> {
        self.map.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Settings read from the `[rig]` config section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RigSettings {
    pub enabled: bool,
    pub step: f32,
}

impl Default for RigSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            step: DEFAULT_STEP,
        }
    }
}

#[derive(Debug, Default)]
struct RigState {
    keys: RigKeyBindings,
    intent: [f32; 6],
}

impl RigState {
    fn key_down(&mut self, key: KeyCode) {
        if let Some((joint, direction)) = self.keys.get(key) {
            self.intent[joint.slot()] = direction.sign();
        }
    }

    // either key of the pair stops the joint
    fn key_up(&mut self, key: KeyCode) {
        if let Some((joint, _)) = self.keys.get(key) {
            self.intent[joint.slot()] = 0.0;
        }
    }
}

/// Turns rig keys into per-frame bone rotations.
pub struct RigPoseController {
    pub settings: RigSettings,
    state: Rc<RefCell<RigState>>,
    subscriptions: Vec<Subscription>,
}

impl RigPoseController {
    pub fn new(hub: &EventHub) -> Self {
        Self::with_bindings(hub, RigKeyBindings::with_default_layout(), RigSettings::default())
    }

    pub fn with_bindings(hub: &EventHub, keys: RigKeyBindings, settings: RigSettings) -> Self {
        let state = Rc::new(RefCell::new(RigState {
            keys,
            ..Default::default()
        }));

        let s = state.clone();
        let down = hub.subscribe(EventKind::KeyDown, move |e| {
            if let InputEvent::KeyDown(key) = e {
                s.borrow_mut().key_down(*key);
            }
            Flow::Continue
        });
        let s = state.clone();
        let up = hub.subscribe(EventKind::KeyUp, move |e| {
            if let InputEvent::KeyUp(key) = e {
                s.borrow_mut().key_up(*key);
            }
            Flow::Continue
        });

        Self {
            settings,
            state,
            subscriptions: vec![down, up],
        }
    }

    /// Current intent of `joint`: `-1`, `0` or `1`.
    pub fn intent(&self, joint: RigJoint) -> f32 {
        self.state.borrow().intent[joint.slot()]
    }

    /// Rotate every active joint of `pose` by one step.
    ///
    /// Returns how many bones were turned.  Does nothing until every bone
    /// of the rig is present in `pose`.
    pub fn apply(&self, pose: &mut impl BonePose) -> usize {
        if !self.settings.enabled {
            return 0;
        }
        if RigJoint::ALL
            .iter()
            .any(|j| pose.bone_rotation_mut(j.bone_name()).is_none())
        {
            return 0;
        }

        let intent = self.state.borrow().intent;
        let mut moved = 0;
        for joint in RigJoint::ALL {
            let amount = intent[joint.slot()];
            if amount == 0.0 {
                continue;
            }
            let v: Vec3 = joint.axis().unit() * amount * self.settings.step;
            let delta = Quat::from_xyzw(v.x, v.y, v.z, 1.0).normalize();
            if let Some(rotation) = pose.bone_rotation_mut(joint.bone_name()) {
                *rotation = (delta * *rotation).normalize();
                moved += 1;
            }
        }
        moved
    }

    /// Release the key subscriptions.  Safe to call more than once.
    pub fn dispose(&mut self) {
        if !self.subscriptions.is_empty() {
            log::debug!("releasing {} rig subscriptions", self.subscriptions.len());
            self.subscriptions.clear();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_pose() -> HashMap<String, Quat> {
        RigJoint::ALL
            .iter()
            .map(|j| (j.bone_name().to_string(), Quat::IDENTITY))
            .collect()
    }

    #[test]
    fn default_layout_covers_six_pairs() {
        let keys = RigKeyBindings::with_default_layout();
        assert_eq!(keys.len(), 12);
        assert_eq!(keys.get(KeyCode::KeyT), Some((RigJoint::Base, Direction::Positive)));
        assert_eq!(keys.get(KeyCode::Semicolon), Some((RigJoint::Arm5, Direction::Negative)));
    }

    #[test]
    fn held_key_turns_its_joint() {
        let hub = EventHub::new();
        let rig = RigPoseController::new(&hub);
        let mut pose = full_pose();

        hub.dispatch(&InputEvent::KeyDown(KeyCode::KeyY));
        assert_eq!(rig.intent(RigJoint::Arm1), 1.0);
        assert_eq!(rig.apply(&mut pose), 1);

        let expected = Quat::from_xyzw(0.01, 0.0, 0.0, 1.0).normalize();
        assert!(pose["arm1"].abs_diff_eq(expected, 1e-6));
        assert_eq!(pose["base"], Quat::IDENTITY);
    }

    #[test]
    fn key_up_of_either_key_stops_joint() {
        let hub = EventHub::new();
        let rig = RigPoseController::new(&hub);
        hub.dispatch(&InputEvent::KeyDown(KeyCode::KeyO));
        hub.dispatch(&InputEvent::KeyDown(KeyCode::KeyL));
        assert_eq!(rig.intent(RigJoint::Arm4), -1.0);
        hub.dispatch(&InputEvent::KeyUp(KeyCode::KeyO));
        assert_eq!(rig.intent(RigJoint::Arm4), 0.0);
    }

    #[test]
    fn incomplete_pose_is_left_alone() {
        let hub = EventHub::new();
        let rig = RigPoseController::new(&hub);
        let mut pose = full_pose();
        pose.remove("arm5");

        hub.dispatch(&InputEvent::KeyDown(KeyCode::KeyT));
        assert_eq!(rig.apply(&mut pose), 0);
        assert_eq!(pose["base"], Quat::IDENTITY);
    }

    #[test]
    fn dispose_detaches_listeners() {
        let hub = EventHub::new();
        let mut rig = RigPoseController::new(&hub);
        assert_eq!(hub.listener_count(), 2);
        rig.dispose();
        rig.dispose();
        assert!(rig.is_disposed());
        assert_eq!(hub.listener_count(), 0);

        hub.dispatch(&InputEvent::KeyDown(KeyCode::KeyT));
        assert_eq!(rig.intent(RigJoint::Base), 0.0);
    }
}
