//! Camera controls built on `strider_core` input aggregation.
//!
//! * [`OrientationController`] – first-person fly camera (keys, mouse, pad)
//! * [`RigPoseController`] – keyboard posing of a six-joint rig
//! * [`ControlModeSwitch`] – orbit / first-person toggle with capture prompt

pub mod first_person;
pub mod mode;
pub mod rig;

pub use first_person::{ControllerSettings, ControllerState, OrientationController, MAX_LATITUDE};
pub use mode::{ControlMode, ControlModeSwitch, Overlay, CAPTURE_PROMPT};
pub use rig::{BonePose, RigJoint, RigKeyBindings, RigPoseController, RigSettings};
