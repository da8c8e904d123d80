// strider_core: camera contract, math helpers and input aggregation

pub mod camera;
pub mod error;
pub mod math;
pub mod time;
pub mod transform;

// input helpers for keyboard / mouse / gamepad
#[cfg(feature = "input")]
pub mod input;

pub use camera::{Camera, CameraRig};
pub use error::ControlError;
pub use math::CubicBezier;
pub use time::{Time, TimeClock};
pub use transform::{LocalAxis, Transform};

// re-export common input types so callers don't need to depend on winit
#[cfg(feature = "input")]
pub use input::{EventHub, InputAggregator, InputEvent, KeyCode, MouseButton, PointerSurface};

// glam is part of the public API (positions, orientations)
pub use glam;
