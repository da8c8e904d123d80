//! Windowed viewer hosting the Strider camera controls.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use strider_app::App;
//!
//! fn main() -> anyhow::Result<()> {
//!     App::new()
//!         .with_config_file("strider.toml")?
//!         .with_title("Hangar walkthrough")
//!         .run()
//! }
//! ```
//!
//! `Q` switches between orbit and first-person; while flying, click to
//! capture the pointer and `Escape` to let it go.

pub mod builder;
pub mod config;
#[cfg(feature = "gamepad")]
mod gamepad;
pub mod logging;
mod runner;
pub mod session;
mod surface;

pub use builder::App;
pub use config::StriderConfig;
pub use session::Session;

// ── Re-export the controls so hosts need a single dependency ───────────────
pub use strider_controls::{ControlMode, ControllerSettings, OrientationController};
pub use strider_core::{Camera, CameraRig, KeyCode, MouseButton};
