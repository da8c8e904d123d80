//! `strider.toml` loading.
//!
//! Every section and key is optional; a missing file yields the defaults.
//!
//! ```toml
//! [window]
//! title = "Strider"
//! width = 1280
//! height = 720
//!
//! [logging]
//! level = "debug"
//!
//! [first_person]
//! movement_speed = 10.0
//! look_vertical = true
//!
//! [gamepad]
//! dead_zone = 0.1
//!
//! [rig]
//! step = 0.02
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use log::LevelFilter;
use serde::Deserialize;
use strider_controls::{ControllerSettings, RigSettings};
use strider_core::input::GamepadLayout;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Strider".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.level
            .parse::<LevelFilter>()
            .with_context(|| format!("unknown log level `{}`", self.level))
    }
}

/// Whole application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StriderConfig {
    pub window: WindowConfig,
    pub logging: LoggingConfig,
    pub first_person: ControllerSettings,
    pub gamepad: GamepadLayout,
    pub rig: RigSettings,
}

impl StriderConfig {
    /// Read and validate `path`.  A file that does not exist gives the
    /// defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            bail!("window size must be non-zero");
        }
        self.logging.level_filter()?;
        self.first_person.validate()?;
        if !(0.0..1.0).contains(&self.gamepad.dead_zone) {
            bail!("gamepad dead_zone must be in [0, 1)");
        }
        if !self.rig.step.is_finite() {
            bail!("rig step must be finite");
        }
        Ok(())
    }
}
