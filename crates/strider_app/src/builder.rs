use std::path::Path;

use anyhow::Result;
use strider_controls::ControllerSettings;

use crate::config::StriderConfig;

/// Entry point.  Configure with the builder methods, then call
/// [`run`](Self::run).
pub struct App {
    config: StriderConfig,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self::from_config(StriderConfig::default())
    }

    pub fn from_config(config: StriderConfig) -> Self {
        Self { config }
    }

    /// Replace the configuration with the contents of `path`.
    pub fn with_config_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.config = StriderConfig::load(path.as_ref())?;
        Ok(self)
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.config.window.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.window.width = width;
        self.config.window.height = height;
        self
    }

    pub fn with_controller_settings(mut self, settings: ControllerSettings) -> Self {
        self.config.first_person = settings;
        self
    }

    pub fn config(&self) -> &StriderConfig {
        &self.config
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<()> {
        self.config.validate()?;
        crate::runner::run_internal(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_window() {
        let app = App::new().with_title("Hangar").with_size(640, 480);
        assert_eq!(app.config().window.title, "Hangar");
        assert_eq!((app.config().window.width, app.config().window.height), (640, 480));
    }

    #[test]
    fn controller_settings_replace_defaults() {
        let settings = ControllerSettings {
            movement_speed: 25.0,
            ..Default::default()
        };
        let app = App::new().with_controller_settings(settings.clone());
        assert_eq!(app.config().first_person, settings);
    }
}
