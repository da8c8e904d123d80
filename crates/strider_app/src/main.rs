use std::path::PathBuf;

use anyhow::Result;
use strider_app::{logging, App, StriderConfig};

const DEFAULT_CONFIG: &str = "strider.toml";

fn main() -> Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    let config = StriderConfig::load(&path)?;
    logging::init(config.logging.level_filter()?)?;
    log::info!("using configuration from {}", path.display());

    App::from_config(config).run()
}
