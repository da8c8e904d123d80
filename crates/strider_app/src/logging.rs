use anyhow::{Context, Result};
use log::LevelFilter;

/// Install the global logger: `[LEVEL target] message` lines on stdout.
///
/// winit and gilrs are capped at `warn` so device chatter does not drown the
/// control logs.
pub fn init(level: LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
        })
        .level(level)
        .level_for("winit", level.min(LevelFilter::Warn))
        .level_for("gilrs", level.min(LevelFilter::Warn))
        .chain(std::io::stdout())
        .apply()
        .context("a global logger is already installed")
}
