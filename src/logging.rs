use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Default filter directive for a `-v` count.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Pick the filter directive: `RUST_LOG`, then the config file, then `-v`.
pub fn build_filter(configured: Option<&str>, verbose: u8) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directive = configured.unwrap_or_else(|| level_for_verbosity(verbose));
    EnvFilter::try_new(directive).map_err(|e| anyhow!("invalid log filter '{directive}': {e}"))
}

/// Send tracing output to `path`, appending. The terminal belongs to the UI.
pub fn init_tracing(path: &Path, configured: Option<&str>, verbose: u8) -> Result<()> {
    let env_filter = build_filter(configured, verbose)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
