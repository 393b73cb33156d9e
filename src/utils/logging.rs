//! Diagnostic logging.
//!
//! The terminal interface owns stdout, so tracing output only ever goes to a
//! file. Without a log file no subscriber is installed and the `tracing`
//! macros compile down to no-ops.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter directive.
pub const LOG_FILTER_ENV: &str = "AGRICHAT_LOG";

const DEFAULT_FILTER: &str = "info";

/// Build the filter from `AGRICHAT_LOG`, falling back to `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a global subscriber that appends to `log_file`.
///
/// Returns `Ok(false)` when no file was given. Installing twice is harmless;
/// the second call keeps the first subscriber.
pub fn init_tracing(log_file: Option<&Path>) -> Result<bool, Box<dyn std::error::Error>> {
    let Some(path) = log_file else {
        return Ok(false);
    };

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();
    Ok(installed)
}
