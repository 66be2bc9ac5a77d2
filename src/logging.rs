//! Diagnostic logging.
//!
//! The TUI owns the terminal, so log output goes to a file under the user's
//! local data directory instead of stdout. Filtering follows the `SCOUT_LOG`
//! environment variable, defaulting to info-level events from this crate.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::eyre::{eyre, Result};
use tracing_subscriber::EnvFilter;

/// Default directive when `SCOUT_LOG` is unset.
const DEFAULT_FILTER: &str = "scout=info";

pub fn log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("scout").join("scout.log"))
}

/// Install the global subscriber writing to the log file.
pub fn init() -> Result<()> {
    let path = log_path().ok_or_else(|| eyre!("no local data directory"))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(&path)?;

    let filter = EnvFilter::try_from_env("SCOUT_LOG")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(())
}
