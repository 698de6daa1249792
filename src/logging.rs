// 📝 Logging setup
//
// The TUI owns stdout, so interactive runs log to a file (or not at all).
// One-shot commands log to stderr.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{Result, WalletError};

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    /// Append to this file
    File(&'a Path),
    Stderr,
    /// No subscriber installed; events are dropped
    Off,
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init(target: LogTarget<'_>) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match target {
        LogTarget::Off => Ok(()),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(WalletError::LogInit),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| WalletError::LogFile {
                    path: path.to_path_buf(),
                    source,
                })?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
                .map_err(WalletError::LogInit)
        }
    }
}
