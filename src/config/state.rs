// Application state module
// Immutable serving state shared by every connection task

use std::path::PathBuf;

use super::types::Config;

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Canonical root directory, fixed for the lifetime of the process
    pub root: PathBuf,
    pub access_log: bool,
    pub keep_alive: bool,
}

impl AppState {
    pub fn new(config: &Config, root: PathBuf) -> Self {
        Self {
            root,
            access_log: config.logging.access_log,
            keep_alive: config.performance.keep_alive,
        }
    }
}
