//! Feature flags configuration
//!
//! Feature flags for optional modules (opt-out unless noted).

use serde::Deserialize;

/// Feature flags for optional modules
#[derive(Debug, Clone)]
pub struct Features {
    /// Storage module: write events to JSONL files
    pub storage: bool,

    /// Print every event to stdout as a JSON line
    pub echo: bool,

    /// Also emit events for chat lines that were not private messages (opt-in)
    pub record_ignored: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            storage: true,
            echo: true,
            record_ignored: false,
        }
    }
}

/// Feature flags as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileFeatures {
    pub storage: Option<bool>,
    pub echo: Option<bool>,
    pub record_ignored: Option<bool>,
}

impl Features {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileFeatures>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            storage: file.storage.unwrap_or(defaults.storage),
            echo: file.echo.unwrap_or(defaults.echo),
            record_ignored: file.record_ignored.unwrap_or(defaults.record_ignored),
        }
    }
}
