//! Command relay and trigger rule configuration
//!
//! Both act on messages after parsing: triggers mark messages that address the
//! bot, the relay forwards commands from trusted senders back to the server.

use serde::Deserialize;

// ─────────────────────────────────────────────────────────────────────────────
// Command Relay
// ─────────────────────────────────────────────────────────────────────────────

/// Command relay configuration (opt-in: default disabled)
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    /// Master switch for the relay
    pub enabled: bool,
    /// Senders allowed to relay commands (case-insensitive)
    pub allowed_senders: Vec<String>,
    /// Body prefix that marks a relay command, e.g. "!say hello"
    pub command_prefix: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_senders: Vec::new(),
            command_prefix: "!say ".to_string(),
        }
    }
}

/// Relay settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileRelay {
    pub enabled: Option<bool>,
    pub allowed_senders: Option<Vec<String>>,
    pub command_prefix: Option<String>,
}

impl RelayConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileRelay>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            enabled: file.enabled.unwrap_or(defaults.enabled),
            allowed_senders: file.allowed_senders.unwrap_or(defaults.allowed_senders),
            command_prefix: file.command_prefix.unwrap_or(defaults.command_prefix),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Trigger Rules
// ─────────────────────────────────────────────────────────────────────────────

/// Default trigger patterns: an explicit `/zarasprite <args>` command, or the word "sprite"
pub const DEFAULT_TRIGGER_PATTERNS: &[&str] = &[r"^/zarasprite\s+(.*)", r"\bsprite\b"];

/// Trigger rule configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TriggersConfig {
    pub enabled: bool,
    /// Case-insensitive regexes, checked in order
    pub patterns: Vec<String>,
}

impl Default for TriggersConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            patterns: DEFAULT_TRIGGER_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Trigger settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileTriggers {
    pub enabled: Option<bool>,
    pub patterns: Option<Vec<String>>,
}

impl TriggersConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileTriggers>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            enabled: file.enabled.unwrap_or(defaults.enabled),
            patterns: file.patterns.unwrap_or(defaults.patterns),
        }
    }
}
