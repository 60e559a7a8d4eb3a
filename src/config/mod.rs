//! Configuration for the chat listener
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/zarasprite/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod features;
pub mod parser;
mod relay;
mod serialization;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports
// ─────────────────────────────────────────────────────────────────────────────

pub use features::{FileFeatures, Features};
pub use crate::logging::{FileLogging, LogRotation, LoggingConfig};
pub use parser::{FileParser, ParserConfig};
pub use relay::{FileRelay, FileTriggers, RelayConfig, TriggersConfig, DEFAULT_TRIGGER_PATTERNS};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name the bot answers to in chat
pub const DEFAULT_BOT_NAME: &str = "ZaraSprite";

const ENV_LOG_DIR: &str = "ZARASPRITE_LOG_DIR";
const ENV_BOT_NAME: &str = "ZARASPRITE_BOT_NAME";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for session event logs
    pub log_dir: PathBuf,

    /// The bot's own in-game name
    pub bot_name: String,

    /// Feature flags for optional modules
    pub features: Features,

    /// Private-message parser settings
    pub parser: ParserConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Command relay settings
    pub relay: RelayConfig,

    /// Trigger rules
    pub triggers: TriggersConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./logs"),
            bot_name: DEFAULT_BOT_NAME.to_string(),
            features: Features::default(),
            parser: ParserConfig::default(),
            logging: LoggingConfig::default(),
            relay: RelayConfig::default(),
            triggers: TriggersConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub log_dir: Option<String>,
    pub bot_name: Option<String>,

    /// Optional [features] section
    pub features: Option<FileFeatures>,

    /// Optional [parser] section
    pub parser: Option<FileParser>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,

    /// Optional [relay] section
    pub relay: Option<FileRelay>,

    /// Optional [triggers] section
    pub triggers: Option<FileTriggers>,
}

/// Values taken from the environment, captured once so merging stays testable
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub log_dir: Option<String>,
    pub bot_name: Option<String>,
}

impl EnvOverrides {
    pub fn capture() -> Self {
        Self {
            log_dir: std::env::var(ENV_LOG_DIR).ok().filter(|v| !v.is_empty()),
            bot_name: std::env::var(ENV_BOT_NAME).ok().filter(|v| !v.is_empty()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/zarasprite/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("zarasprite").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        // Config::default().to_toml() is the single source of truth
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Overwrite the config file with the default template
    pub fn reset_config_file() -> anyhow::Result<PathBuf> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, Self::default().to_toml())?;
        Ok(path)
    }

    /// Parse a config file's contents
    pub(crate) fn parse_file_config(contents: &str) -> Result<FileConfig, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load file config if it exists
    ///
    /// A config file that exists but cannot be read or parsed is fatal: the
    /// process exits with a clear message instead of running on defaults.
    fn load_file_config(path: Option<&Path>) -> FileConfig {
        let Some(path) = path else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::parse_file_config(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  Tip: Check for:\n");
                    eprintln!("    - Missing quotes around string values");
                    eprintln!("    - Backslashes in regex patterns (use 'single quotes')");
                    eprintln!("    - Malformed array syntax");
                    eprintln!("    - Typos in section names\n");
                    eprintln!("  To reset, run `zarasprite config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars -> file -> defaults
    pub fn from_env() -> Self {
        let file = Self::load_file_config(Self::config_path().as_deref());
        Self::resolve(file, &EnvOverrides::capture())
    }

    /// Merge a parsed config file with environment overrides
    pub(crate) fn resolve(file: FileConfig, env: &EnvOverrides) -> Self {
        let defaults = Self::default();

        // Log directory: env > file > default
        let log_dir = env
            .log_dir
            .clone()
            .or(file.log_dir)
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);

        // Bot name: env > file > default
        let bot_name = env
            .bot_name
            .clone()
            .or(file.bot_name)
            .unwrap_or(defaults.bot_name);

        Self {
            log_dir,
            bot_name,
            features: Features::from_file(file.features),
            parser: ParserConfig::from_file(file.parser),
            logging: LoggingConfig::from_file(file.logging),
            relay: RelayConfig::from_file(file.relay),
            triggers: TriggersConfig::from_file(file.triggers),
        }
    }
}
