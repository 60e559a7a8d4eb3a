// Logging module - tracing subscriber setup
//
// Human-readable logs go to stderr so stdout stays free for the JSON event
// stream. File logging is optional: a non-blocking JSON writer with rotation,
// whose guard must live until the process exits or buffered lines are lost.
//
// Filter precedence: RUST_LOG env var > config file > default "info"

mod settings;

pub use settings::{FileLogging, LogRotation, LoggingConfig};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
///
/// Returns the file writer's guard when file logging is active; hold it for
/// the lifetime of the program.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.directive()));

    let (file_writer, guard) = if config.file_enabled {
        match std::fs::create_dir_all(&config.file_dir) {
            Ok(()) => {
                let (writer, guard) = tracing_appender::non_blocking(config.appender());
                (Some(writer), Some(guard))
            }
            Err(e) => {
                // Fall back to stderr-only logging
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    config.file_dir, e
                );
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    // File layer uses JSON format for structured log parsing
    let file_layer = file_writer.map(|writer| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_directive_normalises_level() {
        let mut config = LoggingConfig::default();
        assert_eq!(config.directive(), "zarasprite=info");

        config.level = " DEBUG ".to_string();
        assert_eq!(config.directive(), "zarasprite=debug");
    }

    #[test]
    fn test_missing_section_is_default() {
        assert_eq!(LoggingConfig::from_file(None), LoggingConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let file: FileLogging = toml::from_str(
            r#"
file_enabled = true
file_rotation = "minutely"
"#,
        )
        .unwrap();
        let config = LoggingConfig::from_file(Some(file));

        assert!(config.file_enabled);
        assert_eq!(config.file_rotation, LogRotation::Minutely);
        assert_eq!(config.file_dir, PathBuf::from("./logs/trace"));
        assert_eq!(config.file_prefix, "zarasprite");
    }

    #[test]
    fn test_unknown_rotation_is_rejected() {
        assert!(toml::from_str::<FileLogging>(r#"file_rotation = "weekly""#).is_err());
    }

    #[test]
    fn test_appender_writes_into_configured_dir() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            file_enabled: true,
            file_dir: dir.path().to_path_buf(),
            file_rotation: LogRotation::Never,
            file_prefix: "trace.log".to_string(),
            ..LoggingConfig::default()
        };

        let mut appender = config.appender();
        appender.write_all(b"{}\n").unwrap();
        appender.flush().unwrap();

        assert!(dir.path().join("trace.log").exists());
    }
}
