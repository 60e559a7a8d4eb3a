//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;
use toml::Value;

/// Render a string as a TOML value
pub(super) fn toml_string(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

/// Render a list of strings as a TOML array
pub(super) fn toml_list(values: &[String]) -> String {
    Value::Array(values.iter().cloned().map(Value::String).collect()).to_string()
}

impl Config {
    /// Serialize the full configuration as a commented TOML document
    pub fn to_toml(&self) -> String {
        let parser = &self.parser;
        let logging = &self.logging;

        format!(
            r#"# zarasprite configuration

# Directory for per-session event logs (ZARASPRITE_LOG_DIR overrides)
log_dir = {log_dir}

# The bot's in-game name (ZARASPRITE_BOT_NAME overrides)
bot_name = {bot_name}

# Feature flags
[features]
storage = {storage}
echo = {echo}
record_ignored = {record_ignored}

# ─────────────────────────────────────────────────────────────────────────────
# PRIVATE MESSAGE PARSER
# ─────────────────────────────────────────────────────────────────────────────
# known_aliases: senders recognised in hover metadata (case-insensitive)
# arrow_tokens / closer_tokens: exact spellings of "->" and "]" in the header
# tracking_pattern: regex for server tracking tokens stripped from bodies
[parser]
known_aliases = {aliases}
arrow_tokens = {arrows}
closer_tokens = {closers}
tracking_pattern = {tracking}
highlight_color = {highlight}
hover_label = {hover_label}
hover_scan_window = {scan_window}
min_fallback_body_len = {min_body}
max_depth = {max_depth}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level}
# JSON file logging (in addition to stderr)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir}
file_rotation = "{log_file_rotation}"  # minutely, hourly, daily, never
file_prefix = {log_file_prefix}

# ─────────────────────────────────────────────────────────────────────────────
# COMMAND RELAY (Optional)
# ─────────────────────────────────────────────────────────────────────────────
# Lets trusted senders make the bot speak: a PM of "!say hello" is relayed
# as "hello". Text with control characters or '|' is refused.
[relay]
enabled = {relay_enabled}
allowed_senders = {relay_senders}
command_prefix = {relay_prefix}

# Trigger rules: case-insensitive regexes; the first capture group becomes
# the trigger argument
[triggers]
enabled = {triggers_enabled}
patterns = {trigger_patterns}
"#,
            log_dir = toml_string(&self.log_dir.display().to_string()),
            bot_name = toml_string(&self.bot_name),
            storage = self.features.storage,
            echo = self.features.echo,
            record_ignored = self.features.record_ignored,
            aliases = toml_list(&parser.known_aliases),
            arrows = toml_list(&parser.arrow_tokens),
            closers = toml_list(&parser.closer_tokens),
            tracking = toml_string(&parser.tracking_pattern),
            highlight = toml_string(&parser.highlight_color),
            hover_label = toml_string(&parser.hover_label),
            scan_window = parser.hover_scan_window,
            min_body = parser.min_fallback_body_len,
            max_depth = parser.max_depth,
            log_level = toml_string(&logging.level),
            log_file_enabled = logging.file_enabled,
            log_file_dir = toml_string(&logging.file_dir.display().to_string()),
            log_file_rotation = logging.file_rotation.as_str(),
            log_file_prefix = toml_string(&logging.file_prefix),
            relay_enabled = self.relay.enabled,
            relay_senders = toml_list(&self.relay.allowed_senders),
            relay_prefix = toml_string(&self.relay.command_prefix),
            triggers_enabled = self.triggers.enabled,
            trigger_patterns = toml_list(&self.triggers.patterns),
        )
    }
}
