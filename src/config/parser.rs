//! Parser configuration
//!
//! Everything the extraction stages need to know about the live server:
//! which sender names we trust, how arrows and closing brackets are spelled,
//! and what the tracking tokens look like.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::util::{eq_ignore_case, find_ignore_ascii_case};

/// Default tracking-token pattern: whitespace, `flp`, one of p/m/s, `_`, hex id
pub const DEFAULT_TRACKING_PATTERN: &str = r"\sflp[pms]_[0-9a-fA-F-]+\s*";

/// Configuration for [`crate::parser::Parser`]
///
/// Read-only once a parser has been built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Known sender aliases (matched case-insensitively, reported as written here)
    pub known_aliases: Vec<String>,

    /// Accepted spellings of the sender/receiver separator.
    /// The server has been seen sending both a padded and an unpadded arrow.
    pub arrow_tokens: Vec<String>,

    /// Accepted spellings of the bracket that closes the `[sender -> receiver]` header
    pub closer_tokens: Vec<String>,

    /// Regex for tracking tokens stripped from message bodies
    pub tracking_pattern: String,

    /// Colour the hover form uses for the message body
    pub highlight_color: String,

    /// Label introducing the sender in hover metadata (matched case-insensitively)
    pub hover_label: String,

    /// How many fragments after the label are checked against the alias list
    pub hover_scan_window: usize,

    /// Bodies found without the highlight colour must be longer than this
    pub min_fallback_body_len: usize,

    /// Maximum nesting depth explored in a component tree
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            known_aliases: Vec::new(),
            arrow_tokens: vec!["->".to_string(), " -> ".to_string()],
            closer_tokens: vec!["]".to_string(), "] ".to_string()],
            tracking_pattern: DEFAULT_TRACKING_PATTERN.to_string(),
            highlight_color: "light_purple".to_string(),
            hover_label: "sender:".to_string(),
            hover_scan_window: 3,
            min_fallback_body_len: 10,
            max_depth: 64,
        }
    }
}

impl ParserConfig {
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_arrow(&self, text: &str) -> bool {
        self.arrow_tokens.iter().any(|t| t == text)
    }

    pub fn is_closer(&self, text: &str) -> bool {
        self.closer_tokens.iter().any(|t| t == text)
    }

    /// Canonical spelling of `candidate` if it is a known alias (Unicode case-insensitive)
    pub fn canonical_alias(&self, candidate: &str) -> Option<&str> {
        self.known_aliases
            .iter()
            .find(|alias| eq_ignore_case(alias, candidate))
            .map(String::as_str)
    }

    /// ASCII case-insensitive search for the hover label
    pub fn contains_hover_label(&self, text: &str) -> bool {
        find_ignore_ascii_case(text, &self.hover_label).is_some()
    }

    /// Reject configurations no parser can work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arrow_tokens.iter().all(|t| t.is_empty()) {
            return Err(ConfigError::Empty {
                field: "parser.arrow_tokens",
            });
        }
        if self.closer_tokens.iter().all(|t| t.is_empty()) {
            return Err(ConfigError::Empty {
                field: "parser.closer_tokens",
            });
        }
        if self.hover_label.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "parser.hover_label",
            });
        }
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "parser.max_depth",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Parser settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileParser {
    pub known_aliases: Option<Vec<String>>,
    pub arrow_tokens: Option<Vec<String>>,
    pub closer_tokens: Option<Vec<String>>,
    pub tracking_pattern: Option<String>,
    pub highlight_color: Option<String>,
    pub hover_label: Option<String>,
    pub hover_scan_window: Option<usize>,
    pub min_fallback_body_len: Option<usize>,
    pub max_depth: Option<usize>,
}

impl ParserConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileParser>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            known_aliases: file.known_aliases.unwrap_or(defaults.known_aliases),
            arrow_tokens: file.arrow_tokens.unwrap_or(defaults.arrow_tokens),
            closer_tokens: file.closer_tokens.unwrap_or(defaults.closer_tokens),
            tracking_pattern: file.tracking_pattern.unwrap_or(defaults.tracking_pattern),
            highlight_color: file.highlight_color.unwrap_or(defaults.highlight_color),
            hover_label: file.hover_label.unwrap_or(defaults.hover_label),
            hover_scan_window: file.hover_scan_window.unwrap_or(defaults.hover_scan_window),
            min_fallback_body_len: file
                .min_fallback_body_len
                .unwrap_or(defaults.min_fallback_body_len),
            max_depth: file.max_depth.unwrap_or(defaults.max_depth),
        }
    }
}
