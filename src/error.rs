//! Error types for zarasprite.

use crate::parser::Strategy;

/// Why a chat line was not turned into a [`crate::parser::ParsedMessage`]
///
/// None of these are fatal: the caller simply has no PM for this line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("component tree produced no text fragments")]
    EmptyTree,

    #[error("no private-message signature among {fragment_count} fragment(s)")]
    NoSignature { fragment_count: usize },

    #[error("{strategy} signature found but sender or body could not be resolved")]
    IncompleteExtraction { strategy: Strategy },

    #[error("chat line is not valid JSON: {0}")]
    InvalidJson(String),
}

/// Problems the parser worked around while still producing a result
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Warning {
    #[error("skipped {skipped} malformed node(s)")]
    MalformedTree { skipped: usize },

    #[error("descent stopped below depth {max_depth}")]
    DepthExceeded { max_depth: usize },
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("Invalid configuration value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },

    #[error("Invalid regex for {field} ({pattern:?}): {source}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Command relay errors.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("sender {sender:?} is not allowed to relay commands")]
    Unauthorized { sender: String },

    #[error("outbound text contains forbidden character {character:?}")]
    ForbiddenCharacter { character: char },

    #[error("outbound text is empty")]
    EmptyCommand,

    #[error("session rejected outbound text: {0}")]
    Session(String),
}
