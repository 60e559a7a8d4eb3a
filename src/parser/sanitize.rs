//! Tracking-token removal
//!
//! The server appends opaque markers such as ` flpm_1a2b3c-4d ` to message
//! bodies. Each match is replaced with a single space and the result trimmed.
//!
//! Replacement runs until no match is left: a token's trailing whitespace can
//! be the leading whitespace of the next token, so a single pass would leave
//! every second token of a run behind.

use crate::config::parser::DEFAULT_TRACKING_PATTERN;
use crate::error::ConfigError;
use regex::Regex;
use std::borrow::Cow;

/// Strips tracking tokens from message bodies
#[derive(Debug, Clone)]
pub struct Sanitizer {
    pattern: Regex,
}

impl Sanitizer {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            field: "parser.tracking_pattern",
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern })
    }

    /// Remove every tracking token from `body`
    pub fn sanitize(&self, body: &str) -> String {
        let mut current = body.to_string();

        loop {
            let replaced = match self.pattern.replace_all(&current, " ") {
                Cow::Borrowed(_) => break,
                Cow::Owned(replaced) => replaced,
            };
            // A pass that does not shrink the text would never settle
            let shrunk = replaced.len() < current.len();
            current = replaced;
            if !shrunk {
                break;
            }
        }

        current.trim().to_string()
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_TRACKING_PATTERN).expect("default tracking pattern is valid"),
        }
    }
}

/// Sanitize with the default tracking-token pattern
pub fn sanitize(body: &str) -> String {
    Sanitizer::default().sanitize(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tracking_token() {
        assert_eq!(sanitize("hello flpm_1a2b3c-4d world"), "hello world");
    }

    #[test]
    fn test_all_prefix_letters() {
        assert_eq!(sanitize("a flpp_ff b"), "a b");
        assert_eq!(sanitize("a flps_00-11 b"), "a b");
        assert_eq!(sanitize("a flpx_00 b"), "a flpx_00 b");
    }

    #[test]
    fn test_trailing_token() {
        assert_eq!(sanitize("hello flpm_abc123"), "hello");
    }

    #[test]
    fn test_adjacent_tokens() {
        assert_eq!(sanitize("x flpm_1 flps_2 flpp_3 y"), "x y");
    }

    #[test]
    fn test_token_needs_leading_whitespace() {
        assert_eq!(sanitize("flpm_1a2b"), "flpm_1a2b");
    }

    #[test]
    fn test_untouched_text_is_trimmed() {
        assert_eq!(sanitize("  just chatting  "), "just chatting");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "   ",
            "hello flpm_1a2b3c-4d world",
            "x flpm_1 flps_2 flpp_3 y",
            " flpm_1  flpm_2",
            "flpm_1 flpm_2 end",
            "tabs\tflps_ab\tand\nnewlines",
            "unicode é flpm_ff ü",
        ];
        for sample in samples {
            let once = sanitize(sample);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_custom_pattern() {
        let sanitizer = Sanitizer::new(r"\s#\d+\s*").unwrap();
        assert_eq!(sanitizer.sanitize("hi #42 there"), "hi there");
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        assert!(matches!(
            Sanitizer::new("("),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_runaway_pattern_terminates() {
        let sanitizer = Sanitizer::new(r"x*").unwrap();
        assert_eq!(sanitizer.sanitize("abc"), "a b c");
    }
}
