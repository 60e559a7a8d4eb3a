//! Trigger rules: does a message address the bot?
//!
//! Rules are case-insensitive regexes checked in order against the message
//! body. The first rule that matches wins, and its first capture group (if
//! any) becomes the trigger argument, so `/zarasprite dance now` yields the
//! argument `dance now`.

use crate::config::TriggersConfig;
use crate::error::ConfigError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// A rule that fired
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerMatch {
    /// Source of the pattern that matched
    pub pattern: String,
    /// First capture group, trimmed, if the pattern has one and it matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,
}

/// Compiled trigger rules
#[derive(Debug, Clone, Default)]
pub struct TriggerRules {
    rules: Vec<Regex>,
}

impl TriggerRules {
    pub fn new<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ConfigError::InvalidPattern {
                        field: "triggers.patterns",
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    /// Build from config; disabled triggers compile to an empty rule set
    pub fn from_config(config: &TriggersConfig) -> Result<Self, ConfigError> {
        if !config.enabled {
            return Ok(Self::default());
        }
        Self::new(&config.patterns)
    }

    /// First matching rule for `body`
    pub fn evaluate(&self, body: &str) -> Option<TriggerMatch> {
        self.rules.iter().find_map(|rule| {
            let captures = rule.captures(body)?;
            let argument = captures
                .get(1)
                .map(|m| m.as_str().trim())
                .filter(|arg| !arg.is_empty())
                .map(str::to_string);

            Some(TriggerMatch {
                pattern: rule.as_str().to_string(),
                argument,
            })
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> TriggerRules {
        TriggerRules::from_config(&TriggersConfig::default()).unwrap()
    }

    #[test]
    fn test_command_with_argument() {
        let matched = defaults().evaluate("/zarasprite dance now ").unwrap();
        assert_eq!(matched.pattern, r"^/zarasprite\s+(.*)");
        assert_eq!(matched.argument.as_deref(), Some("dance now"));
    }

    #[test]
    fn test_case_insensitive_mention() {
        let matched = defaults().evaluate("hey SPRITE, you there?").unwrap();
        assert_eq!(matched.pattern, r"\bsprite\b");
        assert_eq!(matched.argument, None);
    }

    #[test]
    fn test_word_boundary() {
        assert!(defaults().evaluate("spritesheet update").is_none());
        assert!(defaults().evaluate("just chatting").is_none());
    }

    #[test]
    fn test_disabled_rules_never_match() {
        let config = TriggersConfig {
            enabled: false,
            ..TriggersConfig::default()
        };
        let rules = TriggerRules::from_config(&config).unwrap();
        assert!(rules.is_empty());
        assert!(rules.evaluate("/zarasprite hi").is_none());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            TriggerRules::new(["(unclosed"]),
            Err(ConfigError::InvalidPattern {
                field: "triggers.patterns",
                ..
            })
        ));
    }
}
