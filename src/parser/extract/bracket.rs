//! Bracket form: `[PM] [sender -> receiver] body`
//!
//! The server renders the header as separate components, so after flattening
//! the arrow is its own fragment with the sender right before it and the
//! receiver right after it. The body is everything after the closing bracket.

use super::PmStrategy;
use crate::config::ParserConfig;
use crate::parser::models::{Extraction, Strategy, TextFragment};

const OPEN_BRACKET: &str = "[";
const PM_TAG: &str = "PM";

/// Strategy for the `[PM ... -> ...]` header
pub struct BracketForm;

/// Whether `fragments` open with `[` `PM` or hold an arrow with two fragments before it
pub fn has_bracket_signature(fragments: &[TextFragment], config: &ParserConfig) -> bool {
    let tagged = matches!(
        fragments,
        [open, tag, ..] if open.text == OPEN_BRACKET && tag.text == PM_TAG
    );

    tagged
        || fragments
            .iter()
            .skip(2)
            .any(|fragment| config.is_arrow(&fragment.text))
}

impl PmStrategy for BracketForm {
    fn name(&self) -> &'static str {
        "bracket-form"
    }

    fn strategy(&self) -> Strategy {
        Strategy::BracketForm
    }

    fn matches(&self, fragments: &[TextFragment], config: &ParserConfig) -> bool {
        has_bracket_signature(fragments, config)
    }

    fn extract(&self, fragments: &[TextFragment], config: &ParserConfig) -> Option<Extraction> {
        let arrow = fragments.iter().position(|f| config.is_arrow(&f.text))?;
        if arrow < 2 {
            return None;
        }

        let receiver_at = arrow + 1;
        let receiver = fragments.get(receiver_at)?.trimmed();
        let sender = fragments[arrow - 1].trimmed();

        let closer = receiver_at
            + fragments[receiver_at..]
                .iter()
                .position(|f| config.is_closer(&f.text))?;

        let body = fragments[closer + 1..]
            .iter()
            .map(TextFragment::trimmed)
            .collect::<Vec<_>>()
            .join(" ");
        let body = body.trim();

        if sender.is_empty() || body.is_empty() {
            return None;
        }

        Some(Extraction {
            sender: sender.to_string(),
            receiver: Some(receiver.to_string()),
            body: body.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frags(texts: &[&str]) -> Vec<TextFragment> {
        texts.iter().map(|t| TextFragment::new(*t)).collect()
    }

    fn run(texts: &[&str]) -> Option<Extraction> {
        BracketForm.extract(&frags(texts), &ParserConfig::default())
    }

    #[test]
    fn test_bracket_round_trip() {
        let extraction = run(&["[", "PM", "Alice", " -> ", "Bob", "] ", "hello", "world"]).unwrap();
        assert_eq!(extraction.sender, "Alice");
        assert_eq!(extraction.receiver.as_deref(), Some("Bob"));
        assert_eq!(extraction.body, "hello world");
    }

    #[test]
    fn test_unpadded_arrow_and_closer() {
        let extraction = run(&["[", "PM", " Alice ", "->", " Bob", "]", " hi there "]).unwrap();
        assert_eq!(extraction.sender, "Alice");
        assert_eq!(extraction.receiver.as_deref(), Some("Bob"));
        assert_eq!(extraction.body, "hi there");
    }

    #[test]
    fn test_server_style_double_header() {
        // [PM] [Alice -> ZaraSprite] ping
        let extraction =
            run(&["[", "PM", "] ", "[", "Alice", " -> ", "ZaraSprite", "] ", "ping"]).unwrap();
        assert_eq!(extraction.sender, "Alice");
        assert_eq!(extraction.receiver.as_deref(), Some("ZaraSprite"));
        assert_eq!(extraction.body, "ping");
    }

    #[test]
    fn test_arrow_too_early_fails() {
        assert!(run(&["Alice", " -> ", "Bob", "]", "hi"]).is_none());
    }

    #[test]
    fn test_nothing_after_arrow_fails() {
        assert!(run(&["[", "PM", "Alice", " -> "]).is_none());
    }

    #[test]
    fn test_missing_closer_fails() {
        assert!(run(&["[", "PM", "Alice", " -> ", "Bob", "hi"]).is_none());
    }

    #[test]
    fn test_empty_body_fails() {
        assert!(run(&["[", "PM", "Alice", " -> ", "Bob", "] "]).is_none());
    }

    #[test]
    fn test_signature_by_tag() {
        let config = ParserConfig::default();
        assert!(has_bracket_signature(&frags(&["[", "PM"]), &config));
        assert!(!has_bracket_signature(&frags(&["[", "pm"]), &config));
    }

    #[test]
    fn test_signature_by_arrow_needs_two_predecessors() {
        let config = ParserConfig::default();
        assert!(has_bracket_signature(&frags(&["a", "b", "->", "c"]), &config));
        assert!(!has_bracket_signature(&frags(&["a", "->", "c"]), &config));
    }
}
