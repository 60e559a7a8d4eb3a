//! Literal form: the whole `[PM] [sender -> receiver] body` line as plain text
//!
//! Older servers and some relays send the PM as a single text component, so
//! there are no separate arrow or closer fragments to anchor on. The header is
//! matched on the concatenated fragment texts instead. Results are reported as
//! [`Strategy::BracketForm`] since it is the same header, only unsplit.

use super::PmStrategy;
use crate::config::ParserConfig;
use crate::parser::models::{Extraction, Strategy, TextFragment};
use regex::Regex;
use std::sync::LazyLock;

static LITERAL_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[PM\] \[([^\]]+?) -> ([^\]]+?)\] (.+)$").expect("literal header pattern is valid")
});

/// Strategy for a `[PM] [a -> b] body` line that was not split into components
pub struct LiteralForm;

fn joined(fragments: &[TextFragment]) -> String {
    fragments.iter().map(|f| f.text.as_str()).collect()
}

impl PmStrategy for LiteralForm {
    fn name(&self) -> &'static str {
        "literal-form"
    }

    fn strategy(&self) -> Strategy {
        Strategy::BracketForm
    }

    fn matches(&self, fragments: &[TextFragment], _config: &ParserConfig) -> bool {
        LITERAL_HEADER.is_match(&joined(fragments))
    }

    fn extract(&self, fragments: &[TextFragment], _config: &ParserConfig) -> Option<Extraction> {
        let text = joined(fragments);
        let captures = LITERAL_HEADER.captures(&text)?;

        let sender = captures.get(1)?.as_str().trim();
        let receiver = captures.get(2)?.as_str().trim();
        let body = captures.get(3)?.as_str().trim();
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

    fn run(texts: &[&str]) -> Option<Extraction> {
        let fragments: Vec<_> = texts.iter().map(|t| TextFragment::new(*t)).collect();
        LiteralForm.extract(&fragments, &ParserConfig::default())
    }

    #[test]
    fn test_single_text_component() {
        let extraction = run(&["[PM] [Alice -> ZaraSprite] hello"]).unwrap();
        assert_eq!(extraction.sender, "Alice");
        assert_eq!(extraction.receiver.as_deref(), Some("ZaraSprite"));
        assert_eq!(extraction.body, "hello");
    }

    #[test]
    fn test_fragments_are_joined_without_separators() {
        let extraction = run(&["[PM] [", "Alice", " -> ", "Bob", "] ", "see you at spawn"]).unwrap();
        assert_eq!(extraction.sender, "Alice");
        assert_eq!(extraction.receiver.as_deref(), Some("Bob"));
        assert_eq!(extraction.body, "see you at spawn");
    }

    #[test]
    fn test_header_must_open_the_line() {
        assert!(run(&["<Alice> [PM] [Alice -> Bob] hi"]).is_none());
        assert!(!LiteralForm.matches(
            &[TextFragment::new("[PM] [Alice -> Bob]")],
            &ParserConfig::default()
        ));
    }
}
