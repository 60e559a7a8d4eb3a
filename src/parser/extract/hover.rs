//! Hover form: sender carried in tooltip metadata
//!
//! Some PM variants render only the body in chat and put the sender inside a
//! hover tooltip (`Sender: <name>`). The body is whichever fragment uses the
//! highlight colour, with a length-based fallback when no colour is present.

use super::PmStrategy;
use crate::config::ParserConfig;
use crate::parser::models::{Extraction, Strategy, TextFragment};
use crate::util::{eq_ignore_case, find_ignore_ascii_case};

/// Strategy for tooltip `Sender:` metadata
pub struct HoverForm;

/// Whether any fragment contains the hover label
pub fn has_hover_signature(fragments: &[TextFragment], config: &ParserConfig) -> bool {
    fragments
        .iter()
        .any(|fragment| config.contains_hover_label(&fragment.text))
}

impl PmStrategy for HoverForm {
    fn name(&self) -> &'static str {
        "hover-form"
    }

    fn strategy(&self) -> Strategy {
        Strategy::HoverForm
    }

    fn matches(&self, fragments: &[TextFragment], config: &ParserConfig) -> bool {
        has_hover_signature(fragments, config)
    }

    fn extract(&self, fragments: &[TextFragment], config: &ParserConfig) -> Option<Extraction> {
        let label = fragments
            .iter()
            .position(|f| config.contains_hover_label(&f.text))?;

        let sender = resolve_sender(fragments, label, config)?;
        let body = resolve_body(fragments, label, &sender, config)?;

        Some(Extraction {
            sender: sender.name,
            receiver: None,
            body,
        })
    }
}

/// Sender name and the fragment it was read from
struct Sender {
    name: String,
    /// `None` when the name came from the label fragment itself
    index: Option<usize>,
}

/// Allow-listed name within the scan window, else the raw next fragment
fn resolve_sender(fragments: &[TextFragment], label: usize, config: &ParserConfig) -> Option<Sender> {
    let following = label + 1;

    let sender = fragments
        .iter()
        .enumerate()
        .skip(following)
        .take(config.hover_scan_window)
        .find_map(|(i, f)| {
            config.canonical_alias(f.trimmed()).map(|alias| Sender {
                name: alias.to_string(),
                index: Some(i),
            })
        })
        .or_else(|| {
            fragments.get(following).map(|f| Sender {
                name: f.trimmed().to_string(),
                index: Some(following),
            })
        })
        .or_else(|| {
            inline_sender(&fragments[label].text, config).map(|name| Sender { name, index: None })
        })?;

    (!sender.name.is_empty()).then_some(sender)
}

/// `Sender: Name` rendered as a single fragment with nothing after it
fn inline_sender(text: &str, config: &ParserConfig) -> Option<String> {
    let at = find_ignore_ascii_case(text, &config.hover_label)?;
    let rest = text[at + config.hover_label.len()..].trim();
    let sender = config.canonical_alias(rest).unwrap_or(rest);
    Some(sender.to_string())
}

/// Last highlighted fragment, else the first long fragment that is not the sender or label
fn resolve_body(
    fragments: &[TextFragment],
    label: usize,
    sender: &Sender,
    config: &ParserConfig,
) -> Option<String> {
    if let Some(highlighted) = fragments
        .iter()
        .rev()
        .find(|f| f.has_color(&config.highlight_color))
    {
        return Some(highlighted.trimmed().to_string());
    }

    fragments
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != label && Some(*i) != sender.index)
        .map(|(_, f)| f.trimmed())
        .find(|text| {
            text.chars().count() > config.min_fallback_body_len
                && !eq_ignore_case(text, &sender.name)
                && !config.contains_hover_label(text)
        })
        .map(str::to_string)
}
