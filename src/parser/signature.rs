// Signature matching - decides which PM form (if any) a chat line has
//
// Precedence is fixed by the strategy table order: bracket form is checked
// first, and when it matches the hover form is never considered, even if a
// `Sender:` label is also present.

use super::extract::StrategyTable;
use super::models::{Signature, TextFragment};
use crate::config::ParserConfig;

pub use super::extract::{has_bracket_signature, has_hover_signature};

/// Classify `fragments` with the standard strategy order
pub fn classify(fragments: &[TextFragment], config: &ParserConfig) -> Signature {
    StrategyTable::standard().classify(fragments, config)
}
