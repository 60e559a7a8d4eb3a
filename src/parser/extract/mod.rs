//! Strategy table for private-message extraction
//!
//! Each PM form the server is known to send is one [`PmStrategy`]. The table
//! is ordered: classification picks the first strategy whose signature is
//! present, and extraction runs the strategy that owns that signature.
//!
//! # Architecture
//!
//! ```text
//! fragments → StrategyTable → [BracketForm, LiteralForm, HoverForm, ...] → Extraction
//! ```
//!
//! New heuristics are added as new table entries, never as branches inside an
//! existing strategy. Strategies are pure functions of the fragments and the
//! configuration; they never log.

mod bracket;
mod hover;
mod literal;

pub use bracket::{has_bracket_signature, BracketForm};
pub use hover::{has_hover_signature, HoverForm};
pub use literal::LiteralForm;

use super::models::{Extraction, Signature, Strategy, TextFragment};
use crate::config::ParserConfig;
use std::sync::Arc;

/// One recognisable PM form
pub trait PmStrategy: Send + Sync {
    /// Human-readable name for logging and debugging
    fn name(&self) -> &'static str;

    /// Which strategy a successful extraction is reported as
    fn strategy(&self) -> Strategy;

    /// Whether the fragments carry this form's signature
    fn matches(&self, fragments: &[TextFragment], config: &ParserConfig) -> bool;

    /// Resolve sender, receiver and body, `None` when something is missing
    fn extract(&self, fragments: &[TextFragment], config: &ParserConfig) -> Option<Extraction>;
}

/// Ordered set of strategies; earlier entries win ties
#[derive(Clone)]
pub struct StrategyTable {
    strategies: Vec<Arc<dyn PmStrategy>>,
}

impl StrategyTable {
    /// Create an empty table (classifies everything as `Signature::None`)
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Split bracket header, unsplit bracket header, then hover form
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.register(BracketForm);
        table.register(LiteralForm);
        table.register(HoverForm);
        table
    }

    /// Register a strategy
    ///
    /// Strategies are consulted in registration order.
    pub fn register(&mut self, strategy: impl PmStrategy + 'static) {
        self.strategies.push(Arc::new(strategy));
    }

    /// Signature of the first strategy that matches
    pub fn classify(&self, fragments: &[TextFragment], config: &ParserConfig) -> Signature {
        self.strategies
            .iter()
            .find(|s| s.matches(fragments, config))
            .map(|s| Signature::from(s.strategy()))
            .unwrap_or(Signature::None)
    }

    /// Run the strategy registered for `signature`
    ///
    /// Several strategies may report the same [`Strategy`]; the first of them
    /// whose signature is present runs, else the first registered.
    pub fn extract(
        &self,
        fragments: &[TextFragment],
        signature: Signature,
        config: &ParserConfig,
    ) -> Option<Extraction> {
        let wanted = signature.strategy()?;
        let mut owners = self.strategies.iter().filter(|s| s.strategy() == wanted);
        let chosen = owners
            .clone()
            .find(|s| s.matches(fragments, config))
            .or_else(|| owners.next())?;
        chosen.extract(fragments, config)
    }

    /// Get names of registered strategies (for logging/debug)
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Extract with the standard table
pub fn extract(
    fragments: &[TextFragment],
    signature: Signature,
    config: &ParserConfig,
) -> Option<Extraction> {
    StrategyTable::standard().extract(fragments, signature, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frags(texts: &[&str]) -> Vec<TextFragment> {
        texts.iter().map(|t| TextFragment::new(*t)).collect()
    }

    /// Test strategy that claims every sequence
    struct Greedy;

    impl PmStrategy for Greedy {
        fn name(&self) -> &'static str {
            "greedy"
        }
        fn strategy(&self) -> Strategy {
            Strategy::HoverForm
        }
        fn matches(&self, _fragments: &[TextFragment], _config: &ParserConfig) -> bool {
            true
        }
        fn extract(&self, fragments: &[TextFragment], _config: &ParserConfig) -> Option<Extraction> {
            Some(Extraction {
                sender: "greedy".to_string(),
                receiver: None,
                body: fragments.first()?.text.clone(),
            })
        }
    }

    #[test]
    fn test_empty_table_classifies_none() {
        let table = StrategyTable::new();
        let config = ParserConfig::default();
        assert_eq!(table.classify(&frags(&["[", "PM"]), &config), Signature::None);
        assert!(table.extract(&frags(&["x"]), Signature::BracketForm, &config).is_none());
    }

    #[test]
    fn test_standard_order() {
        assert_eq!(
            StrategyTable::standard().strategy_names(),
            vec!["bracket-form", "literal-form", "hover-form"]
        );
    }

    #[test]
    fn test_unsplit_header_runs_literal_form() {
        let config = ParserConfig::default();
        let fragments = frags(&["[PM] [Alice -> ZaraSprite] hello"]);

        assert_eq!(
            StrategyTable::standard().classify(&fragments, &config),
            Signature::BracketForm
        );
        let extraction = extract(&fragments, Signature::BracketForm, &config).unwrap();
        assert_eq!(extraction.sender, "Alice");
        assert_eq!(extraction.body, "hello");
    }

    #[test]
    fn test_registration_order_decides_ties() {
        let mut table = StrategyTable::new();
        table.register(Greedy);
        table.register(BracketForm);

        let config = ParserConfig::default();
        let fragments = frags(&["[", "PM", "Alice", " -> ", "Bob", "] ", "hi"]);
        assert_eq!(table.classify(&fragments, &config), Signature::HoverForm);
    }

    #[test]
    fn test_none_signature_never_extracts() {
        let config = ParserConfig::default();
        let fragments = frags(&["[", "PM", "Alice", " -> ", "Bob", "] ", "hi"]);
        assert!(extract(&fragments, Signature::None, &config).is_none());
    }
}
