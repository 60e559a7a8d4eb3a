// Parser module - extracts private messages from chat component trees
//
// One call per inbound chat line runs the state machine
//
//   Received → Flattened → Classified → Extracted → Sanitized
//
// and any stage can reject the line instead. Nothing is retried and nothing
// is remembered between calls: the parser is an immutable value that can be
// cloned into as many tasks or threads as needed.

pub mod diagnostics;
pub mod extract;
pub mod flatten;
pub mod models;
pub mod sanitize;
pub mod signature;

pub use diagnostics::{Diagnostic, DiagnosticSink, Outcome, Stage, TracingSink};
pub use extract::{PmStrategy, StrategyTable};
pub use models::{Extraction, ParsedMessage, Signature, Strategy, TextFragment};
pub use sanitize::Sanitizer;

use crate::component::{self, ComponentTree, Decoded};
use crate::config::ParserConfig;
use crate::error::{ConfigError, Rejection, Warning};
use serde_json::Value;
use std::sync::Arc;

/// Private-message parser: component tree in, [`ParsedMessage`] out
///
/// Cloning is cheap (all state is behind `Arc`) and a single parser can be
/// shared across threads without locking.
#[derive(Clone)]
pub struct Parser {
    config: Arc<ParserConfig>,
    strategies: Arc<StrategyTable>,
    sanitizer: Sanitizer,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl Parser {
    /// Build a parser with the standard strategy table and no diagnostic sink
    pub fn new(config: ParserConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sanitizer = Sanitizer::new(&config.tracking_pattern)?;

        Ok(Self {
            config: Arc::new(config),
            strategies: Arc::new(StrategyTable::standard()),
            sanitizer,
            sink: None,
        })
    }

    /// Report every stage outcome to `sink`
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Replace the strategy table
    pub fn with_strategies(mut self, strategies: StrategyTable) -> Self {
        self.strategies = Arc::new(strategies);
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.strategy_names()
    }

    /// Parse one tree; `None` when it is not a private message
    pub fn parse(&self, tree: &ComponentTree) -> Option<ParsedMessage> {
        self.try_parse(tree).ok()
    }

    /// Parse one tree, reporting why it was rejected
    pub fn try_parse(&self, tree: &ComponentTree) -> Result<ParsedMessage, Rejection> {
        self.run(Some(tree))
    }

    /// Decode a JSON chat component and parse it
    pub fn parse_value(&self, value: &Value) -> Option<ParsedMessage> {
        self.try_parse_value(value).ok()
    }

    pub fn try_parse_value(&self, value: &Value) -> Result<ParsedMessage, Rejection> {
        self.run_decoded(component::decode(value, self.config.max_depth))
    }

    /// Parse a chat component given as JSON text
    ///
    /// Any nesting depth is accepted; levels past `max_depth` are dropped and
    /// reported as [`Warning::DepthExceeded`].
    pub fn try_parse_str(&self, json: &str) -> Result<ParsedMessage, Rejection> {
        let decoded = component::decode_str(json, self.config.max_depth).map_err(|e| {
            let rejection = Rejection::InvalidJson(e.to_string());
            self.report("decoder", Stage::Received, Signature::None, 0, Outcome::Rejected(rejection.clone()));
            rejection
        })?;
        self.run_decoded(decoded)
    }

    fn run_decoded(&self, decoded: Decoded) -> Result<ParsedMessage, Rejection> {
        if decoded.malformed > 0 {
            self.warn(
                "decoder",
                Stage::Received,
                Warning::MalformedTree {
                    skipped: decoded.malformed,
                },
            );
        }
        if decoded.depth_exceeded {
            self.warn(
                "decoder",
                Stage::Received,
                Warning::DepthExceeded {
                    max_depth: self.config.max_depth,
                },
            );
        }

        self.run(decoded.tree.as_ref())
    }

    fn run(&self, tree: Option<&ComponentTree>) -> Result<ParsedMessage, Rejection> {
        let config = self.config.as_ref();

        // Received → Flattened
        let flattened = flatten::flatten_with_report(tree, config.max_depth);
        if flattened.depth_exceeded {
            self.warn(
                "flattener",
                Stage::Flattened,
                Warning::DepthExceeded {
                    max_depth: config.max_depth,
                },
            );
        }
        let fragments = flattened.fragments;
        let count = fragments.len();
        if fragments.is_empty() {
            return Err(self.reject("flattener", Stage::Flattened, Signature::None, 0, Rejection::EmptyTree));
        }

        // Flattened → Classified
        let signature = self.strategies.classify(&fragments, config);
        let Some(strategy) = signature.strategy() else {
            return Err(self.reject(
                "signature_matcher",
                Stage::Classified,
                signature,
                count,
                Rejection::NoSignature {
                    fragment_count: count,
                },
            ));
        };

        // Classified → Extracted
        let incomplete = Rejection::IncompleteExtraction { strategy };
        let Some(extraction) = self.strategies.extract(&fragments, signature, config) else {
            return Err(self.reject("extractor", Stage::Extracted, signature, count, incomplete));
        };

        // Extracted → Sanitized
        let body = self.sanitizer.sanitize(&extraction.body);
        if body.is_empty() {
            return Err(self.reject("sanitizer", Stage::Sanitized, signature, count, incomplete));
        }

        self.report(
            "parser",
            Stage::Sanitized,
            signature,
            count,
            Outcome::Accepted(strategy),
        );

        Ok(ParsedMessage {
            sender: extraction.sender,
            receiver: extraction.receiver,
            body,
            strategy,
        })
    }

    fn warn(&self, component: &'static str, stage: Stage, warning: Warning) {
        self.report(component, stage, Signature::None, 0, Outcome::Warning(warning));
    }

    fn reject(
        &self,
        component: &'static str,
        stage: Stage,
        signature: Signature,
        fragment_count: usize,
        rejection: Rejection,
    ) -> Rejection {
        self.report(
            component,
            stage,
            signature,
            fragment_count,
            Outcome::Rejected(rejection.clone()),
        );
        rejection
    }

    fn report(
        &self,
        component: &'static str,
        stage: Stage,
        signature: Signature,
        fragment_count: usize,
        outcome: Outcome,
    ) {
        if let Some(sink) = &self.sink {
            sink.record(&Diagnostic {
                component,
                stage,
                signature,
                fragment_count,
                outcome,
            });
        }
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("config", &self.config)
            .field("strategies", &self.strategies.strategy_names())
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}
