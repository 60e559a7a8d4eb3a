//! Parser diagnostics
//!
//! The parsing stages themselves never log. Instead the [`Parser`] façade
//! reports every warning, rejection and acceptance to an optional
//! [`DiagnosticSink`] with structured data: which component spoke, at which
//! stage, which signature was being attempted and how many fragments there
//! were.
//!
//! [`Parser`]: super::Parser

use super::models::{Signature, Strategy};
use crate::error::{Rejection, Warning};
use std::fmt;

/// Stage of the per-line state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Flattened,
    Classified,
    Extracted,
    Sanitized,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::Flattened => "flattened",
            Stage::Classified => "classified",
            Stage::Extracted => "extracted",
            Stage::Sanitized => "sanitized",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened at a stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Worked around a problem and kept going
    Warning(Warning),
    /// Terminal: the line is not a PM
    Rejected(Rejection),
    /// Terminal: a message was produced
    Accepted(Strategy),
}

/// One structured report from the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Component that produced the outcome ("decoder", "flattener", ...)
    pub component: &'static str,
    pub stage: Stage,
    /// Signature being attempted, `Signature::None` before classification
    pub signature: Signature,
    pub fragment_count: usize,
    pub outcome: Outcome,
}

/// Observer of parser outcomes
///
/// Sinks are called synchronously from whichever thread runs the parse, so
/// they must be cheap and must not block.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn record(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// Sink that forwards diagnostics to `tracing`
///
/// Rejections are routine (most chat is not a PM), so they go to trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, diagnostic: &Diagnostic) {
        let Diagnostic {
            component,
            stage,
            signature,
            fragment_count,
            outcome,
        } = diagnostic;

        match outcome {
            Outcome::Warning(warning) => tracing::debug!(
                component = *component,
                stage = %stage,
                signature = %signature,
                fragment_count = *fragment_count,
                "Parser warning: {}",
                warning
            ),
            Outcome::Rejected(rejection) => tracing::trace!(
                component = *component,
                stage = %stage,
                signature = %signature,
                fragment_count = *fragment_count,
                "Chat line rejected: {}",
                rejection
            ),
            Outcome::Accepted(strategy) => tracing::trace!(
                component = *component,
                stage = %stage,
                strategy = %strategy,
                fragment_count = *fragment_count,
                "Private message accepted"
            ),
        }
    }
}
