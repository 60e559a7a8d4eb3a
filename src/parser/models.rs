// Data types shared by the parsing stages
//
// Fragments are what the flattener produces and every later stage consumes.
// ParsedMessage is the only type that leaves the parser.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One unit of flattened text with its resolved (inherited) colour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    /// Text as emitted by the server (never empty after trimming)
    pub text: String,
    pub color: Option<String>,
    /// Where in the tree this text came from, e.g. `$.extra[2].with[0]`
    pub origin_path: String,
}

impl TextFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            origin_path: String::new(),
        }
    }

    pub fn colored(text: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: Some(color.into()),
            origin_path: String::new(),
        }
    }

    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Whether the resolved colour equals `color` (case-insensitive)
    pub fn has_color(&self, color: &str) -> bool {
        self.color
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(color))
    }
}

/// Classification of a fragment sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signature {
    None,
    BracketForm,
    HoverForm,
}

impl Signature {
    /// The extraction strategy for this signature, `None` for plain chat
    pub fn strategy(self) -> Option<Strategy> {
        match self {
            Signature::None => None,
            Signature::BracketForm => Some(Strategy::BracketForm),
            Signature::HoverForm => Some(Strategy::HoverForm),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Signature::None => "none",
            Signature::BracketForm => "bracket_form",
            Signature::HoverForm => "hover_form",
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which PM form a message was extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// `[PM] [sender -> receiver] body`
    BracketForm,
    /// Tooltip metadata carrying a `Sender:` label
    HoverForm,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        Signature::from(*self).as_str()
    }
}

impl From<Strategy> for Signature {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::BracketForm => Signature::BracketForm,
            Strategy::HoverForm => Signature::HoverForm,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw sender/receiver/body as found by a strategy, before sanitizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub sender: String,
    pub receiver: Option<String>,
    pub body: String,
}

/// A private message recognised in one chat line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    pub sender: String,
    pub receiver: Option<String>,
    pub body: String,
    pub strategy: Strategy,
}
