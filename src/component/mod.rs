//! Chat component trees
//!
//! A rendered chat line arrives from the server as a recursively nested JSON
//! structure: plain strings, styled objects with `text`/`color`, arrays, and
//! children hidden under several keys (`extra`, `with`, `hoverEvent`, wrapper
//! envelopes). This module models that structure as an explicit tagged enum so
//! the rest of the crate never probes ad hoc JSON keys.
//!
//! Use [`decode`] to turn a `serde_json::Value` into a [`ComponentTree`].

mod decode;

pub use decode::{decode, decode_str, Decoded};

// ─────────────────────────────────────────────────────────────────────────────
// Payload roles
// ─────────────────────────────────────────────────────────────────────────────

/// The key a group of children was found under
///
/// All roles are semantically "more children"; the role only matters for
/// ordering (recognised roles come first, in declaration order) and for the
/// diagnostic origin path of each fragment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Direct nested payload (`extra`)
    Extra,
    /// Translation arguments (`with`)
    With,
    /// Tooltip payload (`hoverEvent.contents` / `hoverEvent.value`)
    Hover,
    /// Wrapped envelope (`json`, `message`, `component`)
    Envelope,
    /// Any other array- or object-shaped key
    Other(String),
}

impl Role {
    /// Segment used in fragment origin paths
    pub fn path_segment(&self) -> &str {
        match self {
            Role::Extra => "extra",
            Role::With => "with",
            Role::Hover => "hoverEvent",
            Role::Envelope => "envelope",
            Role::Other(key) => key,
        }
    }
}

/// Children of a styled node under a single role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub role: Role,
    pub nodes: Vec<ComponentTree>,
}

impl Payload {
    pub fn new(role: Role, nodes: Vec<ComponentTree>) -> Self {
        Self { role, nodes }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Component tree
// ─────────────────────────────────────────────────────────────────────────────

/// One node of a rendered chat line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentTree {
    /// Bare string
    Leaf(String),

    /// Node with optional own text and colour plus nested payloads
    Styled {
        text: Option<String>,
        color: Option<String>,
        payloads: Vec<Payload>,
    },

    /// Ordered children without text or colour of their own
    Container(Vec<ComponentTree>),
}

impl ComponentTree {
    pub fn leaf(text: impl Into<String>) -> Self {
        ComponentTree::Leaf(text.into())
    }

    /// Styled node carrying text and no colour
    pub fn text(text: impl Into<String>) -> Self {
        ComponentTree::Styled {
            text: Some(text.into()),
            color: None,
            payloads: Vec::new(),
        }
    }

    /// Styled node carrying text in the given colour
    pub fn colored(text: impl Into<String>, color: impl Into<String>) -> Self {
        ComponentTree::Styled {
            text: Some(text.into()),
            color: Some(color.into()),
            payloads: Vec::new(),
        }
    }

    pub fn container(children: impl IntoIterator<Item = ComponentTree>) -> Self {
        ComponentTree::Container(children.into_iter().collect())
    }

    /// Set the colour, turning leaves and containers into styled nodes
    pub fn with_color(self, color: impl Into<String>) -> Self {
        match self.into_styled() {
            ComponentTree::Styled { text, payloads, .. } => ComponentTree::Styled {
                text,
                color: Some(color.into()),
                payloads,
            },
            other => other,
        }
    }

    /// Attach children under `role`, turning leaves and containers into styled nodes
    pub fn with_payload(
        self,
        role: Role,
        nodes: impl IntoIterator<Item = ComponentTree>,
    ) -> Self {
        match self.into_styled() {
            ComponentTree::Styled {
                text,
                color,
                mut payloads,
            } => {
                payloads.push(Payload::new(role, nodes.into_iter().collect()));
                ComponentTree::Styled {
                    text,
                    color,
                    payloads,
                }
            }
            other => other,
        }
    }

    pub fn with_extra(self, nodes: impl IntoIterator<Item = ComponentTree>) -> Self {
        self.with_payload(Role::Extra, nodes)
    }

    /// Own text of this node, if any
    pub fn own_text(&self) -> Option<&str> {
        match self {
            ComponentTree::Leaf(text) => Some(text),
            ComponentTree::Styled { text, .. } => text.as_deref(),
            ComponentTree::Container(_) => None,
        }
    }

    fn into_styled(self) -> Self {
        match self {
            ComponentTree::Leaf(text) => ComponentTree::Styled {
                text: Some(text),
                color: None,
                payloads: Vec::new(),
            },
            ComponentTree::Container(children) => ComponentTree::Styled {
                text: None,
                color: None,
                payloads: vec![Payload::new(Role::Extra, children)],
            },
            styled => styled,
        }
    }
}

impl From<&str> for ComponentTree {
    fn from(text: &str) -> Self {
        ComponentTree::leaf(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognised_roles_order_before_other() {
        let mut roles = vec![
            Role::Other("a".to_string()),
            Role::Envelope,
            Role::Hover,
            Role::With,
            Role::Extra,
        ];
        roles.sort();
        assert_eq!(
            roles,
            vec![
                Role::Extra,
                Role::With,
                Role::Hover,
                Role::Envelope,
                Role::Other("a".to_string()),
            ]
        );
    }

    #[test]
    fn test_with_color_converts_leaf() {
        let node = ComponentTree::leaf("hi").with_color("gold");
        assert_eq!(node, ComponentTree::colored("hi", "gold"));
    }

    #[test]
    fn test_with_payload_keeps_container_children_first() {
        let node = ComponentTree::container(["a".into()]).with_payload(Role::With, ["b".into()]);
        match node {
            ComponentTree::Styled { payloads, .. } => {
                assert_eq!(payloads.len(), 2);
                assert_eq!(payloads[0].role, Role::Extra);
                assert_eq!(payloads[1].role, Role::With);
            }
            other => panic!("Expected Styled node, got {:?}", other),
        }
    }
}
