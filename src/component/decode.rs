//! JSON → ComponentTree decoding
//!
//! Server payloads are not documented and change shape between message types,
//! so decoding is lenient: recognised keys map to their [`Role`], any other key
//! whose value is an array or object is descended into generically, and values
//! of the wrong type are skipped and counted instead of failing the decode.

use super::{ComponentTree, Payload, Role};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Keys whose value is treated as a wrapped envelope around the real component
const ENVELOPE_KEYS: &[&str] = &["json", "message", "component"];

/// Keys holding tooltip metadata
const HOVER_KEYS: &[&str] = &["hoverEvent", "hover_event"];

/// Result of decoding one JSON value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Decoded tree, `None` when the root itself was unusable
    pub tree: Option<ComponentTree>,
    /// Number of nodes skipped because they had the wrong JSON type
    pub malformed: usize,
    /// Whether any branch was cut off at `max_depth`
    pub depth_exceeded: bool,
}

/// Decode a JSON chat component, descending at most `max_depth` levels
pub fn decode(value: &Value, max_depth: usize) -> Decoded {
    let mut decoder = Decoder {
        max_depth,
        malformed: 0,
        depth_exceeded: false,
    };
    let tree = decoder.node(value, 0);

    Decoded {
        tree,
        malformed: decoder.malformed,
        depth_exceeded: decoder.depth_exceeded,
    }
}

/// Parse JSON text and decode it
///
/// Nesting depth is not limited while parsing: the stack grows on demand, so
/// a deeply nested tail is cut at `max_depth` by [`decode`] instead of failing
/// the whole line.
pub fn decode_str(json: &str, max_depth: usize) -> Result<Decoded, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;

    let decoded = decode(&value, max_depth);
    dispose(value);
    Ok(decoded)
}

/// Drop a value without recursing once per nesting level
fn dispose(value: Value) {
    let mut pending = vec![value];
    while let Some(value) = pending.pop() {
        match value {
            Value::Array(items) => pending.extend(items),
            Value::Object(map) => pending.extend(map.into_iter().map(|(_, v)| v)),
            _ => {}
        }
    }
}

struct Decoder {
    max_depth: usize,
    malformed: usize,
    depth_exceeded: bool,
}

impl Decoder {
    fn node(&mut self, value: &Value, depth: usize) -> Option<ComponentTree> {
        if depth > self.max_depth {
            self.depth_exceeded = true;
            return None;
        }

        match value {
            Value::String(text) => Some(ComponentTree::Leaf(text.clone())),
            Value::Array(items) => Some(ComponentTree::Container(self.nodes(items, depth))),
            Value::Object(map) => Some(self.object(map, depth)),
            Value::Null | Value::Bool(_) | Value::Number(_) => {
                self.malformed += 1;
                None
            }
        }
    }

    fn nodes(&mut self, items: &[Value], depth: usize) -> Vec<ComponentTree> {
        items
            .iter()
            .filter_map(|item| self.node(item, depth + 1))
            .collect()
    }

    fn object(&mut self, map: &Map<String, Value>, depth: usize) -> ComponentTree {
        let text = self.string_field(map, "text");
        let color = self.string_field(map, "color");

        let mut payloads = Vec::new();
        for (key, value) in map {
            let role = match key.as_str() {
                "text" | "color" => continue,
                "extra" => Role::Extra,
                "with" => Role::With,
                k if HOVER_KEYS.contains(&k) => {
                    if let Some(payload) = self.hover(value, depth) {
                        payloads.push(payload);
                    }
                    continue;
                }
                k if ENVELOPE_KEYS.contains(&k) => Role::Envelope,
                // Scalar styling keys (bold, italic, translate, insertion, ...)
                _ if !(value.is_array() || value.is_object()) => continue,
                other => Role::Other(other.to_string()),
            };

            let nodes = self.payload_nodes(value, depth);
            if !nodes.is_empty() {
                payloads.push(Payload::new(role, nodes));
            }
        }

        ComponentTree::Styled {
            text,
            color,
            payloads,
        }
    }

    /// Tooltips carry their component under `contents` (modern) or `value` (legacy)
    fn hover(&mut self, value: &Value, depth: usize) -> Option<Payload> {
        let Value::Object(event) = value else {
            self.malformed += 1;
            return None;
        };

        let inner = event.get("contents").or_else(|| event.get("value"))?;
        let nodes = self.payload_nodes(inner, depth);
        (!nodes.is_empty()).then(|| Payload::new(Role::Hover, nodes))
    }

    fn payload_nodes(&mut self, value: &Value, depth: usize) -> Vec<ComponentTree> {
        match value {
            Value::Array(items) => self.nodes(items, depth),
            other => self.node(other, depth + 1).into_iter().collect(),
        }
    }

    fn string_field(&mut self, map: &Map<String, Value>, key: &str) -> Option<String> {
        match map.get(key)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.malformed += 1;
                None
            }
        }
    }
}
