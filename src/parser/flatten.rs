//! Component tree flattening
//!
//! Walks a [`ComponentTree`] depth-first, pre-order, emitting one
//! [`TextFragment`] per node with visible text. Colour is resolved on the way
//! down: a node without its own colour takes the nearest ancestor's.

use super::models::TextFragment;
use crate::component::{ComponentTree, Payload};

/// Fragments plus whether the depth guard cut anything off
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flattened {
    pub fragments: Vec<TextFragment>,
    pub depth_exceeded: bool,
}

/// Flatten `root` into document-order fragments
///
/// Descent stops at `max_depth`; whatever was collected before that point is
/// still returned.
pub fn flatten(root: Option<&ComponentTree>, max_depth: usize) -> Vec<TextFragment> {
    flatten_with_report(root, max_depth).fragments
}

/// Like [`flatten`], also reporting whether the depth guard fired
pub fn flatten_with_report(root: Option<&ComponentTree>, max_depth: usize) -> Flattened {
    let mut walker = Walker {
        max_depth,
        out: Flattened::default(),
    };
    if let Some(root) = root {
        walker.visit(root, None, "$", 0);
    }
    walker.out
}

struct Walker {
    max_depth: usize,
    out: Flattened,
}

impl Walker {
    fn visit(&mut self, node: &ComponentTree, inherited: Option<&str>, path: &str, depth: usize) {
        if depth > self.max_depth {
            self.out.depth_exceeded = true;
            return;
        }

        match node {
            ComponentTree::Leaf(text) => self.emit(text, inherited, path),
            ComponentTree::Styled {
                text,
                color,
                payloads,
            } => {
                // An empty colour string means "unset"
                let color = color.as_deref().filter(|c| !c.is_empty()).or(inherited);
                if let Some(text) = text {
                    self.emit(text, color, path);
                }

                let mut ordered: Vec<&Payload> = payloads.iter().collect();
                ordered.sort_by(|a, b| a.role.cmp(&b.role));

                for payload in ordered {
                    let segment = payload.role.path_segment();
                    for (i, child) in payload.nodes.iter().enumerate() {
                        let child_path = format!("{path}.{segment}[{i}]");
                        self.visit(child, color, &child_path, depth + 1);
                    }
                }
            }
            ComponentTree::Container(children) => {
                for (i, child) in children.iter().enumerate() {
                    let child_path = format!("{path}[{i}]");
                    self.visit(child, inherited, &child_path, depth + 1);
                }
            }
        }
    }

    fn emit(&mut self, text: &str, color: Option<&str>, path: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.out.fragments.push(TextFragment {
            text: text.to_string(),
            color: color.map(str::to_string),
            origin_path: path.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Role;

    fn texts(fragments: &[TextFragment]) -> Vec<&str> {
        fragments.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn test_empty_root_yields_nothing() {
        assert!(flatten(None, 64).is_empty());
    }

    #[test]
    fn test_preorder_left_to_right() {
        let tree = ComponentTree::text("a")
            .with_extra([
                ComponentTree::text("b").with_extra(["c".into(), "d".into()]),
                "e".into(),
            ])
            .with_payload(Role::With, ["f".into()]);

        let fragments = flatten(Some(&tree), 64);
        assert_eq!(texts(&fragments), vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_recognised_roles_precede_unknown_ones() {
        let tree = ComponentTree::text("root")
            .with_payload(Role::Other("aaa".to_string()), ["other".into()])
            .with_payload(Role::Hover, ["hover".into()])
            .with_payload(Role::Extra, ["extra".into()]);

        let fragments = flatten(Some(&tree), 64);
        assert_eq!(texts(&fragments), vec!["root", "extra", "hover", "other"]);
    }

    #[test]
    fn test_blank_text_is_dropped() {
        let tree = ComponentTree::container(["  ".into(), "".into(), "x".into()]);
        assert_eq!(texts(&flatten(Some(&tree), 64)), vec!["x"]);
    }

    #[test]
    fn test_text_is_kept_untrimmed() {
        let tree = ComponentTree::container([" -> ".into()]);
        assert_eq!(texts(&flatten(Some(&tree), 64)), vec![" -> "]);
    }

    #[test]
    fn test_color_inherited_from_nearest_ancestor() {
        let tree = ComponentTree::colored("outer", "gold").with_extra([
            ComponentTree::text("plain"),
            ComponentTree::colored("own", "aqua").with_extra(["nested".into()]),
            ComponentTree::container(["boxed".into()]),
        ]);

        let fragments = flatten(Some(&tree), 64);
        let colors: Vec<_> = fragments.iter().map(|f| f.color.as_deref()).collect();
        assert_eq!(
            colors,
            vec![
                Some("gold"),
                Some("gold"),
                Some("aqua"),
                Some("aqua"),
                Some("gold"),
            ]
        );
    }

    #[test]
    fn test_changing_ancestor_color_changes_child() {
        let build = |color: &str| {
            ComponentTree::colored("parent", color).with_extra([ComponentTree::text("child")])
        };

        let red = flatten(Some(&build("red")), 64);
        let blue = flatten(Some(&build("blue")), 64);
        assert_eq!(red[1].color.as_deref(), Some("red"));
        assert_eq!(blue[1].color.as_deref(), Some("blue"));
    }

    #[test]
    fn test_origin_paths() {
        let tree = ComponentTree::text("a").with_payload(Role::With, ["b".into()]);
        let fragments = flatten(Some(&tree), 64);
        assert_eq!(fragments[0].origin_path, "$");
        assert_eq!(fragments[1].origin_path, "$.with[0]");
    }

    #[test]
    fn test_depth_guard_returns_partial_fragments() {
        let mut tree = ComponentTree::leaf("bottom");
        for i in 0..500 {
            tree = ComponentTree::text(format!("level-{i}")).with_extra([tree]);
        }

        let flattened = flatten_with_report(Some(&tree), 64);
        assert!(flattened.depth_exceeded);
        // Root plus 64 levels below it
        assert_eq!(flattened.fragments.len(), 65);
        assert_eq!(flattened.fragments[0].text, "level-499");
    }

    #[test]
    fn test_shallow_tree_does_not_report_depth() {
        let tree = ComponentTree::text("a").with_extra(["b".into()]);
        assert!(!flatten_with_report(Some(&tree), 64).depth_exceeded);
    }
}
