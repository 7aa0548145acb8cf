//! Modifier unwrapping
//!
//! Strips wrapper layers off a schema node until an object, a union or a
//! primitive/literal terminal is reached, collecting the modifier facts seen
//! on the way down.

use serde_json::Value;

use super::types::{is_hidden, strip_hidden_marker, DefaultValue, Modifier, SchemaNode};

/// Unwrap `node`, calling `visit` with every layer in outer-to-inner order.
///
/// The input node and the returned terminal are both visited. Objects and
/// unions end the descent; their children are peeled separately.
pub fn peel_with<'a, F>(node: &'a SchemaNode, mut visit: F) -> &'a SchemaNode
where
    F: FnMut(&'a SchemaNode),
{
    let mut current = node;
    loop {
        visit(current);
        match current {
            SchemaNode::Wrapper(wrapper) => current = &wrapper.inner,
            SchemaNode::Primitive(_)
            | SchemaNode::Literal(_)
            | SchemaNode::Object(_)
            | SchemaNode::Union(_) => return current,
        }
    }
}

/// Modifier facts gathered while peeling
#[derive(Clone, Debug, Default)]
pub struct Modifiers {
    /// Any `Optional` layer seen. Derivation ignores it; callers may use it
    /// to mark required fields.
    pub optional: bool,
    pub read_only: bool,
    /// Innermost default seen
    pub default: Option<DefaultValue>,
    /// Non-empty descriptions, outer to inner, marker intact
    pub descriptions: Vec<String>,
}

impl Modifiers {
    fn record(&mut self, node: &SchemaNode) {
        match node {
            SchemaNode::Wrapper(wrapper) => match &wrapper.modifier {
                Modifier::Optional => self.optional = true,
                Modifier::ReadOnly => self.read_only = true,
                Modifier::Default(default) => self.default = Some(default.clone()),
                Modifier::Described(text) => self.push_description(text),
            },
            SchemaNode::Object(object) => {
                if let Some(text) = &object.description {
                    self.push_description(text);
                }
            }
            SchemaNode::Primitive(_) | SchemaNode::Literal(_) | SchemaNode::Union(_) => {}
        }
    }

    fn push_description(&mut self, text: &str) {
        if !text.is_empty() {
            self.descriptions.push(text.to_string());
        }
    }

    /// Last description found, with the hidden marker stripped
    pub fn description(&self) -> Option<&str> {
        self.descriptions.last().map(|text| strip_hidden_marker(text))
    }

    /// Whether any description along the chain is hidden-marked
    pub fn is_hidden(&self) -> bool {
        self.descriptions.iter().any(|text| is_hidden(text))
    }

    /// Evaluate the captured default, if any
    pub fn default_value(&self) -> Option<Value> {
        self.default.as_ref().map(DefaultValue::produce)
    }
}

/// Result of peeling a node
#[derive(Clone, Debug)]
pub struct Peeled<'a> {
    pub node: &'a SchemaNode,
    pub modifiers: Modifiers,
}

/// Unwrap `node` and return the terminal together with its modifiers
pub fn peel(node: &SchemaNode) -> Peeled<'_> {
    let mut modifiers = Modifiers::default();
    let terminal = peel_with(node, |layer| modifiers.record(layer));
    Peeled {
        node: terminal,
        modifiers,
    }
}

// ============================================================================
// Tests
// ============================================================================
