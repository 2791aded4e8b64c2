use super::property::PropertySet;
use super::slot::{Slot, SlotKind};
use super::{is_false, is_zero};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeStyle {
    Normal,
    Compact,
    Inline,
    Reroute,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeProfile {
    Normal,
    Slim,
    Wide,
}

/// Where generated slots go relative to the statically declared ones.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Prepend,
    Append,
}

/// Regenerates `count` copies of `template` whenever the node changes.
///
/// `count` is an accessor path evaluated against the node itself, e.g.
/// `$.data.inputCount`. The template's `id` and `label` may contain `{I}`
/// (zero-based index) and `{N}` (one-based).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SlotRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
    pub count: String,
    pub template: Slot,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct NodeRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<SlotRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<SlotRule>,
}

/// A positioned entity in the graph.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default)]
    pub id: String,
    /// Free-form category; selects a custom node view in hosts that have one.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// No property edits and no new edges. The node can still be moved.
    #[serde(default, skip_serializing_if = "is_false")]
    pub readonly: bool,
    /// Like `readonly`, and the node cannot be moved either.
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<NodeProfile>,
    /// In-flight drag offset. Zero outside of a drag.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub position_delta_x: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub position_delta_y: f64,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<Map<String, JsonValue>>,
    #[serde(default)]
    pub slots: Vec<Slot>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub alpha: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub beta: bool,
    /// Editable field declarations. Supplied by node templates and
    /// re-attached on load, see [`crate::interaction::inflate_graph`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<PropertySet>>,
    /// Fallbacks used by the accessor when a field holds `"∅"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<Map<String, JsonValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<NodeRules>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    pub fn slot(&self, slot_id: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == slot_id)
    }

    pub fn slot_mut(&mut self, slot_id: &str) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.id == slot_id)
    }

    pub fn first_slot_of_kind(&self, kind: SlotKind) -> Option<&Slot> {
        self.slots.iter().find(|s| s.kind == kind)
    }

    pub fn is_reroute(&self) -> bool {
        self.style == Some(NodeStyle::Reroute)
            || self.data.get("unit").and_then(JsonValue::as_str) == Some("reroute")
    }

    /// Position including any uncommitted drag offset.
    pub fn effective_position(&self) -> (f64, f64) {
        (self.x + self.position_delta_x, self.y + self.position_delta_y)
    }
}
