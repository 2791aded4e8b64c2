use super::is_false;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// The data carried by a slot: a registered value type id plus
/// type-specific parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Value {
    #[serde(rename = "type")]
    pub type_id: String,
    #[serde(default, skip_serializing_if = "JsonValue::is_null")]
    pub params: JsonValue,
}

impl Value {
    pub fn new(type_id: impl Into<String>, params: JsonValue) -> Self {
        Self {
            type_id: type_id.into(),
            params,
        }
    }

    /// A value of the given type with no parameters.
    pub fn of(type_id: impl Into<String>) -> Self {
        Self::new(type_id, JsonValue::Null)
    }
}

/// Direction of a slot.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    #[default]
    Input,
    Output,
    /// Accepts both roles; used by reroute nodes.
    Passthrough,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Input => write!(f, "input"),
            SlotKind::Output => write!(f, "output"),
            SlotKind::Passthrough => write!(f, "passthrough"),
        }
    }
}

/// A named connection point on a node.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Unique among the slots of the owning node.
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub kind: SlotKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, JsonValue>>,
    /// Part of the template the node was created from.
    #[serde(rename = "default", default, skip_serializing_if = "is_false")]
    pub template_default: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub invalid: bool,
    /// Delete this slot once its last edge is removed.
    #[serde(default, skip_serializing_if = "is_false")]
    pub remove_when_empty: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    /// Synthesized by a slot rule or a property slot rather than declared.
    #[serde(default, skip_serializing_if = "is_false")]
    pub dynamic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<Map<String, JsonValue>>,
}

impl Slot {
    pub fn new(id: impl Into<String>, kind: SlotKind) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            kind,
            ..Default::default()
        }
    }

    pub fn input(id: impl Into<String>) -> Self {
        Self::new(id, SlotKind::Input)
    }

    pub fn output(id: impl Into<String>) -> Self {
        Self::new(id, SlotKind::Output)
    }

    pub fn passthrough(id: impl Into<String>) -> Self {
        Self::new(id, SlotKind::Passthrough)
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn remove_when_empty(mut self) -> Self {
        self.remove_when_empty = true;
        self
    }
}
