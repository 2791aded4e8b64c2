use super::is_false;
use super::node::Node;
use super::slot::Value;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PropertyOption {
    pub label: String,
    pub value: JsonValue,
}

/// A user-editable field declared by a node template. `path` is an
/// accessor path relative to the node.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub readonly: bool,
    /// The property may be driven by an edge through a property slot.
    #[serde(default, skip_serializing_if = "is_false")]
    pub slottable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_annotation: Option<bool>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Used when the property is slotted but the slot has no edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<JsonValue>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_options: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PropertyOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_source: Option<String>,
}

impl Property {
    pub fn new(label: impl Into<String>, path: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            path: Some(path.into()),
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Id of the slot created when this property is slotted.
    pub fn slot_id(&self) -> Option<String> {
        self.path.as_ref().map(|p| format!("property:{}", p))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PropertySet {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl PropertySet {
    /// A copy keeping only the properties whose label contains `query`
    /// (case-insensitive), or `None` when nothing matches.
    pub fn filtered(&self, query: &str) -> Option<PropertySet> {
        let query = query.to_lowercase();
        let properties: Vec<Property> = self
            .properties
            .iter()
            .filter(|p| {
                p.label
                    .as_deref()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(&query)
            })
            .cloned()
            .collect();

        if properties.is_empty() {
            None
        } else {
            Some(PropertySet {
                properties,
                ..self.clone()
            })
        }
    }
}

/// A named group of template nodes offered by the new-node menu.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct NodeSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub label: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
}
