use super::{SlotShape, ValueType};
use crate::error::GraphError;
use serde::{Deserialize, Serialize};

/// A hierarchical value type described by data, so a host can register a
/// whole type family from JSON.
///
/// ```json
/// { "id": "integer", "name": "Integer", "color": "#4caf50",
///   "supertypes": ["number"], "splittable": true }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredValueType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_shape: Option<SlotShape>,
    #[serde(default)]
    pub splittable: bool,
    #[serde(default)]
    pub mergeable: bool,
    #[serde(default)]
    pub supertypes: Vec<String>,
}

impl DeclaredValueType {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            ..Default::default()
        }
    }

    pub fn with_supertypes(mut self, supertypes: &[&str]) -> Self {
        self.supertypes = supertypes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_splittable(mut self, splittable: bool) -> Self {
        self.splittable = splittable;
        self
    }

    pub fn with_mergeable(mut self, mergeable: bool) -> Self {
        self.mergeable = mergeable;
        self
    }

    /// Parse a JSON array of type declarations.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, GraphError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn list_from_file(path: &str) -> Result<Vec<Self>, GraphError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GraphError::Io(format!("Could not read '{}': {}", path, e)))?;
        Self::list_from_json(&content)
    }
}

impl ValueType for DeclaredValueType {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn color(&self) -> &str {
        &self.color
    }

    fn line_width(&self) -> Option<f64> {
        self.line_width
    }

    fn slot_shape(&self) -> Option<SlotShape> {
        self.slot_shape
    }

    fn splittable(&self) -> bool {
        self.splittable
    }

    fn mergeable(&self) -> bool {
        self.mergeable
    }

    fn supertypes(&self) -> Vec<String> {
        self.supertypes.clone()
    }
}
