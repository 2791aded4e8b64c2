use super::GraphContext;
use crate::error::GraphError;
use crate::model::Graph;
use crate::values::{ValueType, ValueTypeRegistry, WildcardType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Editor-wide settings. Every field has a default, so a partial JSON
/// object is a valid config.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ContextConfig {
    pub grid_size_x: f64,
    pub grid_size_y: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// No structural edits through the interactive operations.
    pub readonly: bool,
    /// Nodes cannot be moved either. Implies `readonly` for nodes.
    pub locked: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            grid_size_x: 15.0,
            grid_size_y: 15.0,
            min_zoom: 0.3,
            max_zoom: 2.0,
            readonly: false,
            locked: false,
        }
    }
}

impl ContextConfig {
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &str) -> Result<Self, GraphError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GraphError::Io(format!("Could not read '{}': {}", path, e)))?;
        Self::from_json(&content)
    }
}

pub struct ContextBuilder {
    config: ContextConfig,
    graph: Graph,
    value_types: ValueTypeRegistry,
}

impl ContextBuilder {
    pub fn new() -> Self {
        let mut value_types = ValueTypeRegistry::new();
        value_types.register(Arc::new(WildcardType));
        Self {
            config: ContextConfig::default(),
            graph: Graph::new(),
            value_types,
        }
    }

    pub fn config(mut self, config: ContextConfig) -> Self {
        self.config = config;
        self
    }

    pub fn grid_size(mut self, x: f64, y: f64) -> Self {
        self.config.grid_size_x = x;
        self.config.grid_size_y = y;
        self
    }

    pub fn zoom_range(mut self, min: f64, max: f64) -> Self {
        self.config.min_zoom = min;
        self.config.max_zoom = max;
        self
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.config.readonly = readonly;
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.config.locked = locked;
        self
    }

    pub fn graph(mut self, graph: Graph) -> Self {
        self.graph = graph;
        self
    }

    pub fn with_value_type(mut self, value_type: impl ValueType + 'static) -> Self {
        self.value_types.register(Arc::new(value_type));
        self
    }

    pub fn with_shared_value_type(mut self, value_type: Arc<dyn ValueType>) -> Self {
        self.value_types.register(value_type);
        self
    }

    pub fn build(self) -> GraphContext {
        GraphContext::from_parts(self.config, self.graph, self.value_types)
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
