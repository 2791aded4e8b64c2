use super::node::Node;
use super::slot::Slot;
use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};

/// Addresses one slot on one node.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct SlotRef {
    pub node_id: String,
    pub slot_id: String,
}

impl SlotRef {
    pub fn new(node_id: impl Into<String>, slot_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            slot_id: slot_id.into(),
        }
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node_id, self.slot_id)
    }
}

/// A directed connection between two slots.
///
/// Equality and hashing only consider the four endpoint fields; `active`
/// and `valid` are annotations.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub from_node_id: String,
    pub from_slot_id: String,
    pub to_node_id: String,
    pub to_slot_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Cached validity, recomputed by the context when it matters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
}

impl Edge {
    pub fn new(from: SlotRef, to: SlotRef) -> Self {
        Self {
            from_node_id: from.node_id,
            from_slot_id: from.slot_id,
            to_node_id: to.node_id,
            to_slot_id: to.slot_id,
            active: None,
            valid: None,
        }
    }

    /// Shorthand for `Edge::new(SlotRef::new(a, b), SlotRef::new(c, d))`.
    pub fn between(
        from_node: impl Into<String>,
        from_slot: impl Into<String>,
        to_node: impl Into<String>,
        to_slot: impl Into<String>,
    ) -> Self {
        Self::new(
            SlotRef::new(from_node, from_slot),
            SlotRef::new(to_node, to_slot),
        )
    }

    pub fn from_ref(&self) -> SlotRef {
        SlotRef::new(&self.from_node_id, &self.from_slot_id)
    }

    pub fn to_ref(&self) -> SlotRef {
        SlotRef::new(&self.to_node_id, &self.to_slot_id)
    }

    pub fn touches_node(&self, node_id: &str) -> bool {
        self.from_node_id == node_id || self.to_node_id == node_id
    }

    pub fn starts_at(&self, node_id: &str, slot_id: &str) -> bool {
        self.from_node_id == node_id && self.from_slot_id == slot_id
    }

    pub fn ends_at(&self, node_id: &str, slot_id: &str) -> bool {
        self.to_node_id == node_id && self.to_slot_id == slot_id
    }

    pub fn touches_slot(&self, node_id: &str, slot_id: &str) -> bool {
        self.starts_at(node_id, slot_id) || self.ends_at(node_id, slot_id)
    }

    /// The endpoint that is not `slot`.
    pub fn other_end(&self, node_id: &str, slot_id: &str) -> SlotRef {
        if self.starts_at(node_id, slot_id) {
            self.to_ref()
        } else {
            self.from_ref()
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.from_node_id == other.from_node_id
            && self.from_slot_id == other.from_slot_id
            && self.to_node_id == other.to_node_id
            && self.to_slot_id == other.to_slot_id
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from_node_id.hash(state);
        self.from_slot_id.hash(state);
        self.to_node_id.hash(state);
        self.to_slot_id.hash(state);
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from_ref(), self.to_ref())
    }
}

/// The persisted node/edge structure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// First node with the given id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn slot(&self, node_id: &str, slot_id: &str) -> Option<(&Node, &Slot)> {
        let node = self.node(node_id)?;
        node.slot(slot_id).map(|slot| (node, slot))
    }

    pub fn slot_by_ref(&self, slot: &SlotRef) -> Option<(&Node, &Slot)> {
        self.slot(&slot.node_id, &slot.slot_id)
    }

    /// Both endpoints of the edge resolve to existing slots.
    pub fn resolves(&self, edge: &Edge) -> bool {
        self.slot(&edge.from_node_id, &edge.from_slot_id).is_some()
            && self.slot(&edge.to_node_id, &edge.to_slot_id).is_some()
    }

    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.edges.iter().any(|e| e == edge)
    }

    pub fn edges_of_node<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.touches_node(node_id))
    }

    pub fn incoming_edges<'a>(
        &'a self,
        node_id: &'a str,
        slot_id: &'a str,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.ends_at(node_id, slot_id))
    }

    pub fn outgoing_edges<'a>(
        &'a self,
        node_id: &'a str,
        slot_id: &'a str,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.starts_at(node_id, slot_id))
    }

    /// Zero every node's drag offset.
    pub fn clear_position_deltas(&mut self) {
        for node in &mut self.nodes {
            node.position_delta_x = 0.0;
            node.position_delta_y = 0.0;
        }
    }

    /// Ids that occur on more than one node, in first-seen order.
    pub fn duplicate_node_ids(&self) -> Vec<String> {
        let mut seen = ahash::AHashSet::new();
        let mut duplicates = Vec::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) && !duplicates.contains(&node.id) {
                duplicates.push(node.id.clone());
            }
        }
        duplicates
    }

    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a graph from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, GraphError> {
        let content = fs::read_to_string(path)
            .map_err(|e| GraphError::Io(format!("Could not read '{}': {}", path, e)))?;
        Self::from_json(&content)
    }

    /// Saves the graph as pretty-printed JSON.
    pub fn save(&self, path: &str) -> Result<(), GraphError> {
        let json = self.to_json()?;
        fs::write(path, json)
            .map_err(|e| GraphError::Io(format!("Could not write to file '{}': {}", path, e)))
    }
}
