use super::rules::apply_node_rules;
use crate::accessor::{Accessor, UNSET};
use crate::error::{EditFailure, GraphError};
use crate::model::{Edge, Graph, Node, Property, Slot, SlotKind};
use serde_json::{Value as JsonValue, json};

/// Extra work to run when an edit is undone.
pub type Rollback = Box<dyn FnOnce() + Send>;

/// The restricted view an edit callback gets of the working graph.
///
/// Everything done here lands in a copy; the live graph only changes once
/// the callback returns `Ok`.
pub struct GraphEditor<'a> {
    graph: &'a mut Graph,
    rollbacks: &'a mut Vec<Rollback>,
}

impl<'a> GraphEditor<'a> {
    pub(crate) fn new(graph: &'a mut Graph, rollbacks: &'a mut Vec<Rollback>) -> Self {
        Self { graph, rollbacks }
    }

    pub fn graph(&self) -> &Graph {
        self.graph
    }

    /// Direct access to the working copy. Dangling edges left behind are
    /// removed when the edit commits.
    pub fn graph_mut(&mut self) -> &mut Graph {
        self.graph
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.graph.node(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.graph.node_mut(id)
    }

    pub(crate) fn require_node_mut(&mut self, id: &str) -> Result<&mut Node, GraphError> {
        self.graph
            .node_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }

    /// Appends `node` after applying its slot rules. Ids must be unique.
    pub fn add_node(&mut self, mut node: Node) -> Result<(), GraphError> {
        if self.graph.node(&node.id).is_some() {
            return Err(GraphError::DuplicateNodeId(node.id));
        }
        apply_node_rules(&mut node);
        self.graph.nodes.push(node);
        Ok(())
    }

    /// Removes the node and, through [`GraphEditor::remove_edge`], every edge
    /// touching it. Returns `false` when no such node exists.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let affected: Vec<Edge> = self.graph.edges_of_node(id).cloned().collect();
        for edge in &affected {
            self.remove_edge(edge);
        }

        match self.graph.nodes.iter().position(|n| n.id == id) {
            Some(index) => {
                self.graph.nodes.remove(index);
                true
            }
            None => {
                log::warn!("Cannot remove node '{}': not in the graph", id);
                false
            }
        }
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.graph.edges.push(edge);
    }

    /// Removes every edge equal to `edge`. A `removeWhenEmpty` slot at either
    /// end that is left without edges is removed as well.
    pub fn remove_edge(&mut self, edge: &Edge) {
        self.graph.edges.retain(|e| e != edge);

        let to_empty = self
            .graph
            .incoming_edges(&edge.to_node_id, &edge.to_slot_id)
            .next()
            .is_none();
        if to_empty {
            Self::drop_slot_if_flagged(self.graph, &edge.to_node_id, &edge.to_slot_id);
        }

        let from_empty = self
            .graph
            .outgoing_edges(&edge.from_node_id, &edge.from_slot_id)
            .next()
            .is_none();
        if from_empty {
            Self::drop_slot_if_flagged(self.graph, &edge.from_node_id, &edge.from_slot_id);
        }
    }

    fn drop_slot_if_flagged(graph: &mut Graph, node_id: &str, slot_id: &str) {
        if let Some(node) = graph.node_mut(node_id) {
            node.slots
                .retain(|s| !(s.id == slot_id && s.remove_when_empty));
        }
    }

    /// Register work to run if this edit is undone.
    pub fn when_undone(&mut self, rollback: impl FnOnce() + Send + 'static) {
        self.rollbacks.push(Box::new(rollback));
    }

    /// Unwind the edit. Use as `return editor.abort(false);`.
    pub fn abort(&self, silently: bool) -> Result<(), EditFailure> {
        Err(EditFailure::Aborted { silently })
    }

    /// Re-run the slot rules of one node, e.g. after its data changed.
    pub fn apply_node_rules(&mut self, id: &str) -> bool {
        match self.graph.node_mut(id) {
            Some(node) => {
                apply_node_rules(node);
                true
            }
            None => false,
        }
    }

    fn nodes_by_id<'n>(graph: &'n mut Graph, ids: &[String]) -> Vec<&'n mut Node> {
        graph
            .nodes
            .iter_mut()
            .filter(|n| ids.contains(&n.id))
            .collect()
    }

    /// Write `path` on the given nodes and re-run their slot rules. Aborts
    /// silently when no node changed.
    pub fn set_property(
        &mut self,
        node_ids: &[String],
        path: &str,
        value: JsonValue,
    ) -> Result<(), EditFailure> {
        let nodes = Self::nodes_by_id(self.graph, node_ids);
        if !Accessor::set_nodes(nodes, path, value)? {
            return self.abort(true);
        }
        for id in node_ids {
            self.apply_node_rules(id);
        }
        Ok(())
    }

    /// Route `property` through a new input slot on each node. The field is
    /// pointed at the slot and the slot takes the property's slot value.
    pub fn create_property_slot(
        &mut self,
        node_ids: &[String],
        property: &Property,
    ) -> Result<(), EditFailure> {
        let (Some(path), Some(slot_id)) = (property.path.as_deref(), property.slot_id()) else {
            log::warn!("Cannot slot a property without a path");
            return self.abort(false);
        };

        let nodes = Self::nodes_by_id(self.graph, node_ids);
        let mut changed = Accessor::set_nodes(nodes, path, json!({ "$edge": slot_id }))?;

        for node in self.graph.nodes.iter_mut().filter(|n| node_ids.contains(&n.id)) {
            if node.slot(&slot_id).is_some() {
                continue;
            }
            let mut slot = Slot::new(slot_id.clone(), SlotKind::Input)
                .with_label(property.label.clone().unwrap_or_default());
            slot.value = property.slot_value.clone();
            slot.dynamic = true;
            node.slots.push(slot);
            changed = true;
        }

        if !changed {
            return self.abort(true);
        }
        Ok(())
    }

    /// Undo [`GraphEditor::create_property_slot`]: the field is reset to
    /// unset and the slot goes away together with its incoming edges.
    pub fn remove_property_slot(
        &mut self,
        node_ids: &[String],
        property: &Property,
    ) -> Result<(), EditFailure> {
        let (Some(path), Some(slot_id)) = (property.path.as_deref(), property.slot_id()) else {
            log::warn!("Cannot unslot a property without a path");
            return self.abort(false);
        };

        let nodes = Self::nodes_by_id(self.graph, node_ids);
        let mut changed = Accessor::set_nodes(nodes, path, JsonValue::from(UNSET))?;

        for node in self.graph.nodes.iter_mut().filter(|n| node_ids.contains(&n.id)) {
            let before = node.slots.len();
            node.slots.retain(|s| s.id != slot_id);
            changed |= node.slots.len() != before;
        }

        let before = self.graph.edges.len();
        self.graph
            .edges
            .retain(|e| !(node_ids.contains(&e.to_node_id) && e.to_slot_id == slot_id));
        changed |= self.graph.edges.len() != before;

        if !changed {
            return self.abort(true);
        }
        Ok(())
    }
}
