use super::{Command, EditOutcome, GraphContext, NodeContext};
use crate::error::GraphError;
use crate::model::{Edge, Graph};
use ahash::AHashSet;

impl GraphContext {
    /// Nodes without incoming edges.
    pub fn entry_nodes(&self) -> Vec<NodeContext<'_>> {
        self.graph
            .nodes
            .iter()
            .filter(|node| !self.graph.edges.iter().any(|e| e.to_node_id == node.id))
            .map(|node| NodeContext::new(self, node))
            .collect()
    }

    /// Copy of `entry` and everything reachable from it along outgoing
    /// edges. Each node and edge appears once.
    pub fn collect_subgraph(&self, entry: &str) -> Graph {
        let mut subgraph = Graph::new();
        let mut visited: AHashSet<&str> = AHashSet::new();
        let mut pending = vec![entry];

        while let Some(id) = pending.pop() {
            let Some(node) = self.graph.node(id) else {
                continue;
            };
            if !visited.insert(node.id.as_str()) {
                continue;
            }
            subgraph.nodes.push(node.clone());

            let outgoing: Vec<&Edge> = self
                .graph
                .edges
                .iter()
                .filter(|e| e.from_node_id == node.id)
                .collect();
            for edge in &outgoing {
                if !subgraph.contains_edge(edge) {
                    subgraph.edges.push((*edge).clone());
                }
            }
            pending.extend(outgoing.iter().rev().map(|e| e.to_node_id.as_str()));
        }

        subgraph
    }

    /// Remove one node and its edges as "Remove node".
    pub fn remove_node(&mut self, id: &str) -> Result<EditOutcome, GraphError> {
        self.remove_from_selection(id);
        self.execute("Remove node", Command::RemoveNode(id.to_string()))
    }

    pub fn remove_edge(&mut self, edge: &Edge) -> Result<EditOutcome, GraphError> {
        self.execute("Remove edge", Command::RemoveEdge(edge.clone()))
    }

    /// Disconnect a node as one edit.
    pub fn remove_edges_for_node(&mut self, id: &str) -> Result<EditOutcome, GraphError> {
        let commands: Vec<Command> = self
            .graph
            .edges_of_node(id)
            .cloned()
            .map(Command::RemoveEdge)
            .collect();
        if commands.is_empty() {
            return Ok(EditOutcome::Aborted);
        }
        self.execute("Remove edges", Command::Batch(commands))
    }

    /// Delete every selected node as "Delete nodes". Refused when the
    /// editor is readonly.
    pub fn remove_selected_nodes(&mut self) -> Result<EditOutcome, GraphError> {
        if self.readonly() || self.selection.selected.is_empty() {
            return Ok(EditOutcome::Aborted);
        }

        let commands = self
            .selection
            .selected
            .iter()
            .cloned()
            .map(Command::RemoveNode)
            .collect();
        self.execute("Delete nodes", Command::Batch(commands))
    }
}
