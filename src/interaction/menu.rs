use crate::context::rules::apply_node_rules;
use crate::context::{EditOutcome, GraphContext};
use crate::error::GraphError;
use crate::model::{Node, NodeSet, Point, SlotKind, SlotRef};
use uuid::Uuid;

/// The searchable new-node menu.
///
/// A query matches a template when it occurs, case-insensitively, anywhere
/// in the template's JSON. Sets without a match are hidden.
#[derive(Debug, Clone, Default)]
pub struct NodeMenu {
    node_sets: Vec<NodeSet>,
    query: String,
    matching: Vec<NodeSet>,
    selected: usize,
}

impl NodeMenu {
    pub fn new(node_sets: Vec<NodeSet>) -> Self {
        let mut menu = Self {
            node_sets,
            ..Default::default()
        };
        menu.refresh();
        menu
    }

    pub fn node_sets(&self) -> &[NodeSet] {
        &self.node_sets
    }

    pub fn set_node_sets(&mut self, node_sets: Vec<NodeSet>) {
        self.node_sets = node_sets;
        self.refresh();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_lowercase();
        self.refresh();
    }

    fn refresh(&mut self) {
        let query = self.query.as_str();
        self.matching = self
            .node_sets
            .iter()
            .filter_map(|set| {
                let nodes: Vec<Node> = set
                    .nodes
                    .iter()
                    .filter(|node| matches_query(node, query))
                    .cloned()
                    .collect();
                (!nodes.is_empty()).then(|| NodeSet {
                    nodes,
                    ..set.clone()
                })
            })
            .collect();
        self.clamp_selection();
    }

    /// The visible sets, each trimmed to its matching templates.
    pub fn matching_sets(&self) -> &[NodeSet] {
        &self.matching
    }

    /// All matching templates in display order.
    pub fn matching_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.matching.iter().flat_map(|set| set.nodes.iter())
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn select_index(&mut self, index: usize) {
        self.selected = index;
        self.clamp_selection();
    }

    pub fn select_next(&mut self) {
        self.select_index(self.selected.saturating_add(1));
    }

    pub fn select_previous(&mut self) {
        self.select_index(self.selected.saturating_sub(1));
    }

    fn clamp_selection(&mut self) {
        let count = self.matching_nodes().count();
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    pub fn selected(&self) -> Option<&Node> {
        self.matching_nodes().nth(self.selected)
    }

    /// Add the selected template at `position` as one "Add node" edit.
    ///
    /// When the context holds a buffered edge, the open end is attached to
    /// the new node's first input (or first output, for an edge that was
    /// dragged out of an input).
    pub fn insert_selected(
        &self,
        context: &mut GraphContext,
        position: Point,
    ) -> Result<EditOutcome, GraphError> {
        let Some(template) = self.selected() else {
            return Ok(EditOutcome::Aborted);
        };

        let mut node = Node {
            id: Uuid::new_v4().to_string(),
            x: position.x,
            y: position.y,
            ..template.clone()
        };
        apply_node_rules(&mut node);

        let edge = context.take_buffered_edge().and_then(|mut edge| {
            let kind = if edge.to.is_none() {
                SlotKind::Input
            } else {
                SlotKind::Output
            };
            let Some(slot) = node.first_slot_of_kind(kind) else {
                log::warn!("Template '{}' has no {} slot for the buffered edge", node.id, kind);
                return None;
            };
            let end = Some(SlotRef::new(&node.id, &slot.id));
            match kind {
                SlotKind::Input => edge.to = end,
                _ => edge.from = end,
            }
            Some(edge)
        });

        context.set_draft_node(node);
        context.set_draft_edge(edge);
        context.release_draft_node()
    }
}

fn matches_query(node: &Node, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    match serde_json::to_string(node) {
        Ok(json) => json.to_lowercase().contains(query),
        Err(e) => {
            log::error!("Cannot search node '{}': {}", node.id, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn menu() -> NodeMenu {
        NodeMenu::new(vec![
            NodeSet {
                label: "Math".to_string(),
                nodes: vec![
                    Node::new("add").with_label("Add").with_data("unit", json!("add")),
                    Node::new("mul").with_label("Multiply"),
                ],
                ..Default::default()
            },
            NodeSet {
                label: "Text".to_string(),
                nodes: vec![Node::new("concat").with_label("Concatenate")],
                ..Default::default()
            },
        ])
    }

    #[test]
    fn test_query_filters_sets_and_nodes() {
        let mut menu = menu();
        assert_eq!(menu.matching_nodes().count(), 3);

        menu.set_query("MULT");
        assert_eq!(menu.matching_sets().len(), 1);
        assert_eq!(menu.selected().map(|n| n.id.as_str()), Some("mul"));
    }

    #[test]
    fn test_selection_index_is_clamped() {
        let mut menu = menu();
        menu.select_index(10);
        assert_eq!(menu.selected_index(), 2);
        menu.select_previous();
        menu.select_previous();
        menu.select_previous();
        assert_eq!(menu.selected_index(), 0);

        menu.set_query("nothing matches this");
        assert_eq!(menu.selected(), None);
    }
}
