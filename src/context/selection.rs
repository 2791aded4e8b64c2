use super::{GraphContext, NodeContext};
use crate::model::Point;

/// A rubber-band selection in progress. Corners are in screen space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionBox {
    pub start: Point,
    pub end: Option<Point>,
    /// Nodes currently touched by the box.
    pub nodes: Vec<String>,
}

#[derive(Debug, Default)]
pub(crate) struct Selection {
    pub(crate) selected: Vec<String>,
    pub(crate) selection_box: Option<SelectionBox>,
}

/// Whether the closed intervals `[a1, a2]` and `[b1, b2]` intersect. The
/// ends of each interval may be given in either order.
pub fn overlap_1d(a1: f64, a2: f64, b1: f64, b2: f64) -> bool {
    a1.max(a2) >= b1.min(b2) && b1.max(b2) >= a1.min(a2)
}

/// Whether two axis-aligned boxes, each given by two opposite corners,
/// intersect.
pub fn boxes_overlap(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    overlap_1d(a1.x, a2.x, b1.x, b2.x) && overlap_1d(a1.y, a2.y, b1.y, b2.y)
}

impl GraphContext {
    pub fn selected_node_ids(&self) -> &[String] {
        &self.selection.selected
    }

    pub fn selected_nodes(&self) -> Vec<NodeContext<'_>> {
        self.selection
            .selected
            .iter()
            .filter_map(|id| self.node(id))
            .collect()
    }

    /// Selected, taking an active selection box into account: a node
    /// swept by the box flips its state.
    pub fn is_node_selected(&self, id: &str) -> bool {
        let selected = self.selection.selected.iter().any(|s| s == id);
        let in_box = self
            .selection
            .selection_box
            .as_ref()
            .is_some_and(|b| b.nodes.iter().any(|n| n == id));
        selected ^ in_box
    }

    /// Make `id` the only selected node.
    pub fn select_node(&mut self, id: &str) {
        self.selection.selected = vec![id.to_string()];
        self.emit_selection_changed();
    }

    pub fn add_to_selection(&mut self, id: &str) {
        if !self.selection.selected.iter().any(|s| s == id) {
            self.selection.selected.push(id.to_string());
        }
        self.emit_selection_changed();
    }

    pub fn remove_from_selection(&mut self, id: &str) -> bool {
        let before = self.selection.selected.len();
        self.selection.selected.retain(|s| s != id);
        if self.selection.selected.len() == before {
            return false;
        }
        self.update_nodes_in_selection_box();
        self.emit_selection_changed();
        true
    }

    pub fn select_all(&mut self) {
        self.selection.selected = self.graph.nodes.iter().map(|n| n.id.clone()).collect();
        self.emit_selection_changed();
    }

    pub fn unselect_all(&mut self) {
        self.selection.selected.clear();
        self.emit_selection_changed();
    }

    pub fn selection_box(&self) -> Option<&SelectionBox> {
        self.selection.selection_box.as_ref()
    }

    /// Open a selection box at a screen position. Without `additive` the
    /// current selection is dropped first.
    pub fn start_selection_at(&mut self, position: Point, additive: bool) {
        self.selection.selection_box = Some(SelectionBox {
            start: position,
            end: None,
            nodes: Vec::new(),
        });

        if !additive {
            self.selection.selected.clear();
            self.emit_selection_changed();
        }
    }

    pub fn set_selection_box_end(&mut self, position: Point) {
        if let Some(selection_box) = self.selection.selection_box.as_mut() {
            selection_box.end = Some(position);
        }
        self.update_nodes_in_selection_box();
    }

    /// Toggle every node touched by the box, then close it. A box that
    /// touched nothing clears the selection.
    pub fn commit_selection_box(&mut self) {
        let Some(selection_box) = self.selection.selection_box.take() else {
            return;
        };

        if selection_box.nodes.is_empty() {
            self.selection.selected.clear();
        } else {
            for id in selection_box.nodes {
                match self.selection.selected.iter().position(|s| *s == id) {
                    Some(index) => {
                        self.selection.selected.remove(index);
                    }
                    None => self.selection.selected.push(id),
                }
            }
        }
        self.emit_selection_changed();
    }

    pub fn clear_selection_box(&mut self) {
        self.selection.selection_box = None;
    }

    fn update_nodes_in_selection_box(&mut self) {
        let Some((start, end)) = self
            .selection
            .selection_box
            .as_ref()
            .and_then(|b| b.end.map(|end| (b.start, end)))
        else {
            return;
        };

        let start = self.screen_to_graph(start);
        let end = self.screen_to_graph(end);

        let touched: Vec<String> = self
            .graph
            .nodes
            .iter()
            .filter(|node| {
                let origin = Point::new(node.x, node.y);
                let corner = match self.registration(&node.id).and_then(|r| r.size) {
                    Some(size) => Point::new(node.x + size.width, node.y + size.height),
                    None => origin,
                };
                boxes_overlap(start, end, origin, corner)
            })
            .map(|node| node.id.clone())
            .collect();

        if let Some(selection_box) = self.selection.selection_box.as_mut() {
            selection_box.nodes = touched;
        }
    }

    /// Forget selected nodes that no longer exist.
    pub(crate) fn prune_selection(&mut self) {
        let before = self.selection.selected.len();
        let graph = &self.graph;
        self.selection
            .selected
            .retain(|id| graph.node(id).is_some());
        if let Some(selection_box) = self.selection.selection_box.as_mut() {
            selection_box.nodes.retain(|id| graph.node(id).is_some());
        }

        if self.selection.selected.len() != before {
            self.emit_selection_changed();
        }
    }
}
