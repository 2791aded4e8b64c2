use super::slot::SlotContext;
use super::{Command, EditOutcome, GraphContext};
use crate::error::{EditFailure, GraphError};
use crate::model::{Edge, Node, Size};
use ahash::AHashMap;
use std::sync::Arc;

/// Extra edge check contributed by a view for one slot.
pub type EdgeValidator = Arc<dyn Fn(&Edge) -> bool + Send + Sync>;

/// What a view registers for a slot it renders.
#[derive(Clone, Default)]
pub struct SlotRegistration {
    pub validate_edge: Option<EdgeValidator>,
}

impl SlotRegistration {
    pub fn with_validator(validator: impl Fn(&Edge) -> bool + Send + Sync + 'static) -> Self {
        Self {
            validate_edge: Some(Arc::new(validator)),
        }
    }
}

/// What a view registers for a node it renders. Only ephemeral
/// information lives here; the node itself is always read from the graph.
#[derive(Clone, Default)]
pub struct NodeRegistration {
    pub size: Option<Size>,
    pub slots: AHashMap<String, SlotRegistration>,
}

/// Read-only view of one node in the live graph.
#[derive(Clone, Copy)]
pub struct NodeContext<'a> {
    context: &'a GraphContext,
    node: &'a Node,
}

impl<'a> NodeContext<'a> {
    pub(crate) fn new(context: &'a GraphContext, node: &'a Node) -> Self {
        Self { context, node }
    }

    pub fn id(&self) -> &'a str {
        &self.node.id
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn context(&self) -> &'a GraphContext {
        self.context
    }

    pub fn locked(&self) -> bool {
        self.node.locked || self.context.config().locked
    }

    pub fn readonly(&self) -> bool {
        self.locked() || self.node.readonly || self.context.config().readonly
    }

    pub fn x(&self) -> f64 {
        self.node.x
    }

    pub fn y(&self) -> f64 {
        self.node.y
    }

    pub fn position_delta(&self) -> (f64, f64) {
        (self.node.position_delta_x, self.node.position_delta_y)
    }

    pub fn effective_position(&self) -> (f64, f64) {
        self.node.effective_position()
    }

    pub fn size(&self) -> Option<Size> {
        self.context.registration(&self.node.id).and_then(|r| r.size)
    }

    pub fn selected(&self) -> bool {
        self.context.is_node_selected(&self.node.id)
    }

    pub fn involved_in_edge(&self, edge: &Edge) -> bool {
        edge.touches_node(&self.node.id)
    }

    pub fn edges(&self) -> Vec<&'a Edge> {
        let graph = self.context.graph();
        graph.edges.iter().filter(|e| self.involved_in_edge(e)).collect()
    }

    pub fn incoming_edges(&self) -> Vec<&'a Edge> {
        let graph = self.context.graph();
        graph
            .edges
            .iter()
            .filter(|e| e.to_node_id == self.node.id)
            .collect()
    }

    pub fn outgoing_edges(&self) -> Vec<&'a Edge> {
        let graph = self.context.graph();
        graph
            .edges
            .iter()
            .filter(|e| e.from_node_id == self.node.id)
            .collect()
    }

    pub fn slot(&self, slot_id: &str) -> Option<SlotContext<'a>> {
        self.node
            .slot(slot_id)
            .map(|slot| SlotContext::attached(self.context, self.node, slot))
    }

    pub fn slots(&self) -> Vec<SlotContext<'a>> {
        self.node
            .slots
            .iter()
            .map(|slot| SlotContext::attached(self.context, self.node, slot))
            .collect()
    }
}

impl std::fmt::Debug for NodeContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeContext")
            .field("id", &self.node.id)
            .finish()
    }
}

/// Mutating handle for one node. Obtained from [`GraphContext::node_mut`].
pub struct NodeContextMut<'a> {
    context: &'a mut GraphContext,
    id: String,
}

impl<'a> NodeContextMut<'a> {
    pub(crate) fn new(context: &'a mut GraphContext, id: String) -> Self {
        Self { context, id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn view(&self) -> Option<NodeContext<'_>> {
        self.context.node(&self.id)
    }

    fn grid(&self) -> (f64, f64) {
        let config = self.context.config();
        (config.grid_size_x, config.grid_size_y)
    }

    /// Set the in-flight drag offset, snapped so that the effective
    /// position lands on the grid. Not recorded in history.
    pub fn change_delta_position(&mut self, dx: f64, dy: f64) -> bool {
        let (grid_x, grid_y) = self.grid();
        let Some(node) = self.context.graph.node_mut(&self.id) else {
            return false;
        };
        node.position_delta_x = snap(node.x + dx, grid_x) - node.x;
        node.position_delta_y = snap(node.y + dy, grid_y) - node.y;
        true
    }

    /// Fold the drag offset into the position as one "Moved node" edit.
    pub fn commit_delta_position(&mut self) -> Result<EditOutcome, GraphError> {
        let Some(node) = self.context.graph.node(&self.id) else {
            return Ok(EditOutcome::Aborted);
        };
        let command = Command::MoveNode {
            id: self.id.clone(),
            dx: node.position_delta_x,
            dy: node.position_delta_y,
        };
        self.context.execute("Moved node", command)
    }

    pub fn set_position(&mut self, x: f64, y: f64) -> Result<EditOutcome, GraphError> {
        let command = Command::PlaceNode {
            id: self.id.clone(),
            x,
            y,
        };
        self.context.execute("Moved node", command)
    }

    pub fn set_position_on_grid(&mut self, x: f64, y: f64) -> Result<EditOutcome, GraphError> {
        let (grid_x, grid_y) = self.grid();
        self.set_position(snap(x, grid_x), snap(y, grid_y))
    }

    pub fn align_to_grid(&mut self) -> Result<EditOutcome, GraphError> {
        let Some(node) = self.context.graph.node(&self.id) else {
            return Ok(EditOutcome::Aborted);
        };
        let (x, y) = (node.x, node.y);
        self.set_position_on_grid(x, y)
    }

    /// Edit this node inside one transaction.
    pub fn edit_node(
        &mut self,
        cause: &str,
        f: impl Fn(&mut Node) -> Result<(), EditFailure> + Send + Sync + 'static,
    ) -> Result<EditOutcome, GraphError> {
        let id = self.id.clone();
        self.context.edit(cause, move |editor| {
            let node = editor.require_node_mut(&id)?;
            f(node)?;
            editor.apply_node_rules(&id);
            Ok(())
        })
    }

    pub fn set_size(&mut self, size: Size) {
        self.context.registration_mut(&self.id).size = Some(size);
    }

    pub fn register_slot(&mut self, slot_id: impl Into<String>, registration: SlotRegistration) {
        self.context
            .registration_mut(&self.id)
            .slots
            .insert(slot_id.into(), registration);
    }

    pub fn deregister_slot(&mut self, slot_id: &str) -> bool {
        self.context
            .registrations
            .get_mut(&self.id)
            .is_some_and(|r| r.slots.remove(slot_id).is_some())
    }

    /// Begin dragging an edge from `slot_id`. Refused for readonly nodes.
    pub fn start_edge(&mut self, slot_id: &str) -> bool {
        if self.view().is_some_and(|n| n.readonly()) {
            return false;
        }
        self.context.start_edge(&self.id, slot_id)
    }
}

pub(crate) fn snap(value: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return value;
    }
    (value / grid).round() * grid
}
