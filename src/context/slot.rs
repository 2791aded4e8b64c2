use super::GraphContext;
use super::node::EdgeValidator;
use crate::model::{Edge, Node, Slot, SlotKind, SlotRef, Value};
use crate::values::ValueType;
use std::borrow::Cow;

/// A read-only view of one slot, resolved against the live graph.
///
/// A *detached* slot context carries a value but belongs to no node and
/// has no edges. Compatibility checks between bare values use these.
#[derive(Clone)]
pub struct SlotContext<'a> {
    context: &'a GraphContext,
    node: Option<&'a Node>,
    slot: Cow<'a, Slot>,
}

impl<'a> SlotContext<'a> {
    pub(crate) fn attached(context: &'a GraphContext, node: &'a Node, slot: &'a Slot) -> Self {
        Self {
            context,
            node: Some(node),
            slot: Cow::Borrowed(slot),
        }
    }

    pub fn detached(context: &'a GraphContext, value: Option<Value>, kind: SlotKind) -> Self {
        let mut slot = Slot::new("", kind);
        slot.value = value;
        Self {
            context,
            node: None,
            slot: Cow::Owned(slot),
        }
    }

    pub fn context(&self) -> &'a GraphContext {
        self.context
    }

    pub fn node(&self) -> Option<&'a Node> {
        self.node
    }

    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    pub fn id(&self) -> &str {
        &self.slot.id
    }

    pub fn kind(&self) -> SlotKind {
        self.slot.kind
    }

    pub fn value(&self) -> Option<&Value> {
        self.slot.value.as_ref()
    }

    /// The registered type of the slot's value. Unregistered types read as
    /// untyped.
    pub fn value_type(&self) -> Option<&'a dyn ValueType> {
        let id = self.slot.value.as_ref()?.type_id.as_str();
        self.context.value_types().get(id)
    }

    pub fn is_detached(&self) -> bool {
        self.node.is_none()
    }

    pub fn slot_ref(&self) -> Option<SlotRef> {
        self.node.map(|n| SlotRef::new(&n.id, &self.slot.id))
    }

    pub fn incoming_edges(&self) -> Vec<&'a Edge> {
        self.edges_where(|e, node_id, slot_id| e.ends_at(node_id, slot_id))
    }

    pub fn outgoing_edges(&self) -> Vec<&'a Edge> {
        self.edges_where(|e, node_id, slot_id| e.starts_at(node_id, slot_id))
    }

    pub fn edges(&self) -> Vec<&'a Edge> {
        self.edges_where(|e, node_id, slot_id| e.touches_slot(node_id, slot_id))
    }

    fn edges_where(&self, predicate: impl Fn(&Edge, &str, &str) -> bool) -> Vec<&'a Edge> {
        let Some(node) = self.node else {
            return Vec::new();
        };
        let graph: &'a crate::model::Graph = self.context.graph();
        graph
            .edges
            .iter()
            .filter(|e| predicate(e, &node.id, &self.slot.id))
            .collect()
    }

    /// The slot at the far end of `edge`, if it still resolves.
    pub fn other_slot_of_edge(&self, edge: &Edge) -> Option<SlotContext<'a>> {
        let node = self.node?;
        let other = edge.other_end(&node.id, &self.slot.id);
        self.context.slot(&other.node_id, &other.slot_id)
    }

    /// Edge predicate registered for this slot by a view, if any.
    pub fn validator(&self) -> Option<EdgeValidator> {
        let node = self.node?;
        self.context.edge_validator(&node.id, &self.slot.id)
    }
}

impl std::fmt::Debug for SlotContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotContext")
            .field("node", &self.node.map(|n| n.id.as_str()))
            .field("slot", &self.slot.id)
            .field("value", &self.slot.value)
            .finish()
    }
}
