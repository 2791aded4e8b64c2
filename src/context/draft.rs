use super::{Command, ContextEvent, EditOutcome, GraphContext};
use crate::error::GraphError;
use crate::model::{Edge, Node, SlotKind, SlotRef};
use serde::{Deserialize, Serialize};

/// An edge being dragged out. One end is fixed when the drag starts; the
/// other is filled while hovering a candidate slot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PartialEdge {
    pub from: Option<SlotRef>,
    pub to: Option<SlotRef>,
    /// Display hint: the completed edge passed the full validity check.
    pub valid: bool,
}

impl PartialEdge {
    pub fn from_slot(slot: SlotRef) -> Self {
        Self {
            from: Some(slot),
            to: None,
            valid: true,
        }
    }

    pub fn to_slot(slot: SlotRef) -> Self {
        Self {
            from: None,
            to: Some(slot),
            valid: true,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }

    /// The endpoint that was set when the drag started, or the only one set.
    pub fn fixed_end(&self) -> Option<&SlotRef> {
        self.from.as_ref().or(self.to.as_ref())
    }

    pub fn to_edge(&self) -> Option<Edge> {
        let mut edge = Edge::new(self.from.clone()?, self.to.clone()?);
        edge.valid = Some(self.valid);
        Some(edge)
    }
}

#[derive(Debug, Default)]
pub(crate) struct DraftState {
    pub(crate) edge: Option<PartialEdge>,
    /// The draft as it was before the current snap.
    pub(crate) before_snap: Option<PartialEdge>,
    pub(crate) edge_being_replaced: Option<Edge>,
    /// Last cancelled draft, kept for completing with a new node.
    pub(crate) buffered_edge: Option<PartialEdge>,
    pub(crate) node: Option<Node>,
}

impl GraphContext {
    pub fn draft_edge(&self) -> Option<&PartialEdge> {
        self.drafts.edge.as_ref()
    }

    /// Shown dashed while the draft would evict it.
    pub fn edge_being_replaced(&self) -> Option<&Edge> {
        self.drafts.edge_being_replaced.as_ref()
    }

    pub fn buffered_edge(&self) -> Option<&PartialEdge> {
        self.drafts.buffered_edge.as_ref()
    }

    pub fn set_buffered_edge(&mut self, edge: Option<PartialEdge>) {
        self.drafts.buffered_edge = edge;
    }

    pub fn take_buffered_edge(&mut self) -> Option<PartialEdge> {
        self.drafts.buffered_edge.take()
    }

    /// Replace the draft edge outright, e.g. to pair it with a draft node.
    pub fn set_draft_edge(&mut self, edge: Option<PartialEdge>) {
        self.drafts.edge = edge;
        self.drafts.before_snap = None;
        self.drafts.edge_being_replaced = None;
    }

    /// Begin a draft edge at the given slot. Inputs fix the destination;
    /// outputs and passthrough slots fix the source.
    pub fn start_edge(&mut self, node_id: &str, slot_id: &str) -> bool {
        if self.readonly() {
            log::warn!("Cannot start an edge: editor is readonly");
            return false;
        }
        let Some(slot) = self.slot(node_id, slot_id) else {
            log::warn!("Cannot start an edge: no slot '{}.{}'", node_id, slot_id);
            return false;
        };

        let start = SlotRef::new(node_id, slot_id);
        let draft = match slot.kind() {
            SlotKind::Input => PartialEdge::to_slot(start),
            SlotKind::Output | SlotKind::Passthrough => PartialEdge::from_slot(start),
        };
        log::debug!("Drafting edge from {} slot {}.{}", slot.kind(), node_id, slot_id);

        self.drafts.edge = Some(draft);
        self.drafts.before_snap = None;
        self.drafts.edge_being_replaced = None;
        true
    }

    /// Try to complete the draft with the hovered slot. The candidate is
    /// adopted when it is structurally valid; its `valid` flag reports the
    /// value-type check. Returns whether the draft changed.
    pub fn draft_edge_snap(&mut self, node_id: &str, slot_id: &str) -> bool {
        let Some(draft) = self.drafts.edge.clone() else {
            return false;
        };

        if draft.to_edge().is_some_and(|e| self.is_valid(&e)) {
            log::warn!("Drafted edge is already valid. Not modifying it.");
            return false;
        }
        if draft.fixed_end().is_some_and(|end| end.node_id == node_id) {
            log::warn!("Cannot connect an edge to the node it starts on");
            return false;
        }

        let candidate = SlotRef::new(node_id, slot_id);
        let mut full = draft.clone();
        if full.to.is_none() {
            full.to = Some(candidate);
        } else if full.from.is_none() {
            full.from = Some(candidate);
        }

        let Some(mut edge) = full.to_edge() else {
            return false;
        };
        let start_kind = self.slot(&edge.from_node_id, &edge.from_slot_id).map(|s| s.kind());
        let end_kind = self.slot(&edge.to_node_id, &edge.to_slot_id).map(|s| s.kind());
        if start_kind == Some(SlotKind::Passthrough) && end_kind == Some(SlotKind::Output) {
            std::mem::swap(&mut full.from, &mut full.to);
            edge = Edge::new(edge.to_ref(), edge.from_ref());
        }

        full.valid = self.is_valid(&edge);
        if !self.is_valid_with(&edge, false) {
            return false;
        }

        self.drafts.edge_being_replaced = self.find_edge_to_replace(&edge);
        self.drafts.before_snap = Some(draft);
        self.drafts.edge = Some(full);
        true
    }

    /// Undo the last snap.
    pub fn draft_edge_unsnap(&mut self) {
        if let Some(previous) = self.drafts.before_snap.take() {
            self.drafts.edge = Some(previous);
            self.drafts.edge_being_replaced = None;
        }
    }

    /// Abandon the draft. The draft is emitted and kept as the buffered edge.
    pub fn cancel_edge(&mut self) {
        self.drafts.before_snap = None;
        self.drafts.edge_being_replaced = None;
        if let Some(draft) = self.drafts.edge.take() {
            self.emit(ContextEvent::EdgeCancelled(draft.clone()));
            self.drafts.buffered_edge = Some(draft);
        }
    }

    /// The drag ended. Commits the draft when it may be placed, otherwise
    /// cancels it.
    pub fn release_edge(&mut self) -> Result<EditOutcome, GraphError> {
        let Some(draft) = self.drafts.edge.clone() else {
            return Ok(EditOutcome::Aborted);
        };

        let placeable = draft.to_edge().filter(|edge| {
            let endpoint_readonly = [&edge.from_node_id, &edge.to_node_id]
                .into_iter()
                .any(|id| self.node(id).is_some_and(|n| n.readonly()));
            !self.readonly()
                && !endpoint_readonly
                && self.is_valid(edge)
                && self.find_identical_edge(edge).is_none()
        });

        match placeable {
            Some(edge) => {
                let replace = self.find_edge_to_replace(&edge);
                self.finish_edge(replace)
            }
            None => {
                self.cancel_edge();
                Ok(EditOutcome::Aborted)
            }
        }
    }

    /// Commit the draft as "Add edge", removing `replace` first.
    pub fn finish_edge(&mut self, replace: Option<Edge>) -> Result<EditOutcome, GraphError> {
        let draft = self.drafts.edge.take();
        self.drafts.before_snap = None;
        self.drafts.edge_being_replaced = None;

        let Some(edge) = draft.and_then(|d| d.to_edge()) else {
            return Ok(EditOutcome::Aborted);
        };
        self.execute("Add edge", Command::ConnectEdge { replace, edge })
    }

    pub fn draft_node(&self) -> Option<&Node> {
        self.drafts.node.as_ref()
    }

    /// Hold `node` as the node being placed.
    pub fn set_draft_node(&mut self, node: Node) {
        self.drafts.node = Some(node);
    }

    pub fn draft_node_mut(&mut self) -> Option<&mut Node> {
        self.drafts.node.as_mut()
    }

    /// Commit the draft node as "Add node", together with the draft edge
    /// when one is complete.
    pub fn release_draft_node(&mut self) -> Result<EditOutcome, GraphError> {
        let Some(node) = self.drafts.node.take() else {
            return Ok(EditOutcome::Aborted);
        };
        let edge = self.drafts.edge.take().and_then(|d| d.to_edge());
        self.drafts.before_snap = None;
        self.drafts.edge_being_replaced = None;

        if self.readonly() {
            log::warn!("Cannot add node '{}': editor is readonly", node.id);
            return Ok(EditOutcome::Aborted);
        }

        let mut commands = vec![Command::AddNode(node)];
        commands.extend(edge.map(Command::AddEdge));
        self.execute("Add node", Command::Batch(commands))
    }

    /// Discard the draft node, draft edge and buffered edge.
    pub fn clear_drafts(&mut self) {
        self.drafts = DraftState::default();
    }
}
