use super::draft::PartialEdge;
use crate::model::{Graph, Point};
use std::sync::Arc;

/// Notifications emitted by a [`super::GraphContext`]. Delivery is
/// synchronous, in subscription order.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextEvent {
    /// A new live graph after a commit, undo, redo or load.
    GraphChanged(Graph),
    /// Ids of the selected nodes.
    SelectionChanged(Vec<String>),
    ValueTypesChanged,
    /// A draft edge was abandoned. Hosts may offer to complete it with a
    /// new node, see [`crate::interaction::NodeMenu::insert_selected`].
    EdgeCancelled(PartialEdge),
    PanChanged(Point),
    ZoomChanged(f64),
    /// Human-readable status, e.g. `"Undo: Add edge"`.
    Notification(String),
}

pub type Listener = Arc<dyn Fn(&ContextEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
pub(crate) struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub(crate) fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Builds the event only when someone is listening.
    pub(crate) fn emit_with(&self, make: impl FnOnce() -> ContextEvent) {
        if self.listeners.is_empty() {
            return;
        }
        let event = make();
        for (_, listener) in &self.listeners {
            listener(&event);
        }
    }
}

impl super::GraphContext {
    /// Register a listener for every [`ContextEvent`].
    pub fn subscribe(&mut self, listener: impl Fn(&ContextEvent) + Send + Sync + 'static) -> ListenerId {
        self.events.subscribe(Arc::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    pub(crate) fn emit(&self, event: ContextEvent) {
        self.events.emit_with(|| event);
    }

    pub(crate) fn emit_graph_changed(&self) {
        self.events
            .emit_with(|| ContextEvent::GraphChanged(self.graph.clone()));
    }

    pub(crate) fn emit_selection_changed(&self) {
        self.events
            .emit_with(|| ContextEvent::SelectionChanged(self.selection.selected.clone()));
    }
}
