//! The live editing state: one graph, its undo history, and everything a
//! view needs to interact with it.
//!
//! All structural changes go through [`GraphContext::edit`] or
//! [`GraphContext::execute`]. Views read nodes and slots through the
//! borrowed [`NodeContext`] and [`SlotContext`] handles, which always
//! resolve against the current graph.
//!
//! ```
//! use nodeloom::prelude::*;
//!
//! let mut context = GraphContext::builder().grid_size(10.0, 10.0).build();
//! let outcome = context
//!     .execute("Add node", Command::AddNode(Node::new("a").at(20.0, 40.0)))
//!     .unwrap();
//! assert!(outcome.is_committed());
//! assert!(context.undo());
//! assert!(context.graph().nodes.is_empty());
//! ```

mod clipboard;
mod config;
mod draft;
mod editor;
mod events;
mod history;
mod node;
mod ops;
pub mod rules;
mod selection;
mod shared;
mod slot;
mod validity;
mod viewport;

pub use config::{ContextBuilder, ContextConfig};
pub use draft::PartialEdge;
pub use editor::{GraphEditor, Rollback};
pub use events::{ContextEvent, Listener, ListenerId};
pub use history::{Command, EditFn, EditOutcome, UndoEntry, clone_graph};
pub use node::{EdgeValidator, NodeContext, NodeContextMut, NodeRegistration, SlotRegistration};
pub use selection::{SelectionBox, boxes_overlap, overlap_1d};
pub use shared::SharedContext;
pub use slot::SlotContext;

use crate::error::GraphError;
use crate::model::{Graph, Node, Slot, SlotRef};
use crate::values::{ValueType, ValueTypeRegistry};
use ahash::AHashMap;
use draft::DraftState;
use events::EventBus;
use selection::Selection;
use std::sync::Arc;
use viewport::Viewport;

/// Owns the live graph, the undo and redo stacks, and the per-editor
/// registries. Value types are scoped to one context; nothing is global.
pub struct GraphContext {
    config: ContextConfig,
    graph: Graph,
    value_types: ValueTypeRegistry,
    undo_stack: Vec<UndoEntry>,
    redo_stack: Vec<UndoEntry>,
    events: EventBus,
    selection: Selection,
    drafts: DraftState,
    clipboard: Option<Graph>,
    viewport: Viewport,
    registrations: AHashMap<String, NodeRegistration>,
}

impl GraphContext {
    /// An empty context with default settings and only the wildcard type.
    pub fn new() -> Self {
        ContextBuilder::new().build()
    }

    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    pub(crate) fn from_parts(
        config: ContextConfig,
        graph: Graph,
        value_types: ValueTypeRegistry,
    ) -> Self {
        Self {
            config,
            graph,
            value_types,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            events: EventBus::default(),
            selection: Selection::default(),
            drafts: DraftState::default(),
            clipboard: None,
            viewport: Viewport::default(),
            registrations: AHashMap::new(),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn readonly(&self) -> bool {
        self.config.readonly
    }

    pub fn set_readonly(&mut self, readonly: bool) {
        self.config.readonly = readonly;
    }

    pub fn locked(&self) -> bool {
        self.config.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.config.locked = locked;
    }

    /// Replace the live graph wholesale, e.g. after loading a document.
    /// History, drafts and selection are reset.
    pub fn load_graph(&mut self, graph: Graph) {
        let duplicates = graph.duplicate_node_ids();
        if !duplicates.is_empty() {
            log::warn!(
                "Loaded graph has duplicate node ids, lookups use the first match: {:?}",
                duplicates
            );
        }

        self.graph = graph;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.drafts = DraftState::default();
        self.selection = Selection::default();

        self.emit_graph_changed();
        self.emit_selection_changed();
    }

    pub fn value_types(&self) -> &ValueTypeRegistry {
        &self.value_types
    }

    pub fn register_value_type(&mut self, value_type: impl ValueType + 'static) {
        self.register_shared_value_type(Arc::new(value_type));
    }

    pub fn register_shared_value_type(&mut self, value_type: Arc<dyn ValueType>) {
        self.value_types.register(value_type);
        self.emit(ContextEvent::ValueTypesChanged);
    }

    /// Look up a registered type. An unknown id is a configuration error.
    pub fn value_type(&self, id: &str) -> Result<&dyn ValueType, GraphError> {
        self.value_types
            .get(id)
            .ok_or_else(|| GraphError::UnknownValueType(id.to_string()))
    }

    /// Registered types in registration order.
    pub fn all_value_types(&self) -> Vec<&dyn ValueType> {
        self.value_types.all().collect()
    }

    /// Fails with the first slot value whose type is not registered.
    pub fn check_value_types(&self) -> Result<(), GraphError> {
        let unknown = self
            .graph
            .nodes
            .iter()
            .flat_map(|n| n.slots.iter())
            .filter_map(|s| s.value.as_ref())
            .find(|v| !self.value_types.contains(&v.type_id));

        match unknown {
            Some(value) => Err(GraphError::UnknownValueType(value.type_id.clone())),
            None => Ok(()),
        }
    }

    pub fn node(&self, id: &str) -> Option<NodeContext<'_>> {
        self.graph.node(id).map(|node| NodeContext::new(self, node))
    }

    pub fn node_mut(&mut self, id: &str) -> Option<NodeContextMut<'_>> {
        self.graph.node(id)?;
        Some(NodeContextMut::new(self, id.to_string()))
    }

    pub fn nodes(&self) -> Vec<NodeContext<'_>> {
        self.graph
            .nodes
            .iter()
            .map(|node| NodeContext::new(self, node))
            .collect()
    }

    pub fn slot(&self, node_id: &str, slot_id: &str) -> Option<SlotContext<'_>> {
        let (node, slot) = self.graph.slot(node_id, slot_id)?;
        Some(SlotContext::attached(self, node, slot))
    }

    pub fn slot_by_ref(&self, slot: &SlotRef) -> Option<SlotContext<'_>> {
        self.slot(&slot.node_id, &slot.slot_id)
    }

    /// A slot context for a node and slot that are already borrowed from
    /// this context's graph.
    pub fn slot_in<'a>(&'a self, node: &'a Node, slot: &'a Slot) -> SlotContext<'a> {
        SlotContext::attached(self, node, slot)
    }

    /// Attach view-side state to a node. Replaces any earlier registration.
    pub fn register_node(&mut self, id: impl Into<String>, registration: NodeRegistration) {
        self.registrations.insert(id.into(), registration);
    }

    pub fn deregister_node(&mut self, id: &str) -> bool {
        self.registrations.remove(id).is_some()
    }

    pub fn registration(&self, id: &str) -> Option<&NodeRegistration> {
        self.registrations.get(id)
    }

    pub(crate) fn registration_mut(&mut self, id: &str) -> &mut NodeRegistration {
        self.registrations.entry(id.to_string()).or_default()
    }

    pub(crate) fn edge_validator(&self, node_id: &str, slot_id: &str) -> Option<EdgeValidator> {
        self.registrations
            .get(node_id)?
            .slots
            .get(slot_id)?
            .validate_edge
            .clone()
    }
}

impl Default for GraphContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GraphContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphContext")
            .field("config", &self.config)
            .field("nodes", &self.graph.nodes.len())
            .field("edges", &self.graph.edges.len())
            .field("value_types", &self.value_types)
            .field("undo", &self.undo_stack.len())
            .field("redo", &self.redo_stack.len())
            .field("selected", &self.selection.selected)
            .finish()
    }
}
