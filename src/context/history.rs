use super::GraphContext;
use super::editor::{GraphEditor, Rollback};
use crate::error::{EditFailure, GraphError};
use crate::model::{Edge, Graph, Node, Property};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

pub type EditFn = Arc<dyn Fn(&mut GraphEditor<'_>) -> Result<(), EditFailure> + Send + Sync>;

/// A replayable description of one edit. Undo entries keep the command so
/// redo can run the same logical operation again.
#[derive(Clone)]
pub enum Command {
    AddNode(Node),
    RemoveNode(String),
    AddEdge(Edge),
    RemoveEdge(Edge),
    /// Remove `replace` (if any) and add `edge`.
    ConnectEdge { replace: Option<Edge>, edge: Edge },
    /// Fold a drag offset into the node position and zero the offset.
    MoveNode { id: String, dx: f64, dy: f64 },
    PlaceNode { id: String, x: f64, y: f64 },
    /// Write one accessor path on several nodes. Aborts silently when no
    /// node changes.
    SetProperty {
        node_ids: Vec<String>,
        path: String,
        value: JsonValue,
    },
    CreatePropertySlot {
        node_ids: Vec<String>,
        property: Property,
    },
    RemovePropertySlot {
        node_ids: Vec<String>,
        property: Property,
    },
    /// Append already re-identified nodes and edges.
    AddSubgraph(Graph),
    Batch(Vec<Command>),
    Custom(EditFn),
}

impl Command {
    pub fn custom(
        f: impl Fn(&mut GraphEditor<'_>) -> Result<(), EditFailure> + Send + Sync + 'static,
    ) -> Self {
        Command::Custom(Arc::new(f))
    }

    pub fn apply(&self, editor: &mut GraphEditor<'_>) -> Result<(), EditFailure> {
        match self {
            Command::AddNode(node) => editor.add_node(node.clone())?,
            Command::RemoveNode(id) => {
                editor.remove_node(id);
            }
            Command::AddEdge(edge) => editor.add_edge(edge.clone()),
            Command::RemoveEdge(edge) => editor.remove_edge(edge),
            Command::ConnectEdge { replace, edge } => {
                if let Some(replaced) = replace {
                    editor.remove_edge(replaced);
                }
                editor.add_edge(edge.clone());
            }
            Command::MoveNode { id, dx, dy } => {
                let node = editor.require_node_mut(id)?;
                node.x += dx;
                node.y += dy;
                node.position_delta_x = 0.0;
                node.position_delta_y = 0.0;
            }
            Command::PlaceNode { id, x, y } => {
                let node = editor.require_node_mut(id)?;
                node.x = *x;
                node.y = *y;
            }
            Command::SetProperty {
                node_ids,
                path,
                value,
            } => editor.set_property(node_ids, path, value.clone())?,
            Command::CreatePropertySlot { node_ids, property } => {
                editor.create_property_slot(node_ids, property)?
            }
            Command::RemovePropertySlot { node_ids, property } => {
                editor.remove_property_slot(node_ids, property)?
            }
            Command::AddSubgraph(graph) => {
                for node in &graph.nodes {
                    editor.add_node(node.clone())?;
                }
                for edge in &graph.edges {
                    editor.add_edge(edge.clone());
                }
            }
            Command::Batch(commands) => {
                for command in commands {
                    command.apply(editor)?;
                }
            }
            Command::Custom(f) => f(editor)?,
        }
        Ok(())
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::AddNode(node) => write!(f, "AddNode({})", node.id),
            Command::RemoveNode(id) => write!(f, "RemoveNode({})", id),
            Command::AddEdge(edge) => write!(f, "AddEdge({})", edge),
            Command::RemoveEdge(edge) => write!(f, "RemoveEdge({})", edge),
            Command::ConnectEdge { replace, edge } => match replace {
                Some(old) => write!(f, "ConnectEdge({}, replacing {})", edge, old),
                None => write!(f, "ConnectEdge({})", edge),
            },
            Command::MoveNode { id, dx, dy } => write!(f, "MoveNode({}, {}, {})", id, dx, dy),
            Command::PlaceNode { id, x, y } => write!(f, "PlaceNode({}, {}, {})", id, x, y),
            Command::SetProperty { node_ids, path, .. } => {
                write!(f, "SetProperty({:?}, {})", node_ids, path)
            }
            Command::CreatePropertySlot { node_ids, property } => {
                write!(f, "CreatePropertySlot({:?}, {:?})", node_ids, property.path)
            }
            Command::RemovePropertySlot { node_ids, property } => {
                write!(f, "RemovePropertySlot({:?}, {:?})", node_ids, property.path)
            }
            Command::AddSubgraph(graph) => write!(
                f,
                "AddSubgraph({} nodes, {} edges)",
                graph.nodes.len(),
                graph.edges.len()
            ),
            Command::Batch(commands) => f.debug_tuple("Batch").field(commands).finish(),
            Command::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// How an edit ended.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Committed,
    /// The callback aborted, or there was nothing to do.
    Aborted,
    /// The callback returned an error. The graph is untouched.
    Rejected(GraphError),
}

impl EditOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, EditOutcome::Committed)
    }
}

/// One undoable step: full snapshots on either side plus the command that
/// produced it.
pub struct UndoEntry {
    pub cause: String,
    pub command: Command,
    pub graph_before: Graph,
    pub graph_after: Graph,
    rollbacks: Vec<Rollback>,
}

impl fmt::Debug for UndoEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoEntry")
            .field("cause", &self.cause)
            .field("command", &self.command)
            .field("rollbacks", &self.rollbacks.len())
            .finish()
    }
}

/// Deep copy through a JSON round-trip. Fails on coordinates JSON cannot
/// represent, naming the offending field.
pub fn clone_graph(graph: &Graph) -> Result<Graph, GraphError> {
    for (i, node) in graph.nodes.iter().enumerate() {
        let coordinates = [
            ("x", node.x),
            ("y", node.y),
            ("positionDeltaX", node.position_delta_x),
            ("positionDeltaY", node.position_delta_y),
        ];
        if let Some((name, value)) = coordinates.iter().find(|(_, v)| !v.is_finite()) {
            return Err(GraphError::Clone {
                field: format!("nodes[{}].{}", i, name),
                message: format!("is not a finite number ({})", value),
            });
        }
    }

    let value = serde_json::to_value(graph).map_err(|e| GraphError::Clone {
        field: "graph".to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_value(value).map_err(|e| GraphError::Clone {
        field: "graph".to_string(),
        message: e.to_string(),
    })
}

/// Drop every edge whose endpoints no longer resolve.
pub(crate) fn cleanup_graph(graph: &mut Graph) -> usize {
    let before = graph.edges.len();
    let edges = std::mem::take(&mut graph.edges);
    graph.edges = edges.into_iter().filter(|e| graph.resolves(e)).collect();
    let removed = before - graph.edges.len();
    if removed > 0 {
        log::debug!("Cleanup removed {} dangling edge(s)", removed);
    }
    removed
}

impl GraphContext {
    /// Run `f` as one undoable transaction.
    ///
    /// `f` receives a [`GraphEditor`] over a working copy of the graph. Returning
    /// `Err` discards the copy. On success dangling edges are dropped, an undo
    /// entry is recorded, the redo stack is cleared and
    /// [`super::ContextEvent::GraphChanged`] is emitted.
    ///
    /// Nested edits cannot be expressed on a `&mut GraphContext`; see
    /// [`super::SharedContext`] for the runtime check.
    pub fn edit(
        &mut self,
        cause: &str,
        f: impl Fn(&mut GraphEditor<'_>) -> Result<(), EditFailure> + Send + Sync + 'static,
    ) -> Result<EditOutcome, GraphError> {
        self.execute(cause, Command::custom(f))
    }

    pub fn execute(&mut self, cause: &str, command: Command) -> Result<EditOutcome, GraphError> {
        self.run_edit(cause, command, true)
    }

    fn run_edit(
        &mut self,
        cause: &str,
        command: Command,
        clear_redo: bool,
    ) -> Result<EditOutcome, GraphError> {
        let mut graph_before = clone_graph(&self.graph)?;
        graph_before.clear_position_deltas();
        let mut graph_after = clone_graph(&self.graph)?;

        let mut rollbacks = Vec::new();
        let result = {
            let mut editor = GraphEditor::new(&mut graph_after, &mut rollbacks);
            command.apply(&mut editor)
        };

        match result {
            Ok(()) => {}
            Err(EditFailure::Aborted { silently }) => {
                if !silently {
                    log::warn!("REVERT: No changes during: {}", cause);
                }
                return Ok(EditOutcome::Aborted);
            }
            Err(EditFailure::Rejected(e)) => {
                log::error!("REVERT: Edit '{}' failed: {}", cause, e);
                return Ok(EditOutcome::Rejected(e));
            }
        }

        cleanup_graph(&mut graph_after);
        log::debug!("COMMIT: {}", cause);

        self.graph = clone_graph(&graph_after)?;
        self.undo_stack.push(UndoEntry {
            cause: cause.to_string(),
            command,
            graph_before,
            graph_after,
            rollbacks,
        });
        if clear_redo {
            self.redo_stack.clear();
        }

        self.prune_selection();
        self.emit_graph_changed();
        Ok(EditOutcome::Committed)
    }

    /// Restore the graph from before the last edit. Returns `false` when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(mut entry) = self.undo_stack.pop() else {
            return false;
        };

        for rollback in entry.rollbacks.drain(..) {
            rollback();
        }
        self.graph = entry.graph_before.clone();
        let message = format!("Undo: {}", entry.cause);
        log::debug!("{}", message);
        self.redo_stack.push(entry);

        self.prune_selection();
        self.emit_graph_changed();
        self.emit(super::ContextEvent::Notification(message));
        true
    }

    /// Replay the last undone command. Returns `Ok(false)` when there is
    /// nothing to redo or the replay did not commit.
    pub fn redo(&mut self) -> Result<bool, GraphError> {
        let Some(entry) = self.redo_stack.pop() else {
            return Ok(false);
        };

        let outcome = match self.run_edit(&entry.cause, entry.command.clone(), false) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.redo_stack.push(entry);
                return Err(e);
            }
        };

        let message = format!("Redo: {}", entry.cause);
        log::debug!("{}", message);
        self.emit(super::ContextEvent::Notification(message));
        Ok(outcome.is_committed())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_entries(&self) -> &[UndoEntry] {
        &self.undo_stack
    }

    pub fn redo_entries(&self) -> &[UndoEntry] {
        &self.redo_stack
    }
}
