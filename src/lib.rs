//! # Nodeloom - Editing Core for Visual Node Graphs
//!
//! **Nodeloom** holds the state and the interaction rules behind a visual
//! node-graph editor: nodes with typed slots, edges between them, and a
//! transactional edit engine with undo and redo. Rendering is left to the
//! host; everything here is plain data plus the rules for changing it.
//!
//! ## Core Workflow
//!
//! 1.  **Register Value Types**: Describe which slot values may connect, either by
//!     implementing [`values::ValueType`] or by loading [`values::DeclaredValueType`]s
//!     from JSON. A wildcard type that infers its binding from the graph is always present.
//! 2.  **Build a Context**: Use [`context::GraphContext::builder`] to configure grid, zoom
//!     range and readonly flags, and to hand over a loaded [`model::Graph`].
//! 3.  **Edit**: Every structural change runs through `edit` or `execute` as one
//!     transaction. Failed or aborted edits leave the graph untouched; committed ones
//!     land on the undo stack.
//! 4.  **Interact**: Draft edges, selection boxes, copy/paste, reroute insertion and
//!     property editing are built on the same transactions.
//!
//! ## Quick Start
//!
//! ```rust
//! use nodeloom::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let number = DeclaredValueType::new("number", "Number", "#4caf50");
//!     let mut context = GraphContext::builder().with_value_type(number).build();
//!
//!     let source = Node::new("source")
//!         .with_slot(Slot::output("value").with_value(Value::of("number")));
//!     let sink = Node::new("sink")
//!         .at(200.0, 0.0)
//!         .with_slot(Slot::input("value").with_value(Value::of("number")));
//!     context.execute(
//!         "Add nodes",
//!         Command::Batch(vec![Command::AddNode(source), Command::AddNode(sink)]),
//!     )?;
//!
//!     // Drag an edge from the output onto the input and let go.
//!     context.start_edge("source", "value");
//!     context.draft_edge_snap("sink", "value");
//!     let outcome = context.release_edge()?;
//!     assert!(outcome.is_committed());
//!     assert_eq!(context.graph().edges.len(), 1);
//!
//!     context.undo();
//!     assert!(context.graph().edges.is_empty());
//!     Ok(())
//! }
//! ```

pub mod accessor;
pub mod context;
pub mod error;
pub mod interaction;
pub mod model;
pub mod prelude;
pub mod values;
