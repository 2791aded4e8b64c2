//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the nodeloom crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use nodeloom::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let graph = Graph::from_file("path/to/graph.json")?;
//! let types = DeclaredValueType::list_from_file("path/to/value-types.json")?;
//!
//! let mut builder = GraphContext::builder().graph(graph);
//! for value_type in types {
//!     builder = builder.with_value_type(value_type);
//! }
//! let context = builder.build();
//! context.check_value_types()?;
//!
//! for edge in &context.graph().edges {
//!     println!("{} valid: {}", edge, context.is_valid(edge));
//! }
//! # Ok(())
//! # }
//! ```

// Editing state
pub use crate::context::{
    Command, ContextBuilder, ContextConfig, ContextEvent, EditOutcome, GraphContext, GraphEditor,
    NodeContext, PartialEdge, SharedContext, SlotContext,
};

// Graph data
pub use crate::model::{
    Edge, Graph, Node, NodeSet, Point, Property, PropertySet, Size, Slot, SlotKind, SlotRef, Value,
};

// Value types
pub use crate::values::{DeclaredValueType, SlotShape, ValueType, WildcardType};

// Field access
pub use crate::accessor::{Accessor, Lookup, UNSET};

// Interaction helpers
pub use crate::interaction::{NodeMenu, PropertyManipulator, insert_reroute};

// Error types
pub use crate::error::{AccessorError, EditFailure, GraphError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
