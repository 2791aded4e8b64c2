//! Plain graph data: everything here is serde-serializable and carries no
//! behavior beyond lookups. The editing rules live in [`crate::context`].

pub mod geometry;
pub mod graph;
pub mod node;
pub mod property;
pub mod slot;

pub use geometry::*;
pub use graph::*;
pub use node::*;
pub use property::*;
pub use slot::*;

pub(crate) fn is_false(b: &bool) -> bool {
    !*b
}

pub(crate) fn is_zero(v: &f64) -> bool {
    *v == 0.0
}
