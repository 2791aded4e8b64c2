//! Editor gestures built from [`crate::context`] operations: reroute
//! insertion, edge hit-testing, the new-node menu, property editing,
//! graph inflation and rendering hints.
//!
//! Nothing here holds state a view could not rebuild; every change still
//! goes through one [`GraphContext::execute`](crate::context::GraphContext::execute).

mod inflate;
mod menu;
mod presentation;
mod property;
mod reroute;

pub use hit_test::{COLLINEAR_TOLERANCE, edge_at, point_on_line};
pub use inflate::{find_template_node, inflate_graph};
pub use menu::NodeMenu;
pub use presentation::{
    DEFAULT_EDGE_COLOR, DEFAULT_EDGE_WIDTH, EdgePresentation, INVALID_EDGE_COLOR,
    REPLACED_EDGE_COLOR, REPLACED_EDGE_WIDTH, SlotPresentation, edge_presentation,
    slot_presentation,
};
pub use property::{PropertyManipulator, filter_property_sets};
pub use reroute::{REROUTE_SLOT_ID, insert_reroute, reroute_node};
