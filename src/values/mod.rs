//! Pluggable value types and the compatibility rules between them.
//!
//! A [`ValueType`] decides whether an output slot may feed an input slot.
//! An edge is accepted when *either* endpoint's type approves it, so a
//! narrow type can grant a connection the wider type would refuse.
//!
//! The default [`ValueType::is_compatible`] is hierarchical: an output of
//! type `T` may feed an input of type `U` when `T == U` or `U` is one of
//! `T`'s declared supertypes (transitively). Supertype sets are resolved
//! once, when types are registered, see [`ValueTypeRegistry`].

pub mod declared;
pub mod registry;
pub mod wildcard;

pub use declared::DeclaredValueType;
pub use registry::ValueTypeRegistry;
pub use wildcard::{WILDCARD_TYPE_ID, WildcardType};

use crate::context::SlotContext;
use serde::{Deserialize, Serialize};

/// Shape of a slot handle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SlotShape {
    #[default]
    Circle,
    Square,
    Arrow,
}

/// A registered compatibility and presentation policy, referenced by slots
/// through [`crate::model::Value::type_id`].
pub trait ValueType: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// CSS color used for edges and handles of this type.
    fn color(&self) -> &str;

    fn line_width(&self) -> Option<f64> {
        None
    }

    fn slot_shape(&self) -> Option<SlotShape> {
        None
    }

    /// An output of this type may feed more than one edge.
    fn splittable(&self) -> bool {
        false
    }

    /// An input of this type may receive more than one edge.
    fn mergeable(&self) -> bool {
        false
    }

    /// Ids this type may stand in for. Only direct supertypes are needed.
    fn supertypes(&self) -> Vec<String> {
        Vec::new()
    }

    /// Whether `output` may connect to `input`. The graph passed through the
    /// slot contexts does not yet contain the candidate edge.
    fn is_compatible(&self, output: &SlotContext<'_>, input: &SlotContext<'_>) -> bool {
        hierarchical_match(output, input) && self.is_expression_compatible(output, input)
    }

    /// Extra check layered on top of the hierarchy.
    fn is_expression_compatible(&self, _output: &SlotContext<'_>, _input: &SlotContext<'_>) -> bool {
        true
    }

    fn name_by_context(&self, _slot: &SlotContext<'_>) -> Option<String> {
        None
    }

    fn color_by_context(&self, _slot: &SlotContext<'_>) -> Option<String> {
        None
    }

    fn slot_shape_by_context(&self, _slot: &SlotContext<'_>) -> Option<SlotShape> {
        None
    }
}

/// The output's type is the input's type or one of its subtypes.
pub fn hierarchical_match(output: &SlotContext<'_>, input: &SlotContext<'_>) -> bool {
    match (output.value(), input.value()) {
        (Some(out), Some(inp)) => output
            .context()
            .value_types()
            .is_compatible_as(&out.type_id, &inp.type_id),
        _ => false,
    }
}
