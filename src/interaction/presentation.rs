use crate::context::{GraphContext, SlotContext};
use crate::model::Edge;
use crate::values::SlotShape;

pub const DEFAULT_EDGE_COLOR: &str = "white";
pub const DEFAULT_EDGE_WIDTH: f64 = 2.0;
pub const INVALID_EDGE_COLOR: &str = "red";
pub const REPLACED_EDGE_COLOR: &str = "maroon";
pub const REPLACED_EDGE_WIDTH: f64 = 3.0;

/// How to draw a slot handle. `None` fields mean the slot is untyped.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotPresentation {
    pub type_name: Option<String>,
    pub color: Option<String>,
    pub shape: SlotShape,
}

pub fn slot_presentation(slot: &SlotContext<'_>) -> SlotPresentation {
    let Some(value_type) = slot.value_type() else {
        return SlotPresentation {
            type_name: None,
            color: None,
            shape: SlotShape::default(),
        };
    };

    SlotPresentation {
        type_name: Some(
            value_type
                .name_by_context(slot)
                .unwrap_or_else(|| value_type.name().to_string()),
        ),
        color: Some(
            value_type
                .color_by_context(slot)
                .unwrap_or_else(|| value_type.color().to_string()),
        ),
        shape: value_type
            .slot_shape_by_context(slot)
            .or_else(|| value_type.slot_shape())
            .unwrap_or_default(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgePresentation {
    pub color: String,
    pub line_width: f64,
    pub dashed: bool,
    /// Draw the pulse overlay.
    pub active: bool,
}

/// Edges take the color and width of their source slot's type. Invalid
/// edges are red; the edge a draft would replace is dashed.
pub fn edge_presentation(context: &GraphContext, edge: &Edge) -> EdgePresentation {
    let mut presentation = EdgePresentation {
        color: DEFAULT_EDGE_COLOR.to_string(),
        line_width: DEFAULT_EDGE_WIDTH,
        dashed: false,
        active: edge.active == Some(true),
    };

    if let Some(source) = context.slot(&edge.from_node_id, &edge.from_slot_id) {
        if let Some(value_type) = source.value_type() {
            presentation.color = slot_presentation(&source)
                .color
                .unwrap_or_else(|| value_type.color().to_string());
            if let Some(width) = value_type.line_width() {
                presentation.line_width = width;
            }
        }
    }

    if edge.valid == Some(false) {
        presentation.color = INVALID_EDGE_COLOR.to_string();
    }

    if context.edge_being_replaced() == Some(edge) {
        presentation.color = REPLACED_EDGE_COLOR.to_string();
        presentation.line_width = REPLACED_EDGE_WIDTH;
        presentation.dashed = true;
    }

    presentation
}
