use crate::context::{Command, EditOutcome, GraphContext};
use crate::error::GraphError;
use crate::model::{Edge, Node, NodeStyle, Point, Slot};
use crate::values::WildcardType;
use serde_json::json;
use uuid::Uuid;

/// Id of the single slot on a reroute node.
pub const REROUTE_SLOT_ID: &str = "passthrough";

/// A fresh reroute node centered near `position` (graph space). Its slot
/// carries a wildcard of its own so the reroute adopts whatever flows
/// through it.
pub fn reroute_node(position: Point) -> Node {
    let template_name = format!("reroute-{}", Uuid::new_v4().simple());
    let mut node = Node::new(Uuid::new_v4().to_string())
        .at(position.x - 10.0, position.y - 10.0)
        .with_data("type", json!("passthrough"))
        .with_data("unit", json!("reroute"))
        .with_slot(
            Slot::passthrough(REROUTE_SLOT_ID)
                .with_label("")
                .with_value(WildcardType::named(template_name)),
        );
    node.style = Some(NodeStyle::Reroute);
    node
}

/// Split `edge` at `position` with a new reroute node as one
/// "Add reroute node" edit. Both halves keep the edge's `valid` flag.
pub fn insert_reroute(
    context: &mut GraphContext,
    edge: &Edge,
    position: Point,
) -> Result<EditOutcome, GraphError> {
    if context.readonly() {
        return Ok(EditOutcome::Aborted);
    }
    let Some(existing) = context.find_identical_edge(edge).cloned() else {
        log::warn!("Cannot reroute {}: not in the graph", edge);
        return Ok(EditOutcome::Aborted);
    };

    let node = reroute_node(position);

    let mut incoming = Edge::between(
        &existing.from_node_id,
        &existing.from_slot_id,
        &node.id,
        REROUTE_SLOT_ID,
    );
    incoming.valid = existing.valid;
    let mut outgoing = Edge::between(
        &node.id,
        REROUTE_SLOT_ID,
        &existing.to_node_id,
        &existing.to_slot_id,
    );
    outgoing.valid = existing.valid;

    // The halves go in first so the original endpoints never look empty.
    let command = Command::Batch(vec![
        Command::AddNode(node),
        Command::AddEdge(incoming),
        Command::AddEdge(outgoing),
        Command::RemoveEdge(existing),
    ]);
    context.execute("Add reroute node", command)
}
