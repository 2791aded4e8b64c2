use crate::model::{Graph, Node, NodeSet};
use serde_json::Value as JsonValue;

fn data_str<'n>(node: &'n Node, key: &str) -> Option<&'n str> {
    node.data.get(key).and_then(JsonValue::as_str)
}

/// The template `node` was created from: the first set with a template of
/// the same `data.variant`, or failing that the same `data.unit`. Nodes
/// without a unit have no template.
pub fn find_template_node<'s>(node: &Node, node_sets: &'s [NodeSet]) -> Option<&'s Node> {
    let unit = data_str(node, "unit")?;
    let variant = data_str(node, "variant");

    node_sets.iter().find_map(|set| {
        set.nodes
            .iter()
            .find(|t| variant.is_some() && data_str(t, "variant") == variant)
            .or_else(|| set.nodes.iter().find(|t| data_str(t, "unit") == Some(unit)))
    })
}

/// Re-attach property declarations from the templates in `node_sets`.
/// Saved graphs usually omit them; templates may also have changed since.
pub fn inflate_graph(graph: &mut Graph, node_sets: &[NodeSet]) {
    for node in &mut graph.nodes {
        if data_str(node, "unit") == Some("reroute") {
            continue;
        }

        match find_template_node(node, node_sets) {
            Some(template) => node.properties = template.properties.clone(),
            None if node.properties.is_some() => {
                log::warn!("Node '{}' has properties but no template to refresh them", node.id);
            }
            None if !node_sets.is_empty() => {
                log::warn!("No template found for node '{}'", node.id);
            }
            None => {}
        }
    }
}
