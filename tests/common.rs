//! Common test utilities for building contexts, nodes and value types.
use nodeloom::prelude::*;
use std::sync::{Arc, Mutex};

/// `integer` stands in for `number`; `text` is unrelated to both.
#[allow(dead_code)]
pub fn numeric_types() -> Vec<DeclaredValueType> {
    vec![
        DeclaredValueType::new("number", "Number", "#4caf50"),
        DeclaredValueType::new("integer", "Integer", "#2196f3").with_supertypes(&["number"]),
        DeclaredValueType::new("text", "Text", "#ff9800"),
    ]
}

/// A context with [`numeric_types`] registered.
#[allow(dead_code)]
pub fn typed_context() -> GraphContext {
    let mut builder = GraphContext::builder();
    for value_type in numeric_types() {
        builder = builder.with_value_type(value_type);
    }
    builder.build()
}

/// A node whose slots are given as `(id, value type)` pairs. An empty type
/// id leaves the slot untyped.
#[allow(dead_code)]
pub fn typed_node(id: &str, inputs: &[(&str, &str)], outputs: &[(&str, &str)]) -> Node {
    let slot = |kind: SlotKind, (slot_id, type_id): &(&str, &str)| {
        let slot = Slot::new(*slot_id, kind);
        if type_id.is_empty() {
            slot
        } else {
            slot.with_value(Value::of(*type_id))
        }
    };

    let mut node = Node::new(id);
    node.slots.extend(inputs.iter().map(|s| slot(SlotKind::Input, s)));
    node.slots.extend(outputs.iter().map(|s| slot(SlotKind::Output, s)));
    node
}

/// Add nodes outside of any user-visible history expectations. The undo
/// stack is cleared afterwards.
#[allow(dead_code)]
pub fn seed(context: &mut GraphContext, nodes: Vec<Node>, edges: Vec<Edge>) {
    let mut graph = Graph::new();
    graph.nodes = nodes;
    graph.edges = edges;
    context.load_graph(graph);
}

/// `source.out (number)` and `sink.in (number)`, unconnected.
#[allow(dead_code)]
pub fn source_and_sink() -> GraphContext {
    let mut context = typed_context();
    seed(
        &mut context,
        vec![
            typed_node("source", &[], &[("out", "number")]),
            typed_node("sink", &[("in", "number")], &[]),
        ],
        Vec::new(),
    );
    context
}

/// Records every event emitted by `context`.
#[allow(dead_code)]
pub fn record_events(context: &mut GraphContext) -> Arc<Mutex<Vec<ContextEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    context.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
    events
}

/// Node ids of a graph, in order.
#[allow(dead_code)]
pub fn node_ids(graph: &Graph) -> Vec<String> {
    graph.nodes.iter().map(|n| n.id.clone()).collect()
}
