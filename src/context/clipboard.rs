use super::{Command, EditOutcome, GraphContext};
use crate::error::GraphError;
use crate::model::{Edge, Graph, Node, Point};
use ahash::AHashMap;
use uuid::Uuid;

/// Re-identify `nodes` with fresh ids and keep the edges of `edges` whose
/// endpoints are both among them, once each.
fn reidentify<'a>(
    nodes: impl IntoIterator<Item = &'a Node>,
    edges: impl IntoIterator<Item = &'a Edge>,
) -> Graph {
    let mut ids: AHashMap<&str, String> = AHashMap::new();
    let mut copy = Graph::new();

    for node in nodes {
        let id = Uuid::new_v4().to_string();
        ids.insert(node.id.as_str(), id.clone());
        copy.nodes.push(Node { id, ..node.clone() });
    }

    for edge in edges {
        let (Some(from), Some(to)) = (
            ids.get(edge.from_node_id.as_str()),
            ids.get(edge.to_node_id.as_str()),
        ) else {
            continue;
        };
        let mut edge = edge.clone();
        edge.from_node_id = from.clone();
        edge.to_node_id = to.clone();
        if !copy.contains_edge(&edge) {
            copy.edges.push(edge);
        }
    }

    copy
}

impl GraphContext {
    /// Put the selected nodes and the edges between them on the clipboard.
    /// Returns the number of nodes copied.
    pub fn copy(&mut self) -> usize {
        let nodes: Vec<&Node> = self
            .selection
            .selected
            .iter()
            .filter_map(|id| self.graph.node(id))
            .collect();
        let edges = nodes
            .iter()
            .copied()
            .flat_map(|node| self.graph.edges_of_node(&node.id));
        let copied = reidentify(nodes.iter().copied(), edges);

        let count = copied.nodes.len();
        log::debug!("Copied {} node(s), {} edge(s)", count, copied.edges.len());
        self.clipboard = Some(copied);
        count
    }

    pub fn clipboard(&self) -> Option<&Graph> {
        self.clipboard.as_ref()
    }

    pub fn set_clipboard(&mut self, graph: Graph) {
        self.clipboard = Some(graph);
    }

    /// A copy of `graph` with fresh node ids. Edges leaving the graph are
    /// dropped.
    pub fn create_copy(graph: &Graph) -> Graph {
        reidentify(&graph.nodes, &graph.edges)
    }

    /// Insert a fresh copy of the clipboard as one "Paste" edit, centered
    /// on `position` in graph space.
    pub fn paste(&mut self, position: Point) -> Result<EditOutcome, GraphError> {
        if self.readonly() {
            return Ok(EditOutcome::Aborted);
        }
        let Some(clipboard) = self.clipboard.as_ref().filter(|g| !g.nodes.is_empty()) else {
            return Ok(EditOutcome::Aborted);
        };

        let mut subgraph = Self::create_copy(clipboard);
        let (min_x, max_x, min_y, max_y) = subgraph.nodes.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(min_x, max_x, min_y, max_y), n| {
                (min_x.min(n.x), max_x.max(n.x), min_y.min(n.y), max_y.max(n.y))
            },
        );
        let mid_x = (min_x + max_x) / 2.0;
        let mid_y = (min_y + max_y) / 2.0;

        for node in &mut subgraph.nodes {
            node.x = node.x - mid_x + position.x;
            node.y = node.y - mid_y + position.y;
        }

        self.execute("Paste", Command::AddSubgraph(subgraph))
    }
}
