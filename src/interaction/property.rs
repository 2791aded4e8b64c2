use crate::accessor::{Accessor, Lookup};
use crate::context::{Command, EditOutcome, GraphContext};
use crate::error::GraphError;
use crate::model::{Node, Property, PropertySet};
use serde_json::Value as JsonValue;

/// Reads and writes node fields by accessor path across the current
/// selection. Reroute nodes and readonly nodes are never edited.
///
/// ```
/// use nodeloom::prelude::*;
/// use serde_json::json;
///
/// let mut context = GraphContext::new();
/// context
///     .execute("Add node", Command::AddNode(Node::new("a").with_data("n", json!(1))))
///     .unwrap();
/// context.select_node("a");
///
/// let mut properties = PropertyManipulator::new(&mut context);
/// properties.set_property("data.n", json!(2)).unwrap();
/// assert_eq!(properties.get_property("data.n").unwrap(), Lookup::Found(json!(2)));
/// ```
pub struct PropertyManipulator<'a> {
    context: &'a mut GraphContext,
}

impl<'a> PropertyManipulator<'a> {
    pub fn new(context: &'a mut GraphContext) -> Self {
        Self { context }
    }

    fn targets(&self) -> impl Iterator<Item = &Node> + '_ {
        self.context
            .selected_nodes()
            .into_iter()
            .filter(|n| !n.node().is_reroute())
            .map(|n| n.node())
    }

    /// Ids of the selected nodes that may be edited.
    pub fn node_ids(&self) -> Vec<String> {
        self.context
            .selected_nodes()
            .into_iter()
            .filter(|n| !n.node().is_reroute() && !n.readonly())
            .map(|n| n.id().to_string())
            .collect()
    }

    /// The shared value of `path` across the selection. See
    /// [`Accessor::get`] for how disagreement is reported.
    pub fn get_property(&self, path: &str) -> Result<Lookup, GraphError> {
        Accessor::get_nodes(self.targets(), path)
    }

    /// Write `path` on every editable selected node as one
    /// "Edit properties" edit. Nothing is recorded when no value changes.
    pub fn set_property(&mut self, path: &str, value: JsonValue) -> Result<EditOutcome, GraphError> {
        let node_ids = self.node_ids();
        if node_ids.is_empty() {
            return Ok(EditOutcome::Aborted);
        }
        self.context.execute(
            "Edit properties",
            Command::SetProperty {
                node_ids,
                path: path.to_string(),
                value,
            },
        )
    }

    /// Whether any selected node drives `property` through a slot.
    pub fn is_property_slotted(&self, property: &Property) -> bool {
        let Some(slot_id) = property.slot_id() else {
            return false;
        };
        self.targets().any(|node| node.slot(&slot_id).is_some())
    }

    pub fn create_property_slot(&mut self, property: &Property) -> Result<EditOutcome, GraphError> {
        let node_ids = self.node_ids();
        if node_ids.is_empty() || !property.slottable {
            return Ok(EditOutcome::Aborted);
        }
        self.context.execute(
            "Create property slot",
            Command::CreatePropertySlot {
                node_ids,
                property: property.clone(),
            },
        )
    }

    pub fn remove_property_slot(&mut self, property: &Property) -> Result<EditOutcome, GraphError> {
        let node_ids = self.node_ids();
        if node_ids.is_empty() {
            return Ok(EditOutcome::Aborted);
        }
        self.context.execute(
            "Remove property slot",
            Command::RemovePropertySlot {
                node_ids,
                property: property.clone(),
            },
        )
    }

    /// Property sets to show for the selection: the node's own sets when
    /// exactly one node is selected, then `universal`, filtered by `query`.
    pub fn property_sets(&self, universal: &[PropertySet], query: &str) -> Vec<PropertySet> {
        let targets: Vec<&Node> = self.targets().collect();
        let own = match targets.as_slice() {
            [node] => node.properties.clone().unwrap_or_default(),
            _ => Vec::new(),
        };
        filter_property_sets(own.iter().chain(universal), query)
    }
}

/// Keep the sets that still have properties whose label contains `query`.
pub fn filter_property_sets<'s>(
    sets: impl IntoIterator<Item = &'s PropertySet>,
    query: &str,
) -> Vec<PropertySet> {
    sets.into_iter().filter_map(|set| set.filtered(query)).collect()
}
