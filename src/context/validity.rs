use super::GraphContext;
use super::slot::SlotContext;
use crate::error::GraphError;
use crate::model::{Edge, SlotKind, Value};

impl GraphContext {
    /// Full validity check, including value types.
    pub fn is_valid(&self, edge: &Edge) -> bool {
        self.is_valid_with(edge, true)
    }

    /// Whether `edge` may exist in the current graph.
    ///
    /// Both slots must resolve and must not share a direction, except two
    /// passthrough slots. With `check_value`, typed slots need a type that
    /// approves the pair (either end's type suffices) and a typed slot never
    /// connects to an untyped one. View-registered validators on either
    /// slot have the last word. Values of unregistered types count as
    /// untyped.
    pub fn is_valid_with(&self, edge: &Edge, check_value: bool) -> bool {
        let (Some(from), Some(to)) = (
            self.slot(&edge.from_node_id, &edge.from_slot_id),
            self.slot(&edge.to_node_id, &edge.to_slot_id),
        ) else {
            return false;
        };

        if from.kind() == to.kind() && from.kind() != SlotKind::Passthrough {
            return false;
        }

        if check_value {
            match (from.value_type(), to.value_type()) {
                (Some(from_type), Some(to_type)) => {
                    if !from_type.is_compatible(&from, &to) && !to_type.is_compatible(&from, &to) {
                        return false;
                    }
                }
                (None, None) => {}
                _ => return false,
            }
        }

        [&from, &to]
            .into_iter()
            .filter_map(|slot| slot.validator())
            .all(|validate| validate(edge))
    }

    /// Whether an output carrying `output` may feed an input carrying
    /// `input`, judged on detached slots. Either type approving is enough.
    pub fn values_compatible(
        &self,
        output: Option<&Value>,
        input: Option<&Value>,
    ) -> Result<bool, GraphError> {
        let (output, input) = match (output, input) {
            (None, None) => return Ok(true),
            (Some(output), Some(input)) => (output, input),
            _ => return Ok(false),
        };
        if output == input {
            return Ok(true);
        }

        let output_type = self.value_type(&output.type_id)?;
        let input_type = self.value_type(&input.type_id)?;

        let output_slot = SlotContext::detached(self, Some(output.clone()), SlotKind::Output);
        let input_slot = SlotContext::detached(self, Some(input.clone()), SlotKind::Input);

        Ok(output_type.is_compatible(&output_slot, &input_slot)
            || input_type.is_compatible(&output_slot, &input_slot))
    }

    /// The existing edge that must go before `edge` can be placed: the
    /// single incoming edge of a non-mergeable destination, otherwise the
    /// outgoing edge of a non-splittable source.
    pub fn find_edge_to_replace(&self, edge: &Edge) -> Option<Edge> {
        let from = self.slot(&edge.from_node_id, &edge.from_slot_id)?;
        let to = self.slot(&edge.to_node_id, &edge.to_slot_id)?;

        let to_exclusive = to.value_type().is_some_and(|t| !t.mergeable());
        if to_exclusive {
            if let Some(existing) = to.incoming_edges().first() {
                return Some((*existing).clone());
            }
        }

        let from_exclusive = from.value_type().is_some_and(|t| !t.splittable());
        if from_exclusive {
            if let Some(existing) = from.outgoing_edges().first() {
                return Some((*existing).clone());
            }
        }

        None
    }

    /// The edge in the live graph with the same endpoints, if any.
    pub fn find_identical_edge(&self, edge: &Edge) -> Option<&Edge> {
        self.graph.edges.iter().find(|e| Self::edges_are_equal(e, edge))
    }

    /// Endpoint equality; `valid` and `active` are ignored.
    pub fn edges_are_equal(a: &Edge, b: &Edge) -> bool {
        a == b
    }
}
