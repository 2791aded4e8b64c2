use super::ValueType;
use crate::context::SlotContext;
use crate::model::{SlotRef, Value};
use ahash::AHashSet;
use serde_json::{Value as JsonValue, json};

pub const WILDCARD_TYPE_ID: &str = "wildcard";

/// A type inferred from the graph instead of declared.
///
/// Slots carry `{"type": "wildcard", "params": {"templateName": "T"}}`.
/// The concrete type is found by following edges on the slot, then
/// sibling slots on the same node sharing the template name. A wildcard
/// that resolves to nothing is unbound and accepts any connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct WildcardType;

impl WildcardType {
    /// A wildcard value tagged with `template_name`.
    pub fn named(template_name: impl Into<String>) -> Value {
        Value::new(
            WILDCARD_TYPE_ID,
            json!({ "templateName": template_name.into() }),
        )
    }

    pub fn is_wildcard(value: &Value) -> bool {
        value.type_id == WILDCARD_TYPE_ID
    }

    pub fn template_name(value: &Value) -> Option<&str> {
        value.params.get("templateName").and_then(JsonValue::as_str)
    }

    /// The concrete value the slot is bound to, or `None` when unbound or
    /// the slot carries no value at all.
    pub fn resolve_slot_type(slot: &SlotContext<'_>) -> Option<Value> {
        let mut visited = AHashSet::new();
        Self::resolve_with(slot, &mut visited)
    }

    fn resolve_with(slot: &SlotContext<'_>, visited: &mut AHashSet<SlotRef>) -> Option<Value> {
        let value = slot.value()?;
        if !Self::is_wildcard(value) {
            return Some(value.clone());
        }

        if let Some(own) = slot.slot_ref() {
            visited.insert(own);
        }

        for edge in slot.edges() {
            let Some(other) = slot.other_slot_of_edge(edge) else {
                continue;
            };
            if other.slot_ref().is_some_and(|r| visited.contains(&r)) {
                continue;
            }
            if let Some(found) = Self::resolve_with(&other, visited) {
                return Some(found);
            }
        }

        let node = slot.node()?;
        let template = Self::template_name(value);
        for sibling in &node.slots {
            let same_template = sibling
                .value
                .as_ref()
                .is_some_and(|v| Self::is_wildcard(v) && Self::template_name(v) == template);
            if !same_template || visited.contains(&SlotRef::new(&node.id, &sibling.id)) {
                continue;
            }
            let sibling_context = slot.context().slot_in(node, sibling);
            if let Some(found) = Self::resolve_with(&sibling_context, visited) {
                return Some(found);
            }
        }

        None
    }

    fn unbound(slot: &SlotContext<'_>, resolved: &Option<Value>) -> bool {
        resolved.is_none() && slot.value().is_some_and(Self::is_wildcard)
    }
}

impl ValueType for WildcardType {
    fn id(&self) -> &str {
        WILDCARD_TYPE_ID
    }

    fn name(&self) -> &str {
        "Wildcard"
    }

    fn description(&self) -> &str {
        "Works for any value"
    }

    fn color(&self) -> &str {
        "pink"
    }

    fn splittable(&self) -> bool {
        true
    }

    fn is_compatible(&self, output: &SlotContext<'_>, input: &SlotContext<'_>) -> bool {
        self.is_expression_compatible(output, input)
    }

    fn is_expression_compatible(&self, output: &SlotContext<'_>, input: &SlotContext<'_>) -> bool {
        let output_value = Self::resolve_slot_type(output);
        let input_value = Self::resolve_slot_type(input);

        if Self::unbound(output, &output_value) || Self::unbound(input, &input_value) {
            return true;
        }

        output
            .context()
            .values_compatible(output_value.as_ref(), input_value.as_ref())
            .unwrap_or_else(|e| {
                log::error!("Wildcard compatibility check failed: {}", e);
                false
            })
    }

    fn name_by_context(&self, slot: &SlotContext<'_>) -> Option<String> {
        Some(match Self::resolve_slot_type(slot) {
            Some(value) => format!("Wildcard (Bound: {})", value.type_id),
            None => "Wildcard (Unbound)".to_string(),
        })
    }

    fn color_by_context(&self, slot: &SlotContext<'_>) -> Option<String> {
        let bound = Self::resolve_slot_type(slot)
            .and_then(|value| slot.context().value_types().get_shared(&value.type_id))
            .map(|ty| {
                ty.color_by_context(slot)
                    .unwrap_or_else(|| ty.color().to_string())
            });
        Some(bound.unwrap_or_else(|| "white".to_string()))
    }
}
