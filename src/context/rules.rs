use crate::accessor::path::parse_leading_int;
use crate::accessor::{Accessor, Lookup, substitute};
use crate::model::{Node, Placement, Slot, SlotKind, SlotRule};
use serde_json::Value as JsonValue;

/// Slot ids starting with this prefix belong to property slots and are
/// never touched by slot rules.
pub const PROPERTY_SLOT_PREFIX: &str = "property:";

/// Largest number of slots a single rule may generate.
pub const MAX_RULE_SLOTS: i64 = 1024;

/// Regenerates the dynamic input and output slots of `node` from its
/// `rules`. A rule whose count does not evaluate to an integer is logged
/// and leaves that direction untouched.
pub fn apply_node_rules(node: &mut Node) {
    let Some(rules) = node.rules.clone() else {
        return;
    };

    if let Some(rule) = &rules.inputs {
        apply_rule(node, rule, SlotKind::Input, Placement::Prepend);
    }
    if let Some(rule) = &rules.outputs {
        apply_rule(node, rule, SlotKind::Output, Placement::Append);
    }
}

fn apply_rule(node: &mut Node, rule: &SlotRule, kind: SlotKind, default_placement: Placement) {
    let raw = match Accessor::get_nodes([&*node], &rule.count) {
        Ok(lookup) => lookup,
        Err(e) => {
            log::error!("Cannot apply {} rule on '{}': {}", kind, node.id, e);
            return;
        }
    };

    let Some(count) = evaluate_count(&raw) else {
        log::error!(
            "Cannot apply {} rule: Expression '{}' is not a number, value was {:?}",
            kind,
            rule.count,
            raw
        );
        return;
    };
    if count > MAX_RULE_SLOTS {
        log::error!(
            "Cannot apply {} rule on '{}': {} slots exceeds the limit of {}",
            kind,
            node.id,
            count,
            MAX_RULE_SLOTS
        );
        return;
    }

    let generated: Vec<Slot> = (0..count.max(0))
        .map(|i| {
            let params = [("I", i.to_string()), ("N", (i + 1).to_string())];
            let mut slot = rule.template.clone();
            slot.id = substitute(&slot.id, &params);
            slot.label = substitute(&slot.label, &params);
            slot.kind = kind;
            slot.dynamic = true;
            slot
        })
        .collect();

    let kept: Vec<Slot> = node
        .slots
        .drain(..)
        .filter(|s| !is_rule_generated(s, kind))
        .collect();

    node.slots = match rule.placement.unwrap_or(default_placement) {
        Placement::Prepend => generated.into_iter().chain(kept).collect(),
        Placement::Append => kept.into_iter().chain(generated).collect(),
    };
}

fn is_rule_generated(slot: &Slot, kind: SlotKind) -> bool {
    slot.dynamic && slot.kind == kind && !slot.id.starts_with(PROPERTY_SLOT_PREFIX)
}

/// Integer parse of a rule count: numbers truncate, strings need leading
/// digits, anything else fails.
fn evaluate_count(lookup: &Lookup) -> Option<i64> {
    match lookup.value()? {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        JsonValue::String(s) => parse_leading_int(s),
        _ => None,
    }
}
