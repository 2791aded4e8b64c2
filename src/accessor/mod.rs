//! Path-based reads and writes over one or many JSON objects at once.
//!
//! Two path flavors are understood:
//!
//! - **JSONPath** (`$.data.label`, `$..name`): evaluated per object; each
//!   object may match at most once on `get`.
//! - **Dotted** (`data.flags&2`, `tags|,`, `config$`): walks object keys,
//!   creating missing containers on `set`. The last segment may carry the
//!   modifiers described in `path::FieldSelector`.
//!
//! Reading many objects aggregates: when every object agrees the value is
//! returned, otherwise the result is [`Lookup::Missing`], or
//! [`Lookup::MultipleValues`] when the path ends with `?`.

pub mod jsonpath;
pub(crate) mod path;
pub mod template;

pub use jsonpath::JsonPath;
pub use template::{render, substitute};

use crate::error::{AccessorError, GraphError};
use crate::model::Node;
use itertools::Itertools;
use path::{FieldSelector, display_string, is_index, is_truthy, json_to_int};
use serde_json::{Map, Value as JsonValue};

/// Marker for "unset". Reading it falls back to the object's `defaults`;
/// writing it to a dotted path deletes the field.
pub const UNSET: &str = "∅";

/// Result of an accessor read.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(JsonValue),
    /// The objects disagree and the caller asked to see that (`?` suffix).
    MultipleValues,
    Missing,
}

impl Lookup {
    pub fn value(&self) -> Option<&JsonValue> {
        match self {
            Lookup::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<JsonValue> {
        match self {
            Lookup::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Lookup::Missing)
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, Lookup::MultipleValues)
    }
}

impl From<JsonValue> for Lookup {
    fn from(value: JsonValue) -> Self {
        Lookup::Found(value)
    }
}

impl From<Option<JsonValue>> for Lookup {
    fn from(value: Option<JsonValue>) -> Self {
        value.map_or(Lookup::Missing, Lookup::Found)
    }
}

/// Stateless get/set entry points.
pub struct Accessor;

impl Accessor {
    pub fn get(objects: &[JsonValue], path: &str) -> Lookup {
        let objects: Vec<&JsonValue> = objects.iter().filter(|o| !o.is_null()).collect();
        if path.starts_with('$') {
            Self::get_json_path(&objects, path)
        } else {
            Self::get_dotted(objects, path)
        }
    }

    /// Writes `value` into every object. Returns whether anything changed.
    ///
    /// `Missing` and `MultipleValues` are never written.
    pub fn set(objects: &mut [JsonValue], path: &str, value: impl Into<Lookup>) -> bool {
        let value = match value.into() {
            Lookup::Found(v) => v,
            other => {
                log::error!("Refusing to set '{}' to {:?}", path, other);
                return false;
            }
        };

        if path.starts_with('$') {
            Self::set_json_path(objects, path, &value)
        } else {
            let targets: Vec<&mut JsonValue> = objects.iter_mut().collect();
            Self::set_dotted(targets, path, &value).unwrap_or(false)
        }
    }

    /// [`Accessor::get`] over typed nodes.
    pub fn get_nodes<'a>(
        nodes: impl IntoIterator<Item = &'a Node>,
        path: &str,
    ) -> Result<Lookup, GraphError> {
        let objects = nodes
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::get(&objects, path))
    }

    /// [`Accessor::set`] over typed nodes. A write that leaves a node in a
    /// shape that no longer deserializes is rejected and nothing is applied.
    pub fn set_nodes<'a>(
        nodes: impl IntoIterator<Item = &'a mut Node>,
        path: &str,
        value: impl Into<Lookup>,
    ) -> Result<bool, GraphError> {
        let mut nodes: Vec<&mut Node> = nodes.into_iter().collect();
        let mut objects = nodes
            .iter()
            .map(|n| serde_json::to_value(&**n))
            .collect::<Result<Vec<_>, _>>()?;

        if !Self::set(&mut objects, path, value) {
            return Ok(false);
        }

        let updated = objects
            .into_iter()
            .map(serde_json::from_value::<Node>)
            .collect::<Result<Vec<_>, _>>()?;
        for (node, new) in nodes.iter_mut().zip(updated) {
            **node = new;
        }
        Ok(true)
    }

    fn get_json_path(objects: &[&JsonValue], path: &str) -> Lookup {
        let (query, reveal_multiple) = match path.strip_suffix('?') {
            Some(q) => (q, true),
            None => (path, false),
        };
        let json_path = match JsonPath::parse(query) {
            Ok(p) => p,
            Err(e) => {
                log::error!("{}", e);
                return Lookup::Missing;
            }
        };

        let mut distinct: Vec<Option<JsonValue>> = Vec::new();
        for object in objects {
            let matches = json_path.query(object);
            if matches.len() > 1 {
                log::error!("{}", AccessorError::AmbiguousMatch(query.to_string()));
                return Lookup::Missing;
            }

            let mut value = matches.first().map(|v| (*v).clone());
            if value.as_ref().and_then(JsonValue::as_str) == Some(UNSET) {
                if let Some(defaults) = object.get("defaults").and_then(JsonValue::as_object) {
                    value = Self::resolve_default(object, defaults, query);
                }
            }

            if !distinct.contains(&value) {
                distinct.push(value);
            }
        }

        match distinct.len() {
            0 => Lookup::Missing,
            1 => distinct.pop().flatten().into(),
            _ if reveal_multiple => Lookup::MultipleValues,
            _ => Lookup::Missing,
        }
    }

    /// Applies the object's `defaults` to a copy and reads `query` from it.
    /// String defaults are rendered as templates against the original object.
    fn resolve_default(
        object: &JsonValue,
        defaults: &Map<String, JsonValue>,
        query: &str,
    ) -> Option<JsonValue> {
        let mut filled = object.clone();
        if let Some(map) = filled.as_object_mut() {
            map.remove("defaults");
        }
        for (key, value) in defaults {
            Self::set(std::slice::from_mut(&mut filled), key, value.clone());
        }

        let default = Self::get(std::slice::from_ref(&filled), query).into_value()?;
        if !is_truthy(&default) || default.as_str() == Some(UNSET) {
            return None;
        }
        match default {
            JsonValue::String(text) => Some(JsonValue::String(render(object, &text))),
            other => Some(other),
        }
    }

    fn set_json_path(objects: &mut [JsonValue], path: &str, value: &JsonValue) -> bool {
        let json_path = match JsonPath::parse(path) {
            Ok(p) => p,
            Err(e) => {
                log::error!("{}", e);
                return false;
            }
        };

        let mut found = false;
        let mut changed = false;
        for object in objects.iter_mut() {
            for pointer in json_path.pointers(object) {
                if let Some(target) = object.pointer_mut(&pointer) {
                    found = true;
                    if *target != *value {
                        *target = value.clone();
                        changed = true;
                    }
                }
            }
        }

        if !found {
            log::error!(
                "Failed to set '{}' on {} object(s): no matches",
                path,
                objects.len()
            );
        }
        changed
    }

    fn get_dotted(objects: Vec<&JsonValue>, path: &str) -> Lookup {
        if let Some((first, rest)) = path.split_once('.') {
            let children = objects
                .into_iter()
                .filter_map(|o| child(o, first))
                .filter(|c| !c.is_null())
                .collect();
            return Self::get_dotted(children, rest);
        }

        let selector = FieldSelector::parse(path);
        let values: Vec<Option<&JsonValue>> = objects.iter().map(|o| child(o, selector.key)).collect();
        let Some(first) = values.first().copied() else {
            return Lookup::Missing;
        };

        if values.iter().any(|v| *v != first) {
            return if selector.reveal_multiple {
                Lookup::MultipleValues
            } else {
                Lookup::Missing
            };
        }

        if let Some(bit) = selector.bit {
            let Some(mask) = bit_mask(bit) else {
                return Lookup::Missing;
            };
            let current = first.and_then(json_to_int).unwrap_or(0);
            return Lookup::Found(JsonValue::Bool(current & mask != 0));
        }

        if let (Some(JsonValue::String(text)), Some(sep)) = (first, selector.separator) {
            let parts = text
                .split(sep)
                .map(|p| JsonValue::String(p.to_string()))
                .collect();
            return Lookup::Found(JsonValue::Array(parts));
        }

        if selector.embedded_json {
            return match first.map(serde_json::to_string_pretty) {
                Some(Ok(text)) => Lookup::Found(JsonValue::String(text)),
                _ => Lookup::Missing,
            };
        }

        first.cloned().into()
    }

    /// `None` aborts the whole write (embedded JSON failed to parse).
    fn set_dotted(objects: Vec<&mut JsonValue>, path: &str, value: &JsonValue) -> Option<bool> {
        if let Some((first, rest)) = path.split_once('.') {
            let next = rest.split('.').next().unwrap_or(rest);
            let array_next = is_index(next);
            let children = objects
                .into_iter()
                .filter_map(|o| child_or_insert(o, first, array_next))
                .filter(|c| !c.is_null())
                .collect();
            return Self::set_dotted(children, rest, value);
        }

        let selector = FieldSelector::parse(path);
        let mut changed = false;

        for object in objects {
            let existing = child(object, selector.key).cloned();
            let mut new_value = value.clone();

            if let (Some(sep), JsonValue::Array(items)) = (selector.separator, value) {
                new_value = JsonValue::String(items.iter().map(display_string).join(sep));
            }

            if let Some(bit) = selector.bit {
                let Some(mask) = bit_mask(bit) else {
                    log::error!("Bit {} of '{}' is out of range", bit, selector.key);
                    continue;
                };
                let current = existing.as_ref().and_then(json_to_int).unwrap_or(0);
                let bits = if is_truthy(&new_value) {
                    current | mask
                } else {
                    current & !mask
                };
                new_value = JsonValue::from(bits);
            }

            if selector.embedded_json {
                if let JsonValue::String(text) = &new_value {
                    match serde_json::from_str(text) {
                        Ok(parsed) => new_value = parsed,
                        Err(e) => {
                            log::error!("Invalid JSON for '{}': {}", selector.key, e);
                            return None;
                        }
                    }
                }
            }

            if new_value.as_str() == Some(UNSET) {
                changed |= remove_child(object, selector.key);
            } else if existing.as_ref() != Some(&new_value) {
                changed |= insert_child(object, selector.key, new_value);
            }
        }

        Some(changed)
    }
}

/// Highest bit a `&N` modifier may address in a signed 64-bit field.
const MAX_FLAG_BIT: u32 = 62;

/// Furthest an array write may reach past the current end.
const MAX_ARRAY_GAP: usize = 1024;

fn bit_mask(bit: u32) -> Option<i64> {
    (bit <= MAX_FLAG_BIT).then(|| 1i64 << bit)
}

/// Pads `items` with nulls so `index` is addressable. Refuses indices
/// more than [`MAX_ARRAY_GAP`] past the end.
fn grow_to(items: &mut Vec<JsonValue>, index: usize) -> bool {
    match index.checked_add(1) {
        Some(len) if index <= items.len().saturating_add(MAX_ARRAY_GAP) => {
            items.resize(len, JsonValue::Null);
            true
        }
        _ => {
            log::error!(
                "Array index {} is too far past the end (length {})",
                index,
                items.len()
            );
            false
        }
    }
}

fn child<'a>(object: &'a JsonValue, key: &str) -> Option<&'a JsonValue> {
    match object {
        JsonValue::Object(map) => map.get(key),
        JsonValue::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn container(array: bool) -> JsonValue {
    if array {
        JsonValue::Array(Vec::new())
    } else {
        JsonValue::Object(Map::new())
    }
}

fn child_or_insert<'a>(object: &'a mut JsonValue, key: &str, array_next: bool) -> Option<&'a mut JsonValue> {
    match object {
        JsonValue::Object(map) => Some(
            map.entry(key.to_string())
                .or_insert_with(|| container(array_next)),
        ),
        JsonValue::Array(items) if is_index(key) => {
            let index: usize = key.parse().ok()?;
            if index >= items.len() {
                if !grow_to(items, index) {
                    return None;
                }
                items[index] = container(array_next);
            }
            items.get_mut(index)
        }
        _ => None,
    }
}

fn insert_child(object: &mut JsonValue, key: &str, value: JsonValue) -> bool {
    match object {
        JsonValue::Object(map) => {
            map.insert(key.to_string(), value);
            true
        }
        JsonValue::Array(items) if is_index(key) => match key.parse::<usize>() {
            Ok(index) => {
                if index >= items.len() && !grow_to(items, index) {
                    return false;
                }
                items[index] = value;
                true
            }
            Err(_) => false,
        },
        _ => false,
    }
}

fn remove_child(object: &mut JsonValue, key: &str) -> bool {
    match object {
        JsonValue::Object(map) => map.remove(key).is_some(),
        _ => false,
    }
}
