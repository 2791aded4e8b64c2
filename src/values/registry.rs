use super::ValueType;
use ahash::{AHashMap, AHashSet};
use std::sync::Arc;

/// Value types by id, plus the transitive supertype closure of each.
///
/// Registering an id that already exists replaces the previous type. The
/// closure table is rebuilt on every registration so a type may name a
/// supertype that is registered later.
#[derive(Default, Clone)]
pub struct ValueTypeRegistry {
    types: AHashMap<String, Arc<dyn ValueType>>,
    order: Vec<String>,
    closure: AHashMap<String, AHashSet<String>>,
}

impl ValueTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, value_type: Arc<dyn ValueType>) {
        let id = value_type.id().to_string();
        if !self.types.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.types.insert(id, value_type);
        self.rebuild_closure();
    }

    pub fn get(&self, id: &str) -> Option<&dyn ValueType> {
        self.types.get(id).map(|t| t.as_ref())
    }

    pub fn get_shared(&self, id: &str) -> Option<Arc<dyn ValueType>> {
        self.types.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.types.contains_key(id)
    }

    /// All types in registration order.
    pub fn all(&self) -> impl Iterator<Item = &dyn ValueType> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.types.get(id))
            .map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Every id `id` may stand in for, itself included.
    pub fn compatible_as(&self, id: &str) -> Option<&AHashSet<String>> {
        self.closure.get(id)
    }

    /// A value of type `id` may be used where `target` is expected.
    pub fn is_compatible_as(&self, id: &str, target: &str) -> bool {
        id == target || self.closure.get(id).is_some_and(|set| set.contains(target))
    }

    fn rebuild_closure(&mut self) {
        let mut closure = AHashMap::with_capacity(self.types.len());
        for id in self.types.keys() {
            let mut reachable = AHashSet::new();
            let mut stack = vec![id.clone()];
            while let Some(current) = stack.pop() {
                if !reachable.insert(current.clone()) {
                    continue;
                }
                if let Some(ty) = self.types.get(&current) {
                    stack.extend(ty.supertypes());
                }
            }
            closure.insert(id.clone(), reachable);
        }
        self.closure = closure;
    }
}

impl std::fmt::Debug for ValueTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueTypeRegistry")
            .field("types", &self.order)
            .finish()
    }
}
