//! Per-connection map of live entity ids to their 1.14 kind.

use std::collections::HashMap;

use crate::entity::EntityKind;

#[derive(Debug, Default)]
pub struct EntityTracker {
    entities: HashMap<i32, EntityKind>,
}

impl EntityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns the kind previously held by `id`.
    pub fn track(&mut self, id: i32, kind: EntityKind) -> Option<EntityKind> {
        self.entities.insert(id, kind)
    }

    pub fn untrack(&mut self, id: i32) -> Option<EntityKind> {
        self.entities.remove(&id)
    }

    /// `None` means unknown: callers skip kind-specific handling.
    pub fn kind_of(&self, id: i32) -> Option<EntityKind> {
        self.entities.get(&id).copied()
    }

    pub fn is_tracked(&self, id: i32) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
