//! Dense entity storage
//!
//! Entities live contiguously in a `Vec` and are removed with swap-and-pop.
//! Ids come from a per-arena monotonic counter and are never reused, even
//! across `clear`. An id -> slot index keeps lookups O(1); entities must not
//! change their id after spawn.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Entity identifier, unique within one arena for the lifetime of the arena
pub type EntityId = u32;

/// Anything stored in an [`Arena`] carries its own id
pub trait Keyed {
    fn id(&self) -> EntityId;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena<T> {
    items: Vec<T>,
    /// Slot of every live id in `items`
    index: HashMap<EntityId, usize>,
    next_id: EntityId,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T: Keyed> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id and store the entity built from it
    pub fn spawn(&mut self, build: impl FnOnce(EntityId) -> T) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        let item = build(id);
        debug_assert_eq!(item.id(), id);
        self.index.insert(id, self.items.len());
        self.items.push(item);
        id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.index.get(&id).map(|&slot| &self.items[slot])
    }

    /// Remove every entity. The id counter keeps running.
    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }

    /// Visit every entity once and swap-remove those for which `remove`
    /// returns true, handing each removed entity to `on_removed`.
    ///
    /// Walks from the back so the element swapped into a freed slot has
    /// already been visited. Visiting order is therefore stable for a given
    /// arena content.
    pub fn sweep(
        &mut self,
        mut remove: impl FnMut(&mut T) -> bool,
        mut on_removed: impl FnMut(T),
    ) {
        let mut i = self.items.len();
        while i > 0 {
            i -= 1;
            if remove(&mut self.items[i]) {
                let removed = self.items.swap_remove(i);
                self.index.remove(&removed.id());
                if let Some(moved) = self.items.get(i) {
                    self.index.insert(moved.id(), i);
                }
                on_removed(removed);
            }
        }
    }
}

impl<'a, T: Keyed> IntoIterator for &'a Arena<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
