//! Dense per-category entity storage
//!
//! Entities live in a contiguous `Vec` for cache-friendly iteration. Each
//! store hands out its own monotonically increasing ids, so an id stays a
//! stable handle even after the entity moves slot through a swap-remove.

/// Stable handle for an entity within its store
pub type EntityId = u32;

/// Homogeneous entity collection with O(1) removal
#[derive(Debug, Clone)]
pub struct Store<T> {
    items: Vec<T>,
    next_id: EntityId,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Store<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a new entity built from a freshly allocated id
    pub fn spawn(&mut self, make: impl FnOnce(EntityId) -> T) -> EntityId {
        let id = self.allocate_id();
        self.items.push(make(id));
        id
    }

    /// Overwrite the entity in `index` with a new one (new id, same slot)
    pub fn respawn_at(
        &mut self,
        index: usize,
        make: impl FnOnce(EntityId) -> T,
    ) -> Option<EntityId> {
        if index >= self.items.len() {
            return None;
        }
        let id = self.allocate_id();
        self.items[index] = make(id);
        Some(id)
    }

    /// Remove by slot, moving the last entity into the hole
    pub fn swap_remove(&mut self, index: usize) -> T {
        self.items.swap_remove(index)
    }

    /// Keep only entities for which `keep` returns true (order preserved)
    pub fn retain_mut(&mut self, keep: impl FnMut(&mut T) -> bool) {
        self.items.retain_mut(keep);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a Store<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Store<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_stable_across_swap_remove() {
        let mut store: Store<(EntityId, &str)> = Store::new();
        let a = store.spawn(|id| (id, "a"));
        let b = store.spawn(|id| (id, "b"));
        let c = store.spawn(|id| (id, "c"));
        assert_eq!((a, b, c), (1, 2, 3));

        let removed = store.swap_remove(0);
        assert_eq!(removed.0, a);
        // Last entity moved into slot 0, keeps its id
        assert_eq!(store.get(0).map(|e| e.0), Some(c));
        assert_eq!(store.len(), 2);

        // Ids are never reused
        let d = store.spawn(|id| (id, "d"));
        assert_eq!(d, 4);
    }

    #[test]
    fn test_respawn_at_reuses_slot() {
        let mut store: Store<EntityId> = Store::new();
        store.spawn(|id| id);
        store.spawn(|id| id);
        let id = store.respawn_at(0, |id| id);
        assert_eq!(id, Some(3));
        assert_eq!(store.as_slice(), &[3, 2]);
        assert_eq!(store.respawn_at(5, |id| id), None);
        // Failed respawn does not burn an id
        assert_eq!(store.spawn(|id| id), 4);
    }
}
