//! A generational slot table mapping small integers to host pointers (`spec.md` §3,
//! "IndexLookup"), used to route sandbox-to-host callbacks without ever handing the sandbox a
//! raw host address: the sandbox-side host proxy stores an index in its `host_data` field, and
//! every callback resolves that index back through this table.
//!
//! Indices are reused only after an explicit [`IndexLookup::release`]; resolving a released (or
//! never-allocated) index yields `None`, never a dangling pointer, matching the concurrent
//! readers / single writer access pattern of `spec.md` §5.

use std::sync::RwLock;

struct Slot<T> {
    value: Option<T>,
    generation: u32,
}

/// A handle into an [`IndexLookup`] table. Carries the slot's generation so a resolve against a
/// released-then-reused slot cannot accidentally match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexHandle {
    slot: u32,
    generation: u32,
}

impl IndexHandle {
    /// The raw slot index, as written into the sandbox-side host proxy's `host_data` field.
    pub fn as_raw(&self) -> u32 {
        self.slot
    }
}

/// The Bridge's table of live `Plugin`/host proxies, indexed by small integer.
pub struct IndexLookup<T> {
    slots: RwLock<Vec<Slot<T>>>,
}

impl<T> Default for IndexLookup<T> {
    fn default() -> Self {
        Self { slots: RwLock::new(Vec::new()) }
    }
}

impl<T> IndexLookup<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new slot for `value`, reusing a released slot if one is available.
    pub fn retain(&self, value: T) -> IndexHandle {
        let mut slots = self.slots.write().unwrap();
        for (i, slot) in slots.iter_mut().enumerate() {
            if slot.value.is_none() {
                slot.value = Some(value);
                return IndexHandle { slot: i as u32, generation: slot.generation };
            }
        }
        slots.push(Slot { value: Some(value), generation: 0 });
        IndexHandle { slot: (slots.len() - 1) as u32, generation: 0 }
    }

    /// Releases a slot, bumping its generation so any stale [`IndexHandle`] can no longer
    /// resolve, and making the slot eligible for reuse by a future [`IndexLookup::retain`].
    pub fn release(&self, handle: IndexHandle) {
        let mut slots = self.slots.write().unwrap();
        if let Some(slot) = slots.get_mut(handle.slot as usize) {
            if slot.generation == handle.generation {
                slot.value = None;
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
    }
}

impl<T: Clone> IndexLookup<T> {
    /// Resolves a raw sandbox-supplied index to an owned copy of the stored value, or `None` if
    /// the slot is empty (released or never allocated).
    pub fn get_raw(&self, raw: u32) -> Option<T> {
        let slots = self.slots.read().unwrap();
        slots.get(raw as usize)?.value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retain_then_release_then_reuse_bumps_generation() {
        let table: IndexLookup<u64> = IndexLookup::new();
        let a = table.retain(1);
        assert_eq!(table.get_raw(a.as_raw()), Some(1));
        table.release(a);
        assert_eq!(table.get_raw(a.as_raw()), None);

        let b = table.retain(2);
        assert_eq!(b.as_raw(), a.as_raw());
        assert_ne!(b.generation, a.generation);
        assert_eq!(table.get_raw(b.as_raw()), Some(2));
    }

    #[test]
    fn resolving_an_unallocated_index_yields_none() {
        let table: IndexLookup<u64> = IndexLookup::new();
        assert_eq!(table.get_raw(42), None);
    }
}
