//! Generational slot storage.
//!
//! Every live value gets an [`IndexSlot`] that packs its position and the
//! generation of that position. Removing a value bumps the generation, so a
//! handle kept after removal can never observe the value that later reuses the
//! same position: `try_get` answers `None` instead of reading stale data.

use crate::profiling::profile_function;
use std::num::NonZeroU64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexSlot(NonZeroU64);

impl IndexSlot {
    pub fn new(generation: u32, idx: u32) -> Self {
        // The low half stores `idx + 1`, which keeps the packed value non-zero.
        let packed = ((generation as u64) << 32) | (idx as u64 + 1);
        match NonZeroU64::new(packed) {
            Some(raw) => Self(raw),
            None => unreachable!("packed slot is never zero"),
        }
    }

    pub fn generation(&self) -> u32 {
        (self.0.get() >> 32) as u32
    }

    pub fn index(&self) -> u32 {
        (self.0.get() & u32::MAX as u64) as u32 - 1
    }

    /// Raw packed representation, stable for the lifetime of the slot.
    pub fn to_bits(&self) -> u64 {
        self.0.get()
    }
}

struct Entry<T> {
    generation: u32,
    data: Option<T>,
}

pub struct SparseSet<T> {
    vec: Vec<Entry<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SparseSet<T> {
    pub const fn new() -> Self {
        Self {
            vec: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vec: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn push(&mut self, data: T) -> IndexSlot {
        profile_function!();
        self.len += 1;
        if let Some(idx) = self.free.pop() {
            let entry = &mut self.vec[idx as usize];
            entry.data = Some(data);
            IndexSlot::new(entry.generation, idx)
        } else {
            let idx = self.vec.len();
            self.vec.push(Entry {
                generation: 0,
                data: Some(data),
            });
            IndexSlot::new(0, idx as u32)
        }
    }

    /// Returns the value for `idx`.
    ///
    /// # Panics
    /// Panics if the slot was removed or never existed.
    pub fn get(&self, idx: IndexSlot) -> &T {
        match self.try_get(idx) {
            Some(data) => data,
            None => panic!("invalid generation, use after free!"),
        }
    }

    /// Mutable counterpart of [`SparseSet::get`].
    ///
    /// # Panics
    /// Panics if the slot was removed or never existed.
    pub fn get_mut(&mut self, idx: IndexSlot) -> &mut T {
        match self.try_get_mut(idx) {
            Some(data) => data,
            None => panic!("invalid generation, use after free!"),
        }
    }

    pub fn try_get(&self, idx: IndexSlot) -> Option<&T> {
        self.vec
            .get(idx.index() as usize)
            .filter(|entry| entry.generation == idx.generation())
            .and_then(|entry| entry.data.as_ref())
    }

    pub fn try_get_mut(&mut self, idx: IndexSlot) -> Option<&mut T> {
        self.vec
            .get_mut(idx.index() as usize)
            .filter(|entry| entry.generation == idx.generation())
            .and_then(|entry| entry.data.as_mut())
    }

    pub fn contains(&self, idx: IndexSlot) -> bool {
        self.try_get(idx).is_some()
    }

    /// Removes the value for `idx`.
    ///
    /// # Panics
    /// Panics if the slot was already removed.
    pub fn remove(&mut self, idx: IndexSlot) -> T {
        match self.try_remove(idx) {
            Some(data) => data,
            None => panic!("invalid generation, use after free!"),
        }
    }

    pub fn try_remove(&mut self, idx: IndexSlot) -> Option<T> {
        profile_function!();
        let index = idx.index();
        let entry = self.vec.get_mut(index as usize)?;
        if entry.generation != idx.generation() {
            return None;
        }
        let data = entry.data.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(index);
        self.len -= 1;
        Some(data)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        for (index, entry) in self.vec.iter_mut().enumerate() {
            if entry.data.take().is_some() {
                entry.generation = entry.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.vec.iter().filter_map(|entry| entry.data.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.vec.iter_mut().filter_map(|entry| entry.data.as_mut())
    }

    /// Iterate over live slots together with their values.
    pub fn iter_slots(&self) -> impl Iterator<Item = (IndexSlot, &T)> + '_ {
        self.vec.iter().enumerate().filter_map(|(index, entry)| {
            entry
                .data
                .as_ref()
                .map(|data| (IndexSlot::new(entry.generation, index as u32), data))
        })
    }
}

static_assertions::assert_eq_size!(IndexSlot, Option<IndexSlot>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_set_push() {
        let mut set = SparseSet::<u8>::new();
        let idx = set.push(15);
        assert_eq!(idx.generation(), 0);
        assert_eq!(idx.index(), 0);
        assert_eq!(*set.get(idx), 15);
    }

    #[test]
    #[should_panic]
    fn test_sparse_set_uaf() {
        let mut set = SparseSet::<u8>::new();
        let _ = set.push(15);
        // Create index slot with invalid generation
        let idx = IndexSlot::new(1, 0);
        let _ = set.get(idx);
    }

    #[test]
    fn test_sparse_set_remove() {
        let mut set = SparseSet::<u8>::new();
        let idx = set.push(15);
        set.remove(idx);
        let new_idx = set.push(45);
        assert_eq!(idx.index(), new_idx.index());
        assert_ne!(idx.generation(), new_idx.generation());
    }

    #[test]
    fn test_sparse_set_iter() {
        let mut set = SparseSet::<u8>::new();

        for i in 0..100 {
            set.push(i);
        }
        set.remove(IndexSlot::new(0, 0));
        set.remove(IndexSlot::new(0, 1));
        let iter_collected: Vec<_> = set.iter().collect();
        assert_eq!(iter_collected.len(), 98);
        for i in 2..100 {
            assert_eq!(iter_collected[i - 2], &(i as u8));
        }
    }

    #[test]
    fn test_try_remove_twice() {
        let mut set = SparseSet::<u8>::new();
        let idx = set.push(1);
        assert_eq!(set.try_remove(idx), Some(1));
        assert_eq!(set.try_remove(idx), None);
        assert!(set.is_empty());
    }
}
