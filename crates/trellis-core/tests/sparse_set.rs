//! SparseSet generational handle tests.
//!
//! Widget handles are slots in this set, so these tests pin down the
//! liveness guarantees the attribute system relies on: a removed slot never
//! answers again, even after its position is reused.

use trellis_core::alloc::sparse_set::{IndexSlot, SparseSet};

#[test]
fn test_push_and_get() {
    let mut set = SparseSet::new();

    let idx = set.push(42);
    let idx2 = set.push(100);

    assert_eq!(*set.get(idx), 42);
    assert_eq!(*set.get(idx2), 100);
}

#[test]
fn test_get_mut() {
    let mut set = SparseSet::new();

    let idx = set.push(String::from("button"));
    set.get_mut(idx).push_str("-ok");

    assert_eq!(set.get(idx), "button-ok");
}

#[test]
fn test_try_get_invalid_returns_none() {
    let set = SparseSet::<i32>::new();
    assert_eq!(set.try_get(IndexSlot::new(0, 999)), None);
}

#[test]
#[should_panic(expected = "invalid generation")]
fn test_use_after_free_panics() {
    let mut set = SparseSet::new();

    let idx = set.push(42);
    set.remove(idx);

    let _ = set.get(idx);
}

#[test]
fn test_generation_increment() {
    let mut set = SparseSet::new();

    let idx1 = set.push(1);
    set.remove(idx1);

    let idx2 = set.push(2);
    assert_eq!(idx2.index(), idx1.index());
    assert_eq!(idx2.generation(), 1);

    assert!(!set.contains(idx1));
    assert!(set.contains(idx2));
}

#[test]
fn test_len_tracks_removals() {
    let mut set = SparseSet::new();

    set.push(1);
    let idx = set.push(2);
    set.push(3);
    assert_eq!(set.len(), 3);

    set.remove(idx);
    assert_eq!(set.len(), 2);

    set.clear();
    assert!(set.is_empty());
}

#[test]
fn test_clear_invalidates_handles() {
    let mut set = SparseSet::new();
    let idx = set.push(7);

    set.clear();
    let reused = set.push(8);

    assert_eq!(reused.index(), idx.index());
    assert_eq!(set.try_get(idx), None);
    assert_eq!(*set.get(reused), 8);
}

#[test]
fn test_iteration_with_removed_elements() {
    let mut set = SparseSet::new();

    set.push(10);
    let idx = set.push(20);
    set.push(30);
    set.remove(idx);

    let values: Vec<_> = set.iter().copied().collect();
    assert_eq!(values, vec![10, 30]);

    for value in set.iter_mut() {
        *value += 1;
    }
    let slots: Vec<_> = set.iter_slots().map(|(slot, v)| (slot.index(), *v)).collect();
    assert_eq!(slots, vec![(0, 11), (2, 31)]);
}

#[test]
fn test_index_slot_bits_distinguish_generations() {
    let a = IndexSlot::new(0, 5);
    let b = IndexSlot::new(1, 5);

    assert_ne!(a, b);
    assert_ne!(a.to_bits(), b.to_bits());
    assert_eq!(a.index(), b.index());
}
