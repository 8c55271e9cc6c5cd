use pretty_assertions::assert_eq;
use proptest::prelude::*;
use seatdesk::IndexedMinHeap;

fn drain(mut heap: IndexedMinHeap<u32>) -> Vec<u32> {
    let mut out = Vec::with_capacity(heap.len());
    while let Ok(value) = heap.extract_min() {
        out.push(value);
    }
    out
}

#[test]
fn capacity_three_rejects_the_fourth_insert() {
    let mut heap = IndexedMinHeap::with_capacity(3);
    assert!(heap.insert(5));
    assert!(heap.insert(2));
    assert!(heap.insert(9));
    assert!(!heap.insert(1));

    assert_eq!(heap.peek(), Some(&2));
    assert_eq!(drain(heap), [2, 5, 9]);
}

#[test]
fn removing_an_element_preserves_drain_order() {
    let mut heap = IndexedMinHeap::with_capacity(10);
    for value in [10, 20, 30, 5] {
        assert!(heap.insert(value));
    }
    assert_eq!(heap.remove_element(&20), Some(20));
    assert_eq!(drain(heap), [5, 10, 30]);
}

#[test]
fn remove_miss_leaves_the_heap_alone() {
    let mut heap = IndexedMinHeap::with_capacity(4);
    heap.insert(3);
    heap.insert(1);
    assert_eq!(heap.remove_element(&2), None);
    assert_eq!(heap.len(), 2);
    assert_eq!(drain(heap), [1, 3]);
}

#[test]
fn element_and_index_finds_the_first_match() {
    let mut heap = IndexedMinHeap::with_capacity(8);
    for value in [4, 8, 6] {
        heap.insert(value);
    }
    let (index, &value) = heap.element_and_index(&8).expect("8 was inserted");
    assert_eq!(value, 8);
    assert!(index < heap.len());
    assert_eq!(heap.element_and_index(&5), None);
}

proptest! {
    /// `len()` tracks successful inserts; overflowing inserts return false
    /// and leave both `peek()` and `len()` unchanged.
    #[test]
    fn size_tracks_successful_inserts(
        values in prop::collection::vec(any::<u32>(), 1..64),
        overflow in prop::collection::vec(any::<u32>(), 1..8),
    ) {
        let mut heap = IndexedMinHeap::with_capacity(values.len());
        for &value in &values {
            prop_assert!(heap.insert(value));
        }
        prop_assert_eq!(heap.len(), values.len());

        let min = heap.peek().copied();
        for value in overflow {
            prop_assert!(!heap.insert(value));
            prop_assert_eq!(heap.len(), values.len());
            prop_assert_eq!(heap.peek().copied(), min);
        }
    }

    /// Draining always yields the sorted multiset of everything inserted.
    #[test]
    fn drain_equals_sorted_input(values in prop::collection::vec(any::<u32>(), 0..128)) {
        let mut heap = IndexedMinHeap::with_capacity(values.len());
        for &value in &values {
            heap.insert(value);
        }

        let mut expected = values;
        expected.sort_unstable();
        prop_assert_eq!(drain(heap), expected);
    }

    /// Interleaved removals keep the remaining drain order sorted.
    #[test]
    fn removals_then_drain_stay_sorted(
        values in prop::collection::vec(0u32..32, 1..48),
        removals in prop::collection::vec(0u32..32, 1..8),
    ) {
        let mut heap = IndexedMinHeap::with_capacity(values.len());
        let mut model = values.clone();
        for &value in &values {
            heap.insert(value);
        }

        for target in removals {
            let expected = model.iter().position(|&v| v == target);
            match heap.remove_element(&target) {
                Some(removed) => {
                    prop_assert_eq!(removed, target);
                    model.swap_remove(expected.expect("heap and model agree"));
                }
                None => prop_assert_eq!(expected, None),
            }
        }

        model.sort_unstable();
        prop_assert_eq!(drain(heap), model);
    }
}
