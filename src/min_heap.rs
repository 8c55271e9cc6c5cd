//! Fixed-capacity binary min-heap with arbitrary-element removal and
//! in-place update.

use alloc::vec::Vec;

use thiserror::Error;

/// Error returned by [`IndexedMinHeap::extract_min`] on an empty heap.
///
/// An empty extract is a caller-contract violation — callers are expected to
/// check [`is_empty`](IndexedMinHeap::is_empty) first — so unlike the scan
/// misses it is a hard error rather than an absent result.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("cannot extract the minimum of an empty heap")]
pub struct EmptyHeap;

/// An array-backed min-heap with a capacity fixed at construction.
///
/// Beyond the usual `insert`/`peek`/`extract_min`, the heap supports removal
/// of an arbitrary element and in-place replacement of the element at a
/// known slot. Both are linear scans followed by an O(log n) re-sift — an
/// accepted cost for the small bounded collections this heap serves; do not
/// reach for it where an O(log n) removal index is required.
///
/// Capacity overflow is a signaled condition, not an error: `insert` returns
/// `false` and leaves the heap untouched.
///
/// # Examples
///
/// ```
/// use seatdesk::IndexedMinHeap;
///
/// let mut seats: IndexedMinHeap<u32> = IndexedMinHeap::with_capacity(3);
/// assert!(seats.insert(5));
/// assert!(seats.insert(2));
/// assert!(seats.insert(9));
/// assert!(!seats.insert(1)); // full: rejected, nothing changed
///
/// assert_eq!(seats.peek(), Some(&2));
/// assert_eq!(seats.extract_min(), Ok(2));
/// ```
#[derive(Clone, Debug)]
pub struct IndexedMinHeap<T> {
    slots: Vec<T>,
    capacity: usize,
}

impl<T: Ord> IndexedMinHeap<T> {
    /// Creates an empty heap that will hold at most `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of elements currently in the heap.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the heap holds no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Maximum number of elements, fixed at construction.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the minimum element without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.slots.first()
    }

    /// Inserts `value`, keeping the heap ordered.
    ///
    /// Returns `false` — with no mutation — if the heap is at capacity.
    pub fn insert(&mut self, value: T) -> bool {
        if self.slots.len() == self.capacity {
            return false;
        }
        self.slots.push(value);
        self.sift_up(self.slots.len() - 1);
        true
    }

    /// Removes and returns the minimum element.
    ///
    /// # Errors
    ///
    /// [`EmptyHeap`] if the heap is empty.
    pub fn extract_min(&mut self) -> Result<T, EmptyHeap> {
        if self.slots.is_empty() {
            return Err(EmptyHeap);
        }
        let min = self.slots.swap_remove(0);
        if !self.slots.is_empty() {
            self.sift_down(0);
        }
        Ok(min)
    }

    /// Removes the first element equal to `target`.
    ///
    /// Returns the removed element, or `None` if nothing matched.
    pub fn remove_element(&mut self, target: &T) -> Option<T> {
        self.remove_element_by(|element| element == target)
    }

    /// Removes the first element matching `matches`.
    ///
    /// Linear scan; a match in the last slot truncates, any other match is
    /// replaced by the current last element and the slot re-sifts in the
    /// direction its new parent dictates.
    pub fn remove_element_by<F>(&mut self, mut matches: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        let index = self.slots.iter().position(|element| matches(element))?;
        let removed = self.slots.swap_remove(index);
        if index < self.slots.len() {
            self.resift(index);
        }
        Some(removed)
    }

    /// Returns the slot index and a reference to the first element equal to
    /// `target`.
    #[must_use]
    pub fn element_and_index(&self, target: &T) -> Option<(usize, &T)> {
        self.element_and_index_by(|element| element == target)
    }

    /// Returns the slot index and a reference to the first element matching
    /// `matches`.
    pub fn element_and_index_by<F>(&self, mut matches: F) -> Option<(usize, &T)>
    where
        F: FnMut(&T) -> bool,
    {
        self.slots
            .iter()
            .enumerate()
            .find(|&(_, element)| matches(element))
    }

    /// Replaces the element at `index` with `value` and re-sifts it.
    ///
    /// A silent no-op when `index` is outside the current length.
    pub fn update_element(&mut self, index: usize, value: T) {
        if index >= self.slots.len() {
            return;
        }
        self.slots[index] = value;
        self.resift(index);
    }

    /// Re-sifts a freshly overwritten slot: down when the new element is
    /// greater than its parent (order above is intact), up otherwise. The
    /// root has nothing above it and always sifts down.
    fn resift(&mut self, index: usize) {
        if index == 0 || self.slots[index] > self.slots[(index - 1) / 2] {
            self.sift_down(index);
        } else {
            self.sift_up(index);
        }
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.slots[parent] <= self.slots[index] {
                break;
            }
            self.slots.swap(parent, index);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        loop {
            // Child bounds are strict: an index equal to `len` is past the
            // logical end and must never be read.
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            if left < self.slots.len() && self.slots[left] < self.slots[smallest] {
                smallest = left;
            }
            if right < self.slots.len() && self.slots[right] < self.slots[smallest] {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.slots.swap(index, smallest);
            index = smallest;
        }
    }
}
