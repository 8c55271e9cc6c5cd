use core::cmp::Ordering;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, TreeNode};

/// The red-black tree core backing `OrderedMap`.
///
/// Nodes live in an [`Arena`] and link to each other by [`Handle`], so the
/// parent back-references required by the fixup passes never alias an owning
/// reference. Four invariants hold before and after every public operation:
/// BST key order, no red node with a red child, uniform black-height on every
/// root-to-leaf path, and a black root.
pub(crate) struct RawOrderedMap {
    nodes: Arena<TreeNode>,
    root: Option<Handle>,
    len: usize,
}

impl RawOrderedMap {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops the whole node set at once; no per-node unlink walk is needed
    /// because the arena owns every node.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    pub(crate) fn get(&self, key: u32) -> Option<u32> {
        self.find(key).map(|handle| self.nodes.get(handle).value)
    }

    pub(crate) fn contains_key(&self, key: u32) -> bool {
        self.find(key).is_some()
    }

    /// Iterative BST descent.
    fn find(&self, key: u32) -> Option<Handle> {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Inserts or updates. An existing key has its value replaced in place
    /// (no structural change, no size change) and the old value is returned;
    /// a new key enters as a red leaf followed by the insertion fixup.
    pub(crate) fn insert(&mut self, key: u32, value: u32) -> Option<u32> {
        let mut parent = None;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            parent = Some(handle);
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => {
                    let node = self.nodes.get_mut(handle);
                    return Some(core::mem::replace(&mut node.value, value));
                }
            };
        }

        let mut node = TreeNode::new(key, value);
        node.parent = parent;
        let handle = self.nodes.alloc(node);

        match parent {
            None => self.root = Some(handle),
            Some(p) => {
                let parent_node = self.nodes.get_mut(p);
                if key < parent_node.key {
                    parent_node.left = Some(handle);
                } else {
                    parent_node.right = Some(handle);
                }
            }
        }

        self.len += 1;
        self.fix_insert(handle);
        None
    }

    /// Removes a key, returning its value. A two-child node swaps payload
    /// with its in-order predecessor (right-most node of the left subtree)
    /// so that the physically spliced node always has at most one child.
    pub(crate) fn remove(&mut self, key: u32) -> Option<u32> {
        let mut target = self.find(key)?;
        let removed_value = self.nodes.get(target).value;

        if self.left(target).is_some() && self.right(target).is_some() {
            let mut pred = self.left(target).expect("two-child node has a left subtree");
            while let Some(right) = self.right(pred) {
                pred = right;
            }
            let (pred_key, pred_value) = {
                let node = self.nodes.get(pred);
                (node.key, node.value)
            };
            let node = self.nodes.get_mut(target);
            node.key = pred_key;
            node.value = pred_value;
            target = pred;
        }

        let child = self.left(target).or(self.right(target));
        let parent = self.parent(target);
        let removed_color = self.nodes.get(target).color;

        self.transplant(target, parent, child);
        self.nodes.take(target);
        self.len -= 1;

        // Splicing out a red node never disturbs black-heights.
        if removed_color == Color::Black {
            self.fix_remove(child, parent);
        }
        Some(removed_value)
    }

    /// Ascending in-order traversal over `(key, value)` pairs.
    pub(crate) fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            nodes: &self.nodes,
            stack: SmallVec::new(),
            remaining: self.len,
        };
        iter.push_left_spine(self.root);
        iter
    }

    // ─── Link helpers ───────────────────────────────────────────────────────

    #[inline]
    fn left(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).left
    }

    #[inline]
    fn right(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).right
    }

    #[inline]
    fn parent(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).parent
    }

    /// An absent node reads as black.
    #[inline]
    fn color(&self, node: Option<Handle>) -> Color {
        node.map_or(Color::Black, |handle| self.nodes.get(handle).color)
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        self.nodes.get_mut(handle).color = color;
    }

    /// Replaces `node` with `child` in `parent` (or at the root) and rewires
    /// the child's back-link.
    fn transplant(&mut self, node: Handle, parent: Option<Handle>, child: Option<Handle>) {
        match parent {
            None => self.root = child,
            Some(p) => {
                let parent_node = self.nodes.get_mut(p);
                if parent_node.left == Some(node) {
                    parent_node.left = child;
                } else {
                    parent_node.right = child;
                }
            }
        }
        if let Some(c) = child {
            self.nodes.get_mut(c).parent = parent;
        }
    }

    // ─── Rotations ──────────────────────────────────────────────────────────

    fn rotate_left(&mut self, handle: Handle) {
        let pivot = self.right(handle).expect("`rotate_left()` requires a right child");
        let inner = self.left(pivot);

        self.nodes.get_mut(handle).right = inner;
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).parent = Some(handle);
        }

        let parent = self.parent(handle);
        self.nodes.get_mut(pivot).parent = parent;
        match parent {
            None => self.root = Some(pivot),
            Some(p) => {
                let parent_node = self.nodes.get_mut(p);
                if parent_node.left == Some(handle) {
                    parent_node.left = Some(pivot);
                } else {
                    parent_node.right = Some(pivot);
                }
            }
        }

        self.nodes.get_mut(pivot).left = Some(handle);
        self.nodes.get_mut(handle).parent = Some(pivot);
    }

    fn rotate_right(&mut self, handle: Handle) {
        let pivot = self.left(handle).expect("`rotate_right()` requires a left child");
        let inner = self.right(pivot);

        self.nodes.get_mut(handle).left = inner;
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).parent = Some(handle);
        }

        let parent = self.parent(handle);
        self.nodes.get_mut(pivot).parent = parent;
        match parent {
            None => self.root = Some(pivot),
            Some(p) => {
                let parent_node = self.nodes.get_mut(p);
                if parent_node.left == Some(handle) {
                    parent_node.left = Some(pivot);
                } else {
                    parent_node.right = Some(pivot);
                }
            }
        }

        self.nodes.get_mut(pivot).right = Some(handle);
        self.nodes.get_mut(handle).parent = Some(pivot);
    }

    // ─── Fixups ─────────────────────────────────────────────────────────────

    /// Restores the red-black invariants after `node` entered as a red leaf.
    ///
    /// Walks upward classifying by the uncle: a red uncle recolors and moves
    /// the violation to the grandparent; a black uncle resolves terminally
    /// with one rotation (straight-line case) or two (zig-zag case).
    fn fix_insert(&mut self, mut node: Handle) {
        while let Some(parent) = self.parent(node) {
            if self.nodes.get(parent).color == Color::Black {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let grandparent = self.parent(parent).expect("red node has a parent");

            if Some(parent) == self.left(grandparent) {
                let uncle = self.right(grandparent);
                if self.color(uncle) == Color::Red {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle.expect("red uncle exists"), Color::Black);
                    self.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if Some(node) == self.right(parent) {
                        node = parent;
                        self.rotate_left(node);
                    }
                    let parent = self.parent(node).expect("rotated node has a parent");
                    let grandparent = self.parent(parent).expect("red node has a parent");
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.left(grandparent);
                if self.color(uncle) == Color::Red {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle.expect("red uncle exists"), Color::Black);
                    self.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if Some(node) == self.left(parent) {
                        node = parent;
                        self.rotate_right(node);
                    }
                    let parent = self.parent(node).expect("rotated node has a parent");
                    let grandparent = self.parent(parent).expect("red node has a parent");
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_left(grandparent);
                }
            }
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Restores the invariants after a black node was spliced out, leaving
    /// `node` (possibly absent) one black short on its path.
    ///
    /// Classifies the sibling: red siblings rotate over the parent and the
    /// loop re-classifies the new black sibling at the same level; a black
    /// sibling with no red child recolors and either stops at a red parent
    /// or moves the deficiency up; a black sibling with a red child resolves
    /// terminally with the matching single or double rotation.
    fn fix_remove(&mut self, mut node: Option<Handle>, mut parent: Option<Handle>) {
        while let Some(p) = parent {
            if self.color(node) == Color::Red {
                break;
            }

            if node == self.left(p) {
                let mut sibling = self.right(p).expect("black-height demands a sibling");
                if self.nodes.get(sibling).color == Color::Red {
                    self.set_color(sibling, Color::Black);
                    self.set_color(p, Color::Red);
                    self.rotate_left(p);
                    sibling = self.right(p).expect("black-height demands a sibling");
                }

                if self.color(self.left(sibling)) == Color::Black
                    && self.color(self.right(sibling)) == Color::Black
                {
                    self.set_color(sibling, Color::Red);
                    node = Some(p);
                    parent = self.parent(p);
                } else {
                    if self.color(self.right(sibling)) == Color::Black {
                        if let Some(near) = self.left(sibling) {
                            self.set_color(near, Color::Black);
                        }
                        self.set_color(sibling, Color::Red);
                        self.rotate_right(sibling);
                        sibling = self.right(p).expect("black-height demands a sibling");
                    }
                    let parent_color = self.nodes.get(p).color;
                    self.set_color(sibling, parent_color);
                    self.set_color(p, Color::Black);
                    if let Some(far) = self.right(sibling) {
                        self.set_color(far, Color::Black);
                    }
                    self.rotate_left(p);
                    return;
                }
            } else {
                let mut sibling = self.left(p).expect("black-height demands a sibling");
                if self.nodes.get(sibling).color == Color::Red {
                    self.set_color(sibling, Color::Black);
                    self.set_color(p, Color::Red);
                    self.rotate_right(p);
                    sibling = self.left(p).expect("black-height demands a sibling");
                }

                if self.color(self.left(sibling)) == Color::Black
                    && self.color(self.right(sibling)) == Color::Black
                {
                    self.set_color(sibling, Color::Red);
                    node = Some(p);
                    parent = self.parent(p);
                } else {
                    if self.color(self.left(sibling)) == Color::Black {
                        if let Some(near) = self.right(sibling) {
                            self.set_color(near, Color::Black);
                        }
                        self.set_color(sibling, Color::Red);
                        self.rotate_left(sibling);
                        sibling = self.left(p).expect("black-height demands a sibling");
                    }
                    let parent_color = self.nodes.get(p).color;
                    self.set_color(sibling, parent_color);
                    self.set_color(p, Color::Black);
                    if let Some(far) = self.left(sibling) {
                        self.set_color(far, Color::Black);
                    }
                    self.rotate_right(p);
                    return;
                }
            }
        }

        if let Some(node) = node {
            self.set_color(node, Color::Black);
        }
    }
}

impl Clone for RawOrderedMap {
    fn clone(&self) -> Self {
        // Handles are stable indices, so cloning the arena clones the links.
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
        }
    }
}

/// Ascending in-order iterator.
///
/// Iterative with an explicit stack; red-black balance keeps the live spine
/// within the inline capacity for any tree below a few hundred nodes, and the
/// stack spills to the heap past that.
pub(crate) struct Iter<'a> {
    nodes: &'a Arena<TreeNode>,
    stack: SmallVec<[Handle; 16]>,
    remaining: usize,
}

impl Iter<'_> {
    fn push_left_spine(&mut self, mut current: Option<Handle>) {
        while let Some(handle) = current {
            self.stack.push(handle);
            current = self.nodes.get(handle).left;
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<(u32, u32)> {
        let handle = self.stack.pop()?;
        let (key, value, right) = {
            let node = self.nodes.get(handle);
            (node.key, node.value, node.right)
        };
        self.push_left_spine(right);
        self.remaining -= 1;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl core::iter::FusedIterator for Iter<'_> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::vec::Vec;

    use proptest::prelude::*;

    use super::*;

    impl RawOrderedMap {
        /// Checks every structural invariant, panicking on the first
        /// violation. Test-only; used after each mutation in the property
        /// tests below.
        pub(crate) fn validate_invariants(&self) {
            match self.root {
                None => assert_eq!(self.len, 0, "empty tree must have len 0"),
                Some(root) => {
                    assert_eq!(self.nodes.get(root).color, Color::Black, "root must be black");
                    assert_eq!(self.nodes.get(root).parent, None, "root must have no parent");
                    let (_, count) = self.validate_subtree(root, None, None);
                    assert_eq!(count, self.len, "len must equal the node count");
                }
            }
        }

        /// Returns (black-height, node count) of the subtree at `handle`.
        fn validate_subtree(&self, handle: Handle, low: Option<u32>, high: Option<u32>) -> (usize, usize) {
            let node = self.nodes.get(handle);

            if let Some(low) = low {
                assert!(node.key > low, "BST order violated at key {}", node.key);
            }
            if let Some(high) = high {
                assert!(node.key < high, "BST order violated at key {}", node.key);
            }
            if node.color == Color::Red {
                assert_eq!(self.color(node.left), Color::Black, "red node {} has a red left child", node.key);
                assert_eq!(self.color(node.right), Color::Black, "red node {} has a red right child", node.key);
            }

            let (left_height, left_count) = match node.left {
                None => (0, 0),
                Some(left) => {
                    assert_eq!(self.nodes.get(left).parent, Some(handle), "left child back-link broken");
                    self.validate_subtree(left, low, Some(node.key))
                }
            };
            let (right_height, right_count) = match node.right {
                None => (0, 0),
                Some(right) => {
                    assert_eq!(self.nodes.get(right).parent, Some(handle), "right child back-link broken");
                    self.validate_subtree(right, Some(node.key), high)
                }
            };

            assert_eq!(left_height, right_height, "black-height differs below key {}", node.key);
            (left_height + usize::from(node.color == Color::Black), left_count + right_count + 1)
        }
    }

    #[test]
    fn insert_then_remove_single() {
        let mut map = RawOrderedMap::new();
        assert_eq!(map.insert(7, 70), None);
        map.validate_invariants();
        assert_eq!(map.get(7), Some(70));
        assert_eq!(map.remove(7), Some(70));
        map.validate_invariants();
        assert!(map.is_empty());
        assert_eq!(map.remove(7), None);
    }

    #[test]
    fn insert_existing_key_is_upsert() {
        let mut map = RawOrderedMap::new();
        assert_eq!(map.insert(4, 40), None);
        assert_eq!(map.insert(4, 41), Some(40));
        map.validate_invariants();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(4), Some(41));
    }

    #[test]
    fn ascending_insert_stays_balanced() {
        let mut map = RawOrderedMap::new();
        for key in 0..512 {
            map.insert(key, key * 2);
            map.validate_invariants();
        }
        let keys: Vec<u32> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, (0..512).collect::<Vec<u32>>());
    }

    #[test]
    fn descending_remove_stays_balanced() {
        let mut map = RawOrderedMap::new();
        for key in 0..256 {
            map.insert(key, key);
        }
        for key in (0..256).rev() {
            assert_eq!(map.remove(key), Some(key));
            map.validate_invariants();
        }
        assert!(map.is_empty());
    }

    #[derive(Clone, Debug)]
    enum MapOp {
        Insert(u32, u32),
        Remove(u32),
        Get(u32),
    }

    fn map_op_strategy() -> impl Strategy<Value = MapOp> {
        // A narrow key range forces collisions, so removals actually hit.
        prop_oneof![
            5 => (0u32..512, any::<u32>()).prop_map(|(k, v)| MapOp::Insert(k, v)),
            3 => (0u32..512).prop_map(MapOp::Remove),
            2 => (0u32..512).prop_map(MapOp::Get),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// Random operation sequences agree with `BTreeMap` and keep every
        /// red-black invariant after each mutation.
        #[test]
        fn random_ops_match_btreemap(ops in prop::collection::vec(map_op_strategy(), 1000..1500)) {
            let mut map = RawOrderedMap::new();
            let mut oracle: BTreeMap<u32, u32> = BTreeMap::new();

            for op in &ops {
                match *op {
                    MapOp::Insert(key, value) => {
                        prop_assert_eq!(map.insert(key, value), oracle.insert(key, value));
                        map.validate_invariants();
                    }
                    MapOp::Remove(key) => {
                        prop_assert_eq!(map.remove(key), oracle.remove(&key));
                        map.validate_invariants();
                    }
                    MapOp::Get(key) => {
                        prop_assert_eq!(map.get(key), oracle.get(&key).copied());
                    }
                }

                prop_assert_eq!(map.len(), oracle.len());
            }

            let entries: Vec<(u32, u32)> = map.iter().collect();
            let expected: Vec<(u32, u32)> = oracle.iter().map(|(&k, &v)| (k, v)).collect();
            prop_assert_eq!(entries, expected);
        }
    }
}
