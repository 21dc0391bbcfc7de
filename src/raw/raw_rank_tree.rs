use core::borrow::Borrow;
use core::cmp::Ordering::{Equal, Greater, Less};

use alloc::vec::Vec;
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::Node;

/// The augmented BST backing `RankTree`.
///
/// The tree is unbalanced: an adversarial insertion order degenerates it
/// into a linked list, so every descent (find, insert, rank, split-node)
/// is an iterative loop over handles rather than a recursive call chain.
#[derive(Clone)]
pub(crate) struct RawRankTree<K> {
    /// Arena storing all tree nodes. Every key is exactly one node, so the
    /// arena's live count doubles as the tree's length.
    nodes: Arena<Node<K>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
}

impl<K> RawRankTree<K> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    /// Non-panicking node lookup for handles held across mutations.
    #[inline]
    pub(crate) fn try_node(&self, handle: Handle) -> Option<&Node<K>> {
        self.nodes.try_get(handle)
    }

    /// Handle of the minimum key, if any.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.leftmost(root))
    }

    /// Leftmost node of the subtree rooted at `handle`.
    pub(crate) fn leftmost(&self, handle: Handle) -> Handle {
        let mut current = handle;
        while let Some(left) = self.nodes.get(current).left {
            current = left;
        }
        current
    }

    /// In-order successor: the leftmost node of the right subtree, or the
    /// nearest ancestor entered from its left child.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        if let Some(right) = self.nodes.get(handle).right {
            return Some(self.leftmost(right));
        }
        let mut current = handle;
        while let Some(parent) = self.nodes.get(current).parent {
            if self.nodes.get(parent).right == Some(current) {
                current = parent;
            } else {
                return Some(parent);
            }
        }
        None
    }

    fn subtree_size(&self, handle: Option<Handle>) -> usize {
        handle.map_or(0, |h| self.nodes.get(h).size)
    }

    /// Repoints the link that addresses `old`: the parent's child slot, or
    /// the root slot when `parent` is absent. Routing the root through here
    /// is what lets the splice logic treat the root like any other node.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let node = self.nodes.get_mut(p);
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    debug_assert_eq!(node.right, Some(old));
                    node.right = new;
                }
            }
        }
    }

    /// Increments the size augmentation from `start` up to the root, after
    /// a leaf was attached somewhere below `start`.
    fn bump_sizes(&mut self, mut current: Option<Handle>) {
        while let Some(handle) = current {
            let node = self.nodes.get_mut(handle);
            node.size += 1;
            current = node.parent;
        }
    }

    /// Decrements the size augmentation from `start` up to the root, after
    /// a node was spliced out somewhere below `start`.
    fn drop_sizes(&mut self, mut current: Option<Handle>) {
        while let Some(handle) = current {
            let node = self.nodes.get_mut(handle);
            node.size -= 1;
            current = node.parent;
        }
    }
}

impl<K: Ord> RawRankTree<K> {
    /// Attaches `key` as a fresh leaf. Duplicate keys descend right, so
    /// equal keys accumulate in the right subtree in insertion order.
    pub(crate) fn insert(&mut self, key: K) -> Handle {
        let Some(root) = self.root else {
            let handle = self.nodes.alloc(Node::new(key));
            self.root = Some(handle);
            return handle;
        };

        let mut current = root;
        let (parent, went_left) = loop {
            let node = self.nodes.get(current);
            if key < node.key {
                match node.left {
                    Some(left) => current = left,
                    None => break (current, true),
                }
            } else {
                match node.right {
                    Some(right) => current = right,
                    None => break (current, false),
                }
            }
        };

        let mut node = Node::new(key);
        node.parent = Some(parent);
        let handle = self.nodes.alloc(node);

        let slot = self.nodes.get_mut(parent);
        if went_left {
            slot.left = Some(handle);
        } else {
            slot.right = Some(handle);
        }

        self.bump_sizes(Some(parent));
        handle
    }

    /// Returns the first node with an equal key on the descent path (not
    /// necessarily the only one when duplicates exist).
    pub(crate) fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(node.key.borrow()) {
                Equal => return Some(handle),
                Less => node.left,
                Greater => node.right,
            };
        }
        None
    }

    /// Removes one node holding `key` and returns its key, or `None` (and
    /// no mutation) if the key is absent.
    pub(crate) fn delete<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.find(key)?;
        Some(self.delete_at(handle))
    }

    /// Delete-before-swap. A node with two children is never unlinked
    /// itself: its in-order successor is spliced out first, and only then
    /// is the successor's key moved over. The tree is a valid BST at every
    /// intermediate step, and sizes are decremented along the physically
    /// removed node's former ancestor path.
    fn delete_at(&mut self, handle: Handle) -> K {
        let node = self.nodes.get(handle);
        if let (Some(_), Some(right)) = (node.left, node.right) {
            // The successor is the leftmost node of the right subtree; it
            // has no left child, so it always splices directly.
            let successor = self.leftmost(right);
            let (successor_key, _) = self.splice(successor);
            core::mem::replace(&mut self.nodes.get_mut(handle).key, successor_key)
        } else {
            self.splice(handle).0
        }
    }

    /// Unlinks a node with at most one child: the link addressing it is
    /// repointed at its sole child (or cleared), the child's back-reference
    /// is fixed up, and sizes are decremented from the former parent up.
    /// Returns the detached key and the former parent.
    fn splice(&mut self, handle: Handle) -> (K, Option<Handle>) {
        let node = self.nodes.get(handle);
        debug_assert!(node.left.is_none() || node.right.is_none());
        let child = node.left.or(node.right);
        let parent = node.parent;

        self.replace_child(parent, handle, child);
        if let Some(child) = child {
            self.nodes.get_mut(child).parent = parent;
        }
        self.drop_sizes(parent);

        let mut node = self.nodes.take(handle);
        node.disconnect();
        (node.key, parent)
    }

    /// Removes the minimum key. Returns it together with the removed
    /// node's former parent (still live), which callers re-walk from when
    /// recomputing successors.
    pub(crate) fn delete_min(&mut self) -> Option<(K, Option<Handle>)> {
        let root = self.root?;
        let min = self.leftmost(root);
        Some(self.splice(min))
    }

    /// Count of keys `<= key`.
    pub(crate) fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut count = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if key < node.key.borrow() {
                current = node.left;
            } else {
                // This node and its whole left subtree are <= key. Equal
                // keys sit in the right subtree, so equality keeps
                // descending right; stopping here would undercount
                // duplicates.
                count += 1 + self.subtree_size(node.left);
                current = node.right;
            }
        }
        count
    }

    /// The shallowest node whose key lies in `[low, high]`: the point where
    /// the descent paths for `low` and `high` diverge. Absent when the tree
    /// is empty or no key qualifies. Precondition: `low <= high`.
    pub(crate) fn split_node<Q>(&self, low: &Q, high: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let key = node.key.borrow();
            if low <= key && key <= high {
                return Some(handle);
            }
            current = if low < key { node.left } else { node.right };
        }
        None
    }

    /// Ascending handles of all keys in `[low, high]`; empty when
    /// `low > high`. Bounded in-order walk from the split node: left
    /// subtrees are entered only while `low <= key`, right subtrees only
    /// while `key <= high`, so the cost is the split node's depth plus the
    /// number of results.
    pub(crate) fn range<Q>(&self, low: &Q, high: &Q) -> Vec<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut result = Vec::new();
        if low > high {
            return result;
        }
        let Some(split) = self.split_node(low, high) else {
            return result;
        };

        let mut stack: SmallVec<[Handle; 16]> = SmallVec::new();
        let mut current = Some(split);
        loop {
            while let Some(handle) = current {
                stack.push(handle);
                let node = self.nodes.get(handle);
                current = if low <= node.key.borrow() { node.left } else { None };
            }
            let Some(handle) = stack.pop() else { break };
            let node = self.nodes.get(handle);
            let key = node.key.borrow();
            if low <= key && key <= high {
                result.push(handle);
            }
            current = if key <= high { node.right } else { None };
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    impl<K: Ord> RawRankTree<K> {
        /// Walks the whole tree checking the order invariant, parent
        /// back-references, and exact subtree sizes. Panics on violation.
        pub(crate) fn validate_invariants(&self) {
            match self.root {
                None => assert_eq!(self.len(), 0, "empty tree with nonzero len"),
                Some(root) => {
                    assert_eq!(self.node(root).parent, None, "root has a parent");
                    let counted = self.validate_subtree(root, None, None);
                    assert_eq!(counted, self.len(), "len does not match node count");
                }
            }
        }

        fn validate_subtree(&self, handle: Handle, lower: Option<&K>, upper: Option<&K>) -> usize {
            let node = self.node(handle);
            // Left subtrees are strictly below their ancestor key; right
            // subtrees admit equal keys.
            if let Some(lower) = lower {
                assert!(*lower <= node.key, "order invariant violated below a right link");
            }
            if let Some(upper) = upper {
                assert!(node.key < *upper, "order invariant violated below a left link");
            }

            let mut count = 1;
            if let Some(left) = node.left {
                assert_eq!(self.node(left).parent, Some(handle), "left child's parent link is broken");
                count += self.validate_subtree(left, lower, Some(&node.key));
            }
            if let Some(right) = node.right {
                assert_eq!(self.node(right).parent, Some(handle), "right child's parent link is broken");
                count += self.validate_subtree(right, Some(&node.key), upper);
            }

            assert_eq!(node.size, count, "subtree size augmentation is stale");
            count
        }

        fn in_order_keys(&self) -> Vec<K>
        where
            K: Clone,
        {
            let mut keys = Vec::with_capacity(self.len());
            let mut current = self.first();
            while let Some(handle) = current {
                keys.push(self.node(handle).key.clone());
                current = self.successor(handle);
            }
            keys
        }
    }

    #[test]
    fn insert_returns_live_handles() {
        let mut tree = RawRankTree::new();
        let five = tree.insert(5);
        let three = tree.insert(3);
        assert_eq!(tree.node(five).key, 5);
        assert_eq!(tree.node(three).key, 3);
        assert_eq!(tree.find(&3), Some(three));
        tree.validate_invariants();
    }

    #[test]
    fn delete_two_children_transplants_successor_key() {
        let mut tree = RawRankTree::new();
        for key in [5, 3, 8, 7, 9] {
            tree.insert(key);
        }
        let root = tree.root().unwrap();

        // The root node survives; the successor node (7) is the one spliced.
        assert_eq!(tree.delete(&5), Some(5));
        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.node(root).key, 7);
        assert_eq!(tree.find(&5), None);
        tree.validate_invariants();
    }

    #[test]
    fn delete_root_with_one_child_promotes_it() {
        let mut tree = RawRankTree::new();
        tree.insert(5);
        let three = tree.insert(3);
        assert_eq!(tree.delete(&5), Some(5));
        assert_eq!(tree.root(), Some(three));
        assert_eq!(tree.node(three).parent, None);
        tree.validate_invariants();
    }

    #[test]
    fn delete_absent_is_a_no_op() {
        let mut tree = RawRankTree::new();
        for key in [5, 3, 8] {
            tree.insert(key);
        }
        assert_eq!(tree.delete(&4), None);
        assert_eq!(tree.len(), 3);
        tree.validate_invariants();
    }

    #[test]
    fn delete_min_reports_former_parent() {
        let mut tree = RawRankTree::new();
        for key in [5, 3, 8, 1, 4] {
            tree.insert(key);
        }
        let three = tree.find(&3).unwrap();

        let (key, parent) = tree.delete_min().unwrap();
        assert_eq!(key, 1);
        assert_eq!(parent, Some(three));
        tree.validate_invariants();

        // Deleting the root minimum has no parent to report.
        let mut tree = RawRankTree::new();
        tree.insert(1);
        tree.insert(2);
        assert_eq!(tree.delete_min(), Some((1, None)));
        tree.validate_invariants();
    }

    #[test]
    fn delete_min_on_empty_tree() {
        let mut tree: RawRankTree<i64> = RawRankTree::new();
        assert_eq!(tree.delete_min(), None);
        assert_eq!(tree.delete_min(), None);
        tree.validate_invariants();
    }

    #[test]
    fn successor_walk_is_sorted() {
        let mut tree = RawRankTree::new();
        for key in [5, 3, 8, 1, 4, 7, 9] {
            tree.insert(key);
        }
        assert_eq!(tree.in_order_keys(), [1, 3, 4, 5, 7, 8, 9]);
    }

    // ─── Randomized op sequences ─────────────────────────────────────────

    #[derive(Clone, Debug)]
    enum Operation {
        Insert(i8),
        Delete(i8),
        DeleteMin,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        // i8 keys force collisions, exercising the duplicate paths.
        prop_oneof![
            5 => any::<i8>().prop_map(Operation::Insert),
            3 => any::<i8>().prop_map(Operation::Delete),
            1 => Just(Operation::DeleteMin),
        ]
    }

    proptest! {
        /// Replays a random insert/delete/delete_min sequence against a
        /// sorted-Vec multiset model, validating every invariant after
        /// every operation.
        #[test]
        fn ops_preserve_invariants(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut tree: RawRankTree<i8> = RawRankTree::new();
            let mut model: Vec<i8> = Vec::new();

            for operation in operations {
                match operation {
                    Operation::Insert(key) => {
                        tree.insert(key);
                        let at = model.partition_point(|k| *k <= key);
                        model.insert(at, key);
                    }
                    Operation::Delete(key) => {
                        let deleted = tree.delete(&key);
                        match model.iter().position(|k| *k == key) {
                            Some(at) => {
                                model.remove(at);
                                prop_assert_eq!(deleted, Some(key));
                            }
                            None => prop_assert_eq!(deleted, None),
                        }
                    }
                    Operation::DeleteMin => {
                        let deleted = tree.delete_min().map(|(key, _)| key);
                        let expected = if model.is_empty() { None } else { Some(model.remove(0)) };
                        prop_assert_eq!(deleted, expected);
                    }
                }

                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
            }

            prop_assert_eq!(tree.in_order_keys(), model);
        }

        /// rank/range agree with brute-force counts over the model.
        #[test]
        fn rank_and_range_match_model(
            keys in prop::collection::vec(any::<i8>(), 0..128),
            probes in prop::collection::vec((any::<i8>(), any::<i8>()), 0..32),
        ) {
            let mut tree: RawRankTree<i8> = RawRankTree::new();
            for &key in &keys {
                tree.insert(key);
            }

            for (a, b) in probes {
                let expected_rank = keys.iter().filter(|k| **k <= a).count();
                prop_assert_eq!(tree.rank(&a), expected_rank);

                let (low, high) = (a.min(b), a.max(b));
                let found: Vec<i8> = tree.range(&low, &high).iter().map(|&h| tree.node(h).key).collect();
                let mut expected: Vec<i8> = keys.iter().copied().filter(|k| low <= *k && *k <= high).collect();
                expected.sort_unstable();
                prop_assert_eq!(found, expected);

                // Inverted bounds are defined to be empty.
                if low < high {
                    prop_assert!(tree.range(&high, &low).is_empty());
                }
            }
        }
    }
}
