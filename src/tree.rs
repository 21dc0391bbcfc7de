use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;

use alloc::vec::Vec;

use crate::raw::{Handle, RawRankTree};

/// An opaque handle to a node in a [`RankTree`].
///
/// Handles are stable across insertions but are invalidated when the node
/// they address is destroyed by a deletion (for a two-children delete, the
/// node destroyed is the in-order *successor* of the logical key, not the
/// node the key was found in). Dereferencing a stale handle through
/// [`RankTree::key`] returns `None` or, if the slot has been recycled by a
/// later insertion, another live node's key.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) Handle);

/// An ordered-key index backed by an unbalanced binary search tree with
/// subtree-size augmentation.
///
/// `RankTree` stores keys in sorted order and answers point queries
/// ([`find`]), order-statistic queries ([`rank`]) and ascending range
/// enumeration ([`range`]) in time proportional to tree depth. Duplicate
/// keys are permitted: equal keys accumulate in the right subtree in
/// insertion order and are counted individually by [`rank`].
///
/// The tree performs no rebalancing, so depth is O(n) for adversarial
/// insertion orders; all descents are iterative, so a degenerate tree costs
/// time, never stack. Nodes live in an arena and are addressed by opaque
/// [`NodeId`] handles rather than pointers.
///
/// The structure is sequential: no operation blocks or suspends, and
/// concurrent mutation without external synchronization corrupts links and
/// the size augmentation. Wrap the whole tree in a lock if it must be
/// shared.
///
/// [`find`]: RankTree::find
/// [`rank`]: RankTree::rank
/// [`range`]: RankTree::range
///
/// # Examples
///
/// ```
/// use rank_tree::RankTree;
///
/// let mut tree = RankTree::new();
/// for key in [5, 3, 8, 1, 4, 7, 9] {
///     tree.insert(key);
/// }
///
/// assert_eq!(tree.rank(&5), 4); // 1, 3, 4, 5
/// let in_range: Vec<i64> = tree
///     .range(&4, &8)
///     .into_iter()
///     .map(|id| *tree.key(id).unwrap())
///     .collect();
/// assert_eq!(in_range, [4, 5, 7, 8]);
///
/// assert_eq!(tree.delete(&5), Some(5));
/// assert_eq!(tree.find(&5), None);
/// assert_eq!(tree.rank(&9), 6);
/// ```
#[derive(Clone)]
pub struct RankTree<K> {
    pub(crate) raw: RawRankTree<K>,
}

impl<K> RankTree<K> {
    /// Creates an empty tree.
    ///
    /// Does not allocate until the first insertion.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raw: RawRankTree::new(),
        }
    }

    /// Creates an empty tree with arena capacity for at least `capacity`
    /// nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: RawRankTree::with_capacity(capacity),
        }
    }

    /// Returns the number of node slots the arena can hold without
    /// reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the number of keys in the tree, duplicates included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes every key, discarding the whole node graph. Invalidates all
    /// outstanding [`NodeId`]s.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the key stored in `node`, or `None` if the handle is stale.
    #[must_use]
    pub fn key(&self, node: NodeId) -> Option<&K> {
        self.raw.try_node(node.0).map(|n| &n.key)
    }

    /// Returns the minimum key, or `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let mut tree = RankTree::new();
    /// assert_eq!(tree.min(), None);
    /// tree.insert(8);
    /// tree.insert(3);
    /// assert_eq!(tree.min(), Some(&3));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<&K> {
        self.raw.first().map(|h| &self.raw.node(h).key)
    }

    /// Returns an iterator over the keys in ascending order.
    ///
    /// The walk steps through parent back-references, so it needs no
    /// auxiliary stack; each step is amortized constant time.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            raw: &self.raw,
            next: self.raw.first(),
            remaining: self.raw.len(),
        }
    }
}

impl<K: Ord> RankTree<K> {
    /// Inserts `key`, returning a handle to its freshly created leaf node.
    ///
    /// Insertion never fails and never rebalances. Duplicates are allowed;
    /// an equal key is placed in the right subtree of the existing one.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let mut tree = RankTree::new();
    /// let id = tree.insert("carol");
    /// assert_eq!(tree.key(id), Some(&"carol"));
    /// ```
    pub fn insert(&mut self, key: K) -> NodeId {
        NodeId(self.raw.insert(key))
    }

    /// Returns a handle to a node holding `key`, or `None` if absent.
    ///
    /// When duplicates exist this is the first equal key on the descent
    /// path, not necessarily the only one.
    ///
    /// The key may be any borrowed form of the tree's key type, with
    /// matching `Ord` semantics.
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find(key).map(NodeId)
    }

    /// Returns `true` if the tree holds at least one key equal to `key`.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find(key).is_some()
    }

    /// Removes one node holding `key` and returns the detached key, or
    /// `None` (without mutating) if the key is absent.
    ///
    /// When the located node has two children, the node physically
    /// destroyed is its in-order successor; the successor's key is
    /// transplanted into the located node. The handle returned by an
    /// earlier [`find`](RankTree::find) for that key is therefore not
    /// guaranteed to be stale afterwards, but the *key* is gone.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let mut tree = RankTree::new();
    /// tree.insert(2);
    /// assert_eq!(tree.delete(&2), Some(2));
    /// assert_eq!(tree.delete(&2), None);
    /// ```
    pub fn delete<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.delete(key)
    }

    /// Removes the minimum key. Returns it together with a handle to the
    /// removed node's former parent (`None` when the minimum was the
    /// root), or `None` if the tree is empty.
    ///
    /// The former parent is the point a caller re-walks from when
    /// recomputing successors after the extraction.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let mut tree = RankTree::new();
    /// assert_eq!(tree.delete_min(), None);
    /// tree.insert(5);
    /// tree.insert(3);
    /// let (key, parent) = tree.delete_min().unwrap();
    /// assert_eq!(key, 3);
    /// assert_eq!(parent.and_then(|id| tree.key(id)), Some(&5));
    /// ```
    pub fn delete_min(&mut self) -> Option<(K, Option<NodeId>)> {
        self.raw.delete_min().map(|(key, parent)| (key, parent.map(NodeId)))
    }

    /// Returns the number of keys less than or equal to `key` (`key` need
    /// not be present). Zero on an empty tree.
    ///
    /// This is the order-statistic query the subtree-size augmentation
    /// exists for: cost is proportional to tree depth, never to the count
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let mut tree = RankTree::new();
    /// for key in [2, 2, 2] {
    ///     tree.insert(key);
    /// }
    /// assert_eq!(tree.rank(&2), 3);
    /// assert_eq!(tree.rank(&1), 0);
    /// ```
    #[must_use]
    pub fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.rank(key)
    }

    /// Returns handles to all keys in `[low, high]`, in ascending key
    /// order. Empty when `low > high` or when no key qualifies.
    ///
    /// Cost is the depth of the range's split node plus the number of
    /// results.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let mut tree = RankTree::new();
    /// for key in [5, 3, 8, 1, 4, 7, 9] {
    ///     tree.insert(key);
    /// }
    ///
    /// let keys: Vec<i64> = tree
    ///     .range(&4, &8)
    ///     .into_iter()
    ///     .map(|id| *tree.key(id).unwrap())
    ///     .collect();
    /// assert_eq!(keys, [4, 5, 7, 8]);
    /// assert!(tree.range(&8, &4).is_empty());
    /// ```
    #[must_use]
    pub fn range<Q>(&self, low: &Q, high: &Q) -> Vec<NodeId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.range(low, high).into_iter().map(NodeId).collect()
    }
}

impl<K> Default for RankTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for RankTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K: Ord> FromIterator<K> for RankTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for RankTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

/// An iterator over the keys of a [`RankTree`] in ascending order.
///
/// Created by [`RankTree::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K> {
    raw: &'a RawRankTree<K>,
    next: Option<Handle>,
    remaining: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.next?;
        self.next = self.raw.successor(handle);
        self.remaining -= 1;
        Some(&self.raw.node(handle).key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
impl<K> FusedIterator for Iter<'_, K> {}

impl<'a, K> IntoIterator for &'a RankTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
