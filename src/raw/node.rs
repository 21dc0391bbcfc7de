use super::handle::Handle;

/// A single tree node.
///
/// `left` and `right` are owning links (a subtree is reachable only through
/// its parent's child slot or the root slot); `parent` is a non-owning
/// back-reference, absent for the root. `size` is the subtree-size
/// augmentation: the number of nodes in the subtree rooted here, this node
/// included. It is maintained incrementally by insert and splice, never
/// recomputed by traversal.
#[derive(Clone)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) size: usize,
}

impl<K> Node<K> {
    /// Creates a fresh leaf: all links absent, subtree of one.
    pub(crate) const fn new(key: K) -> Self {
        Self {
            key,
            parent: None,
            left: None,
            right: None,
            size: 1,
        }
    }

    /// Clears all links. Called when a node is retired after a splice, so a
    /// detached node never exposes handles into the live tree.
    pub(crate) fn disconnect(&mut self) {
        self.parent = None;
        self.left = None;
        self.right = None;
    }
}
