//! An ordered-key index with order-statistic queries.
//!
//! This crate provides [`RankTree`], an in-memory sorted index over any
//! totally ordered key type, supporting:
//!
//! - [`insert`](RankTree::insert) / [`find`](RankTree::find) /
//!   [`delete`](RankTree::delete) - logarithmic-in-depth point operations
//! - [`delete_min`](RankTree::delete_min) - minimum extraction
//! - [`rank`](RankTree::rank) - count of keys `<=` a probe, in O(depth)
//! - [`range`](RankTree::range) - ascending enumeration of a closed key
//!   interval, in O(depth + results)
//!
//! # Example
//!
//! ```
//! use rank_tree::RankTree;
//!
//! let mut tree = RankTree::new();
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     tree.insert(key);
//! }
//!
//! assert_eq!(tree.rank(&5), 4);
//! assert_eq!(tree.rank(&100), 7);
//!
//! let keys: Vec<i64> = tree.iter().copied().collect();
//! assert_eq!(keys, [1, 3, 4, 5, 7, 8, 9]);
//! ```
//!
//! # Implementation
//!
//! The tree is an *unbalanced* binary search tree augmented with subtree
//! sizes - the classic order-statistic structure, favoring simple pointer
//! surgery over balancing guarantees. Worst-case depth is O(n); every
//! descent is iterative, so skewed trees cost time rather than stack.
//! Nodes live in an arena and reference each other through niche-packed
//! index handles: child links own their subtrees, parent links are plain
//! back-references, and no `Rc`/`RefCell` cycles exist anywhere.
//!
//! Duplicate keys are permitted; equal keys collect in the right subtree
//! and are counted individually by [`rank`](RankTree::rank).
//!
//! # Features
//!
//! - **`no_std` compatible** - only requires `alloc`
//! - **`demo`** - builds the `tree-demo` binary, a small driver that
//!   inserts keys and pretty-prints the tree after each step

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]

extern crate alloc;

mod raw;
mod render;

pub mod tree;

pub use tree::{Iter, NodeId, RankTree};
