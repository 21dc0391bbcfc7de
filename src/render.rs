//! Textual tree diagrams.
//!
//! [`RankTree`] implements [`Display`](fmt::Display) when its key type
//! does, drawing the classic two-rows-per-level diagram: each key label is
//! centered over a `/ \` strut row, with `.` padding marking how far a
//! label extends over its subtrees. The empty tree renders as
//! `<empty tree>`. Rendering reads the tree and never mutates it; it is a
//! debugging aid, not part of the index's contract.

use core::fmt;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::raw::{Handle, RawRankTree};
use crate::tree::RankTree;

struct Layout {
    lines: Vec<String>,
    /// Column of this subtree's root label center within `lines`.
    pos: usize,
    width: usize,
}

fn center(label: &str, width: usize) -> String {
    let slack = width.saturating_sub(label.len());
    let left = slack / 2;
    let mut out = String::with_capacity(width);
    for _ in 0..left {
        out.push('.');
    }
    out.push_str(label);
    for _ in 0..slack - left {
        out.push('.');
    }
    out
}

fn layout<K: fmt::Display>(raw: &RawRankTree<K>, handle: Option<Handle>) -> Layout {
    let Some(handle) = handle else {
        return Layout {
            lines: Vec::new(),
            pos: 0,
            width: 0,
        };
    };

    let node = raw.node(handle);
    let mut label = node.key.to_string();

    let left = layout(raw, node.left);
    let right = layout(raw, node.right);

    let middle = (right.pos + left.width - left.pos + 1).max(label.len()).max(2);
    let pos = left.pos + middle / 2;
    let width = left.pos + middle + right.width - right.pos;

    let mut left_lines = left.lines;
    let mut right_lines = right.lines;
    while left_lines.len() < right_lines.len() {
        left_lines.push(" ".repeat(left.width));
    }
    while right_lines.len() < left_lines.len() {
        right_lines.push(" ".repeat(right.width));
    }

    // A left child with odd slack leans its label a half-step toward the
    // parent's strut.
    let is_left_child = node.parent.is_some_and(|p| raw.node(p).left == Some(handle));
    if (middle - label.len()) % 2 == 1 && is_left_child && label.len() < middle {
        label.push('.');
    }

    let mut label = center(&label, middle);
    if label.starts_with('.') {
        label.replace_range(..1, " ");
    }
    if label.ends_with('.') {
        let end = label.len();
        label.replace_range(end - 1.., " ");
    }

    let indent = " ".repeat(left.pos);
    let tail = " ".repeat(right.width - right.pos);
    let mut lines = Vec::with_capacity(left_lines.len() + 2);
    lines.push(format!("{indent}{label}{tail}"));
    lines.push(format!("{indent}/{}\\{tail}", " ".repeat(middle - 2)));

    let gap = " ".repeat(width - left.width - right.width);
    for (left_line, right_line) in left_lines.into_iter().zip(right_lines) {
        lines.push(format!("{left_line}{gap}{right_line}"));
    }

    Layout { lines, pos, width }
}

impl<K: fmt::Display> fmt::Display for RankTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.raw.root() else {
            return f.write_str("<empty tree>");
        };

        let layout = layout(&self.raw, Some(root));
        for (index, line) in layout.lines.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line.trim_end())?;
        }
        Ok(())
    }
}
