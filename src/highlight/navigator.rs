//! Read-only traversal over a [`TextHost`]: document order, context windows
//! around a caret, and ambient text color lookup.

use crate::highlight::color::Rgb;
use crate::models::{NodeId, Position, TextHost};
use std::cmp::Ordering;

/// Next node in pre-order, `None` past the last node.
pub fn next_in_order<H: TextHost + ?Sized>(host: &H, id: NodeId) -> Option<NodeId> {
    if let Some(&first) = host.children(id).first() {
        return Some(first);
    }
    let mut current = id;
    loop {
        let parent = host.parent(current)?;
        let siblings = host.children(parent);
        let index = siblings.iter().position(|&c| c == current)?;
        if let Some(&next) = siblings.get(index + 1) {
            return Some(next);
        }
        current = parent;
    }
}

/// Previous node in pre-order, `None` before the root.
pub fn prev_in_order<H: TextHost + ?Sized>(host: &H, id: NodeId) -> Option<NodeId> {
    let parent = host.parent(id)?;
    let siblings = host.children(parent);
    let index = siblings.iter().position(|&c| c == id)?;
    if index == 0 {
        return Some(parent);
    }
    let mut current = siblings[index - 1];
    while let Some(&last) = host.children(current).last() {
        current = last;
    }
    Some(current)
}

pub fn next_text<H: TextHost + ?Sized>(host: &H, id: NodeId) -> Option<NodeId> {
    let mut current = next_in_order(host, id);
    while let Some(node) = current {
        if host.is_text(node) {
            return Some(node);
        }
        current = next_in_order(host, node);
    }
    None
}

pub fn prev_text<H: TextHost + ?Sized>(host: &H, id: NodeId) -> Option<NodeId> {
    let mut current = prev_in_order(host, id);
    while let Some(node) = current {
        if host.is_text(node) {
            return Some(node);
        }
        current = prev_in_order(host, node);
    }
    None
}

/// Nearest block element at or above `id`, or the root.
pub fn block_of<H: TextHost + ?Sized>(host: &H, id: NodeId) -> NodeId {
    let mut current = id;
    loop {
        if host.is_block(current) {
            return current;
        }
        match host.parent(current) {
            Some(parent) => current = parent,
            None => return current,
        }
    }
}

/// Next text segment that shares `id`'s block. Words never continue across
/// block elements, so traversal that builds tokens stops there.
pub fn next_text_in_block<H: TextHost + ?Sized>(host: &H, id: NodeId) -> Option<NodeId> {
    let block = block_of(host, id);
    next_text(host, id).filter(|&n| block_of(host, n) == block)
}

pub fn prev_text_in_block<H: TextHost + ?Sized>(host: &H, id: NodeId) -> Option<NodeId> {
    let block = block_of(host, id);
    prev_text(host, id).filter(|&n| block_of(host, n) == block)
}

/// All text segments under `root` in document order.
pub fn text_nodes<H: TextHost + ?Sized>(host: &H, root: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if host.is_text(node) {
            out.push(node);
            continue;
        }
        stack.extend(host.children(node).iter().rev().copied());
    }
    out
}

/// All annotation nodes under `root` in document order.
pub fn annotation_nodes<H: TextHost + ?Sized>(host: &H, root: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if host.is_annotation(node) {
            out.push(node);
        }
        stack.extend(host.children(node).iter().rev().copied());
    }
    out
}

fn path_from_root<H: TextHost + ?Sized>(host: &H, id: NodeId) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = id;
    while let Some(index) = host.index_in_parent(current) {
        path.push(index);
        match host.parent(current) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    path.reverse();
    path
}

/// Orders nodes by document position; an ancestor sorts before its descendants.
pub fn compare_nodes<H: TextHost + ?Sized>(host: &H, a: NodeId, b: NodeId) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    path_from_root(host, a).cmp(&path_from_root(host, b))
}

pub fn compare_positions<H: TextHost + ?Sized>(host: &H, a: Position, b: Position) -> Ordering {
    compare_nodes(host, a.node, b.node).then(a.offset.cmp(&b.offset))
}

/// Closest node that contains both `a` and `b`.
pub fn common_ancestor<H: TextHost + ?Sized>(host: &H, a: NodeId, b: NodeId) -> NodeId {
    let mut ancestors = Vec::new();
    let mut current = Some(a);
    while let Some(node) = current {
        ancestors.push(node);
        current = host.parent(node);
    }
    let mut current = Some(b);
    while let Some(node) = current {
        if ancestors.contains(&node) {
            return node;
        }
        current = host.parent(node);
    }
    host.root()
}

/// Char right after `pos`, hopping into the next segment of the same block
/// when `pos` sits at the end of its segment. Returns the char, where it
/// starts, and the position right after it.
pub fn char_after<H: TextHost + ?Sized>(host: &H, pos: Position) -> Option<(char, Position, Position)> {
    let mut node = pos.node;
    let mut offset = pos.offset;
    loop {
        let text = host.text(node)?;
        if let Some(ch) = text.get(offset..).and_then(|rest| rest.chars().next()) {
            return Some((
                ch,
                Position::new(node, offset),
                Position::new(node, offset + ch.len_utf8()),
            ));
        }
        node = next_text_in_block(host, node)?;
        offset = 0;
    }
}

/// Char right before `pos`, hopping back across segments of the same block.
/// Returns the char, where it starts, and the position right after it.
pub fn char_before<H: TextHost + ?Sized>(host: &H, pos: Position) -> Option<(char, Position, Position)> {
    let mut node = pos.node;
    let mut offset = pos.offset;
    loop {
        let text = host.text(node)?;
        if let Some(ch) = text.get(..offset).and_then(|head| head.chars().next_back()) {
            let start = offset - ch.len_utf8();
            return Some((ch, Position::new(node, start), Position::new(node, offset)));
        }
        node = prev_text_in_block(host, node)?;
        offset = host.text(node).map_or(0, str::len);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ContextChar {
    start: Position,
    end: Position,
}

/// Text gathered around a caret, with the tree position of every char.
#[derive(Debug, Clone)]
pub struct ContextWindow {
    text: String,
    chars: Vec<ContextChar>,
    /// Char index of the caret.
    cursor: usize,
    caret: Position,
    truncated_start: bool,
    truncated_end: bool,
}

impl ContextWindow {
    /// Collects up to `radius` chars on each side of `caret`, crossing
    /// segment boundaries but not block boundaries.
    pub fn build<H: TextHost + ?Sized>(host: &H, caret: Position, radius: usize) -> Self {
        let mut before = Vec::new();
        let mut pos = caret;
        while before.len() < radius {
            let Some((ch, start, end)) = char_before(host, pos) else {
                break;
            };
            before.push((ch, ContextChar { start, end }));
            pos = start;
        }
        let truncated_start = before.len() == radius && char_before(host, pos).is_some();
        before.reverse();

        let mut after = Vec::new();
        let mut pos = caret;
        while after.len() < radius {
            let Some((ch, start, end)) = char_after(host, pos) else {
                break;
            };
            after.push((ch, ContextChar { start, end }));
            pos = end;
        }
        let truncated_end = after.len() == radius && char_after(host, pos).is_some();

        let cursor = before.len();
        let (text, chars): (String, Vec<ContextChar>) = before.into_iter().chain(after).unzip();
        Self {
            text,
            chars,
            cursor,
            caret,
            truncated_start,
            truncated_end,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn truncated_start(&self) -> bool {
        self.truncated_start
    }

    pub fn truncated_end(&self) -> bool {
        self.truncated_end
    }

    /// Char index for a byte offset into [`Self::text`].
    pub fn char_index(&self, byte: usize) -> usize {
        self.text
            .get(..byte)
            .map_or(self.chars.len(), |head| head.chars().count())
    }

    /// Tree position where a span starting at char `index` begins.
    pub fn start_position(&self, index: usize) -> Position {
        match self.chars.get(index) {
            Some(c) => c.start,
            None => self.chars.last().map_or(self.caret, |c| c.end),
        }
    }

    /// Tree position where a span ending at char `index` (exclusive) ends.
    pub fn end_position(&self, index: usize) -> Position {
        match index.checked_sub(1).and_then(|i| self.chars.get(i)) {
            Some(c) => c.end,
            None => self.chars.first().map_or(self.caret, |c| c.start),
        }
    }
}

/// Text color in effect at `id`: the nearest declared color walking up the
/// ancestors, else `default`. Depends only on the tree position.
pub fn ambient_text_color<H: TextHost + ?Sized>(host: &H, id: NodeId, default: Rgb) -> Rgb {
    let mut current = Some(id);
    while let Some(node) = current {
        if let Some(color) = host.declared_color(node) {
            return color;
        }
        current = host.parent(node);
    }
    default
}

#[cfg(test)]
#[path = "../../tests/unit/highlight/navigator.rs"]
mod tests;
