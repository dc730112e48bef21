//! 文本位置与选区

use super::host::TextHost;
use super::text_tree::NodeId;
use crate::highlight::navigator;

/// A caret inside a text segment. `offset` is a UTF-8 byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub node: NodeId,
    pub offset: usize,
}

impl Position {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn caret(at: Position) -> Self {
        Self { start: at, end: at }
    }

    /// Range over `start..end` bytes of a single segment.
    pub fn within(node: NodeId, start: usize, end: usize) -> Self {
        Self {
            start: Position::new(node, start),
            end: Position::new(node, end),
        }
    }

    pub fn start_position(&self) -> Position {
        self.start
    }

    pub fn end_position(&self) -> Position {
        self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Concatenated text between the two positions in document order.
    pub fn to_text<H: TextHost + ?Sized>(&self, host: &H) -> String {
        let (start, end) = (self.start, self.end);
        let Some(start_text) = host.text(start.node) else {
            return String::new();
        };

        if start.node == end.node {
            return start_text
                .get(start.offset..end.offset.max(start.offset))
                .unwrap_or_default()
                .to_string();
        }

        let mut out = start_text.get(start.offset..).unwrap_or_default().to_string();
        let mut current = navigator::next_text(host, start.node);
        while let Some(node) = current {
            let text = host.text(node).unwrap_or_default();
            if node == end.node {
                out.push_str(text.get(..end.offset).unwrap_or(text));
                return out;
            }
            out.push_str(text);
            current = navigator::next_text(host, node);
        }
        out
    }
}
