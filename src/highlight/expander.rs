//! Grows a raw selection to complete tokens.
//!
//! Each edge is resolved on its own: a context window is gathered around the
//! edge, token patterns are tried in priority order, and the first match that
//! straddles the edge decides where the token begins or ends. When no pattern
//! applies, or the window was too short to see the whole token, the edge
//! walks char by char until it meets a boundary.

use super::boundary::is_boundary;
use super::config::HighlightConfig;
use super::navigator::{self, ContextWindow};
use crate::models::{Position, TextHost, TextRange};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

/// Priority order: hyphenated compounds, contractions, number plus unit,
/// plain alphanumeric word.
static TOKEN_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"[\p{Alphabetic}\p{N}]+(?:-[\p{Alphabetic}\p{N}]+)+",
        r"[\p{Alphabetic}\p{N}]+['’][\p{Alphabetic}\p{N}]+",
        r"\d+[\p{Alphabetic}%]+",
        r"[\p{Alphabetic}\p{N}]+",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    End,
}

#[derive(Debug, Clone)]
pub struct SelectionExpander {
    context_radius: usize,
    max_hops: usize,
}

impl Default for SelectionExpander {
    fn default() -> Self {
        Self::new(&HighlightConfig::default())
    }
}

impl SelectionExpander {
    pub fn new(config: &HighlightConfig) -> Self {
        Self {
            context_radius: config.context_radius.max(1),
            max_hops: config.max_hops,
        }
    }

    pub fn expand<H: TextHost + ?Sized>(&self, host: &H, range: &TextRange) -> TextRange {
        let (mut start, mut end) = ordered(host, range.start, range.end);

        if start != end {
            (start, end) = self.trim(host, start, end);
        }

        let start = self.expand_edge(host, start, Edge::Start);
        let end = self.expand_edge(host, end, Edge::End);
        let (start, end) = ordered(host, start, end);
        TextRange::new(start, end)
    }

    /// Pulls both edges inward past boundary chars so the selection starts and
    /// ends on token chars.
    fn trim<H: TextHost + ?Sized>(
        &self,
        host: &H,
        mut start: Position,
        mut end: Position,
    ) -> (Position, Position) {
        let mut steps = 0usize;
        while start != end && steps < self.max_hops {
            match navigator::char_after(host, start) {
                Some((ch, _, next)) if is_boundary(ch) => start = next,
                _ => break,
            }
            steps += 1;
        }
        while start != end && steps < self.max_hops {
            match navigator::char_before(host, end) {
                Some((ch, prev, _)) if is_boundary(ch) => end = prev,
                _ => break,
            }
            steps += 1;
        }
        if steps >= self.max_hops && start != end {
            tracing::warn!(
                max_hops = self.max_hops,
                "selection trim hit the hop limit, keeping edges"
            );
        }
        if navigator::compare_positions(host, start, end) == Ordering::Greater {
            return (start, start);
        }
        (start, end)
    }

    fn expand_edge<H: TextHost + ?Sized>(&self, host: &H, pos: Position, edge: Edge) -> Position {
        let neighbor = match edge {
            Edge::Start => navigator::char_before(host, pos),
            Edge::End => navigator::char_after(host, pos),
        };
        match neighbor {
            Some((ch, _, _)) if !is_boundary(ch) => {}
            _ => return pos,
        }

        let window = ContextWindow::build(host, pos, self.context_radius);
        let Some((token_start, token_end)) = token_at(&window, edge) else {
            tracing::debug!(?edge, "no token pattern at cursor, walking to boundary");
            return self.walk(host, pos, edge);
        };

        match edge {
            Edge::Start if token_start == 0 && window.truncated_start() => {
                self.walk(host, window.start_position(0), edge)
            }
            Edge::Start => window.start_position(token_start),
            Edge::End if token_end == window.len() && window.truncated_end() => {
                self.walk(host, window.end_position(token_end), edge)
            }
            Edge::End => window.end_position(token_end),
        }
    }

    /// Steps one char at a time until the next char is a boundary.
    fn walk<H: TextHost + ?Sized>(&self, host: &H, pos: Position, edge: Edge) -> Position {
        let mut current = pos;
        for _ in 0..self.max_hops {
            let step = match edge {
                Edge::Start => navigator::char_before(host, current).map(|(ch, at, _)| (ch, at)),
                Edge::End => navigator::char_after(host, current).map(|(ch, _, at)| (ch, at)),
            };
            match step {
                Some((ch, next)) if !is_boundary(ch) => current = next,
                _ => return current,
            }
        }
        tracing::warn!(
            ?edge,
            max_hops = self.max_hops,
            "selection expansion made no progress, keeping edge"
        );
        pos
    }
}

/// Char span of the first pattern match that straddles the window's cursor.
fn token_at(window: &ContextWindow, edge: Edge) -> Option<(usize, usize)> {
    let cursor = window.cursor();
    for pattern in TOKEN_PATTERNS.iter() {
        for m in pattern.find_iter(window.text()) {
            let start = window.char_index(m.start());
            let end = window.char_index(m.end());
            let straddles = match edge {
                Edge::Start => start < cursor && cursor <= end,
                Edge::End => start <= cursor && cursor < end,
            };
            if straddles {
                return Some((start, end));
            }
            if start > cursor {
                break;
            }
        }
    }
    None
}

fn ordered<H: TextHost + ?Sized>(host: &H, a: Position, b: Position) -> (Position, Position) {
    if navigator::compare_positions(host, a, b) == Ordering::Greater {
        (b, a)
    } else {
        (a, b)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/highlight/expander.rs"]
mod tests;
