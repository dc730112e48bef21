//! Word boundary rules and word key normalization.

use compact_str::CompactString;

/// Anything that is not alphanumeric delimits a token: whitespace,
/// punctuation, underscore, hyphen, brackets.
pub fn is_boundary(ch: char) -> bool {
    !ch.is_alphanumeric()
}

/// True if the span `start..start + len` (bytes) is delimited on both sides
/// by a boundary character or the edge of `text`.
pub fn has_word_boundary(text: &str, start: usize, len: usize) -> bool {
    let Some(end) = start.checked_add(len) else {
        return false;
    };
    let (Some(before), Some(after)) = (text.get(..start), text.get(end..)) else {
        return false;
    };
    let before_ok = before.chars().next_back().map_or(true, is_boundary);
    let after_ok = after.chars().next().map_or(true, is_boundary);
    before_ok && after_ok
}

/// Lookup key for a word: trimmed and lowercased.
pub fn normalize_word(word: &str) -> CompactString {
    CompactString::from(word.trim().to_lowercase())
}

/// Lowercased copy of a segment plus a byte map back into the original.
///
/// Folding is per char, so final sigma `ς` is folded to `σ` to agree with
/// keys produced by [`normalize_word`] regardless of where the sigma sits.
///
/// `map[i]` is the original byte offset of the char that produced folded
/// byte `i`; `map[folded.len()]` is the original length.
#[derive(Debug, Clone)]
pub struct FoldedText {
    pub folded: String,
    map: Vec<usize>,
}

impl FoldedText {
    pub fn new(text: &str) -> Self {
        let mut folded = String::with_capacity(text.len());
        let mut map = Vec::with_capacity(text.len() + 1);
        for (offset, ch) in text.char_indices() {
            for lower in ch.to_lowercase().map(fold_sigma) {
                let before = folded.len();
                folded.push(lower);
                map.extend(std::iter::repeat(offset).take(folded.len() - before));
            }
        }
        map.push(text.len());
        Self { folded, map }
    }

    /// Maps a folded span back to the original, `None` if either edge falls
    /// inside the expansion of a single original char.
    pub fn original_span(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        if end > self.folded.len() || start > end {
            return None;
        }
        let starts_char = |i: usize| i == 0 || i == self.folded.len() || self.map[i] != self.map[i - 1];
        if !starts_char(start) || !starts_char(end) {
            return None;
        }
        Some((self.map[start], self.map[end]))
    }
}

fn fold_sigma(ch: char) -> char {
    if ch == 'ς' {
        'σ'
    } else {
        ch
    }
}

#[cfg(test)]
#[path = "../../tests/unit/highlight/boundary.rs"]
mod tests;
