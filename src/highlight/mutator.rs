//! Tree mutation primitives for annotation nodes.
//!
//! Invariants kept here: annotations never nest or overlap, and an
//! annotation never wraps empty text.

use super::boundary::{has_word_boundary, is_boundary, FoldedText};
use super::color::{ColorLevelCalculator, Rgb};
use super::error::HighlightError;
use super::navigator;
use crate::models::{Mark, NodeId, Position, TextHost, TextRange, TreeError};
use memchr::memmem::Finder;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPolicy {
    /// Leave annotated text and everything before the reference position alone.
    SkipExisting,
    /// Rescan every plain occurrence, including ones whose annotation for
    /// this word was dropped.
    ForceAll,
}

/// Attributes stamped onto every annotation created or restyled for a word.
#[derive(Debug, Clone, Copy)]
pub struct MarkSpec<'a> {
    pub word: &'a str,
    pub mark_count: u32,
    pub base_color: &'a str,
    /// Ambient text color used where no ancestor declares one.
    pub fallback_ambient: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapOutcome {
    Direct(NodeId),
    Ancestor { container: NodeId, wrapped: usize },
}

pub struct AnnotationMutator<'a> {
    calculator: &'a ColorLevelCalculator,
}

impl<'a> AnnotationMutator<'a> {
    pub fn new(calculator: &'a ColorLevelCalculator) -> Self {
        Self { calculator }
    }

    fn build_mark<H: TextHost + ?Sized>(&self, host: &H, at: NodeId, spec: &MarkSpec<'_>) -> Mark {
        let ambient = navigator::ambient_text_color(host, at, spec.fallback_ambient);
        let style = self
            .calculator
            .style_for(spec.base_color, spec.mark_count, ambient);
        Mark::new(spec.word, spec.mark_count, spec.base_color, style)
    }

    /// Splits `segment` into before/match/after and wraps the match.
    pub fn wrap<H: TextHost + ?Sized>(
        &self,
        host: &mut H,
        segment: NodeId,
        match_start: usize,
        match_len: usize,
        spec: &MarkSpec<'_>,
    ) -> Result<NodeId, HighlightError> {
        self.wrap_split(host, segment, match_start, match_len, spec)
            .map(|(wrapper, _)| wrapper)
    }

    /// Like [`Self::wrap`], also returning the segment holding the text after
    /// the match, if any was split off.
    fn wrap_split<H: TextHost + ?Sized>(
        &self,
        host: &mut H,
        segment: NodeId,
        match_start: usize,
        match_len: usize,
        spec: &MarkSpec<'_>,
    ) -> Result<(NodeId, Option<NodeId>), HighlightError> {
        let text_len = host.text(segment).ok_or(TreeError::NotText)?.len();
        if match_len == 0 {
            return Err(HighlightError::EmptyInput);
        }
        let match_end = match_start + match_len;
        if match_end > text_len {
            return Err(TreeError::OffsetOutOfBounds {
                offset: match_end,
                len: text_len,
            }
            .into());
        }
        if host.annotation_ancestor(segment).is_some() {
            return Err(HighlightError::StructuralConflict);
        }

        let tail = if match_end < text_len {
            Some(host.split_text(segment, match_end)?)
        } else {
            None
        };
        let target = if match_start > 0 {
            host.split_text(segment, match_start)?
        } else {
            segment
        };
        let mark = self.build_mark(host, target, spec);
        let wrapper = host.wrap(target, mark)?;
        Ok((wrapper, tail))
    }

    /// Wraps a range confined to one segment.
    pub fn wrap_range<H: TextHost + ?Sized>(
        &self,
        host: &mut H,
        range: &TextRange,
        spec: &MarkSpec<'_>,
    ) -> Result<NodeId, HighlightError> {
        let (start, end) = (range.start, range.end);
        if start.node != end.node || !host.is_text(start.node) {
            return Err(HighlightError::StructuralConflict);
        }
        if end.offset <= start.offset {
            return Err(HighlightError::EmptyInput);
        }
        self.wrap(host, start.node, start.offset, end.offset - start.offset, spec)
    }

    /// Direct wrap, then on a structural conflict a subtree scan at each
    /// ancestor of the selection's container until one wraps something.
    pub fn wrap_with_fallback<H: TextHost + ?Sized>(
        &self,
        host: &mut H,
        range: &TextRange,
        spec: &MarkSpec<'_>,
    ) -> Result<WrapOutcome, HighlightError> {
        match self.wrap_range(host, range, spec) {
            Ok(wrapper) => return Ok(WrapOutcome::Direct(wrapper)),
            Err(HighlightError::StructuralConflict) => {}
            Err(err) => return Err(err),
        }

        tracing::debug!(word = spec.word, "direct wrap failed, retrying on ancestors");
        let mut container = Some(navigator::common_ancestor(
            host,
            range.start.node,
            range.end.node,
        ));
        while let Some(node) = container {
            let wrapped = self.scan_and_wrap(host, node, spec, ScanPolicy::SkipExisting, None)?;
            if wrapped > 0 {
                return Ok(WrapOutcome::Ancestor {
                    container: node,
                    wrapped,
                });
            }
            container = host.parent(node);
        }

        tracing::warn!(word = spec.word, "no ancestor could wrap the selection");
        Err(HighlightError::StructuralConflict)
    }

    /// Wraps every boundary-respecting occurrence of `spec.word` under `root`.
    pub fn scan_and_wrap<H: TextHost + ?Sized>(
        &self,
        host: &mut H,
        root: NodeId,
        spec: &MarkSpec<'_>,
        policy: ScanPolicy,
        reference: Option<Position>,
    ) -> Result<usize, HighlightError> {
        let needle = FoldedText::new(spec.word.trim()).folded;
        if needle.is_empty() {
            return Err(HighlightError::EmptyInput);
        }
        if policy == ScanPolicy::ForceAll {
            self.unwrap_word(host, root, spec.word);
        }

        let finder = Finder::new(needle.as_bytes());
        let mut wrapped = 0usize;
        for node in navigator::text_nodes(host, root) {
            // Text under another word's annotation is never wrapped again.
            if host.annotation_ancestor(node).is_some() {
                continue;
            }

            let mut from = 0usize;
            if let (ScanPolicy::SkipExisting, Some(reference)) = (policy, reference) {
                match navigator::compare_nodes(host, node, reference.node) {
                    Ordering::Less => continue,
                    Ordering::Equal => from = reference.offset,
                    Ordering::Greater => {}
                }
            }

            let mut current = node;
            while let Some((start, len)) = find_in_segment(host, &finder, current, from) {
                match self.wrap_split(host, current, start, len, spec) {
                    Ok((_, tail)) => {
                        wrapped += 1;
                        match tail {
                            Some(tail) => {
                                current = tail;
                                from = 0;
                            }
                            None => break,
                        }
                    }
                    Err(err) => {
                        tracing::warn!(word = spec.word, error = %err, "skipping occurrence");
                        break;
                    }
                }
            }
        }

        tracing::debug!(word = spec.word, ?policy, wrapped, "scan and wrap finished");
        Ok(wrapped)
    }

    pub fn unwrap<H: TextHost + ?Sized>(&self, host: &mut H, node: NodeId) -> Result<(), HighlightError> {
        host.unwrap(node)?;
        Ok(())
    }

    /// Unwraps every annotation for `word` under `root` and rejoins the text
    /// it split. Returns how many annotations were removed.
    pub fn unwrap_word<H: TextHost + ?Sized>(&self, host: &mut H, root: NodeId, word: &str) -> usize {
        let targets = annotations_for(host, root, word);
        let mut parents = FxHashSet::default();
        let mut removed = 0usize;
        for node in targets {
            let parent = host.parent(node);
            match host.unwrap(node) {
                Ok(()) => {
                    removed += 1;
                    parents.extend(parent);
                }
                Err(err) => tracing::warn!(word, error = %err, "unwrap failed"),
            }
        }
        for parent in parents {
            host.merge_text_siblings(parent);
        }
        removed
    }

    /// Unwraps annotations whose text is empty or whitespace only.
    pub fn remove_empty<H: TextHost + ?Sized>(&self, host: &mut H, root: NodeId) -> usize {
        let empty: Vec<NodeId> = navigator::annotation_nodes(host, root)
            .into_iter()
            .filter(|&node| host.text_content(node).trim().is_empty())
            .collect();
        let mut removed = 0usize;
        for node in empty {
            if host.unwrap(node).is_ok() {
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::debug!(removed, "removed empty annotations");
        }
        removed
    }

    /// Unwraps every annotation that intersects `range`, so a fresh wrap
    /// there cannot nest, and rejoins the text they split. `range` is moved
    /// onto the merged segments so it still covers the same text.
    pub fn clear_annotations_in_range<H: TextHost + ?Sized>(
        &self,
        host: &mut H,
        range: &mut TextRange,
    ) -> usize {
        let root = host.root();
        let hits: Vec<NodeId> = navigator::annotation_nodes(host, root)
            .into_iter()
            .filter(|&node| intersects(host, node, range))
            .collect();
        let mut parents = FxHashSet::default();
        let mut cleared = 0usize;
        for node in hits {
            let parent = host.parent(node);
            if host.unwrap(node).is_ok() {
                cleared += 1;
                parents.extend(parent);
            }
        }
        for parent in parents {
            let mut positions = [range.start, range.end];
            merge_tracking(host, parent, &mut positions);
            *range = TextRange::new(positions[0], positions[1]);
        }
        cleared
    }

    /// Restamps every annotation for `spec.word` in place.
    pub fn restyle_word<H: TextHost + ?Sized>(
        &self,
        host: &mut H,
        root: NodeId,
        spec: &MarkSpec<'_>,
    ) -> Result<usize, HighlightError> {
        let targets = annotations_for(host, root, spec.word);
        if targets.is_empty() {
            return Err(HighlightError::NotFound {
                word: spec.word.into(),
            });
        }
        for &node in &targets {
            let ambient = navigator::ambient_text_color(host, node, spec.fallback_ambient);
            let style = self
                .calculator
                .style_for(spec.base_color, spec.mark_count, ambient);
            if let Some(mark) = host.mark_mut(node) {
                mark.restyle(spec.mark_count, spec.base_color, style);
            }
        }
        Ok(targets.len())
    }
}

/// Annotation nodes for `word` under `root` in document order.
pub fn annotations_for<H: TextHost + ?Sized>(host: &H, root: NodeId, word: &str) -> Vec<NodeId> {
    navigator::annotation_nodes(host, root)
        .into_iter()
        .filter(|&node| host.mark(node).is_some_and(|m| m.word == word))
        .collect()
}

/// Merges the text children of `parent`, moving any position that pointed
/// into a merged segment onto the segment that absorbed it.
fn merge_tracking<H: TextHost + ?Sized>(host: &mut H, parent: NodeId, positions: &mut [Position]) {
    let children = host.children(parent).to_vec();
    let mut run: Option<(NodeId, usize)> = None;
    let mut dropped: Vec<NodeId> = Vec::new();
    for child in children {
        let Some(len) = host.text(child).map(str::len) else {
            run = None;
            dropped.clear();
            continue;
        };
        match run.as_mut() {
            Some((target, joined)) => {
                for pos in positions.iter_mut().filter(|p| p.node == child) {
                    *pos = Position::new(*target, *joined + pos.offset);
                }
                *joined += len;
            }
            // Empty segments at the head of a run are dropped by the merge.
            None if len == 0 => dropped.push(child),
            None => {
                for pos in positions.iter_mut().filter(|p| dropped.contains(&p.node)) {
                    *pos = Position::new(child, 0);
                }
                dropped.clear();
                run = Some((child, len));
            }
        }
    }
    host.merge_text_siblings(parent);
}

fn intersects<H: TextHost + ?Sized>(host: &H, node: NodeId, range: &TextRange) -> bool {
    if host.annotation_ancestor(range.start.node) == Some(node)
        || host.annotation_ancestor(range.end.node) == Some(node)
    {
        return true;
    }
    let texts = navigator::text_nodes(host, node);
    let (Some(&first), Some(&last)) = (texts.first(), texts.last()) else {
        return false;
    };
    let start = Position::new(first, 0);
    let end = Position::new(last, host.text(last).map_or(0, str::len));
    navigator::compare_positions(host, start, range.end) == Ordering::Less
        && navigator::compare_positions(host, range.start, end) == Ordering::Less
}

/// First occurrence at or after byte `from` whose edges are word boundaries,
/// looking into neighboring segments when the match touches a segment edge.
fn find_in_segment<H: TextHost + ?Sized>(
    host: &H,
    finder: &Finder<'_>,
    node: NodeId,
    from: usize,
) -> Option<(usize, usize)> {
    let text = host.text(node)?;
    let folded = FoldedText::new(text);
    let needle_len = finder.needle().len();
    for hit in finder.find_iter(folded.folded.as_bytes()) {
        let Some((start, end)) = folded.original_span(hit, hit + needle_len) else {
            continue;
        };
        if start < from || end == start {
            continue;
        }
        if !has_word_boundary(text, start, end - start) {
            continue;
        }
        if start == 0 && joins_neighbor(navigator::char_before(host, Position::new(node, 0))) {
            continue;
        }
        if end == text.len()
            && joins_neighbor(navigator::char_after(host, Position::new(node, end)))
        {
            continue;
        }
        return Some((start, end - start));
    }
    None
}

fn joins_neighbor(neighbor: Option<(char, Position, Position)>) -> bool {
    neighbor.is_some_and(|(ch, _, _)| !is_boundary(ch))
}

#[cfg(test)]
#[path = "../../tests/unit/highlight/mutator.rs"]
mod tests;
