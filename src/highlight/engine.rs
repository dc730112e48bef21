//! Highlight state machine.
//!
//! A word is either unhighlighted (no record, no annotations) or highlighted
//! (`1..=max_mark_count`, every occurrence wrapped with identical attributes).
//! The persisted record is authoritative; annotations are its projection in
//! the tree and every operation restores that relation before returning.
//! Tree changes always complete, even when the store write fails.

use super::boundary::normalize_word;
use super::color::{ColorLevelCalculator, Palette};
use super::config::HighlightConfig;
use super::error::HighlightError;
use super::expander::SelectionExpander;
use super::mutator::{annotations_for, AnnotationMutator, MarkSpec, ScanPolicy, WrapOutcome};
use super::navigator;
use crate::models::{NodeId, TextHost, TextRange};
use crate::services::ports::{HighlightEvents, MarkStore, NoopEvents};
use compact_str::CompactString;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightReport {
    pub word: CompactString,
    pub mark_count: u32,
    /// `0` once the word is unhighlighted.
    pub level: u8,
    pub wrapped: usize,
    pub restyled: usize,
    pub unwrapped: usize,
    /// False when the store write failed; the tree change was still applied.
    pub persisted: bool,
}

impl HighlightReport {
    fn new(word: &str) -> Self {
        Self {
            word: word.into(),
            mark_count: 0,
            level: 0,
            wrapped: 0,
            restyled: 0,
            unwrapped: 0,
            persisted: true,
        }
    }
}

/// Where a toggle takes its color context from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleTarget {
    Selection(TextRange),
    Element(NodeId),
    Document,
}

pub struct HighlightEngine<S, E = NoopEvents> {
    store: S,
    events: E,
    config: HighlightConfig,
    calculator: ColorLevelCalculator,
    expander: SelectionExpander,
}

impl<S: MarkStore> HighlightEngine<S, NoopEvents> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, HighlightConfig::default())
    }

    pub fn with_config(store: S, config: HighlightConfig) -> Self {
        let palette = Palette::builtin(&config.default_base_color);
        Self::with_palette(store, config, palette)
    }

    pub fn with_palette(store: S, config: HighlightConfig, palette: Palette) -> Self {
        Self {
            calculator: ColorLevelCalculator::new(palette, &config),
            expander: SelectionExpander::new(&config),
            store,
            events: NoopEvents,
            config,
        }
    }
}

impl<S: MarkStore, E: HighlightEvents> HighlightEngine<S, E> {
    pub fn with_events<E2: HighlightEvents>(self, events: E2) -> HighlightEngine<S, E2> {
        HighlightEngine {
            store: self.store,
            events,
            config: self.config,
            calculator: self.calculator,
            expander: self.expander,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    pub fn calculator(&self) -> &ColorLevelCalculator {
        &self.calculator
    }

    pub fn expander(&self) -> &SelectionExpander {
        &self.expander
    }

    fn mutator(&self) -> AnnotationMutator<'_> {
        AnnotationMutator::new(&self.calculator)
    }

    /// Mark count currently stamped on the word's annotations, if any.
    pub fn tree_count<H: TextHost + ?Sized>(&self, host: &H, word: &str) -> Option<u32> {
        let key = normalize_word(word);
        annotations_for(host, host.root(), &key)
            .first()
            .and_then(|&node| host.mark(node))
            .map(|mark| mark.mark_count)
    }

    async fn base_color(&self) -> CompactString {
        match self.store.get_settings().await {
            Ok(settings) => {
                if self.calculator.palette().get(&settings.base_color_id).is_none() {
                    tracing::warn!(
                        base_color = %settings.base_color_id,
                        "unknown base color, shades fall back to the default palette entry"
                    );
                }
                settings.base_color_id.into()
            }
            Err(err) => {
                tracing::warn!(error = %err, "reading settings failed, using default base color");
                self.config.default_base_color.clone()
            }
        }
    }

    async fn persist_count(&self, word: &str, count: u32) -> bool {
        match self.store.update_word_marking(word, count).await {
            Ok(()) => true,
            Err(err) => {
                let err = HighlightError::from(err);
                tracing::warn!(word, count, error = %err, "persisting mark count failed");
                false
            }
        }
    }

    async fn stored_count(&self, word: &str) -> u32 {
        match self.store.get_mark_count(word).await {
            Ok(count) => count,
            Err(err) => {
                tracing::warn!(word, error = %err, "reading mark count failed");
                0
            }
        }
    }

    /// Highlights every occurrence of an unhighlighted word with count 1.
    /// `context` seeds the ambient text color for occurrences whose own
    /// ancestors declare none.
    pub async fn add<H: TextHost + ?Sized>(
        &self,
        host: &mut H,
        word: &str,
        context: NodeId,
    ) -> Result<HighlightReport, HighlightError> {
        let key = normalize_word(word);
        if key.is_empty() {
            tracing::warn!("add called with an empty word");
            return Err(HighlightError::EmptyInput);
        }
        let root = host.root();
        if !annotations_for(host, root, &key).is_empty() {
            tracing::warn!(word = %key, "add on a highlighted word ignored");
            return Err(HighlightError::AlreadyHighlighted { word: key });
        }

        let base_color = self.base_color().await;
        let mut report = HighlightReport::new(&key);
        report.mark_count = 1;
        report.level = self.calculator.level(1);
        report.persisted = self.persist_count(&key, 1).await;

        let spec = MarkSpec {
            word: &key,
            mark_count: 1,
            base_color: &base_color,
            fallback_ambient: navigator::ambient_text_color(
                host,
                context,
                self.config.default_ambient,
            ),
        };
        report.wrapped = self
            .mutator()
            .scan_and_wrap(host, root, &spec, ScanPolicy::ForceAll, None)?;
        if report.wrapped == 0 {
            let err = HighlightError::NotFound { word: key.clone() };
            tracing::warn!(error = %err, "record kept, later text needs a rescan");
        }
        tracing::debug!(word = %key, wrapped = report.wrapped, "word added");
        Ok(report)
    }

    /// Highlights from a user selection. Inside (or matching) an existing
    /// highlight this increments the word; otherwise the selection is
    /// expanded to a token, wrapped, and the rest of the document after it
    /// is synchronized.
    pub async fn apply_to_selection<H: TextHost + ?Sized>(
        &self,
        host: &mut H,
        range: &TextRange,
    ) -> Result<HighlightReport, HighlightError> {
        if range.is_collapsed() {
            tracing::warn!("collapsed selection ignored");
            return Err(HighlightError::EmptyInput);
        }

        // Only a selection held entirely by one annotation counts as
        // selecting that annotation.
        let existing = host
            .annotation_ancestor(range.start.node)
            .filter(|&node| host.annotation_ancestor(range.end.node) == Some(node))
            .and_then(|node| host.mark(node))
            .map(|mark| mark.word.clone());
        if let Some(word) = existing {
            return self.increment(host, &word, None).await;
        }

        let expanded = self.expander.expand(host, range);
        let key = normalize_word(&expanded.to_text(host));
        if key.is_empty() {
            tracing::warn!("selection holds no word");
            return Err(HighlightError::EmptyInput);
        }

        if !annotations_for(host, host.root(), &key).is_empty() {
            return self.increment(host, &key, Some(expanded)).await;
        }
        self.highlight_fresh(host, &key, expanded).await
    }

    async fn highlight_fresh<H: TextHost + ?Sized>(
        &self,
        host: &mut H,
        key: &str,
        mut range: TextRange,
    ) -> Result<HighlightReport, HighlightError> {
        let base_color = self.base_color().await;
        let mut report = HighlightReport::new(key);
        report.mark_count = 1;
        report.level = self.calculator.level(1);
        report.persisted = self.persist_count(key, 1).await;

        let mutator = self.mutator();
        let root = host.root();
        let cleared = mutator.clear_annotations_in_range(host, &mut range);
        if cleared > 0 {
            tracing::debug!(word = key, cleared, "cleared annotations under selection");
        }

        let spec = MarkSpec {
            word: key,
            mark_count: 1,
            base_color: &base_color,
            fallback_ambient: navigator::ambient_text_color(
                host,
                range.start.node,
                self.config.default_ambient,
            ),
        };
        report.wrapped = match mutator.wrap_with_fallback(host, &range, &spec) {
            Ok(WrapOutcome::Direct(_)) => 1,
            Ok(WrapOutcome::Ancestor { wrapped, .. }) => wrapped,
            Err(err) => {
                tracing::warn!(word = key, error = %err, "selection could not be wrapped");
                0
            }
        };
        mutator.remove_empty(host, root);
        report.wrapped += mutator.scan_and_wrap(
            host,
            root,
            &spec,
            ScanPolicy::SkipExisting,
            Some(range.start),
        )?;
        tracing::debug!(word = key, wrapped = report.wrapped, "selection highlighted");
        Ok(report)
    }

    async fn increment<H: TextHost + ?Sized>(
        &self,
        host: &mut H,
        key: &str,
        selection: Option<TextRange>,
    ) -> Result<HighlightReport, HighlightError> {
        let root = host.root();
        let Some(current) = annotations_for(host, root, key)
            .first()
            .and_then(|&node| host.mark(node))
            .cloned()
        else {
            return Err(HighlightError::NotFound { word: key.into() });
        };

        let stored = self.stored_count(key).await;
        let prior = if stored > 0 { stored } else { current.mark_count };
        let count = self.config.clamp_count(prior.saturating_add(1));

        let mut report = HighlightReport::new(key);
        report.mark_count = count;
        report.level = self.calculator.level(count);
        report.persisted = self.persist_count(key, count).await;

        let spec = MarkSpec {
            word: key,
            mark_count: count,
            base_color: &current.base_color,
            fallback_ambient: self.config.default_ambient,
        };
        let mutator = self.mutator();

        // An occurrence typed in after the last scan is still plain text.
        if let Some(mut range) = selection {
            if host.annotation_ancestor(range.start.node).is_none() {
                mutator.clear_annotations_in_range(host, &mut range);
                report.wrapped = match mutator.wrap_with_fallback(host, &range, &spec) {
                    Ok(WrapOutcome::Direct(_)) => 1,
                    Ok(WrapOutcome::Ancestor { wrapped, .. }) => wrapped,
                    Err(err) => {
                        tracing::warn!(word = key, error = %err, "selection could not be wrapped");
                        0
                    }
                };
                mutator.remove_empty(host, root);
            }
        }

        report.restyled = mutator.restyle_word(host, root, &spec)?;
        tracing::debug!(word = key, count, "mark count incremented");
        Ok(report)
    }

    /// Lowers the count by one from `count`; reaching zero removes the word.
    pub async fn decrease<H: TextHost + ?Sized>(
        &self,
        host: &mut H,
        word: &str,
        count: u32,
    ) -> Result<HighlightReport, HighlightError> {
        let key = normalize_word(word);
        if key.is_empty() {
            tracing::warn!("decrease called with an empty word");
            return Err(HighlightError::EmptyInput);
        }
        let root = host.root();
        let tree_base = annotations_for(host, root, &key)
            .first()
            .and_then(|&node| host.mark(node))
            .map(|mark| mark.base_color.clone());
        if tree_base.is_none() && self.stored_count(&key).await == 0 {
            let err = HighlightError::NotFound { word: key };
            tracing::warn!(error = %err, "decrease on an unhighlighted word ignored");
            return Err(err);
        }

        let count = self.config.clamp_count(count).saturating_sub(1);
        if count == 0 {
            return self.remove(host, &key).await;
        }

        let base_color = match tree_base {
            Some(base_color) => base_color,
            None => self.base_color().await,
        };

        let mut report = HighlightReport::new(&key);
        report.mark_count = count;
        report.level = self.calculator.level(count);
        report.persisted = self.persist_count(&key, count).await;

        let spec = MarkSpec {
            word: &key,
            mark_count: count,
            base_color: &base_color,
            fallback_ambient: self.config.default_ambient,
        };
        report.restyled = match self.mutator().restyle_word(host, root, &spec) {
            Ok(restyled) => restyled,
            Err(err) => {
                tracing::warn!(error = %err, "nothing to restyle");
                0
            }
        };
        tracing::debug!(word = %key, count, "mark count decreased");
        Ok(report)
    }

    /// Deletes the record and unwraps every annotation for the word. The
    /// unwrap happens even when the delete fails.
    pub async fn remove<H: TextHost + ?Sized>(
        &self,
        host: &mut H,
        word: &str,
    ) -> Result<HighlightReport, HighlightError> {
        let key = normalize_word(word);
        if key.is_empty() {
            tracing::warn!("remove called with an empty word");
            return Err(HighlightError::EmptyInput);
        }

        let mut report = HighlightReport::new(&key);
        if let Err(err) = self.store.remove_word_marking(&key).await {
            let err = HighlightError::from(err);
            tracing::warn!(word = %key, error = %err, "deleting mark record failed");
            report.persisted = false;
        }
        let root = host.root();
        report.unwrapped = self.mutator().unwrap_word(host, root, &key);
        tracing::debug!(word = %key, unwrapped = report.unwrapped, "word removed");
        Ok(report)
    }

    /// Removes a highlighted word, or highlights an unhighlighted one using
    /// the most specific context available.
    pub async fn toggle<H: TextHost + ?Sized>(
        &self,
        host: &mut H,
        word: &str,
        target: ToggleTarget,
    ) -> Result<HighlightReport, HighlightError> {
        let key = normalize_word(word);
        if key.is_empty() {
            tracing::warn!("toggle called with an empty word");
            return Err(HighlightError::EmptyInput);
        }

        let stored = self.stored_count(&key).await;
        let current = stored.max(self.tree_count(host, &key).unwrap_or(0));
        if current > 0 {
            return self.remove(host, &key).await;
        }

        match target {
            ToggleTarget::Selection(range) => self.apply_to_selection(host, &range).await,
            ToggleTarget::Element(node) => self.add(host, &key, node).await,
            ToggleTarget::Document => {
                tracing::warn!(word = %key, "no color context given, seeding from the document root");
                let root = host.root();
                self.add(host, &key, root).await
            }
        }
    }

    /// Notifies the UI that the pointer entered an annotation. Returns false
    /// when `node` is not inside one.
    pub fn hover_enter<H: TextHost + ?Sized>(&self, host: &H, node: NodeId) -> bool {
        let Some((word, annotation)) = hovered(host, node) else {
            return false;
        };
        self.events.on_hover_enter(word, annotation);
        true
    }

    pub fn hover_leave<H: TextHost + ?Sized>(&self, host: &H, node: NodeId) -> bool {
        let Some((word, annotation)) = hovered(host, node) else {
            return false;
        };
        self.events.on_hover_leave(word, annotation);
        true
    }
}

fn hovered<H: TextHost + ?Sized>(host: &H, node: NodeId) -> Option<(&str, NodeId)> {
    let annotation = host.annotation_ancestor(node)?;
    let mark = host.mark(annotation)?;
    Some((mark.word.as_str(), annotation))
}

#[cfg(test)]
#[path = "../../tests/unit/highlight/engine.rs"]
mod tests;
