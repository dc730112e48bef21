//! 宿主树能力：引擎只通过该 trait 读取和修改文档

use super::mark::Mark;
use super::text_tree::{NodeId, TreeError};
use crate::highlight::color::Rgb;

/// Mutation capability over a document text tree.
///
/// The engine never owns segments. Every read and every structural change
/// goes through this trait, so a host can back it with whatever document
/// model it renders; [`TextTree`](super::TextTree) is the in-memory one.
pub trait TextHost {
    fn root(&self) -> NodeId;
    fn contains(&self, id: NodeId) -> bool;
    fn parent(&self, id: NodeId) -> Option<NodeId>;
    fn children(&self, id: NodeId) -> &[NodeId];

    /// Text of a segment node, `None` for anything else.
    fn text(&self, id: NodeId) -> Option<&str>;
    /// Attributes of an annotation node, `None` for anything else.
    fn mark(&self, id: NodeId) -> Option<&Mark>;
    fn mark_mut(&mut self, id: NodeId) -> Option<&mut Mark>;

    fn is_block(&self, id: NodeId) -> bool;
    /// Text color declared directly on an element, without inheritance.
    fn declared_color(&self, id: NodeId) -> Option<Rgb>;

    /// Splits a segment at byte offset `at`, keeping the head in `id` and
    /// returning the new tail segment inserted right after it.
    fn split_text(&mut self, id: NodeId, at: usize) -> Result<NodeId, TreeError>;
    /// Replaces `id` with a new annotation node that has `id` as its only child.
    fn wrap(&mut self, id: NodeId, mark: Mark) -> Result<NodeId, TreeError>;
    /// Moves an annotation's children to its parent and drops the annotation.
    /// No-op for an annotation without a parent.
    fn unwrap(&mut self, id: NodeId) -> Result<(), TreeError>;
    /// Joins adjacent text children of `parent` and drops empty ones.
    fn merge_text_siblings(&mut self, parent: NodeId);

    fn is_text(&self, id: NodeId) -> bool {
        self.text(id).is_some()
    }

    fn is_annotation(&self, id: NodeId) -> bool {
        self.mark(id).is_some()
    }

    fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Closest annotation node at or above `id`.
    fn annotation_ancestor(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.is_annotation(node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            if let Some(text) = self.text(node) {
                out.push_str(text);
                continue;
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }
}
