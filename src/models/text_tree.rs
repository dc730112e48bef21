//! 文档文本树：元素、文本段与标注节点组成的 arena

use super::host::TextHost;
use super::mark::Mark;
use crate::highlight::color::Rgb;
use compact_str::CompactString;
use slotmap::{new_key_type, SlotMap};

new_key_type! { pub struct NodeId; }

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: CompactString,
    pub block: bool,
    pub color: Option<Rgb>,
}

impl Element {
    pub fn block(tag: &str) -> Self {
        Self {
            tag: tag.into(),
            block: true,
            color: None,
        }
    }

    pub fn inline(tag: &str) -> Self {
        Self {
            tag: tag.into(),
            block: false,
            color: None,
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Element(Element),
    Text(String),
    Annotation(Mark),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("invalid node id")]
    InvalidNodeId,
    #[error("node is not a text segment")]
    NotText,
    #[error("node is not an annotation")]
    NotAnnotation,
    #[error("offset {offset} out of bounds for segment of length {len}")]
    OffsetOutOfBounds { offset: usize, len: usize },
    #[error("offset {0} is not on a char boundary")]
    NotCharBoundary(usize),
    #[error("node is detached from the tree")]
    Detached,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextTree {
    arena: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl Default for TextTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TextTree {
    pub fn new() -> Self {
        Self::with_root(Element::block("body"))
    }

    pub fn with_root(root: Element) -> Self {
        let mut arena = SlotMap::with_key();
        let root = arena.insert(Node::new(NodeKind::Element(root), None));
        Self { arena, root }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() <= 1
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.arena.get(id).map(|n| &n.kind)
    }

    pub fn append_element(
        &mut self,
        parent: NodeId,
        element: Element,
    ) -> Result<NodeId, TreeError> {
        self.append(parent, NodeKind::Element(element))
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, TreeError> {
        self.append(parent, NodeKind::Text(text.to_string()))
    }

    fn append(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId, TreeError> {
        match self.arena.get(parent).map(|n| &n.kind) {
            None => return Err(TreeError::InvalidNodeId),
            Some(NodeKind::Text(_)) => return Err(TreeError::NotText),
            Some(_) => {}
        }
        let id = self.arena.insert(Node::new(kind, Some(parent)));
        self.arena
            .get_mut(parent)
            .ok_or(TreeError::InvalidNodeId)?
            .children
            .push(id);
        Ok(id)
    }

    /// Replaces a segment's text, as a host would after the user edits it.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), TreeError> {
        match self.arena.get_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Text(current)) => {
                current.clear();
                current.push_str(text);
                Ok(())
            }
            Some(_) => Err(TreeError::NotText),
            None => Err(TreeError::InvalidNodeId),
        }
    }

    /// Detaches a subtree and frees every node in it.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::InvalidNodeId);
        }
        let parent = self.arena.get(id).ok_or(TreeError::InvalidNodeId)?.parent;
        if let Some(parent_id) = parent {
            if let Some(parent_node) = self.arena.get_mut(parent_id) {
                parent_node.children.retain(|&c| c != id);
            }
        }
        self.recursive_remove(id);
        Ok(())
    }

    fn recursive_remove(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            if let Some(node) = self.arena.remove(node_id) {
                stack.extend(node.children);
            }
        }
    }

    fn position_in_parent(&self, id: NodeId) -> Result<(NodeId, usize), TreeError> {
        let node = self.arena.get(id).ok_or(TreeError::InvalidNodeId)?;
        let parent = node.parent.ok_or(TreeError::Detached)?;
        let index = self
            .arena
            .get(parent)
            .and_then(|p| p.children.iter().position(|&c| c == id))
            .ok_or(TreeError::Detached)?;
        Ok((parent, index))
    }
}

impl TextHost for TextTree {
    fn root(&self) -> NodeId {
        self.root
    }

    fn contains(&self, id: NodeId) -> bool {
        self.arena.contains_key(id)
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|n| n.parent)
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        self.arena
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    fn text(&self, id: NodeId) -> Option<&str> {
        match self.arena.get(id).map(|n| &n.kind) {
            Some(NodeKind::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    fn mark(&self, id: NodeId) -> Option<&Mark> {
        match self.arena.get(id).map(|n| &n.kind) {
            Some(NodeKind::Annotation(mark)) => Some(mark),
            _ => None,
        }
    }

    fn mark_mut(&mut self, id: NodeId) -> Option<&mut Mark> {
        match self.arena.get_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Annotation(mark)) => Some(mark),
            _ => None,
        }
    }

    fn is_block(&self, id: NodeId) -> bool {
        matches!(
            self.arena.get(id).map(|n| &n.kind),
            Some(NodeKind::Element(Element { block: true, .. }))
        )
    }

    fn declared_color(&self, id: NodeId) -> Option<Rgb> {
        match self.arena.get(id).map(|n| &n.kind) {
            Some(NodeKind::Element(element)) => element.color,
            _ => None,
        }
    }

    fn split_text(&mut self, id: NodeId, at: usize) -> Result<NodeId, TreeError> {
        let tail = {
            let node = self.arena.get_mut(id).ok_or(TreeError::InvalidNodeId)?;
            let NodeKind::Text(text) = &mut node.kind else {
                return Err(TreeError::NotText);
            };
            if at > text.len() {
                return Err(TreeError::OffsetOutOfBounds {
                    offset: at,
                    len: text.len(),
                });
            }
            if !text.is_char_boundary(at) {
                return Err(TreeError::NotCharBoundary(at));
            }
            text.split_off(at)
        };

        let (parent, index) = self.position_in_parent(id)?;
        let new_id = self
            .arena
            .insert(Node::new(NodeKind::Text(tail), Some(parent)));
        self.arena
            .get_mut(parent)
            .ok_or(TreeError::InvalidNodeId)?
            .children
            .insert(index + 1, new_id);
        Ok(new_id)
    }

    fn wrap(&mut self, id: NodeId, mark: Mark) -> Result<NodeId, TreeError> {
        let (parent, index) = self.position_in_parent(id)?;
        let wrapper = self
            .arena
            .insert(Node::new(NodeKind::Annotation(mark), Some(parent)));

        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children[index] = wrapper;
        }
        if let Some(wrapper_node) = self.arena.get_mut(wrapper) {
            wrapper_node.children.push(id);
        }
        if let Some(node) = self.arena.get_mut(id) {
            node.parent = Some(wrapper);
        }
        Ok(wrapper)
    }

    fn unwrap(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.arena.get(id).ok_or(TreeError::InvalidNodeId)?;
        if !matches!(node.kind, NodeKind::Annotation(_)) {
            return Err(TreeError::NotAnnotation);
        }
        if node.parent.is_none() {
            return Ok(());
        }

        let (parent, index) = self.position_in_parent(id)?;
        let children = self
            .arena
            .get_mut(id)
            .map(|n| std::mem::take(&mut n.children))
            .unwrap_or_default();
        for &child in &children {
            if let Some(child_node) = self.arena.get_mut(child) {
                child_node.parent = Some(parent);
            }
        }
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.splice(index..=index, children);
        }
        self.arena.remove(id);
        Ok(())
    }

    fn merge_text_siblings(&mut self, parent: NodeId) {
        let Some(children) = self.arena.get(parent).map(|n| n.children.clone()) else {
            return;
        };

        let mut kept = Vec::with_capacity(children.len());
        let mut current: Option<NodeId> = None;
        for child in children {
            let Some(text) = self.text(child).map(str::to_string) else {
                current = None;
                kept.push(child);
                continue;
            };
            match current {
                Some(target) => {
                    if let Some(NodeKind::Text(existing)) =
                        self.arena.get_mut(target).map(|n| &mut n.kind)
                    {
                        existing.push_str(&text);
                    }
                    self.arena.remove(child);
                }
                None if text.is_empty() => {
                    self.arena.remove(child);
                }
                None => {
                    current = Some(child);
                    kept.push(child);
                }
            }
        }

        if let Some(node) = self.arena.get_mut(parent) {
            node.children = kept;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/text_tree.rs"]
mod tests;
