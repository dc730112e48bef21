use crate::models::NodeId;
use compact_str::CompactString;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverEvent {
    Enter { word: CompactString, node: NodeId },
    Leave { word: CompactString, node: NodeId },
}

/// Fire-and-forget notifications for the UI layer. Nothing is returned and
/// the engine never waits on delivery.
pub trait HighlightEvents {
    fn on_hover_enter(&self, word: &str, node: NodeId);
    fn on_hover_leave(&self, word: &str, node: NodeId);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEvents;

impl HighlightEvents for NoopEvents {
    fn on_hover_enter(&self, _word: &str, _node: NodeId) {}

    fn on_hover_leave(&self, _word: &str, _node: NodeId) {}
}
