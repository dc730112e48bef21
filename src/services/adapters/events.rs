use crate::models::NodeId;
use crate::services::ports::{HighlightEvents, HoverEvent};
use std::sync::mpsc::Sender;

/// Forwards hover notifications over a channel; a closed receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelEvents {
    tx: Sender<HoverEvent>,
}

impl ChannelEvents {
    pub fn new(tx: Sender<HoverEvent>) -> Self {
        Self { tx }
    }
}

impl HighlightEvents for ChannelEvents {
    fn on_hover_enter(&self, word: &str, node: NodeId) {
        let _ = self.tx.send(HoverEvent::Enter {
            word: word.into(),
            node,
        });
    }

    fn on_hover_leave(&self, word: &str, node: NodeId) {
        let _ = self.tx.send(HoverEvent::Leave {
            word: word.into(),
            node,
        });
    }
}
