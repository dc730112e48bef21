//! 标注节点属性

use crate::highlight::color::HighlightStyle;
use compact_str::CompactString;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    /// Normalized word key (trimmed, lowercased).
    pub word: CompactString,
    pub mark_count: u32,
    pub base_color: CompactString,
    pub applied_at: Instant,
    pub style: HighlightStyle,
}

impl Mark {
    pub fn new(word: &str, mark_count: u32, base_color: &str, style: HighlightStyle) -> Self {
        Self {
            word: word.into(),
            mark_count,
            base_color: base_color.into(),
            applied_at: Instant::now(),
            style,
        }
    }

    pub fn restyle(&mut self, mark_count: u32, base_color: &str, style: HighlightStyle) {
        self.mark_count = mark_count;
        if self.base_color != base_color {
            self.base_color = base_color.into();
        }
        self.style = style;
    }
}
