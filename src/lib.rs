//! wordmark - word highlight annotation engine
//!
//! 模块结构：
//! - models: 文本树、位置、标注属性
//! - highlight: 边界规则、颜色分级、导航、选区扩展、树变更、引擎
//! - services: 持久化与 UI 通知的 ports 及 adapters

pub mod highlight;
pub mod logging;
pub mod models;
pub mod services;

pub use highlight::{
    HighlightConfig, HighlightEngine, HighlightError, HighlightReport, ToggleTarget,
};
pub use models::{Element, NodeId, Position, TextHost, TextRange, TextTree};
