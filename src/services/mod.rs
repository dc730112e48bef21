//! 服务层：引擎依赖的外部协作者
//!
//! - ports: MarkStore（持久化）、HighlightEvents（UI 通知）
//! - adapters: 内存 / JSON 文件存储，channel 事件转发

pub mod adapters;
pub mod ports;

pub use adapters::{ChannelEvents, JsonMarkStore, MemoryMarkStore};
pub use ports::{
    HighlightEvents, HighlightSettings, HoverEvent, MarkStore, NoopEvents, StoreError,
};
