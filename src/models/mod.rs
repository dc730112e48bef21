//! 数据模型层

pub mod host;
pub mod mark;
pub mod position;
pub mod text_tree;

pub use host::TextHost;
pub use mark::Mark;
pub use position::{Position, TextRange};
pub use text_tree::{Element, NodeId, NodeKind, TextTree, TreeError};
