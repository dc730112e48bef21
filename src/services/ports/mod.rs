//! Service ports: traits + data contracts.

pub mod events;
pub mod settings;
pub mod store;

pub use events::{HighlightEvents, HoverEvent, NoopEvents};
pub use settings::HighlightSettings;
pub use store::{MarkStore, StoreError, StoreFuture};
