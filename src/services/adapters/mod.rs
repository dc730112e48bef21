//! Concrete implementations of the service ports.

pub mod events;
pub mod json_store;
pub mod memory_store;

pub use events::ChannelEvents;
pub use json_store::{default_store_path, JsonMarkStore};
pub use memory_store::MemoryMarkStore;
