use super::settings::HighlightSettings;
use std::future::Future;
use std::pin::Pin;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for the authoritative `word -> mark count` records.
///
/// Keys arrive already normalized. Writes are best effort from the engine's
/// point of view: a failed write is logged and the tree change still happens.
pub trait MarkStore: Send + Sync {
    /// Stored count, `0` when the word has no record.
    fn get_mark_count<'a>(&'a self, word: &'a str) -> StoreFuture<'a, u32>;
    fn update_word_marking<'a>(&'a self, word: &'a str, count: u32) -> StoreFuture<'a, ()>;
    fn remove_word_marking<'a>(&'a self, word: &'a str) -> StoreFuture<'a, ()>;
    fn get_settings(&self) -> StoreFuture<'_, HighlightSettings>;
}
