use crate::services::ports::{HighlightSettings, MarkStore, StoreError, StoreFuture};
use compact_str::CompactString;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// In-process store. Writes can be switched to fail to exercise the
/// engine's persistence error path.
#[derive(Debug, Default)]
pub struct MemoryMarkStore {
    words: Mutex<FxHashMap<CompactString, u32>>,
    settings: Mutex<HighlightSettings>,
    fail_writes: AtomicBool,
}

impl MemoryMarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: HighlightSettings) -> Self {
        Self {
            settings: Mutex::new(settings),
            ..Self::default()
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_settings(&self, settings: HighlightSettings) {
        *lock(&self.settings) = settings;
    }

    pub fn snapshot(&self) -> FxHashMap<CompactString, u32> {
        lock(&self.words).clone()
    }

    pub fn count(&self, word: &str) -> u32 {
        lock(&self.words).get(word).copied().unwrap_or(0)
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MarkStore for MemoryMarkStore {
    fn get_mark_count<'a>(&'a self, word: &'a str) -> StoreFuture<'a, u32> {
        Box::pin(async move { Ok(self.count(word)) })
    }

    fn update_word_marking<'a>(&'a self, word: &'a str, count: u32) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.check_writable()?;
            lock(&self.words).insert(word.into(), count);
            Ok(())
        })
    }

    fn remove_word_marking<'a>(&'a self, word: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.check_writable()?;
            lock(&self.words).remove(word);
            Ok(())
        })
    }

    fn get_settings(&self) -> StoreFuture<'_, HighlightSettings> {
        Box::pin(async move { Ok(lock(&self.settings).clone()) })
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/services/memory_store.rs"]
mod tests;
