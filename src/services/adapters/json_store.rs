//! JSON file store for word mark counts and highlight settings.
//!
//! Default location mirrors other per-user app data:
//! - macOS: ~/Library/Application Support/wordmark/marks.json
//! - Linux: $XDG_DATA_HOME/wordmark/marks.json or ~/.local/share/wordmark/marks.json
//! - Windows: %APPDATA%\wordmark\marks.json

use crate::services::ports::{HighlightSettings, MarkStore, StoreError, StoreFuture};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const APP_NAME: &str = "wordmark";
const STORE_FILE: &str = "marks.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct MarkFile {
    #[serde(default)]
    words: BTreeMap<String, u32>,
    #[serde(default)]
    settings: HighlightSettings,
}

pub fn default_store_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join(STORE_FILE))
}

fn app_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME").ok().map(|home| {
            PathBuf::from(home)
                .join("Library/Application Support")
                .join(APP_NAME)
        });
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return Some(PathBuf::from(xdg).join(APP_NAME));
        }
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".local/share").join(APP_NAME));
    }

    #[cfg(target_os = "windows")]
    {
        return std::env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_NAME));
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

#[derive(Debug)]
pub struct JsonMarkStore {
    path: PathBuf,
    state: Mutex<MarkFile>,
}

impl JsonMarkStore {
    /// Loads `path`, creating it with default settings when missing.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = match tokio::fs::read_to_string(&path).await {
            Ok(data) => serde_json::from_str(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let state = MarkFile::default();
                write_file(&path, &state).await?;
                state
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), "mark store opened");
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn set_settings(&self, settings: HighlightSettings) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        next.settings = settings;
        commit(&self.path, &mut state, next).await
    }
}

/// Writes `next` and only then replaces the in-memory state, so a failed
/// write leaves memory agreeing with disk.
async fn commit(path: &Path, state: &mut MarkFile, next: MarkFile) -> Result<(), StoreError> {
    write_file(path, &next).await?;
    *state = next;
    Ok(())
}

async fn write_file(path: &Path, state: &MarkFile) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let data = serde_json::to_string_pretty(state)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, data).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

impl MarkStore for JsonMarkStore {
    fn get_mark_count<'a>(&'a self, word: &'a str) -> StoreFuture<'a, u32> {
        Box::pin(async move {
            let state = self.state.lock().await;
            Ok(state.words.get(word).copied().unwrap_or(0))
        })
    }

    fn update_word_marking<'a>(&'a self, word: &'a str, count: u32) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            let mut next = state.clone();
            next.words.insert(word.to_string(), count);
            commit(&self.path, &mut state, next).await
        })
    }

    fn remove_word_marking<'a>(&'a self, word: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            if !state.words.contains_key(word) {
                return Ok(());
            }
            let mut next = state.clone();
            next.words.remove(word);
            commit(&self.path, &mut state, next).await
        })
    }

    fn get_settings(&self) -> StoreFuture<'_, HighlightSettings> {
        Box::pin(async move { Ok(self.state.lock().await.settings.clone()) })
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/services/json_store.rs"]
mod tests;
