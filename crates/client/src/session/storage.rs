// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable key/value storage for session fields.
//!
//! Writes are best-effort: backends log failures instead of surfacing them,
//! so a broken disk never blocks a session mutation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

/// Key/value persistence for session fields.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value);
    }

    fn remove(&self, key: &str) {
        (**self).remove(key);
    }
}

/// In-memory storage, for tests and sessions that should not outlive the
/// process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

/// File-backed storage: a flat JSON object rewritten on every mutation.
///
/// Survives process restarts within the same profile directory. Writes are
/// atomic (unique temp file + rename) so a crash mid-write never leaves a
/// truncated session file behind.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStorage {
    /// Open storage at `path`, loading any previously persisted entries.
    /// A missing or malformed file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "ignoring malformed session file: {e}");
                    HashMap::new()
                }
            },
            Err(e) => {
                tracing::debug!(path = %path.display(), "no persisted session: {e}");
                HashMap::new()
            }
        };
        Self { path, entries: RwLock::new(entries) }
    }

    /// Rewrite the backing file from the current entries.
    ///
    /// Uses a unique temp filename (PID + counter) to avoid corruption when
    /// concurrent flushes race on the same `.tmp` file.
    fn flush(&self, entries: &HashMap<String, String>) {
        use std::sync::atomic::{AtomicU32, Ordering};
        static COUNTER: AtomicU32 = AtomicU32::new(0);

        let json = match serde_json::to_string_pretty(entries) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!("failed to serialize session state: {e}");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_name = format!(
            "{}.{}.{}.tmp",
            self.path.file_name().unwrap_or_default().to_string_lossy(),
            std::process::id(),
            seq,
        );
        let tmp_path = self.path.with_file_name(tmp_name);
        if let Err(e) = std::fs::write(&tmp_path, json) {
            tracing::warn!(path = %tmp_path.display(), "failed to write session file: {e}");
            return;
        }
        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            tracing::warn!(path = %self.path.display(), "failed to rename session file: {e}");
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.write();
        entries.insert(key.to_owned(), value.to_owned());
        self.flush(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.write();
        if entries.remove(key).is_some() {
            self.flush(&entries);
        }
    }
}

#[cfg(test)]
#[path = "storage_tests.rs"]
mod tests;
