//! Key-value persistence behind the [`KeyValueStore`] seam.
//!
//! Two lifetimes exist side by side: [`FileStore`] survives across runs and
//! backs the booking-submission counter, while [`SessionStore`] lives and
//! dies with the process and backs the notification-send counter. Every
//! I/O failure degrades to "no record": a broken disk must never block a
//! booking, so errors are logged and swallowed here (diagnosable
//! internally, invisible to the customer).

use booking_flow_core::environment::KeyValueStore;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A process-lifetime in-memory store; cleared when the session ends.
#[derive(Debug, Default)]
pub struct SessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl SessionStore {
    /// Creates an empty session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for SessionStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned(),
            Err(error) => {
                tracing::warn!(%error, "session store lock poisoned");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(key.to_owned(), value.to_owned());
            }
            Err(error) => {
                tracing::warn!(%error, "session store lock poisoned, dropping write");
            }
        }
    }

    fn delete(&self, key: &str) {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.remove(key);
            }
            Err(error) => {
                tracing::warn!(%error, "session store lock poisoned, dropping delete");
            }
        }
    }
}

/// A write-through JSON file store.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`, loading any existing content. A missing
    /// or unreadable file starts empty.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(error) = std::fs::create_dir_all(parent) {
                    tracing::warn!(path = %self.path.display(), %error, "cannot create store directory");
                    return;
                }
            }
        }

        match serde_json::to_string_pretty(entries) {
            Ok(raw) => {
                if let Err(error) = std::fs::write(&self.path, raw) {
                    tracing::warn!(path = %self.path.display(), %error, "failed to persist store");
                }
            }
            Err(error) => {
                tracing::warn!(%error, "failed to serialize store");
            }
        }
    }
}

fn load_entries(path: &Path) -> HashMap<String, String> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "cannot read store, starting empty");
            return HashMap::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "corrupt store file, starting empty");
            HashMap::new()
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned(),
            Err(error) => {
                tracing::warn!(%error, "store lock poisoned");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(key.to_owned(), value.to_owned());
                self.persist(&entries);
            }
            Err(error) => {
                tracing::warn!(%error, "store lock poisoned, dropping write");
            }
        }
    }

    fn delete(&self, key: &str) {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.remove(key);
                self.persist(&entries);
            }
            Err(error) => {
                tracing::warn!(%error, "store lock poisoned, dropping delete");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("booking-flow-test-{name}-{}", std::process::id()));
        path
    }

    #[test]
    fn survives_reopen() {
        let path = temp_path("reopen");
        let _ = std::fs::remove_file(&path);

        {
            let store = FileStore::open(&path);
            store.set("counter", "{\"count\":1}");
        }

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("counter"), Some("{\"count\":1}".to_owned()));

        reopened.delete("counter");
        let again = FileStore::open(&path);
        assert_eq!(again.get("counter"), None);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{{{{ not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get("anything"), None);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_starts_empty() {
        let path = temp_path("missing");
        let _ = std::fs::remove_file(&path);

        let store = FileStore::open(&path);
        assert_eq!(store.get("anything"), None);
    }
}
