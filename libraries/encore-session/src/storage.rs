//! Durable client storage.
//!
//! A flat string key/value store holding tokens, the serialized user and
//! preferences. Writes made through a storage handle are announced on a
//! broadcast channel so other holders can reload without waiting for the
//! next poll.

use encore_core::{EncoreError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, warn};

const EVENT_CAPACITY: usize = 64;

/// A key was written or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    /// New value, `None` when the key was removed
    pub value: Option<String>,
}

/// Key/value session storage.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Change notifications for writes made through this storage.
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;

    /// Whether `key` holds a non-empty value. Read errors count as absent.
    fn contains(&self, key: &str) -> bool {
        match self.get(key) {
            Ok(value) => value.is_some_and(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "Storage read failed");
                false
            }
        }
    }
}

impl<S: SessionStorage + ?Sized> SessionStorage for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        (**self).subscribe()
    }
}

impl<S: SessionStorage + ?Sized> SessionStorage for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        (**self).subscribe()
    }
}

fn announce(events: &broadcast::Sender<StorageEvent>, key: &str, value: Option<&str>) {
    // No subscribers is fine
    let _ = events.send(StorageEvent {
        key: key.to_string(),
        value: value.map(str::to_string),
    });
}

// ============================================================================
// In-memory storage
// ============================================================================

/// Process-local storage, mostly for tests and one-shot commands.
#[derive(Debug)]
pub struct MemoryStorage {
    values: Mutex<BTreeMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            values: Mutex::new(BTreeMap::new()),
            events,
        }
    }

    fn values(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values().insert(key.to_string(), value.to_string());
        announce(&self.events, key, Some(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.values().remove(key).is_some() {
            announce(&self.events, key, None);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }
}

// ============================================================================
// File storage
// ============================================================================

/// Storage persisted as a JSON object in a single file.
///
/// The file is re-read on every access so writes from other processes are
/// picked up by the next read. Those writes produce no events; the auth
/// reconciliation poll covers them.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
    events: broadcast::Sender<StorageEvent>,
}

impl FileStorage {
    /// Open storage at `path`. The file is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            events,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            EncoreError::storage(format!(
                "corrupt session file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Write then rename so readers never see a half-written file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(values)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(&self, key: &str, value: Option<&str>) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read_all()?;

        let changed = match value {
            Some(value) => {
                let previous = values.insert(key.to_string(), value.to_string());
                previous.as_deref() != Some(value)
            }
            None => values.remove(key).is_some(),
        };
        if !changed {
            return Ok(());
        }

        self.write_all(&values)?;
        debug!(key, path = %self.path.display(), "Session storage updated");
        announce(&self.events, key, value);
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(key, Some(value))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(key, None)
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }
}
