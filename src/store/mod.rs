//! Key-value persistence for preferences, watchlist and playback positions
//!
//! Values are JSON-encoded strings under flat keys. Every mutation is
//! broadcast to subscribers so views holding a derived copy (the watchlist
//! view, the player's watchlist button) can resynchronise.

mod preferences;
mod watchlist;

pub use preferences::{PreferenceKey, Preferences};
pub use watchlist::{WATCHLIST_KEY, Watchlist, WatchlistEntry};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::error::{CccTvError, Result};

/// Capacity of the change channel; slow subscribers see `Lagged` and resync
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Notification sent after a key changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Set(String),
    Removed(String),
}

impl StoreEvent {
    pub fn key(&self) -> &str {
        match self {
            StoreEvent::Set(key) | StoreEvent::Removed(key) => key,
        }
    }
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn keys(&self) -> Vec<String>;
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}

/// Shared handle used throughout the app
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Remove every key starting with `prefix`, returning how many were removed
pub fn remove_prefixed(store: &dyn KeyValueStore, prefix: &str) -> Result<usize> {
    let doomed: Vec<String> = store
        .keys()
        .into_iter()
        .filter(|k| k.starts_with(prefix))
        .collect();
    for key in &doomed {
        store.remove(key)?;
    }
    Ok(doomed.len())
}

// ============================================================================
// In-memory store
// ============================================================================

pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    sender: broadcast::Sender<StoreEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            entries: Mutex::new(BTreeMap::new()),
            sender,
        }
    }

    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        let _ = self.sender.send(StoreEvent::Set(key.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.entries.lock().remove(key).is_some() {
            let _ = self.sender.send(StoreEvent::Removed(key.to_string()));
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }
}

// ============================================================================
// JSON file store
// ============================================================================

/// Store persisted as a single JSON object, rewritten atomically on change
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
    sender: broadcast::Sender<StoreEvent>,
}

impl FileStore {
    /// Open the store at `path`; a missing file starts empty
    ///
    /// A corrupt file is logged and replaced on the next write rather than
    /// failing startup.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("ignoring corrupt store file {}: {e}", path.display());
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        let (sender, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            path,
            entries: Mutex::new(entries),
            sender,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let content = serde_json::to_string_pretty(entries)?;
        write_file_atomic(&self.path, &content)
    }
}

/// Write through a temp file and rename so the store is never half written
fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, content)?;
    std::fs::rename(&temp_path, path).map_err(|e| {
        CccTvError::Store(format!("failed to replace {}: {e}", path.display()))
    })
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        {
            let mut entries = self.entries.lock();
            let mut updated = entries.clone();
            updated.insert(key.to_string(), value.to_string());
            self.persist(&updated)?;
            *entries = updated;
        }
        let _ = self.sender.send(StoreEvent::Set(key.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        {
            let mut entries = self.entries.lock();
            if !entries.contains_key(key) {
                return Ok(());
            }
            let mut updated = entries.clone();
            updated.remove(key);
            self.persist(&updated)?;
            *entries = updated;
        }
        let _ = self.sender.send(StoreEvent::Removed(key.to_string()));
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }
}
