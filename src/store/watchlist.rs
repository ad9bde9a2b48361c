use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::{SharedStore, StoreEvent};
use crate::error::Result;
use crate::types::{Identified, Lecture};

pub const WATCHLIST_KEY: &str = "watchlist";

/// Lecture snapshot saved to the watchlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    #[serde(flatten)]
    pub lecture: Lecture,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub added_at: i64,
}

impl WatchlistEntry {
    pub fn new(lecture: Lecture) -> Self {
        Self {
            lecture,
            added_at: Timestamp::now().as_millisecond(),
        }
    }

    pub fn added(&self) -> Option<Timestamp> {
        Timestamp::from_millisecond(self.added_at).ok()
    }
}

impl Identified for WatchlistEntry {
    fn identity(&self) -> &str {
        &self.lecture.guid
    }
}

/// Read-modify-write access to the watchlist array
#[derive(Clone)]
pub struct Watchlist {
    store: SharedStore,
}

impl Watchlist {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// All entries in insertion order; unreadable data reads as empty
    pub fn entries(&self) -> Vec<WatchlistEntry> {
        let Some(raw) = self.store.get(WATCHLIST_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("failed to read watchlist: {e}");
                Vec::new()
            }
        }
    }

    pub fn contains(&self, guid: &str) -> bool {
        self.entries().iter().any(|e| e.lecture.guid == guid)
    }

    /// Add a lecture; returns false if it was already present
    pub fn add(&self, lecture: &Lecture) -> Result<bool> {
        let mut entries = self.entries();
        if entries.iter().any(|e| e.lecture.guid == lecture.guid) {
            return Ok(false);
        }
        entries.push(WatchlistEntry::new(lecture.clone()));
        self.write(&entries)?;
        Ok(true)
    }

    /// Remove by guid; returns false if nothing was removed
    pub fn remove(&self, guid: &str) -> Result<bool> {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|e| e.lecture.guid != guid);
        if entries.len() == before {
            return Ok(false);
        }
        self.write(&entries)?;
        Ok(true)
    }

    /// Add or remove; returns whether the lecture is now in the watchlist
    pub fn toggle(&self, lecture: &Lecture) -> Result<bool> {
        if self.contains(&lecture.guid) {
            self.remove(&lecture.guid)?;
            Ok(false)
        } else {
            self.add(lecture)?;
            Ok(true)
        }
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(WATCHLIST_KEY)
    }

    /// Receiver for store changes; filter with [`Watchlist::is_watchlist_event`]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.store.subscribe()
    }

    pub fn is_watchlist_event(event: &StoreEvent) -> bool {
        event.key() == WATCHLIST_KEY
    }

    fn write(&self, entries: &[WatchlistEntry]) -> Result<()> {
        let encoded = serde_json::to_string(entries)?;
        self.store.set(WATCHLIST_KEY, &encoded)
    }
}
