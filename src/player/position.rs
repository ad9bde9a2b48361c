//! Saved playback positions
//!
//! A lecture's position is kept under `playback_position_{guid}` while more
//! than five minutes remain. Closer to the end the position is dropped and
//! the lecture leaves the watchlist, as it counts as watched.

use crate::error::Result;
use crate::store::{SharedStore, Watchlist, remove_prefixed};

pub const POSITION_KEY_PREFIX: &str = "playback_position_";

/// Remaining seconds below which a lecture counts as finished
pub const END_THRESHOLD_SECS: f64 = 300.0;

pub fn position_key(guid: &str) -> String {
    format!("{POSITION_KEY_PREFIX}{guid}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Near the end; position removed
    Finished,
    /// Playback never started
    Skipped,
}

#[derive(Clone)]
pub struct PlaybackPositions {
    store: SharedStore,
    watchlist: Watchlist,
}

impl PlaybackPositions {
    pub fn new(store: SharedStore) -> Self {
        let watchlist = Watchlist::new(store.clone());
        Self { store, watchlist }
    }

    /// Resume point in seconds, if one was saved
    pub fn load(&self, guid: &str) -> Option<f64> {
        self.store
            .get(&position_key(guid))
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|secs| *secs > 0.0)
    }

    /// Persist the current position, or clear it when the lecture is finished
    pub fn record(&self, guid: &str, current: f64, duration: f64) -> Result<SaveOutcome> {
        if current <= 0.0 || guid.is_empty() {
            return Ok(SaveOutcome::Skipped);
        }

        if duration - current > END_THRESHOLD_SECS {
            self.store.set(&position_key(guid), &current.to_string())?;
            return Ok(SaveOutcome::Saved);
        }

        if self.watchlist.remove(guid)? {
            tracing::debug!("finished {guid}, removed from watchlist");
        }
        self.store.remove(&position_key(guid))?;
        Ok(SaveOutcome::Finished)
    }

    /// Forget every saved position; returns how many were removed
    pub fn clear_all(&self) -> Result<usize> {
        remove_prefixed(self.store.as_ref(), POSITION_KEY_PREFIX)
    }
}
