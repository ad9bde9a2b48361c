//! Saved lectures, kept in sync with the store

use super::{Activation, ContentView, ListNav};
use crate::config::LayoutConfig;
use crate::focus::{HandleResult, KeyHandler};
use crate::keymap::RemoteKey;
use crate::store::{StoreEvent, Watchlist, WatchlistEntry};

pub struct WatchlistView {
    watchlist: Watchlist,
    entries: Vec<WatchlistEntry>,
    nav: ListNav,
}

impl WatchlistView {
    pub fn new(watchlist: Watchlist, layout: &LayoutConfig) -> Self {
        let mut view = Self {
            watchlist,
            entries: Vec::new(),
            nav: ListNav::new(layout),
        };
        view.reload();
        view
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn nav(&self) -> &ListNav {
        &self.nav
    }

    /// Re-read the stored list, keeping the selection where possible
    pub fn reload(&mut self) {
        self.entries = self.watchlist.entries();
        self.nav.resize(self.entries.len());
    }

    /// React to a store change; returns whether the list was reloaded
    pub fn on_store_event(&mut self, event: &StoreEvent) -> bool {
        if !Watchlist::is_watchlist_event(event) {
            return false;
        }
        self.reload();
        true
    }
}

impl KeyHandler for WatchlistView {
    fn handle_key(&mut self, key: RemoteKey) -> HandleResult {
        self.nav.handle(key).into_result()
    }
}

impl ContentView for WatchlistView {
    fn activation(&self) -> Option<Activation> {
        self.entries.get(self.nav.selected()).map(|entry| Activation::Play {
            conference_title: entry.lecture.conference_title.clone(),
            lecture: entry.lecture.clone(),
        })
    }
}
