//! Content views
//!
//! Each view owns its cursor and data and implements [`KeyHandler`] for the
//! keys the focus router forwards while the content region is active. Views
//! never fetch on their own: loads are queued as [`ViewRequest`]s that the
//! app drains after every key, and results come back through the view's
//! `complete_*` method together with the ticket they were issued with.

pub mod conference;
pub mod events;
pub mod home;
pub mod list;
pub mod popular;
pub mod search;
pub mod settings;
pub mod watchlist;

pub use conference::ConferenceView;
pub use events::EventsView;
pub use home::HomeView;
pub use list::{ListAction, ListNav};
pub use popular::PopularView;
pub use search::SearchView;
pub use settings::SettingsView;
pub use watchlist::WatchlistView;

use crate::error::Result;
use crate::focus::KeyHandler;
use crate::generation::{Generation, Ticket};
use crate::pagination::PageRequest;
use crate::types::Lecture;

/// Load a view needs performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRequest {
    /// Next page of the home feed
    FetchPage(PageRequest),
    /// First page of recent conferences, ranked by the popular view
    LoadPopular(Ticket),
    LoadConferences(Ticket),
    LoadConference { ticket: Ticket, acronym: String },
    /// Query text changed; the app debounces and runs it
    Search(String),
}

/// What Enter on the focused item opens
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    Play {
        lecture: Lecture,
        conference_title: Option<String>,
    },
    OpenConference(String),
}

pub trait ContentView: KeyHandler {
    /// Target of the focused item, consulted when a key returns `Activate`
    fn activation(&self) -> Option<Activation>;

    /// Requests queued since the last call
    fn take_requests(&mut self) -> Vec<ViewRequest> {
        Vec::new()
    }
}

/// Loading/error bookkeeping for a view backed by one request
#[derive(Debug, Default)]
pub struct LoadSlot {
    generation: Generation,
    loading: bool,
    loaded: bool,
    error: Option<String>,
}

impl LoadSlot {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start a load, superseding any outstanding one
    pub fn begin(&mut self) -> Ticket {
        self.loading = true;
        self.error = None;
        self.generation.bump()
    }

    /// Accept a completion; `None` when stale or failed
    pub fn finish<T>(&mut self, ticket: Ticket, result: Result<T>) -> Option<T> {
        if !self.generation.is_current(ticket) {
            return None;
        }
        self.loading = false;
        match result {
            Ok(value) => {
                self.loaded = true;
                Some(value)
            }
            Err(e) => {
                tracing::warn!("load failed: {e}");
                self.error = Some(e.to_string());
                None
            }
        }
    }
}
