//! Sidebar menu

use crate::focus::{HandleResult, KeyHandler};
use crate::keymap::RemoteKey;
use crate::nav::{EdgeMode, SelectionCursor};
use crate::router::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuEntry {
    Search,
    Recent,
    Popular,
    Events,
    Watchlist,
    Settings,
}

impl MenuEntry {
    /// Menu order, top to bottom
    pub const ALL: [MenuEntry; 6] = [
        MenuEntry::Search,
        MenuEntry::Recent,
        MenuEntry::Popular,
        MenuEntry::Events,
        MenuEntry::Watchlist,
        MenuEntry::Settings,
    ];

    pub fn id(self) -> &'static str {
        match self {
            MenuEntry::Search => "search",
            MenuEntry::Recent => "recent",
            MenuEntry::Popular => "popular",
            MenuEntry::Events => "events",
            MenuEntry::Watchlist => "watchlist",
            MenuEntry::Settings => "settings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuEntry::Search => "Search",
            MenuEntry::Recent => "Home",
            MenuEntry::Popular => "Popular",
            MenuEntry::Events => "Events",
            MenuEntry::Watchlist => "Watchlist",
            MenuEntry::Settings => "Settings",
        }
    }

    pub fn view(self) -> View {
        match self {
            MenuEntry::Search => View::Search,
            MenuEntry::Recent => View::Recent,
            MenuEntry::Popular => View::Popular,
            MenuEntry::Events => View::Events,
            MenuEntry::Watchlist => View::Watchlist,
            MenuEntry::Settings => View::Settings,
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|e| *e == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct Sidebar {
    cursor: SelectionCursor,
}

impl Default for Sidebar {
    fn default() -> Self {
        Self::new()
    }
}

impl Sidebar {
    pub fn new() -> Self {
        Self {
            cursor: SelectionCursor::at(MenuEntry::Recent.index(), MenuEntry::ALL.len()),
        }
    }

    /// Entry under the highlight
    pub fn highlighted(&self) -> MenuEntry {
        MenuEntry::ALL[self.cursor.index()]
    }

    /// Move the highlight to the entry owning `view`
    pub fn sync_to(&mut self, view: &View) {
        self.cursor.set_index(view.menu_entry().index());
    }
}

impl KeyHandler for Sidebar {
    fn handle_key(&mut self, key: RemoteKey) -> HandleResult {
        match key {
            RemoteKey::Down => {
                self.cursor.next(EdgeMode::Wrap);
                HandleResult::Handled
            }
            RemoteKey::Up => {
                self.cursor.prev(EdgeMode::Wrap);
                HandleResult::Handled
            }
            RemoteKey::Right => HandleResult::ReturnToContent,
            RemoteKey::Enter => HandleResult::Activate,
            _ => HandleResult::NotHandled,
        }
    }
}
