//! Which content view is mounted, and where Back leads

use crate::sidebar::MenuEntry;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum View {
    Search,
    Recent,
    Popular,
    Events,
    Watchlist,
    Settings,
    /// Conference detail grid, by acronym
    Conference(String),
}

impl View {
    /// Sidebar entry highlighted while this view is shown
    pub fn menu_entry(&self) -> MenuEntry {
        match self {
            View::Search => MenuEntry::Search,
            View::Recent => MenuEntry::Recent,
            View::Popular => MenuEntry::Popular,
            View::Events | View::Conference(_) => MenuEntry::Events,
            View::Watchlist => MenuEntry::Watchlist,
            View::Settings => MenuEntry::Settings,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewRouter {
    current: View,
    previous: Option<View>,
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewRouter {
    pub fn new() -> Self {
        Self {
            current: View::Recent,
            previous: None,
        }
    }

    pub fn current(&self) -> &View {
        &self.current
    }

    pub fn previous(&self) -> Option<&View> {
        self.previous.as_ref()
    }

    /// Switch views; returns false if `view` is already mounted
    pub fn navigate(&mut self, view: View) -> bool {
        if view == self.current {
            return false;
        }
        tracing::debug!("view {:?} -> {:?}", self.current, view);
        self.previous = Some(std::mem::replace(&mut self.current, view));
        true
    }

    /// Return to the previous view, or home; returns false if nothing changed
    pub fn back(&mut self) -> bool {
        let target = self.previous.take().unwrap_or(View::Recent);
        if target == self.current {
            return false;
        }
        self.current = target;
        true
    }
}
