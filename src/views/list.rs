//! Shared vertical list behaviour
//!
//! Popular, events, watchlist and search results all navigate the same way:
//! Up/Down wrap, Left hands focus to the sidebar, Enter selects and Back
//! closes the view.

use crate::config::LayoutConfig;
use crate::focus::HandleResult;
use crate::keymap::RemoteKey;
use crate::nav::{EdgeMode, ListFrame, ListViewport};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListAction {
    Moved(ListFrame),
    Select(usize),
    Close,
    LeftEdge,
    Ignored,
}

impl ListAction {
    /// Focus-router view of the action; `Select` becomes an activation
    pub fn into_result(self) -> HandleResult {
        match self {
            ListAction::Moved(_) => HandleResult::Handled,
            ListAction::Select(_) => HandleResult::Activate,
            ListAction::Close => HandleResult::Close,
            ListAction::LeftEdge => HandleResult::LeftEdge,
            ListAction::Ignored => HandleResult::NotHandled,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListNav {
    viewport: ListViewport,
}

impl ListNav {
    pub fn new(layout: &LayoutConfig) -> Self {
        let viewport_height = layout.item_height * layout.rows_on_screen as f32;
        Self {
            viewport: ListViewport::new(0, layout, viewport_height).with_edge_mode(EdgeMode::Wrap),
        }
    }

    pub fn len(&self) -> usize {
        self.viewport.cursor.item_count()
    }

    pub fn is_empty(&self) -> bool {
        self.viewport.cursor.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.viewport.selected()
    }

    pub fn frame(&self) -> ListFrame {
        self.viewport.current_frame()
    }

    /// New item sequence; selection returns to the top
    pub fn replace(&mut self, item_count: usize) -> ListFrame {
        self.viewport.replace_items(item_count)
    }

    /// Items changed in place (e.g. one removed); keep the selection if valid
    pub fn resize(&mut self, item_count: usize) {
        self.viewport.cursor.resize(item_count);
    }

    /// Move the selection, wrapping at either end
    pub fn move_by(&mut self, delta: isize) -> ListFrame {
        self.viewport.move_by(delta)
    }

    /// Back and Left stay available on an empty list so focus can always leave
    pub fn handle(&mut self, key: RemoteKey) -> ListAction {
        match key {
            RemoteKey::Back => ListAction::Close,
            RemoteKey::Left => ListAction::LeftEdge,
            _ if self.is_empty() => ListAction::Ignored,
            RemoteKey::Down => ListAction::Moved(self.viewport.move_by(1)),
            RemoteKey::Up => ListAction::Moved(self.viewport.move_by(-1)),
            RemoteKey::Enter => ListAction::Select(self.selected()),
            _ => ListAction::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav(count: usize) -> ListNav {
        let mut nav = ListNav::new(&LayoutConfig::default());
        nav.replace(count);
        nav
    }

    #[test]
    fn test_up_down_wrap() {
        let mut nav = nav(3);
        nav.handle(RemoteKey::Up);
        assert_eq!(nav.selected(), 2);
        nav.handle(RemoteKey::Down);
        assert_eq!(nav.selected(), 0);
    }

    #[test]
    fn test_enter_selects_current() {
        let mut nav = nav(3);
        nav.handle(RemoteKey::Down);
        assert_eq!(nav.handle(RemoteKey::Enter), ListAction::Select(1));
        assert_eq!(ListAction::Select(1).into_result(), HandleResult::Activate);
    }

    #[test]
    fn test_empty_list_ignores_movement_but_can_leave() {
        let mut nav = nav(0);
        assert_eq!(nav.handle(RemoteKey::Down), ListAction::Ignored);
        assert_eq!(nav.handle(RemoteKey::Enter), ListAction::Ignored);
        assert_eq!(nav.handle(RemoteKey::Left), ListAction::LeftEdge);
        assert_eq!(nav.handle(RemoteKey::Back), ListAction::Close);
    }

    #[test]
    fn test_replace_resets_selection() {
        let mut nav = nav(5);
        nav.handle(RemoteKey::Up);
        assert_eq!(nav.selected(), 4);
        nav.replace(2);
        assert_eq!(nav.selected(), 0);
        assert_eq!(nav.len(), 2);
    }
}
