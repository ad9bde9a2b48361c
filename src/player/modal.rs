//! Option selector shown over the player (audio language, subtitles)

use crate::keymap::RemoteKey;
use crate::nav::{EdgeMode, SelectionCursor};
use crate::types::language_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Language,
    Subtitle,
}

/// What a key did to the open modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalOutcome {
    Moved(usize),
    /// Enter on an option; the modal should close and apply it
    Applied(String),
    /// Back or stop; the modal should close without applying
    Dismissed,
    /// Swallowed without effect
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorModal {
    kind: ModalKind,
    options: Vec<String>,
    cursor: SelectionCursor,
}

impl SelectorModal {
    /// Open with the current value preselected, or the first option
    pub fn open(kind: ModalKind, options: Vec<String>, current: &str) -> Self {
        let index = options.iter().position(|o| o == current).unwrap_or(0);
        let cursor = SelectionCursor::at(index, options.len());
        Self {
            kind,
            options,
            cursor,
        }
    }

    pub fn kind(&self) -> ModalKind {
        self.kind
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn selected(&self) -> Option<&str> {
        self.options.get(self.cursor.index()).map(String::as_str)
    }

    /// Display labels for the options
    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| language_name(o)).collect()
    }

    pub fn handle_key(&mut self, key: RemoteKey) -> ModalOutcome {
        match key {
            RemoteKey::Down => ModalOutcome::Moved(self.cursor.next(EdgeMode::Wrap)),
            RemoteKey::Up => ModalOutcome::Moved(self.cursor.prev(EdgeMode::Wrap)),
            RemoteKey::Enter => match self.selected() {
                Some(option) => ModalOutcome::Applied(option.to_string()),
                None => ModalOutcome::Dismissed,
            },
            key if key.is_back_or_stop() => ModalOutcome::Dismissed,
            _ => ModalOutcome::Ignored,
        }
    }
}
