//! Settings: stacked option grids, one per preference, plus actions
//!
//! Each section is a grid. Moving down past a section's last row enters the
//! next section and moving up past its first row enters the previous one.
//! Entering a section selects the currently stored value.

use super::{Activation, ContentView};
use crate::focus::{HandleResult, KeyHandler};
use crate::keymap::RemoteKey;
use crate::nav::{GridCursor, GridMove};
use crate::player::PlaybackPositions;
use crate::store::{PreferenceKey, Preferences, Watchlist};
use crate::types::LANGUAGES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingOption {
    pub code: &'static str,
    pub name: &'static str,
}

const SUBTITLE_SIZES: &[SettingOption] = &[
    SettingOption { code: "small", name: "Small" },
    SettingOption { code: "medium", name: "Medium" },
    SettingOption { code: "large", name: "Large" },
];

const SUBTITLE_STYLES: &[SettingOption] = &[
    SettingOption { code: "green", name: "CCC (Matrix)" },
    SettingOption { code: "white", name: "White Text" },
    SettingOption { code: "black", name: "Black Text" },
];

const PREVIEW_VIDEO: &[SettingOption] = &[
    SettingOption { code: "on", name: "On" },
    SettingOption { code: "mute", name: "Mute" },
    SettingOption { code: "off", name: "Off" },
];

pub const CLEAR_CACHE: &str = "clearCache";
pub const CLEAR_WATCHLIST: &str = "clearWatchlist";

const ACTIONS: &[SettingOption] = &[
    SettingOption { code: CLEAR_CACHE, name: "Clear Cache" },
    SettingOption { code: CLEAR_WATCHLIST, name: "Clear Watchlist" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsSection {
    Audio,
    Subtitle,
    SubtitleSize,
    SubtitleStyle,
    PreviewVideo,
    Actions,
}

impl SettingsSection {
    pub const ALL: [SettingsSection; 6] = [
        SettingsSection::Audio,
        SettingsSection::Subtitle,
        SettingsSection::SubtitleSize,
        SettingsSection::SubtitleStyle,
        SettingsSection::PreviewVideo,
        SettingsSection::Actions,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SettingsSection::Audio => "Preferred Audio Language",
            SettingsSection::Subtitle => "Preferred Subtitle Language",
            SettingsSection::SubtitleSize => "Subtitle Size",
            SettingsSection::SubtitleStyle => "Subtitle Style",
            SettingsSection::PreviewVideo => "Preview Video",
            SettingsSection::Actions => "Actions",
        }
    }

    pub fn options(self) -> Vec<SettingOption> {
        match self {
            SettingsSection::Audio => LANGUAGES
                .iter()
                .map(|l| SettingOption { code: l.code, name: l.name })
                .collect(),
            SettingsSection::Subtitle => std::iter::once(SettingOption {
                code: "none",
                name: "None",
            })
            .chain(
                LANGUAGES
                    .iter()
                    .filter(|l| l.code != "auto")
                    .map(|l| SettingOption { code: l.code, name: l.name }),
            )
            .collect(),
            SettingsSection::SubtitleSize => SUBTITLE_SIZES.to_vec(),
            SettingsSection::SubtitleStyle => SUBTITLE_STYLES.to_vec(),
            SettingsSection::PreviewVideo => PREVIEW_VIDEO.to_vec(),
            SettingsSection::Actions => ACTIONS.to_vec(),
        }
    }

    /// Preference persisted by this section; `None` for actions
    pub fn preference(self) -> Option<PreferenceKey> {
        match self {
            SettingsSection::Audio => Some(PreferenceKey::AudioLanguage),
            SettingsSection::Subtitle => Some(PreferenceKey::SubtitleLanguage),
            SettingsSection::SubtitleSize => Some(PreferenceKey::SubtitleSize),
            SettingsSection::SubtitleStyle => Some(PreferenceKey::SubtitleStyle),
            SettingsSection::PreviewVideo => Some(PreferenceKey::PreviewVideo),
            SettingsSection::Actions => None,
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

/// Outcome of the last action, shown as a notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Saved playback positions removed
    CacheCleared(usize),
    WatchlistCleared,
    Failed(String),
}

pub struct SettingsView {
    preferences: Preferences,
    watchlist: Watchlist,
    positions: PlaybackPositions,
    columns: usize,
    section: SettingsSection,
    options: Vec<SettingOption>,
    grid: GridCursor,
    last_action: Option<ActionOutcome>,
}

impl SettingsView {
    pub fn new(
        preferences: Preferences,
        watchlist: Watchlist,
        positions: PlaybackPositions,
        columns: usize,
    ) -> Self {
        let mut view = Self {
            preferences,
            watchlist,
            positions,
            columns,
            section: SettingsSection::Audio,
            options: Vec::new(),
            grid: GridCursor::new(0, columns),
            last_action: None,
        };
        view.enter_section(SettingsSection::Audio, 0);
        view
    }

    pub fn section(&self) -> SettingsSection {
        self.section
    }

    pub fn selected_index(&self) -> usize {
        self.grid.index()
    }

    pub fn selected(&self) -> Option<SettingOption> {
        self.options.get(self.grid.index()).copied()
    }

    /// Stored value for a section, if it is a preference
    pub fn current_value(&self, section: SettingsSection) -> Option<String> {
        section.preference().map(|key| self.preferences.get(key))
    }

    pub fn last_action(&self) -> Option<&ActionOutcome> {
        self.last_action.as_ref()
    }

    /// Switch section, selecting the stored value or else `fallback`
    fn enter_section(&mut self, section: SettingsSection, fallback: usize) {
        self.section = section;
        self.options = section.options();
        self.grid = GridCursor::new(self.options.len(), self.columns);
        let current = self
            .current_value(section)
            .and_then(|value| self.options.iter().position(|o| o.code == value));
        self.grid.set_index(current.unwrap_or(fallback));
    }

    fn go_down(&mut self) {
        if let GridMove::PastBottom = self.grid.down()
            && let Some(next) = self.section.next()
        {
            self.enter_section(next, 0);
        }
    }

    fn go_up(&mut self) {
        if let GridMove::PastTop = self.grid.up()
            && let Some(prev) = self.section.prev()
        {
            // the two language grids span several rows; land on the last one
            let fallback = match prev {
                SettingsSection::Audio | SettingsSection::Subtitle => {
                    GridCursor::new(prev.options().len(), self.columns).last_row_start()
                }
                _ => 0,
            };
            self.enter_section(prev, fallback);
        }
    }

    fn activate(&mut self) {
        let Some(option) = self.selected() else {
            return;
        };
        match self.section.preference() {
            Some(key) => {
                if let Err(e) = self.preferences.set(key, option.code) {
                    tracing::warn!("failed to save {}: {e}", key.storage_key());
                }
            }
            None => self.run_action(option.code),
        }
    }

    fn run_action(&mut self, code: &str) {
        let outcome = match code {
            CLEAR_CACHE => self
                .positions
                .clear_all()
                .map(ActionOutcome::CacheCleared),
            CLEAR_WATCHLIST => self
                .watchlist
                .clear()
                .map(|_| ActionOutcome::WatchlistCleared),
            _ => return,
        };
        self.last_action = Some(outcome.unwrap_or_else(|e| {
            tracing::warn!("settings action {code} failed: {e}");
            ActionOutcome::Failed(e.to_string())
        }));
    }
}

impl KeyHandler for SettingsView {
    fn handle_key(&mut self, key: RemoteKey) -> HandleResult {
        match key {
            RemoteKey::Back => return HandleResult::Close,
            RemoteKey::Right => {
                self.grid.right();
            }
            RemoteKey::Left => {
                if let GridMove::LeftEdge = self.grid.left() {
                    return HandleResult::LeftEdge;
                }
            }
            RemoteKey::Down => self.go_down(),
            RemoteKey::Up => self.go_up(),
            RemoteKey::Enter => self.activate(),
            _ => return HandleResult::NotHandled,
        }
        HandleResult::Handled
    }
}

impl ContentView for SettingsView {
    fn activation(&self) -> Option<Activation> {
        None
    }
}
