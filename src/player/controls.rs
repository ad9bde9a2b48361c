//! Player control overlay state machine
//!
//! The overlay is either hidden (Idle), shown without focus (Active), has
//! the button ring focused (ButtonNav), has the progress bar focused
//! (ProgressNav), or hosts an option selector (ModalOpen). The state is
//! derived from a handful of fields rather than stored, so there is one
//! source of truth for each of them.
//!
//! Time is passed in explicitly. Showing the controls issues a hide-timer
//! ticket; the caller sleeps for the returned delay and feeds the ticket
//! back through [`PlayerControls::on_hide_timer`]. Any later activity
//! invalidates the earlier ticket.

use std::time::Duration;

use tokio::time::Instant;

use super::modal::{ModalKind, ModalOutcome, SelectorModal};
use crate::generation::{Generation, Ticket};
use crate::keymap::RemoteKey;
use crate::types::language_name;

/// Seconds skipped by the seek controls and arrow keys
pub const SEEK_STEP_SECS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Active,
    ButtonNav,
    ProgressNav,
    ModalOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusArea {
    #[default]
    None,
    Buttons,
    Progressbar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlRole {
    Language,
    Subtitle,
    SeekBack,
    PlayPause,
    SeekForward,
    Mute,
    Watchlist,
}

impl ControlRole {
    pub fn id(self) -> &'static str {
        match self {
            ControlRole::Language => "language",
            ControlRole::Subtitle => "subtitle",
            ControlRole::SeekBack => "seek-back",
            ControlRole::PlayPause => "play-pause",
            ControlRole::SeekForward => "seek-forward",
            ControlRole::Mute => "mute",
            ControlRole::Watchlist => "watchlist",
        }
    }
}

/// One button of the control ring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlDescriptor {
    pub id: &'static str,
    pub role: ControlRole,
    pub enabled: bool,
    pub label: String,
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEffect {
    Play,
    Pause,
    /// Relative seek in seconds
    Seek(f64),
    SetMuted(bool),
    ToggleWatchlist,
    ApplyLanguage(String),
    ApplySubtitle(String),
    /// Sleep for `after`, then call `on_hide_timer(ticket)`
    ScheduleHide { ticket: Ticket, after: Duration },
    Close,
}

#[derive(Debug, Clone)]
pub struct PlayerControls {
    controls_visible: bool,
    focus_area: FocusArea,
    focused: ControlRole,
    modal: Option<SelectorModal>,
    /// Button that opened the modal; focus returns here on close
    modal_opener: Option<ControlRole>,
    playing: bool,
    muted: bool,
    seekable: bool,
    in_watchlist: bool,
    languages: Vec<String>,
    language: String,
    recording_language: Option<String>,
    subtitle_options: Vec<String>,
    subtitle: String,
    last_activity: Instant,
    timeout: Duration,
    hide_timer: Generation,
}

impl PlayerControls {
    pub fn new(timeout: Duration, now: Instant) -> Self {
        Self {
            controls_visible: false,
            focus_area: FocusArea::None,
            focused: ControlRole::PlayPause,
            modal: None,
            modal_opener: None,
            playing: true,
            muted: false,
            seekable: true,
            in_watchlist: false,
            languages: Vec::new(),
            language: String::new(),
            recording_language: None,
            subtitle_options: vec!["none".to_string()],
            subtitle: "none".to_string(),
            last_activity: now,
            timeout,
            hide_timer: Generation::new(),
        }
    }

    /// Controls start visible when the player opens
    pub fn mount(&mut self, now: Instant) -> Vec<PlayerEffect> {
        let mut effects = Vec::new();
        self.show(now, &mut effects);
        effects
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn state(&self) -> PlayerState {
        if self.modal.is_some() {
            return PlayerState::ModalOpen;
        }
        match self.focus_area {
            FocusArea::Buttons => PlayerState::ButtonNav,
            FocusArea::Progressbar => PlayerState::ProgressNav,
            FocusArea::None if self.controls_visible => PlayerState::Active,
            FocusArea::None => PlayerState::Idle,
        }
    }

    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    pub fn focus_area(&self) -> FocusArea {
        self.focus_area
    }

    pub fn focused_role(&self) -> Option<ControlRole> {
        (self.focus_area == FocusArea::Buttons).then_some(self.focused)
    }

    /// Index of the focused button within [`PlayerControls::descriptors`]
    pub fn focused_button_index(&self) -> usize {
        self.role_index(self.focused).unwrap_or(0)
    }

    pub fn modal(&self) -> Option<&SelectorModal> {
        self.modal.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn has_multiple_languages(&self) -> bool {
        self.languages.len() > 1
    }

    pub fn has_subtitles(&self) -> bool {
        self.subtitle_options.len() > 1
    }

    // ------------------------------------------------------------------
    // Inputs from the surrounding player
    // ------------------------------------------------------------------

    pub fn set_languages(&mut self, languages: Vec<String>, current: &str) {
        self.languages = languages;
        self.language = current.to_string();
        self.refocus_if_missing();
    }

    /// Language code(s) of the rendition actually playing
    pub fn set_recording_language(&mut self, language: Option<String>) {
        self.recording_language = language;
    }

    pub fn set_subtitle_options(&mut self, options: Vec<String>, current: &str) {
        self.subtitle_options = options;
        self.subtitle = current.to_string();
        self.refocus_if_missing();
    }

    pub fn set_in_watchlist(&mut self, in_watchlist: bool) {
        self.in_watchlist = in_watchlist;
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Seek controls are disabled until the media reports a duration
    pub fn set_seekable(&mut self, seekable: bool) {
        self.seekable = seekable;
    }

    // ------------------------------------------------------------------
    // Control ring
    // ------------------------------------------------------------------

    /// Buttons in ring order; language and subtitle only when available
    pub fn descriptors(&self) -> Vec<ControlDescriptor> {
        let mut roles = Vec::with_capacity(7);
        if self.has_multiple_languages() {
            roles.push(ControlRole::Language);
        }
        if self.has_subtitles() {
            roles.push(ControlRole::Subtitle);
        }
        roles.extend([
            ControlRole::SeekBack,
            ControlRole::PlayPause,
            ControlRole::SeekForward,
            ControlRole::Mute,
            ControlRole::Watchlist,
        ]);

        roles
            .into_iter()
            .map(|role| ControlDescriptor {
                id: role.id(),
                role,
                enabled: self.is_enabled(role),
                label: self.label(role),
            })
            .collect()
    }

    fn is_enabled(&self, role: ControlRole) -> bool {
        match role {
            ControlRole::SeekBack | ControlRole::SeekForward => self.seekable,
            _ => true,
        }
    }

    fn label(&self, role: ControlRole) -> String {
        match role {
            ControlRole::Language => self.language_label(),
            ControlRole::Subtitle if self.subtitle == "none" => "Subtitles Off".to_string(),
            ControlRole::Subtitle => format!("Subtitles ({})", language_name(&self.subtitle)),
            ControlRole::SeekBack => "Back 10s".to_string(),
            ControlRole::PlayPause if self.playing => "Pause".to_string(),
            ControlRole::PlayPause => "Play".to_string(),
            ControlRole::SeekForward => "Forward 10s".to_string(),
            ControlRole::Mute if self.muted => "Unmute".to_string(),
            ControlRole::Mute => "Mute".to_string(),
            ControlRole::Watchlist if self.in_watchlist => "In Watchlist".to_string(),
            ControlRole::Watchlist => "Add to Watchlist".to_string(),
        }
    }

    fn language_label(&self) -> String {
        let recording = self.recording_language.as_deref();
        let names = |codes: &str| {
            codes
                .split('-')
                .map(language_name)
                .collect::<Vec<_>>()
                .join("-")
        };
        match recording {
            Some(rec) if self.language == "auto" => format!("Auto ({})", names(rec)),
            Some(rec) if rec.contains('-') => {
                format!("Multi-Audio ({})", language_name(&self.language))
            }
            _ => language_name(&self.language).to_string(),
        }
    }

    fn role_index(&self, role: ControlRole) -> Option<usize> {
        self.descriptors().iter().position(|d| d.role == role)
    }

    /// Keep focus on an existing button when the ring changes shape
    fn refocus_if_missing(&mut self) {
        if self.role_index(self.focused).is_none() {
            self.focused = ControlRole::PlayPause;
        }
    }

    fn focus_button(&mut self, role: ControlRole) {
        self.focus_area = FocusArea::Buttons;
        self.focused = if self.role_index(role).is_some() {
            role
        } else {
            ControlRole::PlayPause
        };
    }

    fn move_ring(&mut self, delta: isize) {
        let ring = self.descriptors();
        let current = self.focused_button_index() as isize;
        let next = (current + delta).rem_euclid(ring.len() as isize) as usize;
        self.focused = ring[next].role;
    }

    // ------------------------------------------------------------------
    // Visibility
    // ------------------------------------------------------------------

    fn show(&mut self, now: Instant, effects: &mut Vec<PlayerEffect>) {
        self.controls_visible = true;
        self.last_activity = now;
        effects.push(PlayerEffect::ScheduleHide {
            ticket: self.hide_timer.bump(),
            after: self.timeout,
        });
    }

    fn hide(&mut self) {
        self.controls_visible = false;
        self.focus_area = FocusArea::None;
        self.focused = ControlRole::PlayPause;
        self.hide_timer.bump();
    }

    /// Inactivity timer fired
    ///
    /// Controls hide only while playing with nothing focused and no modal;
    /// a paused player keeps them on screen.
    pub fn on_hide_timer(&mut self, ticket: Ticket) -> bool {
        if !self.hide_timer.is_current(ticket) {
            return false;
        }
        if self.playing && self.modal.is_none() && self.focus_area == FocusArea::None {
            self.controls_visible = false;
            return true;
        }
        false
    }

    fn recently_active(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_activity) < self.timeout
    }

    // ------------------------------------------------------------------
    // Key handling
    // ------------------------------------------------------------------

    pub fn handle_key(&mut self, key: RemoteKey, now: Instant) -> Vec<PlayerEffect> {
        if self.modal.is_some() {
            return self.handle_modal_key(key);
        }

        let mut effects = Vec::new();

        if key.is_back_or_stop() {
            if self.focus_area != FocusArea::None
                || (self.controls_visible && self.recently_active(now))
            {
                self.hide();
            } else {
                effects.push(PlayerEffect::Close);
            }
            return effects;
        }

        if key != RemoteKey::Play {
            self.show(now, &mut effects);
        }

        match key {
            RemoteKey::Pause => {
                self.playing = false;
                effects.push(PlayerEffect::Pause);
                self.focus_button(ControlRole::PlayPause);
            }
            RemoteKey::Play => {
                self.hide();
                self.playing = true;
                effects.push(PlayerEffect::Play);
            }
            RemoteKey::PlayPause => self.toggle_playing(&mut effects),
            RemoteKey::Down => self.focus_area = FocusArea::Progressbar,
            RemoteKey::Up => self.focus_button(ControlRole::PlayPause),
            RemoteKey::Enter if self.focus_area == FocusArea::Buttons => {
                self.activate_focused(&mut effects);
            }
            RemoteKey::Left | RemoteKey::Right => {
                let forward = key == RemoteKey::Right;
                if self.focus_area == FocusArea::Buttons {
                    self.move_ring(if forward { 1 } else { -1 });
                } else {
                    effects.push(PlayerEffect::Seek(if forward {
                        SEEK_STEP_SECS
                    } else {
                        -SEEK_STEP_SECS
                    }));
                }
            }
            RemoteKey::Rewind => effects.push(PlayerEffect::Seek(-SEEK_STEP_SECS)),
            RemoteKey::FastForward => effects.push(PlayerEffect::Seek(SEEK_STEP_SECS)),
            RemoteKey::Mute => self.toggle_muted(&mut effects),
            RemoteKey::Subtitle if self.has_subtitles() => {
                self.open_modal(ModalKind::Subtitle, ControlRole::Subtitle);
            }
            RemoteKey::Language if self.has_multiple_languages() => {
                self.open_modal(ModalKind::Language, ControlRole::Language);
            }
            _ => {}
        }

        effects
    }

    fn toggle_playing(&mut self, effects: &mut Vec<PlayerEffect>) {
        self.playing = !self.playing;
        effects.push(if self.playing {
            PlayerEffect::Play
        } else {
            PlayerEffect::Pause
        });
    }

    fn toggle_muted(&mut self, effects: &mut Vec<PlayerEffect>) {
        self.muted = !self.muted;
        effects.push(PlayerEffect::SetMuted(self.muted));
    }

    fn activate_focused(&mut self, effects: &mut Vec<PlayerEffect>) {
        let Some(control) = self
            .descriptors()
            .into_iter()
            .find(|d| d.role == self.focused)
        else {
            return;
        };
        if !control.enabled {
            return;
        }

        match control.role {
            ControlRole::PlayPause => self.toggle_playing(effects),
            ControlRole::SeekBack => effects.push(PlayerEffect::Seek(-SEEK_STEP_SECS)),
            ControlRole::SeekForward => effects.push(PlayerEffect::Seek(SEEK_STEP_SECS)),
            ControlRole::Mute => self.toggle_muted(effects),
            ControlRole::Watchlist => effects.push(PlayerEffect::ToggleWatchlist),
            ControlRole::Language => self.open_modal(ModalKind::Language, ControlRole::Language),
            ControlRole::Subtitle => self.open_modal(ModalKind::Subtitle, ControlRole::Subtitle),
        }
    }

    // ------------------------------------------------------------------
    // Modal
    // ------------------------------------------------------------------

    fn open_modal(&mut self, kind: ModalKind, opener: ControlRole) {
        let modal = match kind {
            ModalKind::Language => {
                SelectorModal::open(kind, self.languages.clone(), &self.language)
            }
            ModalKind::Subtitle => {
                SelectorModal::open(kind, self.subtitle_options.clone(), &self.subtitle)
            }
        };
        self.modal = Some(modal);
        self.modal_opener = Some(opener);
    }

    fn close_modal(&mut self) {
        self.modal = None;
        if let Some(opener) = self.modal_opener.take() {
            self.focus_button(opener);
        }
    }

    /// Keys while a selector is open; nothing leaks to the controls
    pub fn handle_modal_key(&mut self, key: RemoteKey) -> Vec<PlayerEffect> {
        let Some(modal) = self.modal.as_mut() else {
            return Vec::new();
        };
        let kind = modal.kind();

        match modal.handle_key(key) {
            ModalOutcome::Applied(value) => {
                let effect = match kind {
                    ModalKind::Language => {
                        self.language = value.clone();
                        PlayerEffect::ApplyLanguage(value)
                    }
                    ModalKind::Subtitle => {
                        self.subtitle = value.clone();
                        PlayerEffect::ApplySubtitle(value)
                    }
                };
                self.close_modal();
                vec![effect]
            }
            ModalOutcome::Dismissed => {
                self.close_modal();
                Vec::new()
            }
            ModalOutcome::Moved(_) | ModalOutcome::Ignored => Vec::new(),
        }
    }
}
