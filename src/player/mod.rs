//! Fullscreen lecture player
//!
//! [`Player`] ties the control state machine to a [`MediaSurface`], the
//! watchlist, saved positions and subtitle loading. Timers and downloads are
//! not run here: they are queued as [`PlayerRequest`]s which the app drains
//! after every key and turns into tokio tasks. Their completions come back
//! through the `on_*` methods carrying the ticket they were issued with.

pub mod controls;
pub mod modal;
pub mod position;
pub mod subtitles;
pub mod surface;

pub use controls::{
    ControlDescriptor, ControlRole, FocusArea, PlayerControls, PlayerEffect, PlayerState,
};
pub use modal::{ModalKind, SelectorModal};
pub use position::{PlaybackPositions, SaveOutcome, position_key};
pub use subtitles::{SubtitleLoad, SubtitleSlot, SubtitleTrack, TrackOutcome};
pub use surface::{MediaSurface, SimulatedSurface};

use std::time::Duration;

use tokio::time::Instant;

use crate::config::TimingConfig;
use crate::error::{CccTvError, Result};
use crate::focus::{HandleResult, KeyHandler, ModalHost};
use crate::generation::{Generation, Ticket};
use crate::keymap::RemoteKey;
use crate::media::{available_languages, initial_language, playable_video, select_video};
use crate::store::{Preferences, Watchlist};
use crate::types::Lecture;

/// Work the app must schedule on the player's behalf
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerRequest {
    /// Sleep `after`, then call [`Player::on_hide_timer`]
    ScheduleHide { ticket: Ticket, after: Duration },
    /// Call [`Player::on_autosave`] every `every` until the player closes
    Autosave { ticket: Ticket, every: Duration },
    /// Download one of the URLs and call [`Player::on_subtitle_loaded`]
    LoadSubtitle(SubtitleLoad),
}

/// Shared services a player needs
#[derive(Clone)]
pub struct PlayerServices {
    pub preferences: Preferences,
    pub watchlist: Watchlist,
    pub positions: PlaybackPositions,
    pub timing: TimingConfig,
}

pub struct Player {
    lecture: Lecture,
    controls: PlayerControls,
    surface: Box<dyn MediaSurface>,
    subtitles: SubtitleSlot,
    watchlist: Watchlist,
    positions: PlaybackPositions,
    autosave: Generation,
    requests: Vec<PlayerRequest>,
}

impl Player {
    /// Open a lecture on `surface`, resuming from a saved position
    ///
    /// Fails with `NoPlayableMedia` if no rendition can be played; the
    /// surface is returned untouched in that case.
    pub fn open(
        mut lecture: Lecture,
        conference_title: Option<&str>,
        mut surface: Box<dyn MediaSurface>,
        services: &PlayerServices,
        now: Instant,
    ) -> std::result::Result<Self, (CccTvError, Box<dyn MediaSurface>)> {
        if lecture.conference_title.is_none() {
            lecture.conference_title = conference_title.map(str::to_string);
        }

        let languages = available_languages(&lecture.videos);
        let language = initial_language(&languages, &services.preferences.audio_language());
        let (url, recording_language) = match playable_video(&lecture, &language) {
            Ok(choice) => (
                choice.video.url.clone().unwrap_or_default(),
                choice.language().map(str::to_string),
            ),
            Err(e) => return Err((e, surface)),
        };

        let start = services.positions.load(&lecture.guid).unwrap_or(0.0);
        surface.load(&url, start);

        let mut controls = PlayerControls::new(services.timing.controls_timeout(), now);
        controls.set_languages(languages, &language);
        controls.set_recording_language(recording_language);
        controls.set_in_watchlist(services.watchlist.contains(&lecture.guid));
        controls.set_seekable(surface.duration().is_some());

        let options = subtitles::subtitle_options(&lecture.subtitles);
        let subtitle =
            subtitles::initial_subtitle(&services.preferences.subtitle_language(), &options);
        controls.set_subtitle_options(options, &subtitle);

        let mut player = Self {
            lecture,
            controls,
            surface,
            subtitles: SubtitleSlot::new(),
            watchlist: services.watchlist.clone(),
            positions: services.positions.clone(),
            autosave: Generation::new(),
            requests: Vec::new(),
        };

        let effects = player.controls.mount(now);
        player.apply(effects);
        player.select_subtitle(&subtitle);
        player.requests.push(PlayerRequest::Autosave {
            ticket: player.autosave.bump(),
            every: services.timing.autosave_interval(),
        });

        tracing::debug!("opened {} at {start}s", player.lecture.guid);
        Ok(player)
    }

    pub fn lecture(&self) -> &Lecture {
        &self.lecture
    }

    pub fn controls(&self) -> &PlayerControls {
        &self.controls
    }

    pub fn surface(&self) -> &dyn MediaSurface {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> &mut dyn MediaSurface {
        self.surface.as_mut()
    }

    /// Requests queued since the last call
    pub fn take_requests(&mut self) -> Vec<PlayerRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn handle_key_at(&mut self, key: RemoteKey, now: Instant) -> HandleResult {
        let effects = self.controls.handle_key(key, now);
        self.apply(effects)
    }

    /// The media reported its metadata
    pub fn on_media_ready(&mut self) {
        self.controls.set_seekable(self.surface.duration().is_some());
    }

    pub fn on_hide_timer(&mut self, ticket: Ticket) -> bool {
        self.controls.on_hide_timer(ticket)
    }

    pub fn on_autosave(&mut self, ticket: Ticket) -> Option<SaveOutcome> {
        if !self.autosave.is_current(ticket) {
            return None;
        }
        self.save_position()
    }

    pub fn on_subtitle_loaded(&mut self, ticket: Ticket, result: Result<String>) -> TrackOutcome {
        let outcome = self.subtitles.complete(ticket, result);
        if outcome == TrackOutcome::Installed {
            self.surface.set_subtitle_track(self.subtitles.active());
        }
        outcome
    }

    /// Save the position and hand the surface back
    pub fn close(mut self) -> Box<dyn MediaSurface> {
        self.save_position();
        self.autosave.bump();
        if self.subtitles.release().is_some() {
            self.surface.set_subtitle_track(None);
        }
        self.surface.pause();
        tracing::debug!("closed {}", self.lecture.guid);
        self.surface
    }

    fn save_position(&mut self) -> Option<SaveOutcome> {
        let duration = self.surface.duration()?;
        let current = self.surface.current_time();
        match self.positions.record(&self.lecture.guid, current, duration) {
            Ok(outcome) => {
                if outcome == SaveOutcome::Finished {
                    self.controls.set_in_watchlist(false);
                }
                Some(outcome)
            }
            Err(e) => {
                tracing::warn!("failed to save position for {}: {e}", self.lecture.guid);
                None
            }
        }
    }

    fn select_subtitle(&mut self, language: &str) {
        let (released, load) = self.subtitles.select(language, &self.lecture.subtitles);
        if released.is_some() {
            self.surface.set_subtitle_track(None);
        }
        if let Some(load) = load {
            self.requests.push(PlayerRequest::LoadSubtitle(load));
        }
    }

    fn switch_language(&mut self, language: &str) {
        let Some(choice) = select_video(&self.lecture.videos, language) else {
            tracing::warn!("no rendition of {} for {language}", self.lecture.guid);
            return;
        };
        let url = choice.video.url.clone().unwrap_or_default();
        let recording_language = choice.language().map(str::to_string);

        let resume = self.surface.current_time();
        self.surface.load(&url, resume);
        self.controls.set_recording_language(recording_language);
    }

    fn apply(&mut self, effects: Vec<PlayerEffect>) -> HandleResult {
        let mut result = HandleResult::Handled;
        for effect in effects {
            match effect {
                PlayerEffect::Play => self.surface.play(),
                PlayerEffect::Pause => self.surface.pause(),
                PlayerEffect::Seek(delta) => self.surface.seek(delta),
                PlayerEffect::SetMuted(muted) => self.surface.set_muted(muted),
                PlayerEffect::ToggleWatchlist => match self.watchlist.toggle(&self.lecture) {
                    Ok(now_in) => self.controls.set_in_watchlist(now_in),
                    Err(e) => tracing::warn!("failed to update watchlist: {e}"),
                },
                PlayerEffect::ApplyLanguage(language) => self.switch_language(&language),
                PlayerEffect::ApplySubtitle(language) => self.select_subtitle(&language),
                PlayerEffect::ScheduleHide { ticket, after } => {
                    self.requests
                        .push(PlayerRequest::ScheduleHide { ticket, after });
                }
                PlayerEffect::Close => result = HandleResult::Close,
            }
        }
        result
    }
}

impl KeyHandler for Player {
    fn handle_key(&mut self, key: RemoteKey) -> HandleResult {
        self.handle_key_at(key, Instant::now())
    }
}

impl ModalHost for Player {
    fn modal_open(&self) -> bool {
        self.controls.modal().is_some()
    }

    fn handle_modal_key(&mut self, key: RemoteKey) -> HandleResult {
        let effects = self.controls.handle_modal_key(key);
        self.apply(effects)
    }
}

/// Stand-in used by the focus router when no player is open
#[derive(Debug, Default)]
pub struct ClosedPlayer;

impl KeyHandler for ClosedPlayer {
    fn handle_key(&mut self, _key: RemoteKey) -> HandleResult {
        HandleResult::NotHandled
    }
}

impl ModalHost for ClosedPlayer {
    fn modal_open(&self) -> bool {
        false
    }

    fn handle_modal_key(&mut self, _key: RemoteKey) -> HandleResult {
        HandleResult::NotHandled
    }
}
