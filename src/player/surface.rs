//! The video element seen from the player
//!
//! Decoding and rendering live outside this crate; the player drives them
//! through [`MediaSurface`]. [`SimulatedSurface`] keeps just enough state to
//! replay key scripts and to test the player without a real backend.

use super::subtitles::SubtitleTrack;

pub trait MediaSurface: Send {
    /// Load a new source and start at `start_secs`
    fn load(&mut self, url: &str, start_secs: f64);
    fn play(&mut self);
    fn pause(&mut self);
    /// Relative seek, clamped to the media bounds
    fn seek(&mut self, delta_secs: f64);
    fn set_muted(&mut self, muted: bool);
    fn current_time(&self) -> f64;
    /// `None` until the media reports its length
    fn duration(&self) -> Option<f64>;
    fn set_subtitle_track(&mut self, track: Option<&SubtitleTrack>);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulatedSurface {
    pub url: Option<String>,
    pub position: f64,
    pub length: Option<f64>,
    pub playing: bool,
    pub muted: bool,
    pub subtitle: Option<String>,
}

impl SimulatedSurface {
    pub fn new(length: Option<f64>) -> Self {
        Self {
            length,
            ..Default::default()
        }
    }

    /// Let wall-clock playback run for `secs`
    pub fn advance(&mut self, secs: f64) {
        if self.playing {
            self.position = self.clamp(self.position + secs);
        }
    }

    fn clamp(&self, secs: f64) -> f64 {
        match self.length {
            Some(length) => secs.clamp(0.0, length),
            None => secs.max(0.0),
        }
    }
}

impl MediaSurface for SimulatedSurface {
    fn load(&mut self, url: &str, start_secs: f64) {
        self.url = Some(url.to_string());
        self.position = self.clamp(start_secs);
        self.playing = true;
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, delta_secs: f64) {
        self.position = self.clamp(self.position + delta_secs);
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.length
    }

    fn set_subtitle_track(&mut self, track: Option<&SubtitleTrack>) {
        self.subtitle = track.map(|t| t.language.clone());
    }
}
