//! Subtitle options and the active subtitle track
//!
//! Choosing a subtitle language starts an asynchronous load. Only the most
//! recent choice may install its track; the previous track is released as
//! soon as a new choice is made.

use crate::error::Result;
use crate::generation::{Generation, Ticket};
use crate::types::{SubtitleFile, language_name, two_letter_code};

pub const NO_SUBTITLES: &str = "none";

const CDN_BASE: &str = "https://cdn.media.ccc.de/";
const STATIC_BASE: &str = "https://static.media.ccc.de/media/";

/// `none` followed by each distinct language that has a subtitle file
pub fn subtitle_options(files: &[SubtitleFile]) -> Vec<String> {
    let mut options = vec![NO_SUBTITLES.to_string()];
    for file in files {
        let (Some(language), Some(url)) = (file.language.as_deref(), file.url.as_deref()) else {
            continue;
        };
        if url.is_empty() || options.iter().any(|o| o == language) {
            continue;
        }
        options.push(language.to_string());
    }
    options
}

/// The preferred language when offered, otherwise no subtitles
pub fn initial_subtitle(preferred: &str, options: &[String]) -> String {
    if preferred != NO_SUBTITLES && options.iter().any(|o| o == preferred) {
        preferred.to_string()
    } else {
        NO_SUBTITLES.to_string()
    }
}

/// Download candidates: the CDN URL, then its static mirror
pub fn candidate_urls(url: &str) -> Vec<String> {
    let mirror = url
        .replace(CDN_BASE, STATIC_BASE)
        .replace("https://static.media.ccc.de/media/media/", STATIC_BASE);
    if mirror == url {
        vec![url.to_string()]
    } else {
        vec![url.to_string(), mirror]
    }
}

/// A loaded subtitle track attached to the media surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleTrack {
    pub language: String,
    pub label: String,
    /// Two-letter code for the track element
    pub srclang: String,
    /// Raw subtitle text as downloaded
    pub content: String,
}

/// Fetch the caller should perform for a subtitle choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleLoad {
    pub ticket: Ticket,
    pub language: String,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    Installed,
    Failed,
    Stale,
}

#[derive(Debug, Default)]
pub struct SubtitleSlot {
    generation: Generation,
    pending_language: Option<String>,
    active: Option<SubtitleTrack>,
}

impl SubtitleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&SubtitleTrack> {
        self.active.as_ref()
    }

    /// Switch language; returns the released track and the load to start
    pub fn select(
        &mut self,
        language: &str,
        files: &[SubtitleFile],
    ) -> (Option<SubtitleTrack>, Option<SubtitleLoad>) {
        let ticket = self.generation.bump();
        let released = self.active.take();
        if let Some(track) = &released {
            tracing::debug!("releasing {} subtitle track", track.language);
        }
        self.pending_language = None;

        if language == NO_SUBTITLES {
            return (released, None);
        }

        let url = files
            .iter()
            .filter(|f| f.language.as_deref() == Some(language))
            .find_map(|f| f.url.as_deref().filter(|u| !u.is_empty()));

        let load = url.map(|url| {
            self.pending_language = Some(language.to_string());
            SubtitleLoad {
                ticket,
                language: language.to_string(),
                urls: candidate_urls(url),
            }
        });
        (released, load)
    }

    /// Install the downloaded track if the choice is still current
    pub fn complete(&mut self, ticket: Ticket, result: Result<String>) -> TrackOutcome {
        if !self.generation.is_current(ticket) {
            return TrackOutcome::Stale;
        }
        let Some(language) = self.pending_language.take() else {
            return TrackOutcome::Stale;
        };

        match result {
            Ok(content) => {
                self.active = Some(SubtitleTrack {
                    label: language_name(&language).to_string(),
                    srclang: two_letter_code(&language).to_string(),
                    language,
                    content,
                });
                TrackOutcome::Installed
            }
            Err(e) => {
                tracing::warn!("failed to load {language} subtitles: {e}");
                TrackOutcome::Failed
            }
        }
    }

    /// Drop everything, e.g. when the player closes
    pub fn release(&mut self) -> Option<SubtitleTrack> {
        self.generation.bump();
        self.pending_language = None;
        self.active.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CccTvError;

    fn file(language: &str, url: Option<&str>) -> SubtitleFile {
        SubtitleFile {
            url: url.map(str::to_string),
            mime_type: "application/x-subrip".to_string(),
            language: Some(language.to_string()),
        }
    }

    fn files() -> Vec<SubtitleFile> {
        vec![
            file("eng", Some("https://cdn.media.ccc.de/congress/2023/eng.srt")),
            file("deu", Some("https://cdn.media.ccc.de/congress/2023/deu.srt")),
            file("eng", Some("https://example.org/other.srt")),
            file("fra", None),
        ]
    }

    #[test]
    fn test_options_start_with_none() {
        assert_eq!(subtitle_options(&files()), vec!["none", "eng", "deu"]);
        assert_eq!(subtitle_options(&[]), vec!["none"]);
    }

    #[test]
    fn test_initial_subtitle_requires_availability() {
        let options = subtitle_options(&files());
        assert_eq!(initial_subtitle("deu", &options), "deu");
        assert_eq!(initial_subtitle("fra", &options), "none");
        assert_eq!(initial_subtitle("none", &options), "none");
    }

    #[test]
    fn test_candidate_urls_add_static_mirror() {
        let urls = candidate_urls("https://cdn.media.ccc.de/congress/2023/eng.srt");
        assert_eq!(
            urls,
            vec![
                "https://cdn.media.ccc.de/congress/2023/eng.srt",
                "https://static.media.ccc.de/media/congress/2023/eng.srt",
            ]
        );
        assert_eq!(candidate_urls("https://example.org/x.srt").len(), 1);
    }

    #[test]
    fn test_superseded_load_is_stale_and_previous_released() {
        let mut slot = SubtitleSlot::new();
        let (_, first) = slot.select("eng", &files());
        let first = first.unwrap();
        assert_eq!(slot.complete(first.ticket, Ok("1\n".into())), TrackOutcome::Installed);
        assert_eq!(slot.active().unwrap().srclang, "en");

        let (released, second) = slot.select("deu", &files());
        assert_eq!(released.unwrap().language, "eng");
        assert!(slot.active().is_none());

        assert_eq!(slot.complete(first.ticket, Ok("late".into())), TrackOutcome::Stale);
        let second = second.unwrap();
        assert_eq!(slot.complete(second.ticket, Ok("2\n".into())), TrackOutcome::Installed);
        assert_eq!(slot.active().unwrap().label, "German");
    }

    #[test]
    fn test_failed_load_leaves_no_track() {
        let mut slot = SubtitleSlot::new();
        let (_, load) = slot.select("eng", &files());
        let outcome = slot.complete(load.unwrap().ticket, Err(CccTvError::Fetch("404".into())));
        assert_eq!(outcome, TrackOutcome::Failed);
        assert!(slot.active().is_none());
    }

    #[test]
    fn test_none_starts_no_load() {
        let mut slot = SubtitleSlot::new();
        let (released, load) = slot.select("none", &files());
        assert!(released.is_none());
        assert!(load.is_none());
    }
}
