//! Video rendition selection by preferred audio language

use crate::error::{CccTvError, Result};
use crate::types::{Lecture, Video};

/// Language code that means "first playable rendition"
pub const AUTO_LANGUAGE: &str = "auto";

/// Chosen rendition for a lecture
#[derive(Debug, Clone, PartialEq)]
pub struct VideoChoice<'a> {
    pub video: &'a Video,
    /// Whether the preferred language is actually spoken in this rendition
    pub language_found: bool,
    pub priority: u8,
}

impl VideoChoice<'_> {
    /// Language code of the chosen rendition (`deu-eng` for multi-track)
    pub fn language(&self) -> Option<&str> {
        self.video.language.as_deref()
    }

    pub fn is_multi_track(&self) -> bool {
        self.video.languages().len() > 1
    }
}

/// Rank a rendition against the preferred language
///
/// 6 single-track webm, 5 single-track mp4, 4 multi-track webm,
/// 3 multi-track mp4, 2 any webm, 1 any mp4, 0 unplayable.
pub fn priority(video: &Video, preferred: &str) -> u8 {
    if !video.has_url() || !(video.is_webm() || video.is_mp4()) {
        return 0;
    }

    let languages = video.languages();
    let exact = languages.len() == 1 && languages[0] == preferred;
    let includes = languages.contains(&preferred);

    match (exact, includes, video.is_webm()) {
        (true, _, true) => 6,
        (true, _, false) => 5,
        (false, true, true) => 4,
        (false, true, false) => 3,
        (false, false, true) => 2,
        (false, false, false) => 1,
    }
}

/// Pick the best rendition; first of equal priority wins
pub fn select_video<'a>(videos: &'a [Video], preferred: &str) -> Option<VideoChoice<'a>> {
    if preferred == AUTO_LANGUAGE {
        return videos
            .iter()
            .find(|v| v.is_webm() && v.has_url())
            .or_else(|| videos.iter().find(|v| v.is_mp4() && v.has_url()))
            .map(|video| VideoChoice {
                video,
                language_found: true,
                priority: priority(video, preferred),
            });
    }

    let mut best: Option<VideoChoice<'a>> = None;
    for video in videos {
        let rank = priority(video, preferred);
        if rank > best.as_ref().map_or(0, |b| b.priority) {
            best = Some(VideoChoice {
                video,
                language_found: rank >= 3,
                priority: rank,
            });
            if rank == 6 {
                break;
            }
        }
    }
    best
}

/// Like [`select_video`] but an unplayable lecture is an error
pub fn playable_video<'a>(lecture: &'a Lecture, preferred: &str) -> Result<VideoChoice<'a>> {
    select_video(&lecture.videos, preferred)
        .ok_or_else(|| CccTvError::NoPlayableMedia(lecture.guid.clone()))
}

/// Distinct audio languages offered by the webm renditions, first-seen order
pub fn available_languages(videos: &[Video]) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for video in videos.iter().filter(|v| v.is_webm() && v.has_url()) {
        for code in video.languages() {
            if !languages.iter().any(|l| l == code) {
                languages.push(code.to_string());
            }
        }
    }
    languages
}

/// Preferred language if offered, else the first one offered
pub fn initial_language(available: &[String], preferred: &str) -> String {
    if available.iter().any(|l| l == preferred) || available.is_empty() {
        preferred.to_string()
    } else {
        available[0].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MIME_MP4, MIME_WEBM};

    fn video(mime: &str, language: Option<&str>) -> Video {
        Video {
            url: Some(format!("https://cdn/{}-{}", mime, language.unwrap_or("x"))),
            mime_type: mime.to_string(),
            language: language.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_priority_table() {
        assert_eq!(priority(&video(MIME_WEBM, Some("eng")), "eng"), 6);
        assert_eq!(priority(&video(MIME_MP4, Some("eng")), "eng"), 5);
        assert_eq!(priority(&video(MIME_WEBM, Some("deu-eng")), "eng"), 4);
        assert_eq!(priority(&video(MIME_MP4, Some("deu-eng")), "eng"), 3);
        assert_eq!(priority(&video(MIME_WEBM, Some("deu")), "eng"), 2);
        assert_eq!(priority(&video(MIME_MP4, None), "eng"), 1);
        assert_eq!(priority(&video("audio/opus", Some("eng")), "eng"), 0);
    }

    #[test]
    fn test_exact_mp4_beats_multi_track_webm() {
        let videos = vec![
            video(MIME_WEBM, Some("deu-eng")),
            video(MIME_MP4, Some("eng")),
        ];
        let choice = select_video(&videos, "eng").unwrap();
        assert_eq!(choice.priority, 5);
        assert!(choice.language_found);
        assert_eq!(choice.language(), Some("eng"));
    }

    #[test]
    fn test_fallback_does_not_find_language() {
        let videos = vec![video(MIME_MP4, Some("deu")), video(MIME_WEBM, Some("deu"))];
        let choice = select_video(&videos, "eng").unwrap();
        assert_eq!(choice.priority, 2);
        assert!(!choice.language_found);
    }

    #[test]
    fn test_auto_prefers_first_webm() {
        let videos = vec![
            video(MIME_MP4, Some("eng")),
            video(MIME_WEBM, Some("fra")),
            video(MIME_WEBM, Some("deu")),
        ];
        let choice = select_video(&videos, AUTO_LANGUAGE).unwrap();
        assert_eq!(choice.language(), Some("fra"));
    }

    #[test]
    fn test_missing_url_is_skipped() {
        let mut broken = video(MIME_WEBM, Some("eng"));
        broken.url = None;
        assert!(select_video(&[broken.clone()], "eng").is_none());

        let lecture = Lecture {
            guid: "g".to_string(),
            videos: vec![broken],
            ..Default::default()
        };
        assert!(matches!(
            playable_video(&lecture, "eng"),
            Err(CccTvError::NoPlayableMedia(_))
        ));
    }

    #[test]
    fn test_available_languages_from_webm_only() {
        let videos = vec![
            video(MIME_WEBM, Some("deu-eng")),
            video(MIME_MP4, Some("fra")),
            video(MIME_WEBM, Some("eng")),
        ];
        assert_eq!(available_languages(&videos), vec!["deu", "eng"]);
        assert_eq!(initial_language(&available_languages(&videos), "eng"), "eng");
        assert_eq!(initial_language(&available_languages(&videos), "spa"), "deu");
    }
}
