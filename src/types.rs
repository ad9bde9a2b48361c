//! Domain records for the talk archive.
//!
//! Field names follow the upstream API (camelCase for GraphQL payloads,
//! snake_case aliases accepted for the REST endpoints).

use jiff::Timestamp;
use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};

pub const MIME_WEBM: &str = "video/webm";
pub const MIME_MP4: &str = "video/mp4";

/// Anything with a stable identity used for deduplication
pub trait Identified {
    fn identity(&self) -> &str;
}

/// A single video rendition of a lecture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(default, alias = "recording_url")]
    pub url: Option<String>,
    #[serde(default, alias = "mime_type")]
    pub mime_type: String,
    /// Language code, multi-track recordings join codes with `-` (e.g. `deu-eng`)
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default, alias = "high_quality")]
    pub high_quality: Option<bool>,
}

impl Video {
    pub fn is_webm(&self) -> bool {
        self.mime_type == MIME_WEBM
    }

    pub fn is_mp4(&self) -> bool {
        self.mime_type == MIME_MP4
    }

    pub fn has_url(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// Individual language codes carried by this rendition
    pub fn languages(&self) -> Vec<&str> {
        self.language
            .as_deref()
            .map(|l| l.split('-').filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleFile {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, alias = "mime_type")]
    pub mime_type: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Images {
    #[serde(default, alias = "thumb_url")]
    pub thumb_url: Option<String>,
    #[serde(default, alias = "poster_url")]
    pub poster_url: Option<String>,
}

/// One talk recording
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    pub guid: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "length")]
    pub duration: Option<u64>,
    #[serde(default, alias = "view_count")]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub persons: Vec<String>,
    #[serde(default)]
    pub images: Images,
    #[serde(default)]
    pub videos: Vec<Video>,
    #[serde(default)]
    pub subtitles: Vec<SubtitleFile>,
    #[serde(default, alias = "conference_title")]
    pub conference_title: Option<String>,
}

impl Identified for Lecture {
    fn identity(&self) -> &str {
        &self.guid
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LectureNodes {
    #[serde(default)]
    pub nodes: Vec<Lecture>,
}

/// A conference with its lectures: the paginated unit of the home view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceRow {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub event_last_released_at: Option<String>,
    #[serde(default)]
    pub lectures: LectureNodes,
}

impl ConferenceRow {
    pub fn lectures(&self) -> &[Lecture] {
        &self.lectures.nodes
    }

    /// Most recent release timestamp, falling back to the update time
    pub fn released_at(&self) -> Option<&str> {
        self.event_last_released_at
            .as_deref()
            .or(self.updated_at.as_deref())
    }
}

impl Identified for ConferenceRow {
    fn identity(&self) -> &str {
        &self.id
    }
}

/// Conference entry of the events listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConferenceSummary {
    pub acronym: String,
    pub title: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub event_last_released_at: Option<String>,
}

impl ConferenceSummary {
    pub fn released_at(&self) -> Option<&str> {
        self.event_last_released_at
            .as_deref()
            .or(self.updated_at.as_deref())
    }
}

impl Identified for ConferenceSummary {
    fn identity(&self) -> &str {
        &self.acronym
    }
}

/// Parse an upstream release date; missing or unreadable dates sort oldest
///
/// Accepts RFC 3339 timestamps as well as bare dates and offset-less
/// datetimes, which are read as UTC.
pub fn release_timestamp(raw: Option<&str>) -> Timestamp {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Timestamp::UNIX_EPOCH;
    };
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return ts;
    }
    let civil = raw
        .parse::<DateTime>()
        .or_else(|_| raw.parse::<Date>().map(|d| d.to_datetime(jiff::civil::Time::midnight())));
    civil
        .ok()
        .and_then(|dt| dt.to_zoned(TimeZone::UTC).ok())
        .map(|zoned| zoned.timestamp())
        .unwrap_or(Timestamp::UNIX_EPOCH)
}

/// Selectable language with display name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageOption {
    pub code: &'static str,
    pub name: &'static str,
}

pub const LANGUAGES: &[LanguageOption] = &[
    LanguageOption { code: "auto", name: "Auto" },
    LanguageOption { code: "deu", name: "German" },
    LanguageOption { code: "eng", name: "English" },
    LanguageOption { code: "fin", name: "Finnish" },
    LanguageOption { code: "fra", name: "French" },
    LanguageOption { code: "spa", name: "Spanish" },
    LanguageOption { code: "ita", name: "Italian" },
    LanguageOption { code: "por", name: "Portuguese" },
    LanguageOption { code: "rus", name: "Russian" },
    LanguageOption { code: "pol", name: "Polish" },
    LanguageOption { code: "nld", name: "Dutch" },
    LanguageOption { code: "ces", name: "Czech" },
    LanguageOption { code: "jpn", name: "Japanese" },
    LanguageOption { code: "zho", name: "Chinese" },
    LanguageOption { code: "ara", name: "Arabic" },
];

/// Human-readable name for a language code, `none` included
pub fn language_name(code: &str) -> &str {
    if code == "none" {
        return "None";
    }
    LANGUAGES
        .iter()
        .find(|l| l.code == code)
        .map(|l| l.name)
        .unwrap_or(code)
}

/// Two-letter code for subtitle tracks
pub fn two_letter_code(code: &str) -> &str {
    match code {
        "eng" => "en",
        "deu" => "de",
        "fra" => "fr",
        "spa" => "es",
        "ita" => "it",
        "por" => "pt",
        "rus" => "ru",
        "jpn" => "ja",
        "zho" => "zh",
        "ara" => "ar",
        "pol" => "pl",
        "nld" => "nl",
        "ces" => "cs",
        "fin" => "fi",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_languages_split_multi_track() {
        let video = Video {
            language: Some("deu-eng".to_string()),
            ..Default::default()
        };
        assert_eq!(video.languages(), vec!["deu", "eng"]);
    }

    #[test]
    fn test_lecture_accepts_rest_field_names() {
        let json = r#"{"guid":"g1","title":"T","length":3600,"view_count":12,
            "conference_title":"36c3","images":{"thumb_url":"t.jpg"}}"#;
        let lecture: Lecture = serde_json::from_str(json).unwrap();
        assert_eq!(lecture.duration, Some(3600));
        assert_eq!(lecture.view_count, Some(12));
        assert_eq!(lecture.conference_title.as_deref(), Some("36c3"));
        assert_eq!(lecture.images.thumb_url.as_deref(), Some("t.jpg"));
    }

    #[test]
    fn test_language_name_falls_back_to_code() {
        assert_eq!(language_name("eng"), "English");
        assert_eq!(language_name("none"), "None");
        assert_eq!(language_name("xyz"), "xyz");
        assert_eq!(two_letter_code("deu"), "de");
    }

    #[test]
    fn test_release_timestamp_formats() {
        let full = release_timestamp(Some("2024-12-30T10:00:00+01:00"));
        let date = release_timestamp(Some("2024-12-30"));
        assert!(full > date);
        assert_eq!(release_timestamp(Some("garbage")), Timestamp::UNIX_EPOCH);
        assert_eq!(release_timestamp(None), Timestamp::UNIX_EPOCH);
        assert!(release_timestamp(Some("2024-12-30T10:00:00")) > date);
    }

    #[test]
    fn test_conference_released_at_fallback() {
        let row = ConferenceRow {
            updated_at: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        assert_eq!(row.released_at(), Some("2024-01-01"));
    }
}
