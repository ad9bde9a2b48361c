//! Where lectures and conferences come from
//!
//! [`ItemSource`] is the only seam between the navigation core and the
//! network. [`MediaApi`] talks to media.ccc.de (GraphQL for the paginated
//! home feed and conference details, REST for listings and search);
//! [`FixtureSource`] serves a JSON snapshot for offline replay.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::ApiConfig;
use crate::error::{CccTvError, Result};
use crate::types::{ConferenceRow, ConferenceSummary, Images, Lecture, SubtitleFile, Video};

/// Conferences per page of the home feed
pub const PAGE_SIZE: usize = 3;

#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Next page of recent conferences, starting at `offset`
    async fn fetch_page(&self, offset: usize) -> Result<Vec<ConferenceRow>>;

    async fn search(&self, query: &str) -> Result<Vec<Lecture>>;

    /// Every conference, unsorted
    async fn conferences(&self) -> Result<Vec<ConferenceSummary>>;

    /// One conference with its lectures
    async fn conference(&self, acronym: &str) -> Result<ConferenceRow>;

    /// Subtitle text from the first candidate URL that answers
    async fn subtitle(&self, urls: &[String]) -> Result<String>;
}

// ============================================================================
// Wire formats
// ============================================================================

const RECENT_QUERY: &str = r#"
query conferencesRecent($offset: Int, $first: Int) {
  conferencesRecent(offset: $offset, first: $first) {
    id title slug logoUrl updatedAt eventLastReleasedAt
    lectures {
      nodes {
        guid title persons duration viewCount
        images { thumbUrl posterUrl }
        videos { width mimeType language url highQuality }
        subtitles { url mimeType language }
      }
    }
  }
}"#;

const CONFERENCE_QUERY: &str = r#"
query conference($id: ID!) {
  conference(id: $id) {
    id title slug logoUrl updatedAt eventLastReleasedAt
    lectures {
      nodes {
        guid title description persons duration viewCount
        images { thumbUrl posterUrl }
        videos { width mimeType language url highQuality }
        subtitles { url mimeType language }
      }
    }
  }
}"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentData {
    #[serde(default)]
    conferences_recent: Vec<ConferenceRow>,
}

#[derive(Debug, Deserialize)]
struct ConferenceData {
    conference: Option<ConferenceRow>,
}

#[derive(Debug, Deserialize)]
struct ConferencesResponse {
    #[serde(default)]
    conferences: Vec<ConferenceSummary>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    events: Option<Vec<RestEvent>>,
}

/// Event as returned by the REST search endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestEvent {
    pub guid: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub length: Option<u64>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub persons: Vec<String>,
    #[serde(default)]
    pub conference_title: Option<String>,
    #[serde(default)]
    pub thumb_url: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub recordings: Vec<RestRecording>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestRecording {
    #[serde(default)]
    pub recording_url: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub high_quality: Option<bool>,
}

impl From<RestEvent> for Lecture {
    /// Videos take the event's original language; text recordings become subtitles
    fn from(event: RestEvent) -> Self {
        let language = event.original_language.unwrap_or_else(|| "eng".to_string());
        let mut videos = Vec::new();
        let mut subtitles = Vec::new();
        for recording in event.recordings {
            let Some(mime) = recording.mime_type else {
                continue;
            };
            if mime.contains("video") {
                videos.push(Video {
                    url: recording.recording_url,
                    mime_type: mime,
                    language: Some(language.clone()),
                    width: recording.width,
                    high_quality: recording.high_quality,
                });
            } else if mime.contains("text") || mime.contains("vtt") {
                subtitles.push(SubtitleFile {
                    url: recording.recording_url,
                    mime_type: mime,
                    language: Some(recording.language.unwrap_or_else(|| "eng".to_string())),
                });
            }
        }

        Lecture {
            guid: event.guid,
            title: event.title,
            description: event.description,
            duration: event.length.or(event.duration),
            view_count: event.view_count,
            persons: event.persons,
            images: Images {
                thumb_url: event.thumb_url,
                poster_url: event.poster_url,
            },
            videos,
            subtitles,
            conference_title: event.conference_title,
        }
    }
}

// ============================================================================
// media.ccc.de client
// ============================================================================

pub struct MediaApi {
    client: reqwest::Client,
    graphql_url: String,
    rest_base: String,
}

impl MediaApi {
    pub fn new(api: &ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            graphql_url: api.graphql_url.clone(),
            rest_base: api.rest_base.trim_end_matches('/').to_string(),
        }
    }

    async fn graphql<T: serde::de::DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let response = self
            .client
            .post(&self.graphql_url)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CccTvError::Fetch(format!("GraphQL request failed: HTTP {status}")));
        }

        let body: GraphQlResponse<T> = response.json().await?;
        if let Some(first) = body.errors.first() {
            return Err(CccTvError::Fetch(first.message.clone()));
        }
        body.data
            .ok_or_else(|| CccTvError::Fetch("no data in GraphQL response".to_string()))
    }

    async fn rest<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{path}", self.rest_base);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CccTvError::Fetch(format!("{path} failed: HTTP {status}")));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ItemSource for MediaApi {
    async fn fetch_page(&self, offset: usize) -> Result<Vec<ConferenceRow>> {
        let data: RecentData = self
            .graphql(RECENT_QUERY, json!({ "offset": offset, "first": PAGE_SIZE }))
            .await?;
        Ok(data.conferences_recent)
    }

    async fn search(&self, query: &str) -> Result<Vec<Lecture>> {
        let response: SearchResponse = self
            .rest("/public/events/search", &[("q", query)])
            .await?;
        let events = response
            .events
            .ok_or_else(|| CccTvError::Fetch("invalid search response".to_string()))?;
        Ok(events.into_iter().map(Lecture::from).collect())
    }

    async fn conferences(&self) -> Result<Vec<ConferenceSummary>> {
        let response: ConferencesResponse = self.rest("/public/conferences", &[]).await?;
        Ok(response.conferences)
    }

    async fn conference(&self, acronym: &str) -> Result<ConferenceRow> {
        let data: ConferenceData = self
            .graphql(CONFERENCE_QUERY, json!({ "id": acronym }))
            .await?;
        data.conference
            .ok_or_else(|| CccTvError::Fetch(format!("unknown conference '{acronym}'")))
    }

    async fn subtitle(&self, urls: &[String]) -> Result<String> {
        let mut last_error = CccTvError::Fetch("no subtitle URL".to_string());
        for url in urls {
            let response = match self.client.get(url).send().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::debug!("subtitle candidate {url} failed: {e}");
                    last_error = e.into();
                    continue;
                }
            };
            if !response.status().is_success() {
                last_error = CccTvError::Fetch(format!("{url}: HTTP {}", response.status()));
                continue;
            }
            return Ok(response.text().await?);
        }
        Err(last_error)
    }
}

// ============================================================================
// Offline fixture
// ============================================================================

/// Snapshot of the archive served from memory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureSource {
    #[serde(default)]
    pub rows: Vec<ConferenceRow>,
    /// Subtitle bodies keyed by URL
    #[serde(default)]
    pub subtitles: std::collections::HashMap<String, String>,
}

impl FixtureSource {
    pub fn new(rows: Vec<ConferenceRow>) -> Self {
        Self {
            rows,
            subtitles: Default::default(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[async_trait]
impl ItemSource for FixtureSource {
    async fn fetch_page(&self, offset: usize) -> Result<Vec<ConferenceRow>> {
        Ok(self.rows.iter().skip(offset).take(PAGE_SIZE).cloned().collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<Lecture>> {
        let needle = query.to_lowercase();
        Ok(self
            .rows
            .iter()
            .flat_map(|row| {
                row.lectures().iter().map(move |lecture| {
                    let mut lecture = lecture.clone();
                    if lecture.conference_title.is_none() {
                        lecture.conference_title = Some(row.title.clone());
                    }
                    lecture
                })
            })
            .filter(|lecture| lecture.title.to_lowercase().contains(&needle))
            .collect())
    }

    async fn conferences(&self) -> Result<Vec<ConferenceSummary>> {
        Ok(self
            .rows
            .iter()
            .map(|row| ConferenceSummary {
                acronym: row.slug.clone().unwrap_or_else(|| row.id.clone()),
                title: row.title.clone(),
                logo_url: row.logo_url.clone(),
                updated_at: row.updated_at.clone(),
                event_last_released_at: row.event_last_released_at.clone(),
            })
            .collect())
    }

    async fn conference(&self, acronym: &str) -> Result<ConferenceRow> {
        self.rows
            .iter()
            .find(|row| row.id == acronym || row.slug.as_deref() == Some(acronym))
            .cloned()
            .ok_or_else(|| CccTvError::Fetch(format!("unknown conference '{acronym}'")))
    }

    async fn subtitle(&self, urls: &[String]) -> Result<String> {
        urls.iter()
            .find_map(|url| self.subtitles.get(url).cloned())
            .ok_or_else(|| CccTvError::Fetch("subtitle not in fixture".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LectureNodes;

    fn row(id: &str, titles: &[&str]) -> ConferenceRow {
        ConferenceRow {
            id: id.to_string(),
            title: id.to_uppercase(),
            slug: Some(format!("{id}-slug")),
            lectures: LectureNodes {
                nodes: titles
                    .iter()
                    .map(|t| Lecture {
                        guid: format!("{id}-{t}"),
                        title: t.to_string(),
                        ..Default::default()
                    })
                    .collect(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_rest_event_conversion() {
        let json = r#"{
            "guid": "g", "title": "Talk", "length": 1800, "view_count": 7,
            "thumb_url": "t.jpg", "original_language": "deu",
            "recordings": [
                {"recording_url": "a.webm", "mime_type": "video/webm"},
                {"recording_url": "a.vtt", "mime_type": "text/vtt", "language": "eng"},
                {"recording_url": "a.mp3", "mime_type": "audio/mpeg"},
                {"recording_url": "x"}
            ]
        }"#;
        let lecture: Lecture = serde_json::from_str::<RestEvent>(json).unwrap().into();
        assert_eq!(lecture.duration, Some(1800));
        assert_eq!(lecture.videos.len(), 1);
        assert_eq!(lecture.videos[0].language.as_deref(), Some("deu"));
        assert_eq!(lecture.subtitles.len(), 1);
        assert_eq!(lecture.subtitles[0].language.as_deref(), Some("eng"));
        assert_eq!(lecture.images.thumb_url.as_deref(), Some("t.jpg"));
    }

    #[test]
    fn test_rest_event_defaults_to_english() {
        let event = RestEvent {
            guid: "g".into(),
            title: "T".into(),
            duration: Some(60),
            recordings: vec![RestRecording {
                recording_url: Some("v.mp4".into()),
                mime_type: Some("video/mp4".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let lecture = Lecture::from(event);
        assert_eq!(lecture.duration, Some(60));
        assert_eq!(lecture.videos[0].language.as_deref(), Some("eng"));
    }

    #[test]
    fn test_graphql_recent_payload() {
        let json = r#"{"data":{"conferencesRecent":[{"id":"1","title":"38C3",
            "eventLastReleasedAt":"2025-01-02T00:00:00Z",
            "lectures":{"nodes":[{"guid":"a","title":"A","viewCount":3}]}}]}}"#;
        let body: GraphQlResponse<RecentData> = serde_json::from_str(json).unwrap();
        let rows = body.data.unwrap().conferences_recent;
        assert_eq!(rows[0].lectures()[0].view_count, Some(3));
        assert!(body.errors.is_empty());
    }

    #[tokio::test]
    async fn test_fixture_pages() {
        let source = FixtureSource::new(vec![
            row("a", &["x"]),
            row("b", &["y"]),
            row("c", &["z"]),
            row("d", &["w"]),
        ]);
        assert_eq!(source.fetch_page(0).await.unwrap().len(), PAGE_SIZE);
        assert_eq!(source.fetch_page(3).await.unwrap()[0].id, "d");
        assert!(source.fetch_page(4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fixture_search_and_conference() {
        let source = FixtureSource::new(vec![row("a", &["Rust talk", "Other"]), row("b", &["rusty"])]);
        let hits = source.search("RUST").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].conference_title.as_deref(), Some("A"));

        assert_eq!(source.conference("b-slug").await.unwrap().id, "b");
        assert!(source.conference("nope").await.unwrap_err().is_fetch());
        assert_eq!(source.conferences().await.unwrap()[0].acronym, "a-slug");
    }
}
