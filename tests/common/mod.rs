#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use ccctv::focus::Routed;
use ccctv::player::SimulatedSurface;
use ccctv::types::{ConferenceSummary, LectureNodes, MIME_MP4, MIME_WEBM, Video};
use ccctv::{
    App, CccTvError, Config, ConferenceRow, FixtureSource, ItemSource, KeyEvent, Lecture,
    MemoryStore, Result, SharedStore,
};

/// Quiet period after each key; longer than the search debounce
pub const SETTLE: Duration = Duration::from_millis(500);

/// Length of the simulated media in seconds
pub const MEDIA_LENGTH: f64 = 3600.0;

pub fn lecture(conference: usize, index: usize) -> Lecture {
    Lecture {
        guid: format!("conf{conference}-talk{index}"),
        title: format!("Conference {conference} Talk {index}"),
        duration: Some(1800),
        view_count: Some((conference * 10 + index) as u64),
        videos: vec![
            Video {
                url: Some(format!("https://cdn.example/{conference}/{index}.webm")),
                mime_type: MIME_WEBM.to_string(),
                language: Some("eng".to_string()),
                ..Default::default()
            },
            Video {
                url: Some(format!("https://cdn.example/{conference}/{index}.mp4")),
                mime_type: MIME_MP4.to_string(),
                language: Some("eng".to_string()),
                ..Default::default()
            },
        ],
        ..Default::default()
    }
}

/// A lecture nothing can play
pub fn unplayable(guid: &str) -> Lecture {
    Lecture {
        guid: guid.to_string(),
        title: "Slides only".to_string(),
        ..Default::default()
    }
}

pub fn conference(index: usize, lectures: usize) -> ConferenceRow {
    ConferenceRow {
        id: format!("conf{index}"),
        title: format!("Conference {index}"),
        slug: Some(format!("conf{index}")),
        event_last_released_at: Some(format!("2024-12-{:02}T10:00:00Z", 28 - index)),
        lectures: LectureNodes {
            nodes: (0..lectures).map(|i| lecture(index, i)).collect(),
        },
        ..Default::default()
    }
}

pub fn conferences(count: usize, lectures: usize) -> Vec<ConferenceRow> {
    (0..count).map(|i| conference(i, lectures)).collect()
}

/// Fixture data with scripted failures and per-conference delays
pub struct ScriptedSource {
    inner: FixtureSource,
    delays: HashMap<String, Duration>,
    pub fail_pages: AtomicBool,
    pub fail_search: AtomicBool,
}

impl ScriptedSource {
    pub fn new(rows: Vec<ConferenceRow>) -> Self {
        Self {
            inner: FixtureSource::new(rows),
            delays: HashMap::new(),
            fail_pages: AtomicBool::new(false),
            fail_search: AtomicBool::new(false),
        }
    }

    /// Answer `conference(acronym)` only after `delay`
    pub fn slow_conference(mut self, acronym: &str, delay: Duration) -> Self {
        self.delays.insert(acronym.to_string(), delay);
        self
    }

    pub fn failing_pages(self) -> Self {
        self.fail_pages.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_search(self) -> Self {
        self.fail_search.store(true, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl ItemSource for ScriptedSource {
    async fn fetch_page(&self, offset: usize) -> Result<Vec<ConferenceRow>> {
        if self.fail_pages.load(Ordering::SeqCst) {
            return Err(CccTvError::Fetch(format!("page {offset}: HTTP 503")));
        }
        self.inner.fetch_page(offset).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Lecture>> {
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(CccTvError::Fetch(format!("search '{query}': HTTP 500")));
        }
        self.inner.search(query).await
    }

    async fn conferences(&self) -> Result<Vec<ConferenceSummary>> {
        self.inner.conferences().await
    }

    async fn conference(&self, acronym: &str) -> Result<ConferenceRow> {
        if let Some(delay) = self.delays.get(acronym) {
            tokio::time::sleep(*delay).await;
        }
        self.inner.conference(acronym).await
    }

    async fn subtitle(&self, urls: &[String]) -> Result<String> {
        self.inner.subtitle(urls).await
    }
}

/// An app over fixture data with in-memory persistence
pub struct TestApp {
    pub app: App,
    pub store: SharedStore,
}

impl TestApp {
    pub async fn new(rows: Vec<ConferenceRow>) -> Self {
        Self::with_store(rows, MemoryStore::shared()).await
    }

    pub async fn with_store(rows: Vec<ConferenceRow>, store: SharedStore) -> Self {
        Self::with_source(Arc::new(FixtureSource::new(rows)), store).await
    }

    pub async fn with_source(source: Arc<dyn ItemSource>, store: SharedStore) -> Self {
        let surface = Box::new(SimulatedSurface::new(Some(MEDIA_LENGTH)));
        let mut app = App::new(Config::default(), store.clone(), source, surface);
        app.start();
        app.run_until_idle(SETTLE).await;
        TestApp { app, store }
    }

    /// Press a named key and let every resulting task finish
    pub async fn press(&mut self, key: &str) -> Option<Routed> {
        let routed = self.app.handle_key(&KeyEvent::named(key));
        self.app.run_until_idle(SETTLE).await;
        routed
    }

    pub async fn press_n(&mut self, key: &str, times: usize) {
        for _ in 0..times {
            self.press(key).await;
        }
    }

    /// Type characters one by one without waiting in between
    pub async fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.app.handle_key(&KeyEvent::named(c.to_string()));
        }
        self.app.run_until_idle(SETTLE).await;
    }

    /// Open a sidebar entry by pressing Left, moving the highlight, then Enter
    pub async fn open_menu(&mut self, label: &str) {
        self.press("ArrowLeft").await;
        for _ in 0..ccctv::sidebar::MenuEntry::ALL.len() {
            if self.app.sidebar().highlighted().label() == label {
                break;
            }
            self.press("ArrowDown").await;
        }
        assert_eq!(self.app.sidebar().highlighted().label(), label);
        self.press("Enter").await;
    }
}
