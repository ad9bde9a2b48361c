//! Application shell
//!
//! [`App`] owns every region and runs the single-threaded event flow: a key
//! is decoded, routed by the focus router, and whatever the handlers queued
//! (page loads, searches, player timers, subtitle downloads) is spawned as a
//! tokio task. Task results come back as [`AppEvent`]s on one channel and
//! are applied through [`App::handle_event`], where generation tickets drop
//! anything that has been superseded in the meantime.
//!
//! Key handling must run inside a tokio runtime since it may spawn tasks.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::Result;
use crate::focus::{FocusRouter, HandleResult, KeyHandler, ModalHost, Region, Routed};
use crate::generation::Ticket;
use crate::keymap::{KeyEvent, RemoteKey};
use crate::pagination::PageRequest;
use crate::player::{
    ClosedPlayer, MediaSurface, PlaybackPositions, Player, PlayerRequest, PlayerServices,
};
use crate::router::{View, ViewRouter};
use crate::search::{SearchCompletion, SearchController};
use crate::sidebar::{MenuEntry, Sidebar};
use crate::source::ItemSource;
use crate::store::{Preferences, SharedStore, StoreEvent, Watchlist};
use crate::types::{ConferenceRow, ConferenceSummary, Lecture};
use crate::views::{
    Activation, ConferenceView, ContentView, EventsView, HomeView, PopularView, SearchView,
    SettingsView, ViewRequest, WatchlistView,
};

/// Completion of a spawned task, fed back into the app
#[derive(Debug)]
pub enum AppEvent {
    PageLoaded {
        request: PageRequest,
        result: Result<Vec<ConferenceRow>>,
    },
    PopularLoaded {
        ticket: Ticket,
        result: Result<Vec<ConferenceRow>>,
    },
    ConferencesLoaded {
        ticket: Ticket,
        result: Result<Vec<ConferenceSummary>>,
    },
    ConferenceLoaded {
        ticket: Ticket,
        result: Result<ConferenceRow>,
    },
    SearchDone(SearchCompletion),
    HideTimer(Ticket),
    Autosave(Ticket),
    SubtitleLoaded {
        ticket: Ticket,
        result: Result<String>,
    },
}

// ============================================================================
// Views
// ============================================================================

/// Stand-in content while a conference view has not been created
struct Blank;

impl KeyHandler for Blank {
    fn handle_key(&mut self, key: RemoteKey) -> HandleResult {
        match key {
            RemoteKey::Back => HandleResult::Close,
            RemoteKey::Left => HandleResult::LeftEdge,
            _ => HandleResult::NotHandled,
        }
    }
}

impl ContentView for Blank {
    fn activation(&self) -> Option<Activation> {
        None
    }
}

/// Every content view; only the routed one receives keys
pub struct Views {
    pub home: HomeView,
    pub popular: PopularView,
    pub events: EventsView,
    pub conference: Option<ConferenceView>,
    pub search: SearchView,
    pub watchlist: WatchlistView,
    pub settings: SettingsView,
    blank: Blank,
}

impl Views {
    fn new(config: &Config, services: &PlayerServices) -> Self {
        let layout = &config.layout;
        Self {
            home: HomeView::new(layout.rows_on_screen),
            popular: PopularView::new(layout),
            events: EventsView::new(layout),
            conference: None,
            search: SearchView::new(layout),
            watchlist: WatchlistView::new(services.watchlist.clone(), layout),
            settings: SettingsView::new(
                services.preferences.clone(),
                services.watchlist.clone(),
                services.positions.clone(),
                layout.grid_columns,
            ),
            blank: Blank,
        }
    }

    fn active_mut(&mut self, view: &View) -> &mut dyn ContentView {
        match view {
            View::Recent => &mut self.home,
            View::Popular => &mut self.popular,
            View::Events => &mut self.events,
            View::Search => &mut self.search,
            View::Watchlist => &mut self.watchlist,
            View::Settings => &mut self.settings,
            View::Conference(_) => match self.conference.as_mut() {
                Some(conference) => conference,
                None => &mut self.blank,
            },
        }
    }

    fn active(&self, view: &View) -> &dyn ContentView {
        match view {
            View::Recent => &self.home,
            View::Popular => &self.popular,
            View::Events => &self.events,
            View::Search => &self.search,
            View::Watchlist => &self.watchlist,
            View::Settings => &self.settings,
            View::Conference(_) => match self.conference.as_ref() {
                Some(conference) => conference,
                None => &self.blank,
            },
        }
    }

    fn take_requests(&mut self) -> Vec<ViewRequest> {
        let mut requests = self.home.take_requests();
        requests.extend(self.popular.take_requests());
        requests.extend(self.events.take_requests());
        requests.extend(self.search.take_requests());
        if let Some(conference) = self.conference.as_mut() {
            requests.extend(conference.take_requests());
        }
        requests
    }
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    config: Config,
    source: Arc<dyn ItemSource>,
    services: PlayerServices,
    focus: FocusRouter,
    sidebar: Sidebar,
    router: ViewRouter,
    views: Views,
    search: SearchController,
    player: Option<Player>,
    /// Surface parked while no player is open
    surface: Option<Box<dyn MediaSurface>>,
    autosave_task: Option<JoinHandle<()>>,
    store_events: broadcast::Receiver<StoreEvent>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    notice: Option<String>,
}

impl App {
    pub fn new(
        config: Config,
        store: SharedStore,
        source: Arc<dyn ItemSource>,
        surface: Box<dyn MediaSurface>,
    ) -> Self {
        let services = PlayerServices {
            preferences: Preferences::new(store.clone()),
            watchlist: Watchlist::new(store.clone()),
            positions: PlaybackPositions::new(store.clone()),
            timing: config.timing.clone(),
        };
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            views: Views::new(&config, &services),
            search: SearchController::new(config.timing.search_debounce()),
            store_events: store.subscribe(),
            config,
            source,
            services,
            focus: FocusRouter::new(),
            sidebar: Sidebar::new(),
            router: ViewRouter::new(),
            player: None,
            surface: Some(surface),
            autosave_task: None,
            events_tx,
            events_rx,
            notice: None,
        }
    }

    /// Mount the home view and request its first page
    pub fn start(&mut self) {
        self.mount(&View::Recent);
        self.dispatch();
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn focus(&self) -> &FocusRouter {
        &self.focus
    }

    pub fn router(&self) -> &ViewRouter {
        &self.router
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    /// Last user-facing problem, e.g. a lecture without playable video
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// The region that will receive the next key
    pub fn effective_region(&self) -> Region {
        match &self.player {
            Some(player) => self.focus.effective_region(player),
            None => self.focus.effective_region(&ClosedPlayer),
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Handle one raw key press; `None` if the key meant nothing here
    pub fn handle_key(&mut self, event: &KeyEvent) -> Option<Routed> {
        let routed = if self.edit_search_text(event) {
            Some(Routed {
                region: Region::ContentList,
                result: HandleResult::Handled,
            })
        } else {
            event.decode().map(|key| self.route(key))
        };
        self.dispatch();
        self.sync_store();
        routed
    }

    /// Typed characters and Backspace edit the focused search input
    fn edit_search_text(&mut self, event: &KeyEvent) -> bool {
        if self.focus.active_region() != Region::ContentList
            || *self.router.current() != View::Search
            || !self.views.search.is_input_focused()
        {
            return false;
        }
        match event.key.as_deref() {
            // Backspace on an empty query falls through to Back
            Some("Backspace") => self.views.search.delete_back(),
            Some(text) if text.chars().count() == 1 => self.views.search.insert_text(text),
            _ => false,
        }
    }

    fn route(&mut self, key: RemoteKey) -> Routed {
        let current = self.router.current().clone();
        let mut closed = ClosedPlayer;
        let player: &mut dyn ModalHost = match self.player.as_mut() {
            Some(player) => player,
            None => &mut closed,
        };
        let content = self.views.active_mut(&current);
        let routed = self
            .focus
            .route_key(key, &mut self.sidebar, content, player);

        match (routed.region, routed.result) {
            (Region::Sidebar, HandleResult::Activate) => {
                let target = self.sidebar.highlighted().view();
                self.navigate(target);
                self.focus.request_focus(Region::ContentList);
                self.content_refocused();
            }
            (Region::Sidebar, HandleResult::ReturnToContent) => self.content_refocused(),
            (Region::ContentList, HandleResult::Activate) => {
                if let Some(activation) = self.views.active(&current).activation() {
                    self.activate(activation);
                }
            }
            (Region::ContentList, HandleResult::Close) => self.back(),
            (Region::ContentPlayer | Region::ModalSelector, HandleResult::Close) => {
                self.close_player();
            }
            _ => {}
        }
        routed
    }

    /// Content regained focus without being remounted
    fn content_refocused(&mut self) {
        if *self.router.current() == View::Search {
            self.views.search.on_focus_returned();
        }
    }

    fn activate(&mut self, activation: Activation) {
        match activation {
            Activation::Play {
                lecture,
                conference_title,
            } => self.open_player(lecture, conference_title.as_deref()),
            Activation::OpenConference(acronym) => self.navigate(View::Conference(acronym)),
        }
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn navigate(&mut self, view: View) {
        if self.router.navigate(view.clone()) {
            self.mount(&view);
        }
        self.sidebar.sync_to(self.router.current());
    }

    fn back(&mut self) {
        if self.router.back() {
            let current = self.router.current().clone();
            self.mount(&current);
        }
        self.sidebar.sync_to(self.router.current());
    }

    fn mount(&mut self, view: &View) {
        match view {
            View::Recent => self.views.home.start(),
            View::Popular => self.views.popular.start(),
            View::Events => self.views.events.start(),
            View::Search => self.views.search.focus_input(),
            View::Watchlist => self.views.watchlist.reload(),
            View::Settings => {}
            View::Conference(acronym) => {
                let reuse = self
                    .views
                    .conference
                    .as_ref()
                    .is_some_and(|c| c.acronym() == acronym && c.load_state().error().is_none());
                if !reuse {
                    self.views.conference =
                        Some(ConferenceView::open(acronym, self.config.layout.grid_columns));
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Player
    // ------------------------------------------------------------------

    fn open_player(&mut self, lecture: Lecture, conference_title: Option<&str>) {
        let Some(surface) = self.surface.take() else {
            tracing::warn!("no media surface available");
            return;
        };
        match Player::open(
            lecture,
            conference_title,
            surface,
            &self.services,
            tokio::time::Instant::now(),
        ) {
            Ok(player) => {
                self.notice = None;
                self.player = Some(player);
                self.focus.request_focus(Region::ContentPlayer);
            }
            Err((e, surface)) => {
                tracing::warn!("cannot play: {e}");
                self.notice = Some(e.to_string());
                self.surface = Some(surface);
            }
        }
    }

    fn close_player(&mut self) {
        if let Some(player) = self.player.take() {
            self.surface = Some(player.close());
        }
        if let Some(task) = self.autosave_task.take() {
            task.abort();
        }
        self.focus.request_focus(Region::ContentList);
    }

    // ------------------------------------------------------------------
    // Async work
    // ------------------------------------------------------------------

    fn spawn_event(&self, work: BoxFuture<'static, AppEvent>) {
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(work.await);
        });
    }

    /// Turn every queued request into a task
    fn dispatch(&mut self) {
        for request in self.views.take_requests() {
            self.dispatch_view(request);
        }
        let requests = self
            .player
            .as_mut()
            .map(Player::take_requests)
            .unwrap_or_default();
        for request in requests {
            self.dispatch_player(request);
        }
    }

    fn dispatch_view(&mut self, request: ViewRequest) {
        let source = self.source.clone();
        match request {
            ViewRequest::FetchPage(request) => {
                self.spawn_event(
                    async move {
                        let result = source.fetch_page(request.offset).await;
                        AppEvent::PageLoaded { request, result }
                    }
                    .boxed(),
                );
            }
            ViewRequest::LoadPopular(ticket) => {
                self.spawn_event(
                    async move {
                        let result = source.fetch_page(0).await;
                        AppEvent::PopularLoaded { ticket, result }
                    }
                    .boxed(),
                );
            }
            ViewRequest::LoadConferences(ticket) => {
                self.spawn_event(
                    async move {
                        let result = source.conferences().await;
                        AppEvent::ConferencesLoaded { ticket, result }
                    }
                    .boxed(),
                );
            }
            ViewRequest::LoadConference { ticket, acronym } => {
                self.spawn_event(
                    async move {
                        let result = source.conference(&acronym).await;
                        AppEvent::ConferenceLoaded { ticket, result }
                    }
                    .boxed(),
                );
            }
            ViewRequest::Search(query) => {
                let tx = self.events_tx.clone();
                self.search.schedule(&query, source, move |completion| {
                    let _ = tx.send(AppEvent::SearchDone(completion));
                });
            }
        }
    }

    fn dispatch_player(&mut self, request: PlayerRequest) {
        match request {
            PlayerRequest::ScheduleHide { ticket, after } => {
                self.spawn_event(
                    async move {
                        tokio::time::sleep(after).await;
                        AppEvent::HideTimer(ticket)
                    }
                    .boxed(),
                );
            }
            PlayerRequest::Autosave { ticket, every } => {
                if let Some(task) = self.autosave_task.take() {
                    task.abort();
                }
                let tx = self.events_tx.clone();
                self.autosave_task = Some(tokio::spawn(async move {
                    let mut interval = tokio::time::interval_at(
                        tokio::time::Instant::now() + every,
                        every,
                    );
                    loop {
                        interval.tick().await;
                        if tx.send(AppEvent::Autosave(ticket)).is_err() {
                            break;
                        }
                    }
                }));
            }
            PlayerRequest::LoadSubtitle(load) => {
                let source = self.source.clone();
                self.spawn_event(
                    async move {
                        let result = source.subtitle(&load.urls).await;
                        AppEvent::SubtitleLoaded {
                            ticket: load.ticket,
                            result,
                        }
                    }
                    .boxed(),
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // Completions
    // ------------------------------------------------------------------

    /// Wait for the next task completion
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.recv().await
    }

    /// Handle events until none arrives within `quiet`; returns how many ran
    pub async fn run_until_idle(&mut self, quiet: Duration) -> usize {
        let mut handled = 0;
        while let Ok(Some(event)) = tokio::time::timeout(quiet, self.events_rx.recv()).await {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::PageLoaded { request, result } => {
                let outcome = self.views.home.complete_page(request, result);
                tracing::debug!("page at offset {}: {outcome:?}", request.offset);
            }
            AppEvent::PopularLoaded { ticket, result } => {
                self.views.popular.complete(ticket, result);
            }
            AppEvent::ConferencesLoaded { ticket, result } => {
                self.views.events.complete(ticket, result);
            }
            AppEvent::ConferenceLoaded { ticket, result } => {
                if let Some(conference) = self.views.conference.as_mut() {
                    conference.complete(ticket, result);
                }
            }
            AppEvent::SearchDone(completion) => {
                if self.search.accept(&completion) {
                    self.views.search.complete(completion.result);
                }
            }
            AppEvent::HideTimer(ticket) => {
                if let Some(player) = self.player.as_mut() {
                    player.on_hide_timer(ticket);
                }
            }
            AppEvent::Autosave(ticket) => {
                if let Some(player) = self.player.as_mut() {
                    player.on_autosave(ticket);
                }
            }
            AppEvent::SubtitleLoaded { ticket, result } => {
                if let Some(player) = self.player.as_mut() {
                    player.on_subtitle_loaded(ticket, result);
                }
            }
        }
        self.dispatch();
        self.sync_store();
    }

    /// Apply store notifications to views holding derived copies
    fn sync_store(&mut self) {
        loop {
            match self.store_events.try_recv() {
                Ok(event) => {
                    self.views.watchlist.on_store_event(&event);
                }
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    tracing::warn!("missed {missed} store notifications, reloading");
                    self.views.watchlist.reload();
                }
                Err(_) => break,
            }
        }
    }

    // ------------------------------------------------------------------
    // Snapshot
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> Snapshot {
        let region = self.effective_region();
        let detail = match (&self.player, region) {
            (Some(player), Region::ContentPlayer | Region::ModalSelector) => {
                describe_player(player)
            }
            _ => self.describe_view(),
        };
        Snapshot {
            region,
            view: self.router.current().clone(),
            sidebar: self.sidebar.highlighted(),
            detail,
        }
    }

    fn describe_view(&self) -> String {
        let views = &self.views;
        match self.router.current() {
            View::Recent => match views.home.focused() {
                Some((row, lecture)) => format!(
                    "row {} '{}' > '{}'{}",
                    views.home.pages().active_offset(),
                    row.title,
                    lecture.title,
                    if views.home.pages().is_fetching_more() { " (loading)" } else { "" }
                ),
                None if views.home.pages().is_loading_initial() => "loading".to_string(),
                None => views.home.pages().last_error().unwrap_or("empty").to_string(),
            },
            View::Popular => describe_list(
                views.popular.nav().selected(),
                views.popular.lectures().iter().map(|l| l.title.as_str()),
            ),
            View::Events => describe_list(
                views.events.nav().selected(),
                views.events.conferences().iter().map(|c| c.title.as_str()),
            ),
            View::Watchlist => describe_list(
                views.watchlist.nav().selected(),
                views.watchlist.entries().iter().map(|e| e.lecture.title.as_str()),
            ),
            View::Search => {
                let search = &views.search;
                let input = if search.is_input_focused() { "*" } else { "" };
                let state = match (search.error(), search.is_searching()) {
                    (Some(error), _) => format!("error: {error}"),
                    (None, true) => "searching".to_string(),
                    (None, false) => describe_list(
                        search.nav().selected(),
                        search.results().iter().map(|l| l.title.as_str()),
                    ),
                };
                format!("query{input} '{}' {state}", search.query())
            }
            View::Settings => {
                let settings = &views.settings;
                format!(
                    "{} > {}",
                    settings.section().title(),
                    settings.selected().map_or("-", |o| o.name)
                )
            }
            View::Conference(acronym) => match &views.conference {
                Some(view) => match view.conference() {
                    Some(conference) => describe_list(
                        view.grid().index(),
                        conference.lectures().iter().map(|l| l.title.as_str()),
                    ),
                    None if view.load_state().is_loading() => format!("{acronym} loading"),
                    None => format!("{acronym} {}", view.load_state().error().unwrap_or("empty")),
                },
                None => acronym.clone(),
            },
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(task) = self.autosave_task.take() {
            task.abort();
        }
    }
}

fn describe_list<'a>(selected: usize, mut titles: impl ExactSizeIterator<Item = &'a str>) -> String {
    let len = titles.len();
    match titles.nth(selected) {
        Some(title) => format!("{}/{} '{title}'", selected + 1, len),
        None => "empty".to_string(),
    }
}

fn describe_player(player: &Player) -> String {
    let controls = player.controls();
    let modal = controls
        .modal()
        .and_then(|m| m.selected())
        .map(|selected| format!(" modal '{selected}'"))
        .unwrap_or_default();
    format!(
        "playing '{}' {:?} focus {:?}/{:?} at {:.0}s{modal}",
        player.lecture().title,
        controls.state(),
        controls.focus_area(),
        controls.focused_role(),
        player.surface().current_time(),
    )
}

/// Plain-data summary of what is on screen
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub region: Region,
    pub view: View,
    pub sidebar: MenuEntry,
    pub detail: String,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:?}] {:?} ({}) {}",
            self.region,
            self.view,
            self.sidebar.label(),
            self.detail
        )
    }
}
