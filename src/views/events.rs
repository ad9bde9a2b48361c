//! All conferences, newest release first

use std::cmp::Reverse;

use super::{Activation, ContentView, ListNav, LoadSlot, ViewRequest};
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::focus::{HandleResult, KeyHandler};
use crate::generation::Ticket;
use crate::keymap::RemoteKey;
use crate::types::{ConferenceSummary, release_timestamp};

pub fn sort_by_release(conferences: &mut [ConferenceSummary]) {
    conferences.sort_by_cached_key(|c| Reverse(release_timestamp(c.released_at())));
}

pub struct EventsView {
    conferences: Vec<ConferenceSummary>,
    nav: ListNav,
    load: LoadSlot,
    requests: Vec<ViewRequest>,
}

impl EventsView {
    pub fn new(layout: &LayoutConfig) -> Self {
        Self {
            conferences: Vec::new(),
            nav: ListNav::new(layout),
            load: LoadSlot::default(),
            requests: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        if self.load.is_loaded() || self.load.is_loading() {
            return;
        }
        let ticket = self.load.begin();
        self.requests.push(ViewRequest::LoadConferences(ticket));
    }

    pub fn complete(&mut self, ticket: Ticket, result: Result<Vec<ConferenceSummary>>) {
        if let Some(mut conferences) = self.load.finish(ticket, result) {
            sort_by_release(&mut conferences);
            self.conferences = conferences;
            self.nav.replace(self.conferences.len());
        }
    }

    pub fn conferences(&self) -> &[ConferenceSummary] {
        &self.conferences
    }

    pub fn nav(&self) -> &ListNav {
        &self.nav
    }

    pub fn load_state(&self) -> &LoadSlot {
        &self.load
    }
}

impl KeyHandler for EventsView {
    fn handle_key(&mut self, key: RemoteKey) -> HandleResult {
        self.nav.handle(key).into_result()
    }
}

impl ContentView for EventsView {
    fn activation(&self) -> Option<Activation> {
        self.conferences
            .get(self.nav.selected())
            .map(|c| Activation::OpenConference(c.acronym.clone()))
    }

    fn take_requests(&mut self) -> Vec<ViewRequest> {
        std::mem::take(&mut self.requests)
    }
}
