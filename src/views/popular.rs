//! Most-viewed lectures across the recently released conferences

use std::cmp::Reverse;

use super::{Activation, ContentView, ListNav, LoadSlot, ViewRequest};
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::focus::{HandleResult, KeyHandler};
use crate::generation::Ticket;
use crate::keymap::RemoteKey;
use crate::types::{ConferenceRow, Lecture, release_timestamp};

/// Upper bound on ranked lectures
pub const POPULAR_LIMIT: usize = 100;

/// Flatten conference rows into lectures ranked by views, then recency
///
/// Each lecture carries its conference title. Ties on view count go to the
/// more recently released conference; the sort is stable otherwise.
pub fn rank_popular(rows: &[ConferenceRow]) -> Vec<Lecture> {
    let mut ranked: Vec<(Lecture, jiff::Timestamp)> = rows
        .iter()
        .flat_map(|row| {
            let released = release_timestamp(row.released_at());
            row.lectures().iter().map(move |lecture| {
                let mut lecture = lecture.clone();
                lecture.conference_title = Some(row.title.clone());
                (lecture, released)
            })
        })
        .collect();

    ranked.sort_by_key(|(lecture, released)| {
        (Reverse(lecture.view_count.unwrap_or(0)), Reverse(*released))
    });
    ranked.truncate(POPULAR_LIMIT);
    ranked.into_iter().map(|(lecture, _)| lecture).collect()
}

pub struct PopularView {
    lectures: Vec<Lecture>,
    nav: ListNav,
    load: LoadSlot,
    requests: Vec<ViewRequest>,
}

impl PopularView {
    pub fn new(layout: &LayoutConfig) -> Self {
        Self {
            lectures: Vec::new(),
            nav: ListNav::new(layout),
            load: LoadSlot::default(),
            requests: Vec::new(),
        }
    }

    /// Load on first mount; later mounts keep the ranked list
    pub fn start(&mut self) {
        if self.load.is_loaded() || self.load.is_loading() {
            return;
        }
        let ticket = self.load.begin();
        self.requests.push(ViewRequest::LoadPopular(ticket));
    }

    pub fn complete(&mut self, ticket: Ticket, result: Result<Vec<ConferenceRow>>) {
        if let Some(rows) = self.load.finish(ticket, result) {
            self.lectures = rank_popular(&rows);
            self.nav.replace(self.lectures.len());
        }
    }

    pub fn lectures(&self) -> &[Lecture] {
        &self.lectures
    }

    pub fn nav(&self) -> &ListNav {
        &self.nav
    }

    pub fn load_state(&self) -> &LoadSlot {
        &self.load
    }
}

impl KeyHandler for PopularView {
    fn handle_key(&mut self, key: RemoteKey) -> HandleResult {
        self.nav.handle(key).into_result()
    }
}

impl ContentView for PopularView {
    fn activation(&self) -> Option<Activation> {
        self.lectures.get(self.nav.selected()).map(|lecture| Activation::Play {
            conference_title: lecture.conference_title.clone(),
            lecture: lecture.clone(),
        })
    }

    fn take_requests(&mut self) -> Vec<ViewRequest> {
        std::mem::take(&mut self.requests)
    }
}
