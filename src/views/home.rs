//! Home: recent conferences as stacked lecture carousels
//!
//! Vertical movement slides the pagination window one conference at a time;
//! only the top row of the window takes horizontal input. Carousel positions
//! are keyed by the row's absolute offset, so a row scrolled away and back
//! keeps its lecture.

use super::{Activation, ContentView, ViewRequest};
use crate::carousel::{CarouselMove, CarouselTracker};
use crate::error::Result;
use crate::focus::{HandleResult, KeyHandler};
use crate::keymap::RemoteKey;
use crate::pagination::{PageOutcome, PageRequest, PaginationCursor};
use crate::types::{ConferenceRow, Lecture};

pub struct HomeView {
    pages: PaginationCursor<ConferenceRow>,
    carousel: CarouselTracker,
    requests: Vec<ViewRequest>,
}

impl HomeView {
    pub fn new(rows_on_screen: usize) -> Self {
        Self {
            pages: PaginationCursor::new(rows_on_screen),
            carousel: CarouselTracker::new(),
            requests: Vec::new(),
        }
    }

    /// Request the first page; no-op once started
    pub fn start(&mut self) {
        if let Some(request) = self.pages.start() {
            self.requests.push(ViewRequest::FetchPage(request));
        }
    }

    /// Drop everything and load from the top again
    pub fn refresh(&mut self) {
        self.carousel.clear();
        if let Some(request) = self.pages.reset() {
            self.requests.push(ViewRequest::FetchPage(request));
        }
    }

    pub fn pages(&self) -> &PaginationCursor<ConferenceRow> {
        &self.pages
    }

    /// Rows on screen with each row's selected lecture index
    pub fn rows(&self) -> Vec<(&ConferenceRow, usize)> {
        let offset = self.pages.active_offset();
        self.pages
            .window()
            .iter()
            .enumerate()
            .map(|(slot, row)| (row, self.carousel.position(offset + slot, row.lectures().len())))
            .collect()
    }

    /// The focused lecture: the top row's carousel selection
    pub fn focused(&self) -> Option<(&ConferenceRow, &Lecture)> {
        let row = self.pages.top_row()?;
        let index = self
            .carousel
            .position(self.pages.active_offset(), row.lectures().len());
        row.lectures().get(index).map(|lecture| (row, lecture))
    }

    pub fn complete_page(
        &mut self,
        request: PageRequest,
        result: Result<Vec<ConferenceRow>>,
    ) -> PageOutcome {
        self.pages.complete_page(request, result)
    }

    fn top_row_len(&self) -> usize {
        self.pages.top_row().map_or(0, |row| row.lectures().len())
    }
}

impl KeyHandler for HomeView {
    fn handle_key(&mut self, key: RemoteKey) -> HandleResult {
        let offset = self.pages.active_offset();
        match key {
            RemoteKey::Down => {
                let step = self.pages.advance();
                if let Some(request) = step.fetch {
                    self.requests.push(ViewRequest::FetchPage(request));
                }
                HandleResult::Handled
            }
            RemoteKey::Up => {
                self.pages.retreat();
                HandleResult::Handled
            }
            RemoteKey::Right => {
                self.carousel.move_right(offset, self.top_row_len());
                HandleResult::Handled
            }
            RemoteKey::Left => match self.carousel.move_left(offset, self.top_row_len()) {
                CarouselMove::Moved(_) => HandleResult::Handled,
                CarouselMove::LeftEdge | CarouselMove::Empty => HandleResult::LeftEdge,
            },
            RemoteKey::Enter if self.focused().is_some() => HandleResult::Activate,
            _ => HandleResult::NotHandled,
        }
    }
}

impl ContentView for HomeView {
    fn activation(&self) -> Option<Activation> {
        self.focused().map(|(row, lecture)| Activation::Play {
            lecture: lecture.clone(),
            conference_title: Some(row.title.clone()),
        })
    }

    fn take_requests(&mut self) -> Vec<ViewRequest> {
        std::mem::take(&mut self.requests)
    }
}
