//! Search: a text input above a result list
//!
//! The input and the list share the content region. While the input has
//! focus, typed characters edit the query and Left moves the caret until it
//! reaches the start. Down leaves the input for the results; Up on the first
//! result returns to it.

use super::{Activation, ContentView, ListNav, ViewRequest};
use crate::config::LayoutConfig;
use crate::error::{CccTvError, Result};
use crate::focus::{HandleResult, KeyHandler};
use crate::keymap::RemoteKey;
use crate::types::Lecture;

const NETWORK_ERROR: &str =
    "Network error. Please check your internet connection or try again later.";

pub struct SearchView {
    query: String,
    /// Caret position in characters
    caret: usize,
    input_focused: bool,
    results: Vec<Lecture>,
    nav: ListNav,
    searching: bool,
    error: Option<String>,
    requests: Vec<ViewRequest>,
}

impl SearchView {
    pub fn new(layout: &LayoutConfig) -> Self {
        Self {
            query: String::new(),
            caret: 0,
            input_focused: true,
            results: Vec::new(),
            nav: ListNav::new(layout),
            searching: false,
            error: None,
            requests: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn is_input_focused(&self) -> bool {
        self.input_focused
    }

    pub fn results(&self) -> &[Lecture] {
        &self.results
    }

    pub fn nav(&self) -> &ListNav {
        &self.nav
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn focus_input(&mut self) {
        self.input_focused = true;
        self.caret = self.query.chars().count();
    }

    /// Focus came back from the sidebar; with no results to land on, the
    /// input takes it so typing works again
    pub fn on_focus_returned(&mut self) {
        if self.results.is_empty() {
            self.focus_input();
        }
    }

    /// Insert typed text at the caret; ignored unless the input has focus
    pub fn insert_text(&mut self, text: &str) -> bool {
        if !self.input_focused || text.is_empty() {
            return false;
        }
        let at = self.byte_offset(self.caret);
        self.query.insert_str(at, text);
        self.caret += text.chars().count();
        self.query_changed();
        true
    }

    /// Delete the character before the caret
    pub fn delete_back(&mut self) -> bool {
        if !self.input_focused || self.caret == 0 {
            return false;
        }
        let at = self.byte_offset(self.caret - 1);
        self.query.remove(at);
        self.caret -= 1;
        self.query_changed();
        true
    }

    /// Results for the current query arrived
    pub fn complete(&mut self, result: Result<Vec<Lecture>>) {
        self.searching = false;
        match result {
            Ok(results) => {
                self.error = None;
                self.results = results;
            }
            Err(e) => {
                tracing::warn!("search for '{}' failed: {e}", self.query);
                self.error = Some(match e {
                    CccTvError::Http(_) => NETWORK_ERROR.to_string(),
                    other => other.to_string(),
                });
                self.results.clear();
            }
        }
        self.nav.replace(self.results.len());
    }

    fn query_changed(&mut self) {
        if self.query.trim().is_empty() {
            self.results.clear();
            self.nav.replace(0);
            self.searching = false;
            self.error = None;
        } else {
            self.searching = true;
        }
        self.requests.push(ViewRequest::Search(self.query.clone()));
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.query
            .char_indices()
            .nth(chars)
            .map_or(self.query.len(), |(i, _)| i)
    }
}

impl KeyHandler for SearchView {
    fn handle_key(&mut self, key: RemoteKey) -> HandleResult {
        let has_results = !self.results.is_empty();
        match key {
            RemoteKey::Back => HandleResult::Close,
            RemoteKey::Down if has_results => {
                self.input_focused = false;
                self.nav.move_by(1);
                HandleResult::Handled
            }
            RemoteKey::Up if has_results => {
                if self.nav.selected() == 0 {
                    self.focus_input();
                } else {
                    self.nav.move_by(-1);
                }
                HandleResult::Handled
            }
            RemoteKey::Enter if has_results && !self.input_focused => HandleResult::Activate,
            RemoteKey::Left if !self.input_focused || self.caret == 0 => {
                self.input_focused = false;
                HandleResult::LeftEdge
            }
            RemoteKey::Left => {
                self.caret -= 1;
                HandleResult::Handled
            }
            RemoteKey::Right if self.input_focused && self.caret < self.query.chars().count() => {
                self.caret += 1;
                HandleResult::Handled
            }
            _ => HandleResult::NotHandled,
        }
    }
}

impl ContentView for SearchView {
    fn activation(&self) -> Option<Activation> {
        if self.input_focused {
            return None;
        }
        self.results.get(self.nav.selected()).map(|lecture| Activation::Play {
            conference_title: lecture.conference_title.clone(),
            lecture: lecture.clone(),
        })
    }

    fn take_requests(&mut self) -> Vec<ViewRequest> {
        std::mem::take(&mut self.requests)
    }
}
