//! Sliding window over a remote paginated collection
//!
//! The cursor retains every row it has ever received for the lifetime of the
//! query. The on-screen window is `known[active_offset..active_offset + capacity]`,
//! so scrolling back up re-inserts retained rows without touching the
//! network, and scrolling down only fetches when the already-known tail is
//! about to run out.
//!
//! Fetching is not performed here. [`PaginationCursor::advance`] hands back
//! a [`PageRequest`] for the caller to execute, and the result is fed back
//! through [`PaginationCursor::complete_page`].

use std::collections::HashSet;

use crate::error::{CccTvError, Result};
use crate::generation::{Generation, Ticket};
use crate::types::Identified;

/// A page fetch the caller should issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Number of rows fetched so far; the upstream offset for the next page
    pub offset: usize,
    pub ticket: Ticket,
}

/// Effect of one vertical navigation step
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaginationStep {
    pub moved: bool,
    /// Identity of the row that left the top of the window
    pub evicted: Option<String>,
    /// Identity of the retained row re-inserted at the top
    pub prepended: Option<String>,
    pub fetch: Option<PageRequest>,
}

/// What happened to a completed page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// New rows appended to the tail (duplicates already removed)
    Appended(usize),
    /// The page held nothing new; no further pages will be requested
    Exhausted,
    /// The fetch failed; the cursor keeps working with what it has
    Failed(String),
    /// The completion belongs to a superseded query and was discarded
    Stale,
}

#[derive(Debug, Clone)]
pub struct PaginationCursor<R> {
    known: Vec<R>,
    ids: HashSet<String>,
    active_offset: usize,
    capacity: usize,
    in_flight: Option<PageRequest>,
    /// Highest offset already requested, so a failed page is not re-requested
    requested_through: Option<usize>,
    exhausted: bool,
    last_error: Option<String>,
    generation: Generation,
}

impl<R: Identified + Clone> PaginationCursor<R> {
    pub fn new(capacity: usize) -> Self {
        let mut generation = Generation::new();
        generation.bump();
        Self {
            known: Vec::new(),
            ids: HashSet::new(),
            active_offset: 0,
            capacity: capacity.max(2),
            in_flight: None,
            requested_through: None,
            exhausted: false,
            last_error: None,
            generation,
        }
    }

    /// Cursor pre-seeded with already-fetched rows
    pub fn with_rows(capacity: usize, rows: Vec<R>) -> Self {
        let mut cursor = Self::new(capacity);
        cursor.append_unique(rows);
        cursor.requested_through = Some(0);
        cursor
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Rows currently on screen, top row first
    pub fn window(&self) -> &[R] {
        let start = self.active_offset.min(self.known.len());
        let end = (self.active_offset + self.capacity).min(self.known.len());
        &self.known[start..end]
    }

    /// The row receiving horizontal input
    pub fn top_row(&self) -> Option<&R> {
        self.known.get(self.active_offset)
    }

    /// Every row received so far, evicted ones included
    pub fn known(&self) -> &[R] {
        &self.known
    }

    pub fn active_offset(&self) -> usize {
        self.active_offset
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_fetched(&self) -> usize {
        self.known.len()
    }

    pub fn is_fetching_more(&self) -> bool {
        self.in_flight.is_some()
    }

    /// First page still outstanding
    pub fn is_loading_initial(&self) -> bool {
        self.known.is_empty() && self.in_flight.is_some()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Rows known beyond the top row
    pub fn rows_ahead(&self) -> usize {
        self.known
            .len()
            .saturating_sub(self.active_offset + 1)
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Request the first page of a fresh query
    pub fn start(&mut self) -> Option<PageRequest> {
        self.maybe_request()
    }

    /// Scroll down one row
    pub fn advance(&mut self) -> PaginationStep {
        if self.window().len() < 2 {
            return PaginationStep::default();
        }

        let evicted = self.known[self.active_offset].identity().to_string();
        self.active_offset += 1;

        let fetch = if self.rows_ahead() <= 1 {
            self.maybe_request()
        } else {
            None
        };

        PaginationStep {
            moved: true,
            evicted: Some(evicted),
            prepended: None,
            fetch,
        }
    }

    /// Scroll up one row, re-inserting a retained row; never fetches
    pub fn retreat(&mut self) -> PaginationStep {
        if self.active_offset == 0 {
            return PaginationStep::default();
        }

        self.active_offset -= 1;
        PaginationStep {
            moved: true,
            evicted: None,
            prepended: Some(self.known[self.active_offset].identity().to_string()),
            fetch: None,
        }
    }

    fn maybe_request(&mut self) -> Option<PageRequest> {
        if self.exhausted || self.in_flight.is_some() {
            return None;
        }

        let offset = self.known.len();
        if self.requested_through.is_some_and(|done| done >= offset) {
            return None;
        }

        let request = PageRequest {
            offset,
            ticket: self.generation.ticket(),
        };
        self.in_flight = Some(request);
        self.requested_through = Some(offset);
        tracing::debug!("requesting page at offset {offset}");
        Some(request)
    }

    // ------------------------------------------------------------------
    // Completion
    // ------------------------------------------------------------------

    /// Feed back the result of a [`PageRequest`]
    pub fn complete_page(&mut self, request: PageRequest, result: Result<Vec<R>>) -> PageOutcome {
        if !self.generation.is_current(request.ticket) || self.in_flight != Some(request) {
            return PageOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(rows) => {
                self.last_error = None;
                let appended = self.append_unique(rows);
                if appended == 0 {
                    self.exhausted = true;
                    PageOutcome::Exhausted
                } else {
                    PageOutcome::Appended(appended)
                }
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!("failed to fetch page at offset {}: {message}", request.offset);
                self.last_error = Some(message.clone());
                PageOutcome::Failed(message)
            }
        }
    }

    /// Check a completion's ticket without consuming it
    pub fn check_ticket(&self, ticket: Ticket) -> Result<()> {
        if self.generation.is_current(ticket) {
            Ok(())
        } else {
            Err(CccTvError::StaleCallback(ticket.value()))
        }
    }

    /// Start over with a new query; outstanding completions become stale
    pub fn reset(&mut self) -> Option<PageRequest> {
        self.generation.bump();
        self.known.clear();
        self.ids.clear();
        self.active_offset = 0;
        self.in_flight = None;
        self.requested_through = None;
        self.exhausted = false;
        self.last_error = None;
        self.start()
    }

    fn append_unique(&mut self, rows: Vec<R>) -> usize {
        let before = self.known.len();
        for row in rows {
            if self.ids.insert(row.identity().to_string()) {
                self.known.push(row);
            }
        }
        self.known.len() - before
    }
}
