//! Debounced search orchestration
//!
//! Typing schedules a search that only runs once the query has been stable
//! for the debounce interval. Each new keystroke aborts the previous task
//! (whether it is still sleeping or already waiting on the network) and
//! invalidates its ticket, so a slow response for an old query can never
//! overwrite newer results.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::error::Result;
use crate::generation::{Generation, Ticket};
use crate::source::ItemSource;
use crate::types::Lecture;

/// A finished search, delivered back to the event loop
#[derive(Debug)]
pub struct SearchCompletion {
    pub ticket: Ticket,
    pub query: String,
    pub result: Result<Vec<Lecture>>,
}

pub struct SearchController {
    generation: Generation,
    debounce: Duration,
    task: Option<JoinHandle<()>>,
}

impl SearchController {
    pub fn new(debounce: Duration) -> Self {
        Self {
            generation: Generation::new(),
            debounce,
            task: None,
        }
    }

    /// A search task is sleeping or running
    pub fn is_in_flight(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Replace any scheduled search with one for `query`
    ///
    /// A blank query only cancels. `deliver` runs on the spawned task once
    /// the search finishes and must hand the completion to the event loop.
    pub fn schedule<F>(
        &mut self,
        query: &str,
        source: Arc<dyn ItemSource>,
        deliver: F,
    ) -> Option<Ticket>
    where
        F: FnOnce(SearchCompletion) + Send + 'static,
    {
        self.cancel();
        let query = query.trim().to_string();
        if query.is_empty() {
            return None;
        }

        let ticket = self.generation.ticket();
        let debounce = self.debounce;
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            tracing::debug!("searching for '{query}'");
            let result = source.search(&query).await;
            deliver(SearchCompletion {
                ticket,
                query,
                result,
            });
        }));
        Some(ticket)
    }

    /// Abort the scheduled search and invalidate its ticket
    pub fn cancel(&mut self) {
        self.generation.bump();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Whether a completion belongs to the latest scheduled search
    pub fn accept(&mut self, completion: &SearchCompletion) -> bool {
        if !self.generation.is_current(completion.ticket) {
            tracing::debug!("dropping stale results for '{}'", completion.query);
            return false;
        }
        self.task = None;
        true
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
