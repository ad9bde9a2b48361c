//! Generation tokens for async completions.
//!
//! Every asynchronous operation captures a [`Ticket`] when it is started.
//! When the completion re-enters the event flow it presents the ticket;
//! completions whose ticket is no longer current are discarded.
//!
//! Tickets come from one process-wide sequence, so a component that is
//! recreated (a reopened view, a new player) never reissues a ticket an
//! earlier instance handed out.

use std::sync::atomic::{AtomicU64, Ordering};

static TICKET_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Token handed to an async operation at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Generation owned by a single component; starts with no ticket issued
#[derive(Debug, Clone, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate all outstanding tickets and issue a fresh one
    pub fn bump(&mut self) -> Ticket {
        self.current = TICKET_COUNTER.fetch_add(1, Ordering::Relaxed);
        Ticket(self.current)
    }

    /// Ticket for the current generation without invalidating anything
    pub fn ticket(&self) -> Ticket {
        Ticket(self.current)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.current
    }
}
