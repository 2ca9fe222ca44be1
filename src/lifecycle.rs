//! Serialization of outbound requests.
//!
//! At most one request is ever active. Each request is identified by a
//! generation number; a completion whose generation is no longer the active
//! one arrived for a superseded or cancelled request and must be discarded.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct RequestLifecycle {
    counter: AtomicU64,
    active: Mutex<Option<u64>>,
}

/// Identity of one in-flight request. Holders pass it back on completion so
/// stale responses can be told apart from the current exchange.
#[derive(Debug)]
pub struct RequestTicket {
    generation: u64,
}

impl RequestLifecycle {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(1),
            active: Mutex::new(None),
        }
    }

    /// Issue a new ticket. Any previously active ticket is superseded: its
    /// eventual completion will fail the identity check.
    pub fn begin(&self) -> RequestTicket {
        let generation = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut active = self.active.lock().expect("lifecycle poisoned");
        *active = Some(generation);
        RequestTicket { generation }
    }

    /// Mark the request finished. Returns false when the ticket was
    /// superseded or cancelled; stale completions must not touch state
    /// belonging to a newer request.
    pub fn end(&self, ticket: &RequestTicket) -> bool {
        let mut active = self.active.lock().expect("lifecycle poisoned");
        if *active == Some(ticket.generation) {
            *active = None;
            true
        } else {
            false
        }
    }

    /// Drop the active ticket, if any. The underlying network call is not
    /// torn down here; its completion becomes stale and is discarded.
    pub fn cancel(&self) {
        let mut active = self.active.lock().expect("lifecycle poisoned");
        *active = None;
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        *self.active.lock().expect("lifecycle poisoned") == Some(ticket.generation)
    }

    pub fn busy(&self) -> bool {
        self.active.lock().expect("lifecycle poisoned").is_some()
    }
}

impl Default for RequestLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
