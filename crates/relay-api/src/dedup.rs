//! # Submission Guard
//!
//! Process-local, time-bounded record of client order ids that have been
//! sent to the gateway. Keeps a redelivered webhook from creating a second
//! gateway transaction and a second email. Nothing is persisted; a restart
//! forgets every entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Outcome of claiming a client order id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// First sighting; the caller owns the submission
    Fresh,
    /// Already submitted (or in flight) within the window
    Duplicate { payment_link: Option<String> },
}

#[derive(Debug)]
enum EntryState {
    InFlight,
    Submitted(Option<String>),
}

#[derive(Debug)]
struct Entry {
    at: Instant,
    state: EntryState,
}

#[derive(Debug)]
pub struct SubmissionGuard {
    window: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl SubmissionGuard {
    /// A zero window disables the guard
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        !self.window.is_zero()
    }

    /// Claim `id` for submission.
    pub fn claim(&self, id: &str) -> Claim {
        if !self.is_enabled() {
            return Claim::Fresh;
        }

        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, entry| now.duration_since(entry.at) < self.window);

        match entries.get(id) {
            Some(Entry {
                state: EntryState::Submitted(link),
                ..
            }) => Claim::Duplicate {
                payment_link: link.clone(),
            },
            Some(Entry {
                state: EntryState::InFlight,
                ..
            }) => Claim::Duplicate { payment_link: None },
            None => {
                entries.insert(
                    id.to_string(),
                    Entry {
                        at: now,
                        state: EntryState::InFlight,
                    },
                );
                Claim::Fresh
            }
        }
    }

    /// Record a successful submission
    pub fn complete(&self, id: &str, payment_link: Option<String>) {
        if !self.is_enabled() {
            return;
        }
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            id.to_string(),
            Entry {
                at: Instant::now(),
                state: EntryState::Submitted(payment_link),
            },
        );
    }

    /// Drop a claim after a failed submission so a retry can go through
    pub fn release(&self, id: &str) {
        if !self.is_enabled() {
            return;
        }
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(id);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An in-flight claim. Released on drop unless `complete` ran, so a dropped
/// or panicking submission never leaves the id blocked for the whole window.
#[derive(Debug)]
pub struct ClaimHold {
    guard: Arc<SubmissionGuard>,
    id: String,
    completed: bool,
}

impl ClaimHold {
    /// Take ownership of a claim that `SubmissionGuard::claim` returned as `Fresh`
    pub fn new(guard: Arc<SubmissionGuard>, id: impl Into<String>) -> Self {
        Self {
            guard,
            id: id.into(),
            completed: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Record the submission; the id stays claimed for the rest of the window
    pub fn complete(mut self, payment_link: Option<String>) {
        self.guard.complete(&self.id, payment_link);
        self.completed = true;
    }
}

impl Drop for ClaimHold {
    fn drop(&mut self) {
        if !self.completed {
            self.guard.release(&self.id);
        }
    }
}
