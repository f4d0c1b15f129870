//! Request generations per interactive control
//!
//! Overlapping requests for the same control race to mutate the same DOM
//! node. Each request takes a ticket when it starts; once its response
//! arrives it is only applied if no newer request for that control has
//! started in the meantime.

use std::collections::HashMap;
use std::sync::Mutex;

/// Ticket handed out when a request starts. Tickets are unique across all
/// controls, so a finished control can be forgotten without reusing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

#[derive(Debug, Default)]
struct Counters {
    issued: u64,
    latest: HashMap<String, u64>,
}

/// Latest ticket per control (usually session + control name). A control
/// is only tracked while one of its requests is in flight.
#[derive(Debug, Default)]
pub struct RequestGenerations {
    counters: Mutex<Counters>,
}

impl RequestGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `key`, superseding any request still in flight
    pub fn begin(&self, key: &str) -> Generation {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters.issued += 1;
        let issued = counters.issued;
        counters.latest.insert(key.to_string(), issued);
        Generation(issued)
    }

    /// Finish the request holding `generation` and tell whether it is still
    /// the latest for `key`. The latest request releases the key.
    pub fn finish(&self, key: &str, generation: Generation) -> bool {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        if counters.latest.get(key).copied() == Some(generation.0) {
            counters.latest.remove(key);
            true
        } else {
            false
        }
    }

    /// Number of controls with a request in flight
    pub fn len(&self) -> usize {
        self.counters.lock().unwrap_or_else(|e| e.into_inner()).latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
