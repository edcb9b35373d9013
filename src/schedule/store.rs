//! In-memory event storage.
//!
//! The store is authoritative for the schedule but performs no conflict
//! checking; the orchestrator verifies non-overlap before calling [`EventStore::put`].

use std::collections::HashMap;

use tracing::debug;

use super::types::Event;

/// In-memory map of event id to event, with deterministic ordered listing.
///
/// All methods are synchronous; callers that need shared access wrap the
/// store in `Arc<tokio::sync::RwLock<_>>`.
#[derive(Debug, Default)]
pub struct EventStore {
    events: HashMap<String, Entry>,
    next_seq: u64,
}

#[derive(Debug)]
struct Entry {
    /// Insertion sequence, used as a stable tie-break for equal start
    /// times. Replacing an event keeps its original sequence.
    seq: u64,
    event: Event,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an event by id.
    pub fn put(&mut self, event: Event) {
        let seq = match self.events.get(&event.id) {
            Some(existing) => existing.seq,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                seq
            }
        };
        debug!("Storing event: {} ({})", event.title, event.id);
        self.events.insert(event.id.clone(), Entry { seq, event });
    }

    /// Get an event by id.
    pub fn get(&self, id: &str) -> Option<Event> {
        self.events.get(id).map(|e| e.event.clone())
    }

    /// Remove an event by id, returning it if present.
    pub fn remove(&mut self, id: &str) -> Option<Event> {
        let removed = self.events.remove(id).map(|e| e.event);
        if let Some(ref event) = removed {
            debug!("Removed event: {} ({})", event.title, event.id);
        }
        removed
    }

    /// All events sorted ascending by start time, insertion order breaking
    /// ties.
    pub fn list(&self) -> Vec<Event> {
        let mut entries: Vec<&Entry> = self.events.values().collect();
        entries.sort_by_key(|e| (e.event.start_ms, e.seq));
        entries.iter().map(|e| e.event.clone()).collect()
    }

    /// Events whose tags include `tag`, preserving the natural listing order.
    pub fn filter_by_tag(&self, tag: &str) -> Vec<Event> {
        self.list()
            .into_iter()
            .filter(|e| e.tags.iter().any(|t| t == tag))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
