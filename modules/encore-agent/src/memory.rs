//! In-memory backends for tests, in the spirit of a no-op notifier:
//! same trait surface, no network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use encore_common::{EventRecord, VoteEntry};

use crate::backends::{EventSource, VoteStore};

/// Serves a fixed event list and counts how often it was asked, so tests
/// can assert the fetch-once behavior.
pub struct MemoryEvents {
    events: Vec<EventRecord>,
    fetches: AtomicUsize,
}

impl MemoryEvents {
    pub fn new(events: Vec<EventRecord>) -> Self {
        Self {
            events,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl EventSource for MemoryEvents {
    async fn upcoming_events(&self) -> Result<Vec<EventRecord>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Ok(self.events.clone())
    }
}

/// Event source whose fetch always fails, for the degraded-upstream path.
pub struct FailingEvents;

#[async_trait]
impl EventSource for FailingEvents {
    async fn upcoming_events(&self) -> Result<Vec<EventRecord>> {
        Err(anyhow!("upstream unavailable"))
    }
}

/// Vote ledger held in a HashMap.
#[derive(Default)]
pub struct MemoryVotes {
    entries: Mutex<HashMap<String, VoteEntry>>,
}

impl MemoryVotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entry for `key`, for assertions.
    pub fn entry(&self, key: &str) -> Option<VoteEntry> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl VoteStore for MemoryVotes {
    async fn get(&self, key: &str) -> Result<Option<VoteEntry>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, entry: &VoteEntry) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), entry.clone());
        Ok(())
    }

    async fn set_votes(&self, key: &str, votes: u64) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get_mut(key) {
            Some(entry) => entry.votes = votes,
            None => return Err(anyhow!("no entry for key {key}")),
        }
        Ok(())
    }

    async fn all_by_votes(&self) -> Result<Vec<VoteEntry>> {
        let mut all: Vec<VoteEntry> = self.entries.lock().unwrap().values().cloned().collect();
        all.sort_by_key(|e| e.votes);
        Ok(all)
    }
}
