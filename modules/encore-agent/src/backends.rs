//! Remote backends behind trait seams so handlers can run against
//! in-memory doubles in tests.

use anyhow::Result;
use async_trait::async_trait;
use encore_common::{EncoreError, EventRecord, VoteEntry};
use firebase_client::FirebaseClient;
use meetup_client::MeetupClient;

/// Read-only source of upcoming events. Fetched at most once per
/// conversation by the handlers.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn upcoming_events(&self) -> Result<Vec<EventRecord>>;
}

/// Per-artist vote counters in a remote key-value store.
///
/// `get` + `set_votes` form a non-atomic read-modify-write; two concurrent
/// conversations voting for the same artist can lose an increment. Inherited
/// behavior, not a guarantee worth locking for.
#[async_trait]
pub trait VoteStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<VoteEntry>>;
    async fn put(&self, key: &str, entry: &VoteEntry) -> Result<()>;
    async fn set_votes(&self, key: &str, votes: u64) -> Result<()>;
    /// All entries, ascending by vote count.
    async fn all_by_votes(&self) -> Result<Vec<VoteEntry>>;
}

/// Event source backed by the Meetup upcoming-events endpoint, pinned to
/// one search location.
pub struct MeetupEvents {
    client: MeetupClient,
    lat: f64,
    lng: f64,
    limit: u32,
}

impl MeetupEvents {
    pub fn new(client: MeetupClient, lat: f64, lng: f64, limit: u32) -> Self {
        Self { client, lat, lng, limit }
    }
}

#[async_trait]
impl EventSource for MeetupEvents {
    async fn upcoming_events(&self) -> Result<Vec<EventRecord>> {
        let events = self
            .client
            .upcoming_events(self.lat, self.lng, self.limit)
            .await
            .map_err(|e| EncoreError::EventSource(e.to_string()))?;
        Ok(events)
    }
}

/// Vote ledger under the `votes/` root of a Firebase Realtime Database.
pub struct FirebaseVotes {
    client: FirebaseClient,
}

const VOTES_ROOT: &str = "votes";

impl FirebaseVotes {
    pub fn new(client: FirebaseClient) -> Self {
        Self { client }
    }

    fn path(key: &str) -> String {
        format!("{VOTES_ROOT}/{key}")
    }
}

fn store_err(e: firebase_client::FirebaseError) -> EncoreError {
    EncoreError::VoteStore(e.to_string())
}

#[async_trait]
impl VoteStore for FirebaseVotes {
    async fn get(&self, key: &str) -> Result<Option<VoteEntry>> {
        Ok(self.client.get(&Self::path(key)).await.map_err(store_err)?)
    }

    async fn put(&self, key: &str, entry: &VoteEntry) -> Result<()> {
        Ok(self
            .client
            .set(&Self::path(key), entry)
            .await
            .map_err(store_err)?)
    }

    async fn set_votes(&self, key: &str, votes: u64) -> Result<()> {
        Ok(self
            .client
            .update(&Self::path(key), &serde_json::json!({ "votes": votes }))
            .await
            .map_err(store_err)?)
    }

    async fn all_by_votes(&self) -> Result<Vec<VoteEntry>> {
        // The REST scan is indexed on `votes` but JSON objects carry no
        // order, so sort here.
        let mut entries: Vec<VoteEntry> = self
            .client
            .scan(VOTES_ROOT, "votes")
            .await
            .map_err(store_err)?;
        entries.sort_by_key(|e| e.votes);
        Ok(entries)
    }
}
