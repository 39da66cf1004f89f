use encore_common::EventRecord;
use serde::{Deserialize, Serialize};

/// Which rendering the last list-related turn used. Navigation intents
/// consult this so "repeat" replays what the user actually heard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Single,
    List,
}

/// Per-conversation state, passed into every handler and written back into
/// the webhook response so the platform replays it on the next turn.
///
/// The event list is fetched at most once per conversation: `fetched` stays
/// true even when the fetch produced nothing, so an empty result is not
/// retried on the next turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionState {
    pub events: Vec<EventRecord>,
    /// Index into `events`; meaningful only while `events` is non-empty.
    pub cursor: usize,
    pub fetched: bool,
    pub view: ViewMode,
    /// Consecutive vote turns that arrived without a recognizable artist.
    pub vote_fallbacks: u8,
}
