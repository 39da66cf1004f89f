use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

// --- Event source types ---

/// One upcoming event as returned by the event source.
/// Immutable once fetched; navigation only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub name: String,
    pub group: GroupRef,
    /// Start time in epoch milliseconds.
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRef {
    pub name: String,
}

impl EventRecord {
    /// Human-readable start date, e.g. "Wed Jan 15 2020".
    pub fn date_text(&self) -> String {
        match Utc.timestamp_millis_opt(self.time).single() {
            Some(dt) => dt.format("%a %b %d %Y").to_string(),
            None => "an unknown date".to_string(),
        }
    }
}

// --- Vote ledger types ---

/// A named vote counter in the remote store. Created on first vote,
/// incremented on subsequent votes, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteEntry {
    /// Display form of the name as first supplied by a voter.
    pub name: String,
    pub votes: u64,
}

/// Storage key for a vote entry: lowercased with all whitespace removed,
/// so "Taylor Swift" and "taylor swift" tally together.
pub fn vote_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_key_normalizes_case_and_whitespace() {
        assert_eq!(vote_key("Taylor Swift"), "taylorswift");
        assert_eq!(vote_key(" taylor  SWIFT "), "taylorswift");
        assert_eq!(vote_key("taylorswift"), "taylorswift");
    }

    #[test]
    fn date_text_renders_epoch_millis() {
        let event = EventRecord {
            name: "Rust London".into(),
            group: GroupRef { name: "Rust UK".into() },
            time: 1579046400000, // 2020-01-15T00:00:00Z
            description: String::new(),
            link: String::new(),
            image: None,
        };
        assert_eq!(event.date_text(), "Wed Jan 15 2020");
    }
}
