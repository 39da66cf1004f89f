//! Vote casting, fallback escalation, and leaderboard rendering.

use anyhow::Result;
use encore_common::{vote_key, VoteEntry};

use crate::backends::VoteStore;
use crate::format::TurnResponse;
use crate::session::SessionState;

pub const VOTE_THANKS: &str = "Thank you for voting!";
pub const VOTE_REFUSED: &str = "Thank you for voting. Your vote was refused. Try again later.";

/// Consecutive unrecognized-artist turns tolerated before refusing.
pub const VOTE_FALLBACK_LIMIT: u8 = 3;

/// Record one vote for `name`. First vote creates the entry with the
/// display name as supplied; later votes (under any casing/spacing of the
/// same name) increment it. Read-then-write, not atomic.
pub async fn cast_vote(store: &dyn VoteStore, name: &str) -> Result<()> {
    let key = vote_key(name);
    match store.get(&key).await? {
        Some(entry) => {
            store.set_votes(&key, entry.votes + 1).await?;
            tracing::info!(key = %key, votes = entry.votes + 1, "Vote incremented");
        }
        None => {
            store
                .put(
                    &key,
                    &VoteEntry {
                        name: name.to_string(),
                        votes: 1,
                    },
                )
                .await?;
            tracing::info!(key = %key, "Vote entry created");
        }
    }
    Ok(())
}

/// A vote turn arrived without a recognizable artist. Echo the NLU's own
/// fallback text while below the limit; refuse and close on the third
/// consecutive miss.
pub fn fallback_on_missing_vote(state: &mut SessionState, nlu_text: &str) -> TurnResponse {
    state.vote_fallbacks += 1;
    if state.vote_fallbacks >= VOTE_FALLBACK_LIMIT {
        TurnResponse::close(VOTE_REFUSED)
    } else {
        TurnResponse::ask(nlu_text)
    }
}

/// Comma-joined leaderboard body, highest count first. Exactly one vote
/// says "vote"; every other count, zero included, says "votes".
pub fn leaderboard_text(entries_descending: &[VoteEntry]) -> String {
    entries_descending
        .iter()
        .map(|entry| {
            let word = if entry.votes == 1 { "vote" } else { "votes" };
            format!("{} has {} {}", entry.name, entry.votes, word)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read the whole ledger and render the spoken leaderboard sentence.
pub async fn render_leaderboard(store: &dyn VoteStore) -> Result<String> {
    let mut entries = store.all_by_votes().await?;
    entries.reverse();
    if entries.is_empty() {
        return Ok("No votes have been cast yet.".to_string());
    }
    Ok(format!("Vote results are {}", leaderboard_text(&entries)))
}
