//! The registered intent handlers.
//!
//! Single-item and list browsing share one session state machine with an
//! explicit view mode instead of parallel handler sets; "repeat" replays
//! whichever view the user last saw.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::cursor::NavOutcome;
use crate::dispatch::{HandlerRegistry, IntentHandler, TurnContext};
use crate::format::{self, TurnResponse, PLATFORM_MISMATCH_MESSAGE};
use crate::session::ViewMode;
use crate::votes;

pub const WELCOME_MESSAGE: &str = "Welcome to my agent!";
pub const END_OF_LIST_MESSAGE: &str = "That was the last meetup. Goodbye!";
pub const START_OF_LIST_MESSAGE: &str = "You are already at the first meetup.";
pub const ASK_FOR_NUMBER_MESSAGE: &str = "Which meetup number would you like to hear about?";

/// Build the full registry of intents this agent answers.
pub fn registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry.register("Default Welcome Intent", Welcome);
    registry.register("Default Fallback Intent", Fallback);
    registry.register("music vote", MusicVote);
    registry.register("vote results", VoteResults);
    registry.register("show meetups", ShowMeetups);
    registry.register("show meetups list", ShowMeetupsList);
    registry.register("next meetup", NextMeetup);
    registry.register("previous meetup", PreviousMeetup);
    registry.register("repeat meetup", RepeatMeetup);
    registry.register("select meetup", SelectMeetup);
    registry
}

/// List and vote intents only work through the Google Assistant
/// integration; everything else gets a pointer to the directory.
fn require_google(ctx: &TurnContext<'_>) -> Option<TurnResponse> {
    if ctx.surface.is_google {
        None
    } else {
        Some(TurnResponse::ask(PLATFORM_MISMATCH_MESSAGE))
    }
}

/// Fetch the event list if this conversation has not fetched yet. A failed
/// fetch is logged and leaves the list empty; the user only ever hears the
/// no-events message, never an error.
async fn ensure_events(ctx: &mut TurnContext<'_>) {
    if ctx.state.fetched {
        return;
    }
    match ctx.events.upcoming_events().await {
        Ok(events) => ctx.state.events = events,
        Err(e) => {
            warn!(error = %e, "Event fetch failed; treating list as empty");
        }
    }
    ctx.state.fetched = true;
}

/// 1-based ordinal from the slot parameters: a numeric `number` slot, or
/// the option key echoed back from a rich list selection.
fn requested_ordinal(params: &Value) -> Option<usize> {
    if let Some(number) = params.get("number") {
        if let Some(f) = number.as_f64() {
            if f >= 1.0 && f.fract() == 0.0 {
                return Some(f as usize);
            }
            return None;
        }
        if let Some(s) = number.as_str() {
            return s.trim().parse::<usize>().ok().filter(|&n| n >= 1);
        }
    }
    params
        .get("option")
        .and_then(Value::as_str)
        .and_then(format::index_for_option)
        .map(|index| index + 1)
}

// --- Handlers ---

struct Welcome;

#[async_trait]
impl IntentHandler for Welcome {
    async fn handle(&self, _ctx: &mut TurnContext<'_>) -> Result<TurnResponse> {
        Ok(TurnResponse::ask(WELCOME_MESSAGE))
    }
}

struct Fallback;

#[async_trait]
impl IntentHandler for Fallback {
    async fn handle(&self, _ctx: &mut TurnContext<'_>) -> Result<TurnResponse> {
        Ok(TurnResponse::ask("I didn't understand").then_say("I'm sorry, can you try again?"))
    }
}

struct ShowMeetups;

#[async_trait]
impl IntentHandler for ShowMeetups {
    async fn handle(&self, ctx: &mut TurnContext<'_>) -> Result<TurnResponse> {
        if let Some(mismatch) = require_google(ctx) {
            return Ok(mismatch);
        }
        ensure_events(ctx).await;
        ctx.state.view = ViewMode::Single;
        Ok(format::single_view(ctx.state, ctx.surface.has_screen))
    }
}

struct ShowMeetupsList;

#[async_trait]
impl IntentHandler for ShowMeetupsList {
    async fn handle(&self, ctx: &mut TurnContext<'_>) -> Result<TurnResponse> {
        if let Some(mismatch) = require_google(ctx) {
            return Ok(mismatch);
        }
        ctx.state.reset();
        ensure_events(ctx).await;
        ctx.state.view = ViewMode::List;
        Ok(format::list_view(ctx.state, ctx.surface.has_screen))
    }
}

struct NextMeetup;

#[async_trait]
impl IntentHandler for NextMeetup {
    async fn handle(&self, ctx: &mut TurnContext<'_>) -> Result<TurnResponse> {
        if let Some(mismatch) = require_google(ctx) {
            return Ok(mismatch);
        }
        ensure_events(ctx).await;
        if ctx.state.events.is_empty() {
            return Ok(format::single_view(ctx.state, ctx.surface.has_screen));
        }
        match ctx.state.advance() {
            NavOutcome::Moved => {
                ctx.state.view = ViewMode::Single;
                Ok(format::single_view(ctx.state, ctx.surface.has_screen))
            }
            _ => Ok(TurnResponse::close(END_OF_LIST_MESSAGE)),
        }
    }
}

struct PreviousMeetup;

#[async_trait]
impl IntentHandler for PreviousMeetup {
    async fn handle(&self, ctx: &mut TurnContext<'_>) -> Result<TurnResponse> {
        if let Some(mismatch) = require_google(ctx) {
            return Ok(mismatch);
        }
        ensure_events(ctx).await;
        if ctx.state.events.is_empty() {
            return Ok(format::single_view(ctx.state, ctx.surface.has_screen));
        }
        match ctx.state.retreat() {
            NavOutcome::Moved => {
                ctx.state.view = ViewMode::Single;
                Ok(format::single_view(ctx.state, ctx.surface.has_screen))
            }
            _ => Ok(TurnResponse::ask(START_OF_LIST_MESSAGE)),
        }
    }
}

struct RepeatMeetup;

#[async_trait]
impl IntentHandler for RepeatMeetup {
    async fn handle(&self, ctx: &mut TurnContext<'_>) -> Result<TurnResponse> {
        if let Some(mismatch) = require_google(ctx) {
            return Ok(mismatch);
        }
        ensure_events(ctx).await;
        Ok(match ctx.state.view {
            ViewMode::Single => format::single_view(ctx.state, ctx.surface.has_screen),
            ViewMode::List => format::list_view(ctx.state, ctx.surface.has_screen),
        })
    }
}

struct SelectMeetup;

#[async_trait]
impl IntentHandler for SelectMeetup {
    async fn handle(&self, ctx: &mut TurnContext<'_>) -> Result<TurnResponse> {
        if let Some(mismatch) = require_google(ctx) {
            return Ok(mismatch);
        }
        ensure_events(ctx).await;
        if ctx.state.events.is_empty() {
            return Ok(format::single_view(ctx.state, ctx.surface.has_screen));
        }
        let Some(ordinal) = requested_ordinal(ctx.params) else {
            return Ok(TurnResponse::ask(ASK_FOR_NUMBER_MESSAGE));
        };
        match ctx.state.select(ordinal - 1) {
            NavOutcome::Moved => {
                ctx.state.view = ViewMode::Single;
                Ok(format::single_view(ctx.state, ctx.surface.has_screen))
            }
            _ => Ok(TurnResponse::ask(format!(
                "There is no meetup number {}. Pick a number between 1 and {}.",
                ordinal,
                ctx.state.events.len()
            ))),
        }
    }
}

struct MusicVote;

#[async_trait]
impl IntentHandler for MusicVote {
    async fn handle(&self, ctx: &mut TurnContext<'_>) -> Result<TurnResponse> {
        if let Some(mismatch) = require_google(ctx) {
            return Ok(mismatch);
        }
        let artist = ctx
            .params
            .get("artist")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty());

        match artist {
            Some(artist) => {
                votes::cast_vote(ctx.votes, artist).await?;
                ctx.state.vote_fallbacks = 0;
                Ok(TurnResponse::ask(votes::VOTE_THANKS))
            }
            None => Ok(votes::fallback_on_missing_vote(ctx.state, ctx.nlu_text)),
        }
    }
}

struct VoteResults;

#[async_trait]
impl IntentHandler for VoteResults {
    async fn handle(&self, ctx: &mut TurnContext<'_>) -> Result<TurnResponse> {
        if let Some(mismatch) = require_google(ctx) {
            return Ok(mismatch);
        }
        let sentence = votes::render_leaderboard(ctx.votes).await?;
        Ok(TurnResponse::ask(sentence))
    }
}
