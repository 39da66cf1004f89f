//! End-to-end turns through the dispatcher over in-memory backends:
//! browse, paginate, select, vote, and the degraded paths.

use encore_agent::dispatch::{Surface, TurnContext};
use encore_agent::handlers::{self, END_OF_LIST_MESSAGE, START_OF_LIST_MESSAGE};
use encore_agent::memory::{FailingEvents, MemoryEvents, MemoryVotes};
use encore_agent::session::{SessionState, ViewMode};
use encore_agent::votes::{VOTE_REFUSED, VOTE_THANKS};
use encore_agent::{HandlerRegistry, TurnResponse};
use encore_common::{EventRecord, GroupRef};

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

fn event(name: &str) -> EventRecord {
    EventRecord {
        name: name.to_string(),
        group: GroupRef { name: "Group".into() },
        time: 1579046400000,
        description: format!("{name} description"),
        link: format!("https://example.com/{name}"),
        image: None,
    }
}

fn three_events() -> MemoryEvents {
    MemoryEvents::new(vec![event("Alpha"), event("Beta"), event("Gamma")])
}

struct Harness {
    registry: HandlerRegistry,
    events: MemoryEvents,
    votes: MemoryVotes,
    state: SessionState,
    surface: Surface,
}

impl Harness {
    fn new(events: MemoryEvents) -> Self {
        Self {
            registry: handlers::registry(),
            events,
            votes: MemoryVotes::new(),
            state: SessionState::default(),
            surface: Surface {
                is_google: true,
                has_screen: true,
            },
        }
    }

    async fn turn(&mut self, intent: &str, params: serde_json::Value) -> TurnResponse {
        let mut ctx = TurnContext {
            params: &params,
            nlu_text: "I didn't get that. Who do you want to vote for?",
            surface: self.surface,
            state: &mut self.state,
            events: &self.events,
            votes: &self.votes,
        };
        self.registry.dispatch(intent, &mut ctx).await
    }
}

// ---------------------------------------------------------------------------
// Browsing and pagination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn show_meetups_fetches_once_per_conversation() {
    let mut h = Harness::new(three_events());

    let first = h.turn("show meetups", serde_json::json!({})).await;
    assert!(first.speech[0].starts_with("Meetup number 1: Alpha"));
    assert!(first.card.is_some());

    h.turn("next meetup", serde_json::json!({})).await;
    h.turn("repeat meetup", serde_json::json!({})).await;

    assert_eq!(h.events.fetch_count(), 1);
}

#[tokio::test]
async fn pagination_walks_forward_and_closes_at_the_end() {
    let mut h = Harness::new(three_events());
    h.turn("show meetups", serde_json::json!({})).await;

    let second = h.turn("next meetup", serde_json::json!({})).await;
    assert!(second.speech[0].starts_with("Meetup number 2: Beta"));

    let third = h.turn("next meetup", serde_json::json!({})).await;
    assert!(third.speech[0].starts_with("Meetup number 3: Gamma"));

    let past_end = h.turn("next meetup", serde_json::json!({})).await;
    assert_eq!(past_end.speech, vec![END_OF_LIST_MESSAGE.to_string()]);
    assert!(!past_end.expect_user_response);
    assert_eq!(h.state.cursor, 2);
}

#[tokio::test]
async fn previous_at_the_start_keeps_the_conversation_open() {
    let mut h = Harness::new(three_events());
    h.turn("show meetups", serde_json::json!({})).await;

    let boundary = h.turn("previous meetup", serde_json::json!({})).await;
    assert_eq!(boundary.speech, vec![START_OF_LIST_MESSAGE.to_string()]);
    assert!(boundary.expect_user_response);
    assert_eq!(h.state.cursor, 0);
}

#[tokio::test]
async fn select_by_number_jumps_and_out_of_range_is_rejected() {
    let mut h = Harness::new(three_events());
    h.turn("show meetups list", serde_json::json!({})).await;

    let selected = h
        .turn("select meetup", serde_json::json!({ "number": 3.0 }))
        .await;
    assert!(selected.speech[0].starts_with("Meetup number 3: Gamma"));
    assert_eq!(h.state.view, ViewMode::Single);

    let rejected = h
        .turn("select meetup", serde_json::json!({ "number": 9.0 }))
        .await;
    assert!(rejected.speech[0].contains("no meetup number 9"));
    assert!(rejected.expect_user_response);
    assert_eq!(h.state.cursor, 2);
}

#[tokio::test]
async fn selecting_a_list_option_maps_back_to_the_cursor() {
    let mut h = Harness::new(three_events());
    let list = h.turn("show meetups list", serde_json::json!({})).await;
    let key = list.list.expect("list payload").items[1].key.clone();

    let selected = h
        .turn("select meetup", serde_json::json!({ "option": key }))
        .await;
    assert!(selected.speech[0].starts_with("Meetup number 2: Beta"));
    assert_eq!(h.state.cursor, 1);
}

#[tokio::test]
async fn repeat_replays_the_last_view_mode() {
    let mut h = Harness::new(three_events());
    h.turn("show meetups list", serde_json::json!({})).await;

    let repeated = h.turn("repeat meetup", serde_json::json!({})).await;
    assert!(repeated.list.is_some(), "list mode should repeat as a list");

    h.turn("select meetup", serde_json::json!({ "number": 2.0 }))
        .await;
    let repeated = h.turn("repeat meetup", serde_json::json!({})).await;
    assert!(repeated.list.is_none());
    assert!(repeated.speech[0].starts_with("Meetup number 2: Beta"));
}

// ---------------------------------------------------------------------------
// Degraded paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_list_closes_both_views() {
    let mut h = Harness::new(MemoryEvents::new(vec![]));

    let single = h.turn("show meetups", serde_json::json!({})).await;
    assert!(!single.expect_user_response);
    assert_eq!(single.speech[0], "No meetups available at this time!");

    let mut h = Harness::new(MemoryEvents::new(vec![]));
    let list = h.turn("show meetups list", serde_json::json!({})).await;
    assert!(!list.expect_user_response);
    assert_eq!(list.speech[0], "No meetups available at this time!");
}

#[tokio::test]
async fn fetch_failure_reads_as_no_events_and_is_not_retried() {
    let registry = handlers::registry();
    let votes = MemoryVotes::new();
    let mut state = SessionState::default();
    let params = serde_json::json!({});

    let mut ctx = TurnContext {
        params: &params,
        nlu_text: "",
        surface: Surface {
            is_google: true,
            has_screen: false,
        },
        state: &mut state,
        events: &FailingEvents,
        votes: &votes,
    };
    let response = registry.dispatch("show meetups", &mut ctx).await;
    assert_eq!(response.speech[0], "No meetups available at this time!");
    assert!(!response.expect_user_response);
    assert!(state.fetched, "a failed fetch still counts as fetched");
}

#[tokio::test]
async fn non_google_surface_skips_list_and_vote_logic() {
    let mut h = Harness::new(three_events());
    h.surface = Surface {
        is_google: false,
        has_screen: false,
    };

    let response = h.turn("show meetups", serde_json::json!({})).await;
    assert!(response.speech[0].contains("Google Assistant"));
    assert_eq!(h.events.fetch_count(), 0);

    let vote = h
        .turn("music vote", serde_json::json!({ "artist": "Muse" }))
        .await;
    assert!(vote.speech[0].contains("Google Assistant"));
    assert!(h.votes.entry("muse").is_none());
}

#[tokio::test]
async fn unknown_intent_still_gets_a_reply() {
    let mut h = Harness::new(three_events());
    let response = h.turn("order pizza", serde_json::json!({})).await;
    assert!(response.expect_user_response);
    assert!(!response.speech.is_empty());
}

// ---------------------------------------------------------------------------
// Voting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn votes_accumulate_across_name_variants() {
    let mut h = Harness::new(three_events());

    let first = h
        .turn("music vote", serde_json::json!({ "artist": "Daft Punk" }))
        .await;
    assert_eq!(first.speech, vec![VOTE_THANKS.to_string()]);

    h.turn("music vote", serde_json::json!({ "artist": "daft punk" }))
        .await;

    let entry = h.votes.entry("daftpunk").expect("tally entry");
    assert_eq!(entry.votes, 2);
    assert_eq!(entry.name, "Daft Punk");
}

#[tokio::test]
async fn third_unrecognized_vote_in_a_row_is_refused() {
    let mut h = Harness::new(three_events());

    let first = h.turn("music vote", serde_json::json!({})).await;
    assert!(first.expect_user_response);
    assert_eq!(
        first.speech,
        vec!["I didn't get that. Who do you want to vote for?".to_string()]
    );

    let second = h.turn("music vote", serde_json::json!({})).await;
    assert!(second.expect_user_response);

    let third = h.turn("music vote", serde_json::json!({})).await;
    assert!(!third.expect_user_response);
    assert_eq!(third.speech, vec![VOTE_REFUSED.to_string()]);
}

#[tokio::test]
async fn successful_vote_resets_the_fallback_streak() {
    let mut h = Harness::new(three_events());

    h.turn("music vote", serde_json::json!({})).await;
    h.turn("music vote", serde_json::json!({})).await;
    h.turn("music vote", serde_json::json!({ "artist": "Muse" }))
        .await;
    assert_eq!(h.state.vote_fallbacks, 0);

    // The streak starts over; the next miss is the first again.
    let after = h.turn("music vote", serde_json::json!({})).await;
    assert!(after.expect_user_response);
}

#[tokio::test]
async fn leaderboard_reads_descending() {
    let mut h = Harness::new(three_events());
    for artist in ["A", "A", "A", "B", "C", "C", "C", "C", "C"] {
        h.turn("music vote", serde_json::json!({ "artist": artist }))
            .await;
    }

    let results = h.turn("vote results", serde_json::json!({})).await;
    assert_eq!(
        results.speech,
        vec!["Vote results are C has 5 votes, A has 3 votes, B has 1 vote".to_string()]
    );
}
