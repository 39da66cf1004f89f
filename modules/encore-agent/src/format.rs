//! Pure response building: (event list, cursor) -> display payload.
//!
//! Nothing here touches the network; handlers decide what to show and this
//! module decides how it reads and looks on the assistant surface.

use crate::session::SessionState;

pub const EMPTY_LIST_MESSAGE: &str = "No meetups available at this time!";
pub const PLATFORM_MISMATCH_MESSAGE: &str =
    "Only requests from Google Assistant are supported. \
     Find the Encore action in the Google Assistant directory!";

/// Card image used when an event carries no photo of its own.
pub const DEFAULT_CARD_IMAGE: &str =
    "https://raw.githubusercontent.com/jbergant/udemydemoimg/master/meetup.png";

/// A rich single-item card for screen surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct CardPayload {
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub image_url: String,
    pub image_alt: String,
    pub button_title: String,
    pub button_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    /// Option key the platform echoes back on selection ("meetup-3").
    pub key: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub image_alt: String,
}

/// A rich list widget for screen surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPayload {
    pub title: String,
    pub items: Vec<ListItem>,
}

/// What one turn says and shows, before platform serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnResponse {
    pub speech: Vec<String>,
    pub card: Option<CardPayload>,
    pub list: Option<ListPayload>,
    /// false closes the conversation after this turn.
    pub expect_user_response: bool,
}

impl TurnResponse {
    /// A spoken reply that keeps the conversation open.
    pub fn ask(text: impl Into<String>) -> Self {
        Self {
            speech: vec![text.into()],
            card: None,
            list: None,
            expect_user_response: true,
        }
    }

    /// A spoken reply that ends the conversation.
    pub fn close(text: impl Into<String>) -> Self {
        Self {
            speech: vec![text.into()],
            card: None,
            list: None,
            expect_user_response: false,
        }
    }

    pub fn then_say(mut self, text: impl Into<String>) -> Self {
        self.speech.push(text.into());
        self
    }

    pub fn with_card(mut self, card: CardPayload) -> Self {
        self.card = Some(card);
        self
    }

    pub fn with_list(mut self, list: ListPayload) -> Self {
        self.list = Some(list);
        self
    }
}

/// Option key for the event at `index`, 1-based for the user's benefit.
pub fn option_key(index: usize) -> String {
    format!("meetup-{}", index + 1)
}

/// Map a list option key back to a cursor position.
pub fn index_for_option(key: &str) -> Option<usize> {
    let ordinal: usize = key.strip_prefix("meetup-")?.parse().ok()?;
    ordinal.checked_sub(1)
}

/// Render the event under the cursor: one spoken ordinal line, plus a card
/// when the surface has a screen. Empty list short-circuits to the terminal
/// message and closes.
pub fn single_view(state: &SessionState, has_screen: bool) -> TurnResponse {
    let Some(event) = state.current() else {
        return TurnResponse::close(EMPTY_LIST_MESSAGE);
    };

    let spoken = format!(
        "Meetup number {}: {} by {} on {}.",
        state.cursor + 1,
        event.name,
        event.group.name,
        event.date_text(),
    );

    let response = TurnResponse::ask(spoken);
    if !has_screen {
        return response;
    }

    let image_url = event
        .image
        .clone()
        .unwrap_or_else(|| DEFAULT_CARD_IMAGE.to_string());
    response.with_card(CardPayload {
        title: event.name.clone(),
        subtitle: format!("by {}", event.group.name),
        body: event.description.clone(),
        image_url,
        image_alt: event.name.clone(),
        button_title: "Read more".to_string(),
        button_url: event.link.clone(),
    })
}

/// Render the whole list: a spoken summary of at most the first three
/// events, plus a selectable list widget when the surface has a screen.
pub fn list_view(state: &SessionState, has_screen: bool) -> TurnResponse {
    if state.events.is_empty() {
        return TurnResponse::close(EMPTY_LIST_MESSAGE);
    }

    let preview: Vec<&str> = state
        .events
        .iter()
        .take(3)
        .map(|e| e.name.as_str())
        .collect();
    let spoken = format!(
        "I found {} upcoming meetups. The first {} are: {}. Say a meetup number to hear more.",
        state.events.len(),
        preview.len(),
        preview.join(", "),
    );

    let response = TurnResponse::ask(spoken);
    if !has_screen {
        return response;
    }

    let items = state
        .events
        .iter()
        .enumerate()
        .map(|(i, event)| ListItem {
            key: option_key(i),
            title: format!("Meetup {}", i + 1),
            description: event.name.clone(),
            image_url: event
                .image
                .clone()
                .unwrap_or_else(|| DEFAULT_CARD_IMAGE.to_string()),
            image_alt: event.name.clone(),
        })
        .collect();
    response.with_list(ListPayload {
        title: "Upcoming meetups".to_string(),
        items,
    })
}

#[cfg(test)]
mod tests {
    use encore_common::{EventRecord, GroupRef};

    use crate::session::SessionState;

    use super::*;

    fn sample_state() -> SessionState {
        SessionState {
            events: vec![
                EventRecord {
                    name: "Rust London".into(),
                    group: GroupRef { name: "Rust UK".into() },
                    time: 1579046400000,
                    description: "Monthly meetup".into(),
                    link: "https://example.com/rust-london".into(),
                    image: None,
                },
                EventRecord {
                    name: "Tokio Night".into(),
                    group: GroupRef { name: "Async Club".into() },
                    time: 1579132800000,
                    description: "Hands-on async".into(),
                    link: "https://example.com/tokio-night".into(),
                    image: Some("https://example.com/tokio.png".into()),
                },
            ],
            fetched: true,
            ..Default::default()
        }
    }

    #[test]
    fn single_view_speaks_ordinal_name_group_and_date() {
        let state = sample_state();
        let turn = single_view(&state, false);
        assert_eq!(
            turn.speech,
            vec!["Meetup number 1: Rust London by Rust UK on Wed Jan 15 2020.".to_string()]
        );
        assert!(turn.expect_user_response);
        assert!(turn.card.is_none());
    }

    #[test]
    fn single_view_adds_card_on_screen_surfaces() {
        let mut state = sample_state();
        state.cursor = 1;
        let turn = single_view(&state, true);
        let card = turn.card.expect("screen surface should get a card");
        assert_eq!(card.title, "Tokio Night");
        assert_eq!(card.subtitle, "by Async Club");
        assert_eq!(card.image_url, "https://example.com/tokio.png");
        assert_eq!(card.button_url, "https://example.com/tokio-night");
    }

    #[test]
    fn single_view_falls_back_to_default_image() {
        let state = sample_state();
        let turn = single_view(&state, true);
        assert_eq!(turn.card.unwrap().image_url, DEFAULT_CARD_IMAGE);
    }

    #[test]
    fn empty_list_closes_with_terminal_message_in_both_views() {
        let state = SessionState {
            fetched: true,
            ..Default::default()
        };

        let single = single_view(&state, true);
        assert_eq!(single.speech, vec![EMPTY_LIST_MESSAGE.to_string()]);
        assert!(!single.expect_user_response);
        assert!(single.card.is_none());

        let list = list_view(&state, true);
        assert_eq!(list.speech, vec![EMPTY_LIST_MESSAGE.to_string()]);
        assert!(!list.expect_user_response);
        assert!(list.list.is_none());
    }

    #[test]
    fn list_view_previews_at_most_three_and_keys_all_entries() {
        let mut state = sample_state();
        state.events.extend(sample_state().events);
        assert_eq!(state.events.len(), 4);

        let turn = list_view(&state, true);
        let spoken = &turn.speech[0];
        assert!(spoken.contains("4 upcoming meetups"));
        assert!(spoken.contains("first 3"));

        let list = turn.list.expect("screen surface should get a list");
        assert_eq!(list.items.len(), 4);
        assert_eq!(list.items[0].key, "meetup-1");
        assert_eq!(list.items[3].key, "meetup-4");
        assert_eq!(list.items[1].description, "Tokio Night");
    }

    #[test]
    fn option_keys_round_trip_to_cursor_positions() {
        assert_eq!(index_for_option(&option_key(0)), Some(0));
        assert_eq!(index_for_option(&option_key(7)), Some(7));
        assert_eq!(index_for_option("meetup-0"), None);
        assert_eq!(index_for_option("concert-2"), None);
        assert_eq!(index_for_option("meetup-x"), None);
    }
}
