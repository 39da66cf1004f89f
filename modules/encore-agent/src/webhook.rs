//! Dialogflow v2 webhook wire format.
//!
//! Requests carry the resolved intent, slot parameters, and output
//! contexts; session state rides in a dedicated context parameter so the
//! platform replays it on the next turn. Responses carry the spoken text
//! plus the Actions-on-Google rich payload.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::dispatch::Surface;
use crate::format::TurnResponse;
use crate::session::SessionState;

/// Context name (suffix) that carries session state between turns.
pub const SESSION_CONTEXT: &str = "encore-session";

/// Turns the context survives; effectively the rest of the conversation.
const SESSION_CONTEXT_LIFESPAN: u32 = 50;

const SCREEN_CAPABILITY: &str = "actions.capability.SCREEN_OUTPUT";

// --- Request types ---

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(default)]
    pub response_id: String,
    #[serde(default)]
    pub session: String,
    pub query_result: QueryResult,
    #[serde(default)]
    pub original_detect_intent_request: Option<OriginalDetectIntentRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub query_text: String,
    #[serde(default)]
    pub parameters: Value,
    #[serde(default)]
    pub fulfillment_text: String,
    #[serde(default)]
    pub output_contexts: Vec<OutputContext>,
    pub intent: Intent,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputContext {
    pub name: String,
    #[serde(default)]
    pub lifespan_count: u32,
    #[serde(default)]
    pub parameters: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalDetectIntentRequest {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub payload: Value,
}

impl WebhookRequest {
    /// Surface facts for this turn. Only the Google Assistant integration
    /// counts as supported; screen capability comes from the AoG payload.
    pub fn surface(&self) -> Surface {
        let Some(original) = &self.original_detect_intent_request else {
            return Surface::default();
        };
        if original.source != "google" {
            return Surface::default();
        }
        let has_screen = original.payload["surface"]["capabilities"]
            .as_array()
            .is_some_and(|caps| {
                caps.iter()
                    .any(|c| c["name"].as_str() == Some(SCREEN_CAPABILITY))
            });
        Surface {
            is_google: true,
            has_screen,
        }
    }

    /// Session state replayed from the previous turn's output context, or a
    /// fresh default on the first turn.
    pub fn session_state(&self) -> SessionState {
        self.query_result
            .output_contexts
            .iter()
            .find(|c| c.name.ends_with(&format!("/contexts/{SESSION_CONTEXT}")))
            .and_then(|c| c.parameters.get("state"))
            .and_then(|state| serde_json::from_value(state.clone()).ok())
            .unwrap_or_default()
    }
}

// --- Response types ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_text: String,
    pub payload: Value,
    pub output_contexts: Vec<OutputContext>,
}

/// Serialize a turn into the webhook response, re-embedding the session
/// state so the next turn sees it.
pub fn build_response(
    turn: &TurnResponse,
    state: &SessionState,
    session: &str,
) -> WebhookResponse {
    let mut items: Vec<Value> = turn
        .speech
        .iter()
        .map(|line| json!({ "simpleResponse": { "textToSpeech": line } }))
        .collect();

    if let Some(card) = &turn.card {
        items.push(json!({
            "basicCard": {
                "title": card.title,
                "subtitle": card.subtitle,
                "formattedText": card.body,
                "image": {
                    "url": card.image_url,
                    "accessibilityText": card.image_alt,
                },
                "buttons": [{
                    "title": card.button_title,
                    "openUrlAction": { "url": card.button_url },
                }],
                "imageDisplayOptions": "CROPPED",
            }
        }));
    }

    let mut google = json!({
        "expectUserResponse": turn.expect_user_response,
        "richResponse": { "items": items },
    });

    if let Some(list) = &turn.list {
        let list_items: Vec<Value> = list
            .items
            .iter()
            .map(|item| {
                json!({
                    "optionInfo": {
                        "key": item.key,
                        "synonyms": [item.title],
                    },
                    "title": item.title,
                    "description": item.description,
                    "image": {
                        "url": item.image_url,
                        "accessibilityText": item.image_alt,
                    },
                })
            })
            .collect();
        google["systemIntent"] = json!({
            "intent": "actions.intent.OPTION",
            "data": {
                "@type": "type.googleapis.com/google.actions.v2.OptionValueSpec",
                "listSelect": {
                    "title": list.title,
                    "items": list_items,
                },
            },
        });
    }

    let session_context = OutputContext {
        name: format!("{session}/contexts/{SESSION_CONTEXT}"),
        lifespan_count: SESSION_CONTEXT_LIFESPAN,
        parameters: json!({
            "state": serde_json::to_value(state).unwrap_or(Value::Null),
        }),
    };

    WebhookResponse {
        fulfillment_text: turn.speech.join(" "),
        payload: json!({ "google": google }),
        output_contexts: vec![session_context],
    }
}
