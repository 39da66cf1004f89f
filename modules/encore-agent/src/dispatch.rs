//! Intent dispatch: a registry of named handlers, looked up by the intent
//! display name the NLU platform resolved.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::backends::{EventSource, VoteStore};
use crate::format::TurnResponse;
use crate::session::SessionState;

/// What the inbound request says about the client surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct Surface {
    /// Request originated from the Google Assistant integration.
    pub is_google: bool,
    /// The surface can render cards and lists.
    pub has_screen: bool,
}

/// Everything one turn's handler may read or mutate.
pub struct TurnContext<'a> {
    /// Slot parameters from the NLU, as loosely-typed JSON.
    pub params: &'a serde_json::Value,
    /// Fallback text the NLU already composed for this turn.
    pub nlu_text: &'a str,
    pub surface: Surface,
    pub state: &'a mut SessionState,
    pub events: &'a dyn EventSource,
    pub votes: &'a dyn VoteStore,
}

/// One registered intent capability.
#[async_trait]
pub trait IntentHandler: Send + Sync {
    async fn handle(&self, ctx: &mut TurnContext<'_>) -> Result<TurnResponse>;
}

/// Maps intent display names to handlers. Unknown intents and handler
/// failures both degrade to a spoken reply; no turn ends without one.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, Box<dyn IntentHandler>>,
}

const UNKNOWN_INTENT_MESSAGE: &str = "I didn't understand. I'm sorry, can you try again?";
const HANDLER_FAILURE_MESSAGE: &str = "Something went wrong on my end. Please try again.";

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, intent: &'static str, handler: impl IntentHandler + 'static) {
        self.handlers.insert(intent, Box::new(handler));
    }

    pub async fn dispatch(&self, intent: &str, ctx: &mut TurnContext<'_>) -> TurnResponse {
        match self.handlers.get(intent) {
            Some(handler) => match handler.handle(ctx).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(intent, error = %e, "Intent handler failed");
                    TurnResponse::ask(HANDLER_FAILURE_MESSAGE)
                }
            },
            None => {
                debug!(intent, "No handler registered for intent");
                TurnResponse::ask(UNKNOWN_INTENT_MESSAGE)
            }
        }
    }
}
