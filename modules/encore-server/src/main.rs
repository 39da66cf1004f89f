use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use encore_agent::webhook::{self, WebhookRequest, WebhookResponse};
use encore_agent::{handlers, FirebaseVotes, HandlerRegistry, MeetupEvents, TurnContext};
use encore_common::Config;
use firebase_client::FirebaseClient;
use meetup_client::MeetupClient;

pub struct AppState {
    pub registry: HandlerRegistry,
    pub events: MeetupEvents,
    pub votes: FirebaseVotes,
}

/// The webhook endpoint. Always answers 200 with a well-formed response;
/// anything that goes wrong inside a handler degrades to a spoken reply.
async fn fulfillment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WebhookRequest>,
) -> Json<WebhookResponse> {
    let intent = request.query_result.intent.display_name.clone();
    info!(intent = %intent, session = %request.session, "Webhook request");

    let mut session_state = request.session_state();
    let surface = request.surface();

    let response = {
        let mut ctx = TurnContext {
            params: &request.query_result.parameters,
            nlu_text: &request.query_result.fulfillment_text,
            surface,
            state: &mut session_state,
            events: &state.events,
            votes: &state.votes,
        };
        state.registry.dispatch(&intent, &mut ctx).await
    };

    Json(webhook::build_response(
        &response,
        &session_state,
        &request.session,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("encore_server=info".parse()?)
                .add_directive("encore_agent=info".parse()?),
        )
        .init();

    let config = Config::from_env();

    let events = MeetupEvents::new(
        MeetupClient::new(config.meetup_api_key.clone()),
        config.event_search_lat,
        config.event_search_lng,
        config.event_search_limit,
    );
    let votes = FirebaseVotes::new(FirebaseClient::new(
        config.firebase_db_url.clone(),
        config.firebase_auth_token.clone(),
    ));

    let state = Arc::new(AppState {
        registry: handlers::registry(),
        events,
        votes,
    });

    let app = Router::new()
        .route("/fulfillment", post(fulfillment))
        // Health check
        .route("/", get(|| async { "ok" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        );

    let addr = format!("{}:{}", config.host, config.port);
    info!(addr = %addr, "Encore fulfillment server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
