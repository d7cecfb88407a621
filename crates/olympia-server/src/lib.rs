//! Olympia server - streaming chat relay
//!
//! A thin HTTP layer over the upstream completion client: one endpoint that
//! validates the conversation history, calls the model with the fixed system
//! prompt, and relays the streamed fragments to the browser.

pub mod api;
pub mod config;
pub mod prompt;
pub mod state;

use axum::{
    Router,
    http::{Method, header},
    routing::{any, get},
};
use tower_http::cors::CorsLayer;

use crate::state::SharedState;

#[derive(serde::Serialize)]
struct Health {
    status: String,
}

async fn health() -> axum::Json<Health> {
    axum::Json(Health {
        status: "olympia is working!".to_string(),
    })
}

/// Build the application router. Shared between `main` and the tests.
pub fn router(state: SharedState) -> Router {
    // Browser UI is served from another origin during development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        // The chat relay performs its own method gate so non-POST requests
        // get the structured 405 body the UI expects
        .route("/api/chat", any(api::chat::relay_chat))
        .layer(cors)
        .with_state(state)
}
