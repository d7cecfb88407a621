use axum::{
    Json,
    body::{Body, Bytes},
    extract::State,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use olympia_ai::{ChatMessage, CompletionRequest};
use serde_json::json;

use crate::state::SharedState;

// POST /api/chat
//
// Accepts the conversation history as a JSON array of {role, content}
// objects, prepends the system prompt, and relays the upstream completion
// fragment by fragment over a chunked response. The body is raw UTF-8 text
// with no framing; the client treats it as one incrementally-arriving blob.
pub async fn relay_chat(State(state): State<SharedState>, method: Method, body: Bytes) -> Response {
    tracing::debug!(method = %method, "Received chat request");

    if method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(json!({ "message": "Method Not Allowed" })),
        )
            .into_response();
    }

    // Typed parse before any streaming headers commit. Alternate role labels
    // ("bot") are canonicalized to "assistant" during deserialization.
    let history: Vec<ChatMessage> = match serde_json::from_slice(&body) {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected malformed chat body");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Invalid request body: {}", e) })),
            )
                .into_response();
        }
    };

    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::system(state.system_prompt.as_str()));
    messages.extend(history);

    let stream = match state.llm.complete_stream(CompletionRequest::new(messages)).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!(error = %e, "Upstream completion call failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error" })),
            )
                .into_response();
        }
    };

    // Forward each fragment the moment it arrives, in upstream order. A
    // failed item terminates the body abruptly; once headers are out there is
    // no other signal the client can receive.
    let body = Body::from_stream(
        stream.map(|fragment| fragment.map(Bytes::from).map_err(axum::Error::new)),
    );

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        body,
    )
        .into_response()
}
