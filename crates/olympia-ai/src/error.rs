//! Error types for the completion client

use thiserror::Error;

/// Completion client error types
#[derive(Error, Debug)]
pub enum AiError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("{provider} returned HTTP {status}: {message}")]
    LlmHttp {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for completion operations
pub type Result<T> = std::result::Result<T, AiError>;

/// Convert a non-success upstream response into an error, consuming the body.
pub(crate) async fn response_to_error(response: reqwest::Response, provider: &str) -> AiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    AiError::LlmHttp {
        provider: provider.to_string(),
        status,
        message: truncate_error_body(body),
    }
}

/// Truncate an upstream error body to prevent leaking large or sensitive
/// responses. The body is externally controlled, so the cut must land on a
/// char boundary.
fn truncate_error_body(body: String) -> String {
    const MAX_ERROR_BODY: usize = 512;

    if body.len() <= MAX_ERROR_BODY {
        return body;
    }

    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &body[..end])
}
