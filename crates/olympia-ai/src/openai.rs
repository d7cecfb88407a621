//! OpenAI-compatible completion provider

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{
    ChatRole, CompletionClient, CompletionRequest, FragmentStream,
};
use crate::error::{AiError, Result, response_to_error};
use crate::http_client::build_http_client;

/// OpenAI client
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    /// Create a new OpenAI client
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: build_http_client(),
            api_key: api_key.into(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set custom base URL (for API-compatible services)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn dispatch(&self, body: &serde_json::Value) -> Result<reqwest::Response> {
        tracing::debug!(model = %self.model, "Dispatching completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let error = response_to_error(response, "OpenAI").await;
            tracing::warn!(error = %error, "Upstream completion call failed");
            return Err(error);
        }

        Ok(response)
    }
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

fn to_wire_messages(request: &CompletionRequest) -> Vec<OpenAiMessage> {
    request
        .messages
        .iter()
        .map(|m| {
            let role = match m.role {
                ChatRole::System => "system",
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            }
            .to_string();

            OpenAiMessage {
                role,
                content: m.content.clone(),
            }
        })
        .collect()
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

// Streaming types

#[derive(Deserialize, Debug)]
struct OpenAiStreamResponse {
    choices: Vec<OpenAiStreamChoice>,
}

#[derive(Deserialize, Debug)]
struct OpenAiStreamChoice {
    delta: OpenAiStreamDelta,
}

#[derive(Deserialize, Debug)]
struct OpenAiStreamDelta {
    content: Option<String>,
}

/// Extract the content delta from one SSE `data:` payload, if any.
fn delta_content(data: &str) -> Option<String> {
    if data.trim() == "[DONE]" {
        return None;
    }

    let parsed: OpenAiStreamResponse = serde_json::from_str(data).ok()?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty())
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    fn provider(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": to_wire_messages(&request),
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        let response = self.dispatch(&body).await?;
        let data: OpenAiResponse = response.json().await?;

        data.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AiError::Llm("No response from OpenAI".to_string()))
    }

    async fn complete_stream(&self, request: CompletionRequest) -> Result<FragmentStream> {
        let body = json!({
            "model": self.model,
            "messages": to_wire_messages(&request),
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "stream": true,
        });

        // Send before constructing the stream so connection and credential
        // failures are reported ahead of the first fragment.
        let response = self.dispatch(&body).await?;
        let mut byte_stream = response.bytes_stream();

        Ok(Box::pin(async_stream::stream! {
            let mut buffer = String::new();

            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        yield Err(AiError::Llm(format!("Stream error: {}", e)));
                        return;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&chunk));

                // Process complete SSE events from buffer
                while let Some(pos) = buffer.find("\n\n") {
                    let event_str = buffer[..pos].to_string();
                    buffer = buffer[pos + 2..].to_string();

                    for line in event_str.lines() {
                        if let Some(data) = line.strip_prefix("data: ")
                            && let Some(content) = delta_content(data)
                        {
                            yield Ok(content);
                        }
                    }
                }
            }

            // Process any remaining data in the buffer after the stream ends.
            // This handles the case where the last SSE event lacks a trailing
            // \n\n (e.g., due to a network interruption).
            for line in buffer.lines() {
                if let Some(data) = line.strip_prefix("data: ")
                    && let Some(content) = delta_content(data)
                {
                    yield Ok(content);
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ChatMessage;

    #[test]
    fn test_delta_content_extracts_text() {
        let data = r#"{"choices":[{"delta":{"content":"Par"}}]}"#;
        assert_eq!(delta_content(data), Some("Par".to_string()));
    }

    #[test]
    fn test_delta_content_skips_done_sentinel() {
        assert_eq!(delta_content("[DONE]"), None);
        assert_eq!(delta_content(" [DONE]"), None);
    }

    #[test]
    fn test_delta_content_skips_empty_and_missing() {
        assert_eq!(delta_content(r#"{"choices":[{"delta":{"content":""}}]}"#), None);
        assert_eq!(delta_content(r#"{"choices":[{"delta":{}}]}"#), None);
        assert_eq!(delta_content("not json"), None);
    }

    #[test]
    fn test_wire_messages_use_canonical_roles() {
        let request = CompletionRequest::new(vec![
            ChatMessage::system("instructions"),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
        ]);
        let wire = to_wire_messages(&request);
        let roles: Vec<&str> = wire.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant"]);
    }

    #[test]
    fn test_builder_overrides() {
        let client = OpenAiClient::new("key")
            .with_model("gpt-4o")
            .with_base_url("http://localhost:9999/v1");
        assert_eq!(client.model(), "gpt-4o");
        assert_eq!(client.base_url, "http://localhost:9999/v1");
    }
}
