//! Completion client trait and message types

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Chat message role
///
/// The legacy "bot" label some callers still send for assistant turns is
/// accepted on input and always written back as "assistant".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    #[serde(alias = "bot")]
    Assistant,
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Create a new completion request
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set temperature
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}

/// Lazy, single-pass sequence of text fragments from a streamed completion.
///
/// Finite and not restartable: it ends when the upstream signals completion,
/// or yields a single `Err` item and stops if the stream breaks mid-flight.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Completion client trait
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Get provider name
    fn provider(&self) -> &str;

    /// Get model name
    fn model(&self) -> &str;

    /// Complete a chat request, returning the full assistant text at once
    async fn complete(&self, request: CompletionRequest) -> Result<String>;

    /// Complete a chat request with incremental fragment delivery.
    ///
    /// The upstream call happens eagerly: connection and authentication
    /// failures are reported as `Err` here, before any fragment exists.
    /// Failures after that point surface as `Err` items inside the stream.
    async fn complete_stream(&self, request: CompletionRequest) -> Result<FragmentStream>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        let json = serde_json::to_string(&ChatRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let role: ChatRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, ChatRole::User);
    }

    #[test]
    fn test_bot_alias_normalizes_to_assistant() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role":"bot","content":"hello"}"#).unwrap();
        assert_eq!(msg.role, ChatRole::Assistant);
        // Re-serialization uses the canonical label
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"assistant\""));
        assert!(!json.contains("\"bot\""));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result = serde_json::from_str::<ChatMessage>(r#"{"role":"robot","content":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_message_constructors() {
        assert_eq!(ChatMessage::system("s").role, ChatRole::System);
        assert_eq!(ChatMessage::user("u").role, ChatRole::User);
        assert_eq!(ChatMessage::assistant("a").role, ChatRole::Assistant);
    }

    #[test]
    fn test_history_parses_in_order() {
        let history: Vec<ChatMessage> = serde_json::from_str(
            r#"[{"role":"user","content":"first"},{"role":"bot","content":"second"}]"#,
        )
        .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "first");
        assert_eq!(history[1].role, ChatRole::Assistant);
    }
}
