//! Deterministic mock completion client for relay and reliability tests.

use async_trait::async_trait;
use tokio::time::{Duration, sleep};

use crate::client::{
    ChatRole, CompletionClient, CompletionRequest, FragmentStream,
};
use crate::error::{AiError, Result};

/// Scripted behavior for the mock client.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Yield a fixed fragment list, in order.
    Fragments(Vec<String>),
    /// Yield the last user message back, one word per fragment.
    Echo,
    /// Fail before any fragment is produced (as a bad credential would).
    FailBeforeStream(String),
    /// Yield the given fragments, then fail mid-stream.
    FailMidStream {
        fragments: Vec<String>,
        error: String,
    },
}

/// A deterministic mock completion client driven by a scripted behavior.
#[derive(Debug, Clone)]
pub struct MockCompletionClient {
    model: String,
    behavior: MockBehavior,
    delay_ms: u64,
}

impl MockCompletionClient {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            model: "mock-model".to_string(),
            behavior,
            delay_ms: 0,
        }
    }

    pub fn fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(MockBehavior::Fragments(
            fragments.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockBehavior::FailBeforeStream(message.into()))
    }

    /// Sleep between fragments, to exercise interleaved delivery.
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    fn script_for(&self, request: &CompletionRequest) -> Result<Vec<Result<String>>> {
        match &self.behavior {
            MockBehavior::Fragments(fragments) => {
                Ok(fragments.iter().cloned().map(Ok).collect())
            }
            MockBehavior::Echo => {
                let last_user = request
                    .messages
                    .iter()
                    .rev()
                    .find(|m| m.role == ChatRole::User)
                    .map(|m| m.content.clone())
                    .unwrap_or_default();
                Ok(last_user
                    .split_whitespace()
                    .map(|word| Ok(format!("{} ", word)))
                    .collect())
            }
            MockBehavior::FailBeforeStream(message) => Err(AiError::Llm(message.clone())),
            MockBehavior::FailMidStream { fragments, error } => {
                let mut script: Vec<Result<String>> =
                    fragments.iter().cloned().map(Ok).collect();
                script.push(Err(AiError::Llm(error.clone())));
                Ok(script)
            }
        }
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let script = self.script_for(&request)?;
        let mut full = String::new();
        for item in script {
            full.push_str(&item?);
        }
        Ok(full)
    }

    async fn complete_stream(&self, request: CompletionRequest) -> Result<FragmentStream> {
        let script = self.script_for(&request)?;
        let delay_ms = self.delay_ms;

        Ok(Box::pin(async_stream::stream! {
            for item in script {
                if delay_ms > 0 {
                    sleep(Duration::from_millis(delay_ms)).await;
                }
                let failed = item.is_err();
                yield item;
                if failed {
                    return;
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ChatMessage;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_fragments_stream_in_order() {
        let client = MockCompletionClient::fragments(["Par", "is 20", "24"]);
        let request = CompletionRequest::new(vec![ChatMessage::user("host city?")]);

        let mut stream = client.complete_stream(request).await.unwrap();
        let mut assembled = String::new();
        while let Some(fragment) = stream.next().await {
            assembled.push_str(&fragment.unwrap());
        }
        assert_eq!(assembled, "Paris 2024");
    }

    #[tokio::test]
    async fn test_streamed_matches_non_streamed() {
        let client = MockCompletionClient::fragments(["a", "b", "c"]);
        let request = CompletionRequest::new(vec![ChatMessage::user("q")]);

        let full = client.complete(request.clone()).await.unwrap();
        let mut stream = client.complete_stream(request).await.unwrap();
        let mut assembled = String::new();
        while let Some(fragment) = stream.next().await {
            assembled.push_str(&fragment.unwrap());
        }
        assert_eq!(full, assembled);
    }

    #[tokio::test]
    async fn test_fail_before_stream() {
        let client = MockCompletionClient::failing("no api key");
        let request = CompletionRequest::new(vec![ChatMessage::user("q")]);
        assert!(client.complete_stream(request).await.is_err());
    }

    #[tokio::test]
    async fn test_mid_stream_failure_stops_stream() {
        let client = MockCompletionClient::new(MockBehavior::FailMidStream {
            fragments: vec!["partial".to_string()],
            error: "connection reset".to_string(),
        });
        let request = CompletionRequest::new(vec![ChatMessage::user("q")]);

        let mut stream = client.complete_stream(request).await.unwrap();
        assert_eq!(stream.next().await.unwrap().unwrap(), "partial");
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_echo_uses_last_user_message() {
        let client = MockCompletionClient::echo();
        let request = CompletionRequest::new(vec![
            ChatMessage::user("first question"),
            ChatMessage::assistant("first answer"),
            ChatMessage::user("second question"),
        ]);

        let full = client.complete(request).await.unwrap();
        assert_eq!(full, "second question ");
    }
}
