//! Olympia AI - Upstream completion client
//!
//! This crate provides:
//! - Chat message types shared with the relay server
//! - An OpenAI-compatible client with streamed (fragment-by-fragment) delivery
//! - A deterministic mock client for tests

mod client;
mod error;
mod http_client;
mod mock;
mod openai;

pub use client::{
    ChatMessage, ChatRole, CompletionClient, CompletionRequest, FragmentStream,
};
pub use error::{AiError, Result};
pub use mock::{MockBehavior, MockCompletionClient};
pub use openai::OpenAiClient;
