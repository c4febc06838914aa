//! Chat-completion wire payloads and the client that sends them.

use serde::{Deserialize, Serialize};

use crate::core::message::Message;

pub mod completion;

pub use completion::{CompletionClient, CompletionError, OpenAiClient};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
}

#[derive(Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ChatResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message as returned by the endpoint, before validation.
#[derive(Deserialize)]
pub struct ChatResponseMessage {
    pub role: String,
    pub content: Option<String>,
}
