//! Wire types shared by the explain endpoint and its clients.

use serde::{Deserialize, Serialize};

/// Default sampling temperature forwarded upstream.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default completion token budget forwarded upstream.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions defining how the model should answer.
    System,
    /// Content supplied by the end user.
    User,
    /// Content produced by the model.
    Assistant,
}

/// Chat message in the OpenAI wire format.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChatMessage {
    /// Who the message is from.
    pub role: MessageRole,
    /// Message text.
    pub content: String,
}

/// Inbound explain payload: the ordered messages plus tuning knobs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExplainPayload {
    /// Ordered chat messages, typically a system instruction followed by the
    /// wrapped user input.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Completion token budget.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

/// Body forwarded to the upstream chat completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UpstreamRequest {
    pub(crate) model: String,
    pub(crate) messages: Vec<ChatMessage>,
    pub(crate) temperature: f64,
    pub(crate) max_tokens: u32,
}
