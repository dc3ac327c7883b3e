use explain::messages::{
    ChatMessage, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, ExplainPayload, MessageRole,
};

use crate::{error::ClientError, level::ExplainLevel};

/// Maximum accepted input length, matching the documented endpoint bound.
pub const MAX_INPUT_LENGTH: usize = 5000;

/// Validate user input and build the proxy payload for it.
///
/// The payload is always a system instruction for the level followed by the
/// wrapped user input. Validation failures mean no network call is made.
pub fn build_payload(user_text: &str, level: ExplainLevel) -> crate::Result<ExplainPayload> {
    let trimmed = user_text.trim();

    if trimmed.is_empty() {
        return Err(ClientError::InvalidInput(
            "Nothing to explain: the input is empty".to_string(),
        ));
    }

    if trimmed.chars().count() > MAX_INPUT_LENGTH {
        return Err(ClientError::InvalidInput(format!(
            "Input exceeds maximum length of {MAX_INPUT_LENGTH} characters"
        )));
    }

    let messages = vec![
        ChatMessage {
            role: MessageRole::System,
            content: level.instruction().to_string(),
        },
        ChatMessage {
            role: MessageRole::User,
            content: format!("Please explain this:\n\n{trimmed}"),
        },
    ];

    Ok(ExplainPayload {
        messages,
        temperature: DEFAULT_TEMPERATURE,
        max_tokens: DEFAULT_MAX_TOKENS,
    })
}
