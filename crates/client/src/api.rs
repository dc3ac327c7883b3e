use std::time::Duration;

use async_trait::async_trait;
use explain::messages::ExplainPayload;
use serde_json::Value;
use url::Url;

use crate::error::ClientError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Model identifier assumed when the proxy did not stamp one.
const FALLBACK_MODEL: &str = "openai";

/// Result of a successful explanation request.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplanationResult {
    /// Markdown content of the first completion choice.
    pub content: String,
    /// Model identifier stamped by the proxy.
    pub model: String,
}

/// Transport used by the session to reach the explain endpoint.
#[async_trait]
pub trait ExplainBackend: Send + Sync {
    /// Send one payload and return the parsed result.
    async fn explain(&self, payload: ExplainPayload) -> crate::Result<ExplanationResult>;
}

/// HTTP implementation talking to the expound proxy.
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpBackend {
    /// Create a backend for the given explain endpoint URL.
    pub fn new(endpoint: Url) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Api(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl ExplainBackend for HttpBackend {
    async fn explain(&self, payload: ExplainPayload) -> crate::Result<ExplanationResult> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| ClientError::Api(format!("Failed to reach the explain endpoint: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<Value>().await {
                Ok(body) => body.get("error").and_then(Value::as_str).map(str::to_string),
                Err(_) => None,
            };

            return Err(ClientError::Api(
                message.unwrap_or_else(|| format!("API error: {}", status.as_u16())),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Api(format!("Invalid JSON from the explain endpoint: {e}")))?;

        parse_result(&body)
    }
}

/// Extract the first completion choice and the stamped model identifier.
fn parse_result(body: &Value) -> crate::Result<ExplanationResult> {
    let content = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| ClientError::Api("Malformed response: no completion choices".to_string()))?;

    let model = body
        .get("model_used")
        .and_then(Value::as_str)
        .unwrap_or(FALLBACK_MODEL);

    Ok(ExplanationResult {
        content: content.to_string(),
        model: model.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::parse_result;

    #[test]
    fn takes_the_first_choice_and_the_stamped_model() {
        let body = json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Light becomes sugar." } },
                { "message": { "role": "assistant", "content": "ignored" } }
            ],
            "model_used": "gpt-test"
        });

        let result = parse_result(&body).unwrap();
        assert_eq!("Light becomes sugar.", result.content);
        assert_eq!("gpt-test", result.model);
    }

    #[test]
    fn missing_model_stamp_falls_back() {
        let body = json!({
            "choices": [{ "message": { "content": "ok" } }]
        });

        assert_eq!("openai", parse_result(&body).unwrap().model);
    }

    #[test]
    fn missing_choices_are_an_error() {
        assert!(parse_result(&json!({})).is_err());
        assert!(parse_result(&json!({ "choices": [] })).is_err());
    }
}
