use std::time::Duration;

use config::ApiConfig;
use reqwest::{Client, header::AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use crate::{
    error::ExplainError,
    messages::{ExplainPayload, UpstreamRequest},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Credential-injecting client for the upstream chat completions API.
pub(crate) struct CompletionClient {
    client: Client,
    base_url: Url,
    model: String,
    api_key: Option<SecretString>,
}

impl CompletionClient {
    pub(crate) fn new(config: ApiConfig) -> crate::Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(|e| {
            log::error!("Failed to create HTTP client for the completion API: {e}");
            ExplainError::Internal
        })?;

        Ok(Self {
            client,
            base_url: config.base_url,
            model: config.model,
            api_key: config.api_key,
        })
    }

    /// Forward a validated payload upstream and relay the outcome.
    ///
    /// Success bodies are passed through unchanged apart from the
    /// `model_used` stamp. Error bodies are reduced to their `error.message`
    /// when present, or a generic status message otherwise.
    pub(crate) async fn explain(&self, payload: ExplainPayload) -> crate::Result<Value> {
        let Some(key) = self.api_key.as_ref() else {
            return Err(ExplainError::NotConfigured);
        };

        let url = format!(
            "{}/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        );

        let request = UpstreamRequest {
            model: self.model.clone(),
            messages: payload.messages,
            temperature: payload.temperature,
            max_tokens: payload.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", key.expose_secret()))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                ExplainError::Connection(format!("Failed to send request to the completion API: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("Completion API error ({status}): {error_text}");

            return Err(ExplainError::Upstream {
                status: status.as_u16(),
                message: extract_error_message(&error_text)
                    .unwrap_or_else(|| format!("API error: {}", status.as_u16())),
            });
        }

        let response_text = response.text().await.map_err(|e| {
            log::error!("Failed to read the completion API response body: {e}");
            ExplainError::Connection("Failed to read the completion API response".to_string())
        })?;

        let mut data: Value = serde_json::from_str(&response_text).map_err(|e| {
            log::error!("Failed to parse the completion API response: {e}");
            log::error!("Raw response that failed to parse: {response_text}");
            ExplainError::Connection("Invalid JSON from the completion API".to_string())
        })?;

        if let Some(object) = data.as_object_mut() {
            object.insert("model_used".to_string(), Value::String(self.model.clone()));
        }

        Ok(data)
    }
}

/// Best-effort extraction of `error.message` from an upstream error body.
/// Any other shape falls back to the generic status message.
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = value.get("error")?.get("message")?.as_str()?;

    Some(message.to_string())
}
