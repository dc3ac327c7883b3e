//! Upstream completion API configuration.

use std::borrow::Cow;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Environment variable consulted when `[api] api_key` is not set in the file.
pub const API_KEY_ENV: &str = "EXPOUND_API_KEY";

const DEFAULT_BASE_URL: &str = "https://gen.pollinations.ai/v1";
const DEFAULT_MODEL: &str = "openai";

/// Upstream completion API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// The path where the explain endpoint is mounted.
    pub path: Cow<'static, str>,
    /// Base URL of the upstream chat completions API.
    pub base_url: Url,
    /// Model identifier sent upstream and stamped onto successful responses.
    pub model: String,
    /// API key for the upstream API. When absent, the `EXPOUND_API_KEY`
    /// environment variable is consulted at proxy startup.
    pub api_key: Option<SecretString>,
}

impl ApiConfig {
    /// Fill `api_key` from the execution environment when the configuration
    /// file did not set one.
    pub fn apply_env_api_key(&mut self) {
        if self.api_key.is_none() {
            self.api_key = std::env::var(API_KEY_ENV).ok().map(SecretString::from);
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            path: Cow::Borrowed("/api/explain"),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL must parse"),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}
