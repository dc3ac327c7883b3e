//! The explain endpoint: a stateless proxy between clients and the upstream
//! chat completions API.
//!
//! The endpoint validates the inbound payload, attaches the server-side
//! credential and forwards the request upstream. Upstream responses are
//! relayed as-is apart from the `model_used` stamp; upstream failures are
//! normalized into the `{"error": "..."}` contract.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use config::{ApiConfig, CorsConfig};
use serde_json::Value;

mod cors;
mod error;
pub mod messages;
mod upstream;

use cors::CorsPolicy;
pub use error::ExplainError;
use messages::ExplainPayload;
use upstream::CompletionClient;

pub(crate) type Result<T> = std::result::Result<T, ExplainError>;

struct ProxyState {
    upstream: CompletionClient,
    cors: CorsPolicy,
}

/// Creates an axum router for the explain endpoint.
pub fn router(api: ApiConfig, cors: CorsConfig) -> anyhow::Result<Router> {
    let path = api.path.to_string();

    let state = Arc::new(ProxyState {
        upstream: CompletionClient::new(api)?,
        cors: CorsPolicy::new(cors),
    });

    Ok(Router::new()
        .route(&path, post(explain).options(preflight))
        .with_state(state))
}

/// Handle explain requests.
///
/// The body must be JSON with a `messages` array of chat messages; anything
/// else is rejected before an upstream call is attempted.
async fn explain(
    State(state): State<Arc<ProxyState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let payload = parse_payload(&body)?;

    log::debug!("Forwarding {} messages upstream", payload.messages.len());

    let data = state.upstream.explain(payload).await?;

    let mut response = Json(data).into_response();

    if let Some(origin) = state.cors.allow_origin(headers.get(header::ORIGIN)) {
        response.headers_mut().insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }

    Ok(response)
}

/// Answer cross-origin preflight probes, independently of the main handler.
async fn preflight(State(state): State<Arc<ProxyState>>, headers: HeaderMap) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let response_headers = response.headers_mut();

    if let Some(origin) = state.cors.allow_origin(headers.get(header::ORIGIN)) {
        response_headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }

    response_headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    response_headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );

    response
}

fn parse_payload(body: &[u8]) -> Result<ExplainPayload> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        log::debug!("Rejecting non-JSON request body: {e}");
        ExplainError::InvalidRequest("request body must be valid JSON".to_string())
    })?;

    if !value.get("messages").is_some_and(Value::is_array) {
        return Err(ExplainError::InvalidRequest("messages array required".to_string()));
    }

    serde_json::from_value(value).map_err(|e| ExplainError::InvalidRequest(e.to_string()))
}
