use thiserror::Error;

/// Errors surfaced by the client pipeline.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input failed a local precondition; no network call was made.
    #[error("{0}")]
    InvalidInput(String),

    /// The explain endpoint (or the transport to it) failed.
    #[error("{0}")]
    Api(String),
}
