//! Client-side request orchestration for the expound explain endpoint.
//!
//! Everything in this crate is UI-agnostic: rendering, notifications,
//! persistence and the network transport are injected capabilities, so the
//! orchestration logic can be exercised without a terminal or a running
//! server.

mod api;
mod error;
mod format;
mod history;
mod level;
mod request;
mod session;
mod store;

pub use api::{ExplainBackend, ExplanationResult, HttpBackend};
pub use error::ClientError;
pub use format::{format_relative, model_display_name};
pub use history::{HISTORY_LIMIT, History, HistoryEntry};
pub use level::ExplainLevel;
pub use request::{MAX_INPUT_LENGTH, build_payload};
pub use session::{
    ExplainSession, LastRequest, MarkdownRenderer, Notifier, RenderedExplanation, RestoredEntry,
    SubmitOutcome,
};
pub use store::{HISTORY_KEY, JsonFileStore, KvStore, LAST_REQUEST_KEY, MemoryStore, THEME_KEY};

pub(crate) type Result<T> = std::result::Result<T, ClientError>;
