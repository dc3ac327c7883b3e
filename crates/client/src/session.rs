use std::time::Instant;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    api::ExplainBackend,
    error::ClientError,
    history::{History, HistoryEntry},
    level::ExplainLevel,
    request,
    store::{HISTORY_KEY, KvStore, LAST_REQUEST_KEY, THEME_KEY},
};

const FALLBACK_ERROR: &str = "Failed to get explanation. Please try again.";

/// Rendering capability: markdown source to displayable markup.
pub trait MarkdownRenderer {
    /// Render markdown for display.
    fn render(&self, markdown: &str) -> String;
}

/// Notification capability: short, non-blocking user-visible messages.
pub trait Notifier {
    /// Show a transient message to the user.
    fn notify(&self, message: &str);
}

/// The last attempted request, persisted for manual retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastRequest {
    /// Raw input text.
    pub input: String,
    /// Requested level.
    pub level: ExplainLevel,
}

/// A successfully rendered explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedExplanation {
    /// Markup produced by the injected renderer.
    pub rendered: String,
    /// Raw markdown, e.g. for clipboard copy.
    pub markdown: String,
    /// Model identifier.
    pub model: String,
    /// Elapsed seconds, one decimal place.
    pub duration: String,
}

/// A history entry replayed locally.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredEntry {
    /// The full, untruncated original input.
    pub input: String,
    /// The level the entry was requested at.
    pub level: ExplainLevel,
    /// The re-rendered stored explanation.
    pub explanation: RenderedExplanation,
}

/// Outcome of a submit call.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The explanation was rendered and recorded in the history.
    Completed(RenderedExplanation),
    /// Another request was already in flight; nothing happened.
    Busy,
    /// A local precondition failed; the user was notified and no network
    /// call was made.
    Rejected,
    /// The request itself failed; the user was notified.
    Failed,
}

/// Client-side request orchestrator.
///
/// Owns the in-flight guard, the history log and the injected capabilities.
/// There is no ambient state: everything the operations touch lives here.
pub struct ExplainSession<S> {
    backend: Box<dyn ExplainBackend>,
    renderer: Box<dyn MarkdownRenderer>,
    notifier: Box<dyn Notifier>,
    store: S,
    history: History,
    in_flight: bool,
}

impl<S: KvStore> ExplainSession<S> {
    /// Create a session, loading any persisted history from the store.
    pub fn new(
        backend: Box<dyn ExplainBackend>,
        renderer: Box<dyn MarkdownRenderer>,
        notifier: Box<dyn Notifier>,
        store: S,
    ) -> Self {
        let history = store
            .get(HISTORY_KEY)
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(history) => Some(history),
                Err(e) => {
                    log::warn!("Ignoring unreadable history log: {e}");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            backend,
            renderer,
            notifier,
            store,
            history,
            in_flight: false,
        }
    }

    /// Submit user text for explanation.
    ///
    /// A call while another request is in flight is a no-op. Local
    /// validation failures and request failures notify the user and leave
    /// the history untouched. The busy state is cleared on every exit path,
    /// success or failure.
    pub async fn submit(&mut self, user_text: &str, level: ExplainLevel) -> SubmitOutcome {
        if self.in_flight {
            return SubmitOutcome::Busy;
        }

        let payload = match request::build_payload(user_text, level) {
            Ok(payload) => payload,
            Err(e) => {
                self.notifier.notify(&e.to_string());
                return SubmitOutcome::Rejected;
            }
        };

        self.remember_last_request(user_text, level);

        self.in_flight = true;
        let started = Instant::now();
        let result = self.backend.explain(payload).await;
        self.in_flight = false;

        match result {
            Ok(result) => {
                let duration = format!("{:.1}", started.elapsed().as_secs_f64());
                let rendered = self.record_success(user_text.trim(), level, result.content, result.model, duration);

                SubmitOutcome::Completed(rendered)
            }
            Err(e) => {
                let message = match e {
                    ClientError::Api(message) if !message.is_empty() => message,
                    _ => FALLBACK_ERROR.to_string(),
                };

                self.notifier.notify(&message);
                SubmitOutcome::Failed
            }
        }
    }

    /// Re-invoke submit with the most recently attempted request.
    pub async fn retry(&mut self) -> SubmitOutcome {
        let Some(last) = self.last_request() else {
            self.notifier.notify("Nothing to retry yet");
            return SubmitOutcome::Rejected;
        };

        self.submit(&last.input, last.level).await
    }

    /// Pure local replay of a stored entry: the full input and level plus
    /// the re-rendered stored explanation. No network call is made.
    pub fn restore_from_history(&self, index: usize) -> Option<RestoredEntry> {
        let entry = self.history.get(index)?;

        Some(RestoredEntry {
            input: entry.full_input.clone(),
            level: entry.level,
            explanation: RenderedExplanation {
                rendered: self.renderer.render(&entry.full_explanation),
                markdown: entry.full_explanation.clone(),
                model: entry.model.clone(),
                duration: entry.duration.clone(),
            },
        })
    }

    /// Clear the history log. `confirm` gates the action; returns whether
    /// anything was cleared.
    pub fn clear_history(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            return false;
        }

        self.history.clear();
        self.store.remove(HISTORY_KEY);
        self.notifier.notify("History cleared");

        true
    }

    /// Read-only view of the history log.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Whether a request is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// The most recently attempted request, if any.
    pub fn last_request(&self) -> Option<LastRequest> {
        let raw = self.store.get(LAST_REQUEST_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    /// Persisted theme preference.
    pub fn theme(&self) -> Option<String> {
        self.store.get(THEME_KEY)
    }

    /// Persist a new theme preference.
    pub fn set_theme(&mut self, theme: &str) {
        self.store.set(THEME_KEY, theme);
    }

    fn record_success(
        &mut self,
        input: &str,
        level: ExplainLevel,
        content: String,
        model: String,
        duration: String,
    ) -> RenderedExplanation {
        let rendered = self.renderer.render(&content);

        let entry = HistoryEntry::new(input, &content, &model, level, &duration, Timestamp::now());
        self.history.push(entry);
        self.persist_history();

        RenderedExplanation {
            rendered,
            markdown: content,
            model,
            duration,
        }
    }

    fn persist_history(&mut self) {
        match serde_json::to_string(&self.history) {
            Ok(raw) => self.store.set(HISTORY_KEY, &raw),
            Err(e) => log::warn!("Failed to serialize the history log: {e}"),
        }
    }

    fn remember_last_request(&mut self, input: &str, level: ExplainLevel) {
        let last = LastRequest {
            input: input.to_string(),
            level,
        };

        match serde_json::to_string(&last) {
            Ok(raw) => self.store.set(LAST_REQUEST_KEY, &raw),
            Err(e) => log::warn!("Failed to persist the last request: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use explain::messages::{ExplainPayload, MessageRole};

    use super::{ExplainSession, MarkdownRenderer, Notifier, SubmitOutcome};
    use crate::{
        api::{ExplainBackend, ExplanationResult},
        error::ClientError,
        level::ExplainLevel,
        store::{HISTORY_KEY, KvStore, MemoryStore},
    };

    #[derive(Clone, Default)]
    struct FakeBackend {
        calls: Arc<AtomicUsize>,
        payloads: Arc<Mutex<Vec<ExplainPayload>>>,
        error: Option<String>,
    }

    impl FakeBackend {
        fn failing(message: &str) -> Self {
            Self {
                error: Some(message.to_string()),
                ..Self::default()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExplainBackend for FakeBackend {
        async fn explain(&self, payload: ExplainPayload) -> crate::Result<ExplanationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.payloads.lock().unwrap().push(payload);

            match &self.error {
                Some(message) => Err(ClientError::Api(message.clone())),
                None => Ok(ExplanationResult {
                    content: "**Light** becomes sugar.".to_string(),
                    model: "openai".to_string(),
                }),
            }
        }
    }

    /// Renderer that wraps the source so tests can tell raw from rendered.
    struct FakeRenderer;

    impl MarkdownRenderer for FakeRenderer {
        fn render(&self, markdown: &str) -> String {
            format!("<{markdown}>")
        }
    }

    #[derive(Clone, Default)]
    struct FakeNotifier {
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl FakeNotifier {
        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Notifier for FakeNotifier {
        fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn session(backend: FakeBackend, notifier: FakeNotifier) -> ExplainSession<MemoryStore> {
        ExplainSession::new(
            Box::new(backend),
            Box::new(FakeRenderer),
            Box::new(notifier),
            MemoryStore::default(),
        )
    }

    #[tokio::test]
    async fn successful_submit_renders_and_records_history() {
        let backend = FakeBackend::default();
        let notifier = FakeNotifier::default();
        let mut session = session(backend.clone(), notifier.clone());

        let outcome = session.submit("photosynthesis", ExplainLevel::Simple).await;

        let SubmitOutcome::Completed(explanation) = outcome else {
            unreachable!("expected a completed outcome");
        };

        assert_eq!("<**Light** becomes sugar.>", explanation.rendered);
        assert_eq!("**Light** becomes sugar.", explanation.markdown);
        assert_eq!("openai", explanation.model);

        assert_eq!(1, session.history().len());
        let entry = session.history().get(0).unwrap();
        assert_eq!("photosynthesis", entry.full_input);
        assert_eq!("**Light** becomes sugar.", entry.full_explanation);
        assert_eq!(ExplainLevel::Simple, entry.level);

        assert!(!session.is_busy());
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn submitted_payload_carries_the_level_instruction() {
        let backend = FakeBackend::default();
        let mut session = session(backend.clone(), FakeNotifier::default());

        session.submit("photosynthesis", ExplainLevel::Simple).await;

        let payloads = backend.payloads.lock().unwrap();
        let payload = &payloads[0];

        assert_eq!(MessageRole::System, payload.messages[0].role);
        assert_eq!(ExplainLevel::Simple.instruction(), payload.messages[0].content);
        assert_eq!(
            "Please explain this:\n\nphotosynthesis",
            payload.messages[1].content
        );
    }

    #[tokio::test]
    async fn empty_input_makes_no_network_call() {
        let backend = FakeBackend::default();
        let notifier = FakeNotifier::default();
        let mut session = session(backend.clone(), notifier.clone());

        let outcome = session.submit("   \n", ExplainLevel::Simple).await;

        assert_eq!(SubmitOutcome::Rejected, outcome);
        assert_eq!(0, backend.call_count());
        assert_eq!(1, notifier.messages().len());
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn over_length_input_makes_no_network_call() {
        let backend = FakeBackend::default();
        let notifier = FakeNotifier::default();
        let mut session = session(backend.clone(), notifier.clone());

        let text = "a".repeat(5001);
        let outcome = session.submit(&text, ExplainLevel::Simple).await;

        assert_eq!(SubmitOutcome::Rejected, outcome);
        assert_eq!(0, backend.call_count());
        assert_eq!(
            vec!["Input exceeds maximum length of 5000 characters".to_string()],
            notifier.messages()
        );
    }

    #[tokio::test]
    async fn submit_while_in_flight_is_a_no_op() {
        let backend = FakeBackend::default();
        let mut session = session(backend.clone(), FakeNotifier::default());

        session.in_flight = true;
        let outcome = session.submit("gravity", ExplainLevel::Simple).await;

        assert_eq!(SubmitOutcome::Busy, outcome);
        assert_eq!(0, backend.call_count());
    }

    #[tokio::test]
    async fn failures_notify_and_leave_history_untouched() {
        let backend = FakeBackend::failing("Rate limit exceeded, slow down");
        let notifier = FakeNotifier::default();
        let mut session = session(backend.clone(), notifier.clone());

        let outcome = session.submit("gravity", ExplainLevel::Detailed).await;

        assert_eq!(SubmitOutcome::Failed, outcome);
        assert!(session.history().is_empty());
        assert!(!session.is_busy());
        assert_eq!(vec!["Rate limit exceeded, slow down".to_string()], notifier.messages());
    }

    #[tokio::test]
    async fn blank_failure_messages_fall_back_to_the_generic_one() {
        let backend = FakeBackend::failing("");
        let notifier = FakeNotifier::default();
        let mut session = session(backend, notifier.clone());

        session.submit("gravity", ExplainLevel::Simple).await;

        assert_eq!(
            vec!["Failed to get explanation. Please try again.".to_string()],
            notifier.messages()
        );
    }

    #[tokio::test]
    async fn retry_re_invokes_submit_with_the_last_request() {
        let backend = FakeBackend::failing("boom");
        let notifier = FakeNotifier::default();
        let mut session = session(backend.clone(), notifier.clone());

        session.submit("gravity", ExplainLevel::Eli5).await;
        assert_eq!(1, backend.call_count());

        session.retry().await;
        assert_eq!(2, backend.call_count());

        let payloads = backend.payloads.lock().unwrap();
        assert_eq!(payloads[0], payloads[1]);
        assert_eq!(ExplainLevel::Eli5.instruction(), payloads[1].messages[0].content);
    }

    #[tokio::test]
    async fn retry_without_a_prior_request_is_rejected() {
        let backend = FakeBackend::default();
        let notifier = FakeNotifier::default();
        let mut session = session(backend.clone(), notifier.clone());

        let outcome = session.retry().await;

        assert_eq!(SubmitOutcome::Rejected, outcome);
        assert_eq!(0, backend.call_count());
    }

    #[tokio::test]
    async fn restore_replays_the_full_copies_without_a_network_call() {
        let backend = FakeBackend::default();
        let mut session = session(backend.clone(), FakeNotifier::default());

        let long_input = "x".repeat(300);
        session.submit(&long_input, ExplainLevel::Detailed).await;
        assert_eq!(1, backend.call_count());

        let restored = session.restore_from_history(0).unwrap();

        assert_eq!(long_input, restored.input);
        assert_eq!(ExplainLevel::Detailed, restored.level);
        assert_eq!("<**Light** becomes sugar.>", restored.explanation.rendered);
        assert_eq!("**Light** becomes sugar.", restored.explanation.markdown);

        assert_eq!(1, backend.call_count());
        assert!(session.restore_from_history(1).is_none());
    }

    #[tokio::test]
    async fn history_survives_a_session_restart() {
        let backend = FakeBackend::default();

        let mut store = MemoryStore::default();
        {
            let mut session = ExplainSession::new(
                Box::new(backend.clone()),
                Box::new(FakeRenderer),
                Box::new(FakeNotifier::default()),
                MemoryStore::default(),
            );

            session.submit("gravity", ExplainLevel::Simple).await;
            session.submit("photosynthesis", ExplainLevel::Eli5).await;

            store.set(HISTORY_KEY, &session.store.get(HISTORY_KEY).unwrap());
        }

        let session = ExplainSession::new(
            Box::new(backend),
            Box::new(FakeRenderer),
            Box::new(FakeNotifier::default()),
            store,
        );

        assert_eq!(2, session.history().len());
        assert_eq!("photosynthesis", session.history().get(0).unwrap().full_input);
        assert_eq!("gravity", session.history().get(1).unwrap().full_input);
    }

    #[tokio::test]
    async fn clear_history_requires_confirmation() {
        let backend = FakeBackend::default();
        let notifier = FakeNotifier::default();
        let mut session = session(backend, notifier.clone());

        session.submit("gravity", ExplainLevel::Simple).await;

        assert!(!session.clear_history(|| false));
        assert_eq!(1, session.history().len());

        assert!(session.clear_history(|| true));
        assert!(session.history().is_empty());
        assert_eq!(None, session.store.get(HISTORY_KEY));
    }

    #[tokio::test]
    async fn theme_round_trips_through_the_store() {
        let mut session = session(FakeBackend::default(), FakeNotifier::default());

        assert_eq!(None, session.theme());
        session.set_theme("light");
        assert_eq!(Some("light".to_string()), session.theme());
    }
}
