//! Terminal implementations of the session's injected capabilities.

use client::{KvStore, MarkdownRenderer, Notifier, THEME_KEY};
use colored::Colorize;
use copypasta::{ClipboardContext, ClipboardProvider};
use termimad::MadSkin;

/// Markdown renderer backed by termimad, skinned by the persisted theme.
pub(crate) struct TermRenderer {
    skin: MadSkin,
}

impl TermRenderer {
    /// Pick the skin from the theme stored under the fixed theme key.
    pub(crate) fn from_store(store: &impl KvStore) -> Self {
        let skin = match store.get(THEME_KEY).as_deref() {
            Some("light") => MadSkin::default_light(),
            _ => MadSkin::default_dark(),
        };

        Self { skin }
    }
}

impl MarkdownRenderer for TermRenderer {
    fn render(&self, markdown: &str) -> String {
        self.skin.term_text(markdown).to_string()
    }
}

/// Notifier writing transient messages to stderr.
pub(crate) struct TermNotifier;

impl Notifier for TermNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{}", message.yellow());
    }
}

/// Interactive yes/no gate for destructive actions.
pub(crate) fn confirm(prompt: &str) -> bool {
    dialoguer::Confirm::with_theme(&dialoguer::theme::ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or(false)
}

pub(crate) fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let mut context = ClipboardContext::new().map_err(|e| e.to_string())?;
    context.set_contents(text.to_string()).map_err(|e| e.to_string())
}
