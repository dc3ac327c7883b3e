use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::level::ExplainLevel;

/// Maximum number of entries kept in the history log.
pub const HISTORY_LIMIT: usize = 10;

const INPUT_PREVIEW_LEN: usize = 200;
const EXPLANATION_PREVIEW_LEN: usize = 500;

/// One past explanation, as persisted in the history log.
///
/// The truncated copies are for list display; restoring always uses the full
/// copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Millisecond timestamp doubling as a stable identifier.
    pub id: i64,
    /// Truncated input for list display.
    pub input: String,
    /// Truncated explanation for list display.
    pub explanation: String,
    /// Full input, used when restoring.
    pub full_input: String,
    /// Full explanation, used when restoring.
    pub full_explanation: String,
    /// Model identifier reported by the proxy.
    pub model: String,
    /// Level the explanation was requested at.
    pub level: ExplainLevel,
    /// Elapsed wall-clock seconds, one decimal place.
    pub duration: String,
    /// When the explanation completed.
    pub timestamp: Timestamp,
}

impl HistoryEntry {
    pub(crate) fn new(
        input: &str,
        explanation: &str,
        model: &str,
        level: ExplainLevel,
        duration: &str,
        now: Timestamp,
    ) -> Self {
        Self {
            id: now.as_millisecond(),
            input: truncate(input, INPUT_PREVIEW_LEN),
            explanation: truncate(explanation, EXPLANATION_PREVIEW_LEN),
            full_input: input.to_string(),
            full_explanation: explanation.to_string(),
            model: model.to_string(),
            level,
            duration: duration.to_string(),
            timestamp: now,
        }
    }

    /// Whether the display copy of the input was cut short.
    pub fn input_truncated(&self) -> bool {
        self.full_input.chars().count() > INPUT_PREVIEW_LEN
    }
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Bounded, most-recent-first log of past explanations.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Prepend an entry, dropping the oldest past the limit.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_LIMIT);
    }

    /// Entry at the given position, most recent first.
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Entries in most-recent-first order.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::{HISTORY_LIMIT, History, HistoryEntry};
    use crate::level::ExplainLevel;

    fn entry(input: &str, seq: i64) -> HistoryEntry {
        HistoryEntry::new(
            input,
            "an explanation",
            "openai",
            ExplainLevel::Simple,
            "1.0",
            Timestamp::from_millisecond(seq).unwrap(),
        )
    }

    #[test]
    fn entries_are_most_recent_first() {
        let mut history = History::default();
        history.push(entry("first", 1));
        history.push(entry("second", 2));

        assert_eq!("second", history.get(0).unwrap().full_input);
        assert_eq!("first", history.get(1).unwrap().full_input);
    }

    #[test]
    fn length_never_exceeds_the_limit() {
        let mut history = History::default();

        for i in 0..25 {
            history.push(entry(&format!("input {i}"), i));
            assert!(history.len() <= HISTORY_LIMIT);
        }

        assert_eq!(HISTORY_LIMIT, history.len());
        assert_eq!("input 24", history.get(0).unwrap().full_input);
        assert_eq!("input 15", history.get(9).unwrap().full_input);
    }

    #[test]
    fn display_copies_are_truncated_and_full_copies_kept() {
        let long_input = "x".repeat(300);
        let entry = HistoryEntry::new(
            &long_input,
            &"y".repeat(800),
            "openai",
            ExplainLevel::Eli5,
            "2.4",
            Timestamp::from_millisecond(7).unwrap(),
        );

        assert_eq!(200, entry.input.chars().count());
        assert_eq!(500, entry.explanation.chars().count());
        assert_eq!(300, entry.full_input.chars().count());
        assert_eq!(800, entry.full_explanation.chars().count());
        assert!(entry.input_truncated());
    }

    #[test]
    fn persistence_round_trip_preserves_order_and_content() {
        let mut history = History::default();

        for i in 0..12 {
            history.push(entry(&format!("input {i}"), i));
        }

        let raw = serde_json::to_string(&history).unwrap();
        let restored: History = serde_json::from_str(&raw).unwrap();

        assert_eq!(history, restored);
    }
}
