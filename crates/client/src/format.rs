//! Display helpers for results and history listings.

use jiff::{Timestamp, tz::TimeZone};

/// Human-facing name for a model identifier.
pub fn model_display_name(model: &str) -> &str {
    if model == "openai" { "GPT-5 Mini" } else { model }
}

/// Compact relative age for history listings.
pub fn format_relative(timestamp: Timestamp, now: Timestamp) -> String {
    let secs = (now.as_second() - timestamp.as_second()).max(0);

    let mins = secs / 60;
    let hours = secs / 3600;
    let days = secs / 86400;

    if mins < 1 {
        "Just now".to_string()
    } else if mins < 60 {
        format!("{mins}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        let zoned = timestamp.to_zoned(TimeZone::system());
        format!("{} {}", zoned.strftime("%b"), zoned.day())
    }
}
