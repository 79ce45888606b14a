//! Formatting utilities for terminal output

/// Format an evaluation status as its board emoji.
#[must_use]
pub fn status_emoji(status: Option<&str>) -> char {
    match status {
        Some("correct") => '🟩',
        Some("present") => '🟨',
        _ => '⬜',
    }
}

/// Format an announced checked state as a checkbox glyph.
#[must_use]
pub fn checked_glyph(state: Option<&str>) -> &'static str {
    if state == Some("true") { "[x]" } else { "[ ]" }
}

/// Quote an utterance the way a screen-reader log would.
#[must_use]
pub fn utterance(text: &str) -> String {
    format!("“{text}”")
}
