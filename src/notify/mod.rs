//! Notification seam between the engine and the surrounding application
//!
//! The engine emits one event per newly persisted paper, one per run-state
//! transition, and one per failed cycle. A UI subscribes by implementing
//! [`Notifier`]; [`LogNotifier`] routes everything through tracing for the
//! CLI.

use crate::paper::Paper;
use crate::state::RunState;
use crate::FetchError;

/// Display summaries truncate titles beyond this many characters
pub const SUMMARY_MAX_CHARS: usize = 50;

/// Sink for engine events
pub trait Notifier: Send + Sync {
    /// One newly persisted paper; `summary` is the display-truncated title,
    /// the full title stays on the record
    fn paper_discovered(&self, paper: &Paper, summary: &str);

    /// Run-state transition
    fn status_changed(&self, state: RunState);

    /// A cycle ended in failure after exhausting retries
    fn cycle_failed(&self, error: &FetchError);
}

/// Builds the human-readable summary for a title
///
/// Truncation counts characters, not bytes, so multibyte titles cut
/// cleanly.
pub fn summarize_title(title: &str) -> String {
    if title.chars().count() > SUMMARY_MAX_CHARS {
        let mut summary: String = title.chars().take(SUMMARY_MAX_CHARS).collect();
        summary.push_str("...");
        summary
    } else {
        title.to_string()
    }
}

/// Notifier that reports through the tracing pipeline
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn paper_discovered(&self, paper: &Paper, summary: &str) {
        tracing::info!(
            "New paper: {} ({}, {})",
            summary,
            paper.authors.join(", "),
            paper.issue
        );
    }

    fn status_changed(&self, state: RunState) {
        tracing::info!("Monitor state: {}", state);
    }

    fn cycle_failed(&self, error: &FetchError) {
        tracing::error!("Fetch cycle failed: {}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_title_untruncated() {
        assert_eq!(summarize_title("短标题"), "短标题");
    }

    #[test]
    fn test_exact_limit_untruncated() {
        let title = "a".repeat(SUMMARY_MAX_CHARS);
        assert_eq!(summarize_title(&title), title);
    }

    #[test]
    fn test_long_title_truncated_with_ellipsis() {
        let title = "a".repeat(SUMMARY_MAX_CHARS + 1);
        let summary = summarize_title(&title);
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS + 3);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        // 60 CJK characters, 180 bytes; must cut at 50 characters
        let title = "究".repeat(60);
        let summary = summarize_title(&title);
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS + 3);
        assert!(summary.starts_with(&"究".repeat(SUMMARY_MAX_CHARS)));
    }
}
