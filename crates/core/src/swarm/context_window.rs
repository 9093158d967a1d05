//! # Context Window
//!
//! Bounded summary of prior completed work, forwarded into the next
//! generation request.

use crate::state::{Task, TaskStatus};

/// Characters of each prior output carried forward
pub const DEFAULT_EXCERPT_CHARS: usize = 1500;

/// Marker used when no prior work qualifies
pub const NO_PRIOR_WORK: &str = "No previous work. You are starting fresh.";

/// Labeled excerpts of every completed task with output, in the given
/// (completion) order.
pub fn build(completed: &[&Task], excerpt_chars: usize) -> String {
    let sections: Vec<String> = completed
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .filter_map(|t| t.output.as_deref().map(|out| (t, out)))
        .map(|(t, out)| {
            let (excerpt, truncated) = truncate_chars(out, excerpt_chars);
            let ellipsis = if truncated { "..." } else { "" };
            format!(
                "--- OUTPUT FROM {} ({}) ---\n{}{}\n",
                t.assigned_agent_id, t.title, excerpt, ellipsis
            )
        })
        .collect();

    if sections.is_empty() {
        NO_PRIOR_WORK.to_string()
    } else {
        sections.join("\n")
    }
}

/// First `max` characters of `text`, split on a char boundary
pub(crate) fn truncate_chars(text: &str, max: usize) -> (&str, bool) {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn done(id: &str, agent: &str, title: &str, output: &str) -> Task {
        let mut t = Task::new(id, title, agent, 2, 0);
        t.start().unwrap();
        t.complete(output.to_string()).unwrap();
        t
    }

    #[test]
    fn test_empty_input_marker() {
        assert_eq!(build(&[], DEFAULT_EXCERPT_CHARS), NO_PRIOR_WORK);
    }

    #[test]
    fn test_labels_and_order() {
        let a = done("1", "arch-01", "Architecture", "stack: rust");
        let b = done("2", "db-arch", "Schema", "CREATE TABLE t;");
        let window = build(&[&b, &a], DEFAULT_EXCERPT_CHARS);

        let schema_at = window.find("--- OUTPUT FROM db-arch (Schema) ---").unwrap();
        let arch_at = window.find("--- OUTPUT FROM arch-01 (Architecture) ---").unwrap();
        assert!(schema_at < arch_at);
        assert!(window.contains("stack: rust"));
        assert!(!window.contains("..."));
    }

    #[test]
    fn test_excludes_failed_and_pending() {
        let ok = done("1", "doc-01", "Docs", "readme");
        let pending = Task::new("2", "Later", "builder-fe", 2, 2);
        let mut failed = Task::new("3", "Broken", "builder-be", 2, 4);
        failed.start().unwrap();
        failed.fail("Error: timeout".to_string()).unwrap();

        let window = build(&[&ok, &pending, &failed], DEFAULT_EXCERPT_CHARS);
        assert!(window.contains("(Docs)"));
        assert!(!window.contains("Later"));
        assert!(!window.contains("timeout"));
    }

    #[test]
    fn test_body_truncated_to_limit() {
        let long = "é".repeat(2000);
        let t = done("1", "builder-fe", "UI", &long);
        let window = build(&[&t], DEFAULT_EXCERPT_CHARS);

        let body = window.lines().nth(1).unwrap();
        let body = body.trim_end_matches("...");
        assert_eq!(body.chars().count(), DEFAULT_EXCERPT_CHARS);
    }

    #[test]
    fn test_truncate_chars_short_input() {
        assert_eq!(truncate_chars("abc", 10), ("abc", false));
        assert_eq!(truncate_chars("abcdef", 3), ("abc", true));
    }
}
