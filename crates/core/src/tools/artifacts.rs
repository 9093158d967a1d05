//! # Artifact Extraction
//!
//! Agents return files as a `### name` heading followed by a fenced code
//! block. This module recovers those files from raw task output.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::state::{Task, TaskStatus};

const ARTIFACT_PATTERN: &str =
    r"###\s+([a-zA-Z0-9_./-]+)(?:\r?\n)+```([a-zA-Z0-9]*)\r?\n([\s\S]*?)\r?\n```";

/// Language tag used when the fence has none
pub const DEFAULT_LANGUAGE: &str = "text";

/// A file produced by an agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactFile {
    /// File name as written in the heading, may contain `/`
    pub name: String,
    pub language: String,
    pub content: String,
    /// Roster id of the producing agent
    pub agent: String,
}

fn pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(ARTIFACT_PATTERN).ok()).as_ref()
}

/// Every file block in `output`, in order of appearance
pub fn extract_artifacts(output: &str, agent_id: &str) -> Vec<ArtifactFile> {
    let Some(re) = pattern() else {
        return Vec::new();
    };

    re.captures_iter(output)
        .map(|caps| {
            let language = caps
                .get(2)
                .map(|m| m.as_str())
                .filter(|lang| !lang.is_empty())
                .unwrap_or(DEFAULT_LANGUAGE);
            ArtifactFile {
                name: caps[1].to_string(),
                language: language.to_string(),
                content: caps[3].to_string(),
                agent: agent_id.to_string(),
            }
        })
        .collect()
}

/// Files from every completed task, in task order. Failed outputs are
/// error messages and are never scanned.
pub fn collect_artifacts(tasks: &[Task]) -> Vec<ArtifactFile> {
    tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .filter_map(|t| {
            t.output
                .as_deref()
                .map(|out| extract_artifacts(out, &t.assigned_agent_id))
        })
        .flatten()
        .collect()
}
