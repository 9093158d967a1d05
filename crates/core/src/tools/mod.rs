//! # Run Tools
//!
//! Deterministic post-processing over run state. Nothing here touches the
//! pipeline; presentation layers call these on a snapshot.
//!
//! ## Modules
//!
//! - `artifacts` - Pull `### filename` + fenced block files out of task output
//! - `report` - Markdown summary of a run

pub mod artifacts;
pub mod report;

pub use artifacts::{collect_artifacts, extract_artifacts, ArtifactFile};
pub use report::render_markdown_report;
