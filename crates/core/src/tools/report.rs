//! # Run Report
//!
//! Renders a run snapshot as a Markdown document, suitable as a README
//! body for the generated project.

use std::fmt::Write;

use crate::state::{ConceptSource, RunSnapshot};

/// Markdown summary: concept, vision, KPIs, task table, usage and every
/// task's output.
pub fn render_markdown_report(snapshot: &RunSnapshot) -> String {
    let mut out = String::new();

    let title = snapshot
        .concept
        .as_ref()
        .map(|c| c.project_name.as_str())
        .unwrap_or("Untitled run");
    let _ = writeln!(out, "# {}\n", title);
    let _ = writeln!(
        out,
        "Run `{}` started {} (stage: `{:?}`)\n",
        snapshot.run_id,
        snapshot.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        snapshot.stage
    );

    if let Some(concept) = &snapshot.concept {
        let _ = writeln!(out, "## Concept\n");
        let _ = writeln!(out, "- **Trend:** {}", concept.trend);
        let _ = writeln!(out, "- **Sector:** {}", concept.sector);
        let _ = writeln!(out, "- **Opportunity:** {}", concept.opportunity);
        if snapshot.concept_source == Some(ConceptSource::Fallback) {
            let _ = writeln!(out, "- _Fallback concept (trend scan unavailable)_");
        }
        out.push('\n');
    }

    if let Some(decision) = &snapshot.decision {
        let _ = writeln!(out, "## Vision\n\n{}\n", decision.vision);
        if !decision.kpis.is_empty() {
            let _ = writeln!(out, "### KPIs\n");
            for kpi in &decision.kpis {
                let _ = writeln!(out, "- {}", kpi);
            }
            out.push('\n');
        }
    }

    if !snapshot.tasks.is_empty() {
        let _ = writeln!(out, "## Tasks\n");
        let _ = writeln!(out, "| # | Task | Agent | Status | Start | Duration |");
        let _ = writeln!(out, "|---|------|-------|--------|-------|----------|");
        for (i, task) in snapshot.tasks.iter().enumerate() {
            let _ = writeln!(
                out,
                "| {} | {} | `{}` | {} | {} | {} |",
                i + 1,
                task.title.replace('|', "\\|"),
                task.assigned_agent_id,
                task.status.as_str(),
                task.start_offset,
                task.duration
            );
        }
        out.push('\n');
    }

    let _ = writeln!(out, "## Usage\n");
    let _ = writeln!(out, "- Units: {}", snapshot.usage.units);
    let _ = writeln!(out, "- Estimated cost: ${:.6}\n", snapshot.usage.cost);

    if let Some(failure) = &snapshot.failure {
        let _ = writeln!(out, "## Failure\n\n{}\n", failure);
    }

    let outputs: Vec<_> = snapshot
        .tasks
        .iter()
        .filter_map(|t| t.output.as_deref().map(|o| (t, o)))
        .collect();
    if !outputs.is_empty() {
        let _ = writeln!(out, "## Deliverables\n");
        for (task, output) in outputs {
            let _ = writeln!(
                out,
                "### {} ({})\n\n{}\n",
                task.title, task.assigned_agent_id, output
            );
        }
    }

    out
}
