//! Open-task classification and the rendered triage summary.

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

use vellum_core::{extract_tasks, Result, StatusIndex, Task};
use vellum_vault::{paths, Vault};

const BACKLOG_HEADING: &str = "## Backlog (Optional)";

/// The triage result: four mutually exclusive buckets plus the
/// overlapping stale list.
#[derive(Debug, Clone, Serialize)]
pub struct TriageSummary {
    pub blockers: Vec<Task>,
    pub needs_design: Vec<Task>,
    pub needs_testing: Vec<Task>,
    pub other: Vec<Task>,
    pub stale: Vec<Task>,
    pub generated_at: String,
}

/// Run triage over the plan and backlog documents and overwrite the
/// summary at its destination.
///
/// Input order is fixed: unfinished masterplan tasks first, then
/// unfinished tasks from the backlog document's `## Backlog (Optional)`
/// subsection. Classification is tested per task in fixed priority
/// order; the first matching tag wins and the buckets never overlap.
/// Staleness is evaluated independently and may overlap every bucket.
pub fn run_triage(vault: &Vault, now: DateTime<Local>) -> Result<TriageSummary> {
    let masterplan = vault.read(paths::MASTERPLAN)?.unwrap_or_default();
    let backlog = vault.read(paths::BACKLOG)?.unwrap_or_default();
    let progress = vault.read(paths::PROGRESS)?.unwrap_or_default();

    let mut open: Vec<Task> = extract_tasks(&masterplan)
        .into_iter()
        .filter(|t| !t.done)
        .collect();
    open.extend(
        extract_tasks(&backlog_section(&backlog))
            .into_iter()
            .filter(|t| !t.done),
    );

    let index = StatusIndex::from_progress(&progress);
    let today = now.date_naive();

    let mut summary = TriageSummary {
        blockers: Vec::new(),
        needs_design: Vec::new(),
        needs_testing: Vec::new(),
        other: Vec::new(),
        stale: Vec::new(),
        generated_at: now.format("%Y-%m-%d %H:%M").to_string(),
    };

    for task in open {
        if index.is_stale(&task.id, today) {
            summary.stale.push(task.clone());
        }
        if task.has_tag("#blocker") {
            summary.blockers.push(task);
        } else if task.has_tag("#needs-design") {
            summary.needs_design.push(task);
        } else if task.has_tag("#needs-testing") {
            summary.needs_testing.push(task);
        } else {
            summary.other.push(task);
        }
    }

    info!(
        blockers = summary.blockers.len(),
        stale = summary.stale.len(),
        "triage complete"
    );

    vault.write(paths::TRIAGE, &render_summary(&summary))?;
    Ok(summary)
}

/// The lines of the `## Backlog (Optional)` subsection, ending at the
/// next level-2 heading or end-of-text. Level 2 specifically: deeper
/// headings inside the backlog stay part of it.
fn backlog_section(text: &str) -> String {
    let mut collected = Vec::new();
    let mut inside = false;
    for line in text.lines() {
        if line.trim().eq_ignore_ascii_case(BACKLOG_HEADING) {
            inside = true;
            continue;
        }
        if inside {
            if line.starts_with("## ") {
                break;
            }
            collected.push(line);
        }
    }
    collected.join("\n")
}

fn push_section(lines: &mut Vec<String>, title: &str, tasks: &[Task]) {
    lines.push(format!("## {title}"));
    if tasks.is_empty() {
        lines.push("- None".to_string());
    } else {
        for task in tasks {
            lines.push(task.render_open());
        }
    }
    lines.push(String::new());
}

/// Render the fixed-section summary document. The destination is fully
/// replaced on every run.
#[must_use]
pub fn render_summary(summary: &TriageSummary) -> String {
    let mut lines = vec![
        "# Task Triage (Generated)".to_string(),
        String::new(),
        "_This file is overwritten on each triage run._".to_string(),
        String::new(),
    ];
    push_section(&mut lines, "Blockers", &summary.blockers);
    push_section(&mut lines, "Needs Design", &summary.needs_design);
    push_section(&mut lines, "Needs Testing", &summary.needs_testing);
    push_section(&mut lines, "Other Open Tasks", &summary.other);
    push_section(&mut lines, "Stale", &summary.stale);
    lines.push("## Notes".to_string());
    lines.push(format!("- Generated: {}", summary.generated_at));
    lines.push(String::new());
    lines.join("\n")
}
