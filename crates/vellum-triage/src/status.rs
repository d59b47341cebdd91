//! Current-focus snapshot: regenerates `planning/now.md`.
//!
//! The snapshot pulls the current phase out of the masterplan (the phase
//! of the first unfinished task that carries one), picks active and next
//! tasks from it, and surfaces blockers, including missing required
//! planning documents.

use serde::Serialize;
use tracing::info;

use vellum_core::{extract_tasks, Result, Task};
use vellum_vault::{paths, Vault};

const MAX_ACTIVE: usize = 5;
const MAX_NEXT: usize = 5;

const REFERENCES: &[&str] = &[
    "architecture/ARCHITECTURE.md",
    "contracts/VAULT_CONTRACT.md",
    "architecture/DECISIONS.md",
];

/// The regenerated current-focus state.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub objective: String,
    pub phase: String,
    pub active: Vec<Task>,
    pub next: Vec<Task>,
    pub blockers: Vec<String>,
}

/// Rebuild the snapshot from the plan document and overwrite
/// `planning/now.md` with its rendered form.
pub fn run_status(vault: &Vault) -> Result<StatusSnapshot> {
    let mut missing_notes: Vec<String> = Vec::new();

    let masterplan = vault.read(paths::MASTERPLAN)?.unwrap_or_else(|| {
        missing_notes.push(format!("- Missing required file: {}", paths::MASTERPLAN));
        String::new()
    });
    if vault.read(paths::PROGRESS)?.is_none() {
        missing_notes.push(format!("- Missing required file: {}", paths::PROGRESS));
    }

    let tasks = extract_tasks(&masterplan);
    let unchecked: Vec<&Task> = tasks.iter().filter(|t| !t.done).collect();

    let phase = unchecked
        .iter()
        .find_map(|t| t.phase.clone())
        .unwrap_or_else(|| "Unknown Phase".to_string());
    let phase_tasks: Vec<&Task> = unchecked
        .iter()
        .filter(|t| t.phase.as_deref() == Some(phase.as_str()))
        .copied()
        .collect();

    let blocker_tasks: Vec<&Task> = phase_tasks
        .iter()
        .filter(|t| t.has_tag("#blocker"))
        .copied()
        .collect();
    let non_blockers: Vec<&Task> = phase_tasks
        .iter()
        .filter(|t| !t.has_tag("#blocker"))
        .copied()
        .collect();

    let active: Vec<Task> = non_blockers.iter().take(MAX_ACTIVE).map(|t| (*t).clone()).collect();
    let remaining: Vec<&Task> = phase_tasks
        .iter()
        .filter(|t| !active.iter().any(|a| a.id == t.id))
        .copied()
        .collect();
    let next_candidates: Vec<&Task> = remaining
        .iter()
        .filter(|t| !t.has_tag("#blocker"))
        .copied()
        .collect();
    let next_pool: Vec<&Task> = if !next_candidates.is_empty() {
        next_candidates
    } else if !remaining.is_empty() {
        remaining
    } else {
        blocker_tasks.clone()
    };
    let next: Vec<Task> = next_pool.iter().take(MAX_NEXT).map(|t| (*t).clone()).collect();

    let objective = if let Some(first) = active.first() {
        format!("Complete Phase {} tasks, starting with {}.", phase, first.id)
    } else {
        "Maintain system state and resolve blockers.".to_string()
    };

    let mut blockers: Vec<String> = blocker_tasks
        .iter()
        .map(|t| format!("- ({}) {}", t.id, t.text))
        .collect();
    blockers.append(&mut missing_notes);

    let snapshot = StatusSnapshot {
        objective,
        phase,
        active,
        next,
        blockers,
    };
    info!(
        phase = %snapshot.phase,
        active = snapshot.active.len(),
        "status snapshot rebuilt"
    );

    vault.write(paths::NOW, &render_snapshot(&snapshot))?;
    Ok(snapshot)
}

fn push_task_section(lines: &mut Vec<String>, title: &str, tasks: &[Task]) {
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

/// Render the now document. Overwrite semantics: the file is regenerated
/// wholesale, never edited in place.
#[must_use]
pub fn render_snapshot(snapshot: &StatusSnapshot) -> String {
    let mut lines = vec![
        "# Now".to_string(),
        String::new(),
        "## Current Objective".to_string(),
        snapshot.objective.clone(),
        String::new(),
    ];
    push_task_section(&mut lines, "Active Tasks (max 5)", &snapshot.active);
    push_task_section(&mut lines, "Next Tasks (max 5)", &snapshot.next);

    lines.push("## Blockers".to_string());
    if snapshot.blockers.is_empty() {
        lines.push("- None".to_string());
    } else {
        lines.extend(snapshot.blockers.iter().cloned());
    }
    lines.push(String::new());

    lines.push("## References".to_string());
    for reference in REFERENCES {
        lines.push(format!("- `{reference}`"));
    }
    lines.push(String::new());
    lines.join("\n")
}
