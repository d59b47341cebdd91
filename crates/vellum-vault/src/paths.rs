//! Canonical vault-relative paths.
//!
//! Every engine addresses vault documents through these constants so the
//! layout is declared once. Paths are relative to the vault root and use
//! forward slashes on every platform.

/// The plan document holding the task backlog phases.
pub const MASTERPLAN: &str = "planning/masterplan.md";

/// The chronological progress log with dated section headers.
pub const PROGRESS: &str = "planning/progress.md";

/// Secondary backlog document; triage reads its `## Backlog (Optional)`
/// subsection.
pub const BACKLOG: &str = "planning/backlog.md";

/// The current-focus snapshot, regenerated by the status operation.
pub const NOW: &str = "planning/now.md";

/// Append-only maintenance log receiving contract-check reports.
pub const MAINTENANCE: &str = "system/maintenance.md";

/// Task-triage summary, fully overwritten per run.
pub const TRIAGE: &str = "system/triage.md";

/// Search notes, fully overwritten per search.
pub const SEARCH_NOTES: &str = "system/search-notes.md";

/// The architecture document queried for components and definitions.
pub const ARCHITECTURE: &str = "architecture/ARCHITECTURE.md";

/// The decisions ledger, second in query document order.
pub const DECISIONS: &str = "architecture/DECISIONS.md";

/// The structural contract the validator loads its rule set from.
pub const VAULT_CONTRACT: &str = "contracts/VAULT_CONTRACT.md";

/// API contract, part of the context spine.
pub const API_CONTRACT: &str = "contracts/API_CONTRACT.md";

/// Git workflow contract, part of the context spine.
pub const GIT_CONTRACT: &str = "contracts/GIT_CONTRACT.md";

/// Dated devlog file for a `YYYY-MM` month.
#[must_use]
pub fn devlog_for_month(month: &str) -> String {
    format!("devlog/{month}.md")
}
