//! # vellum-triage
//!
//! Task triage and status snapshots for Vellum vaults.
//!
//! Triage re-derives every open task from the plan and backlog
//! documents, classifies each into exactly one priority bucket, flags
//! stale tasks against the progress log, and overwrites the rendered
//! summary. The status snapshot regenerates the current-focus document
//! from the same inputs.

mod status;
mod triage;

pub use status::{run_status, StatusSnapshot};
pub use triage::{run_triage, TriageSummary};
