//! # vellum-audit
//!
//! Contract validation for Vellum vaults.
//!
//! Runs a fixed, ordered battery of structural checks against the vault
//! and appends a timestamped report to the maintenance log. A rule that
//! is not met is a first-class FAIL finding, never an error: the
//! validator reports missing files, it does not raise on them.

pub mod rules;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

use vellum_core::{is_task_line, Result};
use vellum_vault::{paths, Vault};

pub use rules::RuleSet;

const MIN_MASTERPLAN_TASKS: usize = 5;

/// Outcome of a single check or of the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Pass,
    Fail,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Pass => f.write_str("PASS"),
            CheckStatus::Fail => f.write_str("FAIL"),
        }
    }
}

/// One finding produced by a contract check.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub status: CheckStatus,
    pub message: String,
}

impl Finding {
    fn pass(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Pass,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Fail,
            message: message.into(),
        }
    }
}

/// Accumulated result of one contract-check run.
#[derive(Debug, Clone, Serialize)]
pub struct ContractReport {
    pub status: CheckStatus,
    pub findings: Vec<Finding>,
    pub suggested_fixes: Vec<String>,
    pub checked_at: String,
}

/// Run the full check battery and append the rendered report to the
/// maintenance log. Each rule reports independently; one FAIL anywhere
/// sets the overall status to FAIL.
///
/// # Errors
///
/// Only storage-boundary failures surface as errors; unmet rules are
/// findings.
pub fn run_contract_check(vault: &Vault, now: DateTime<Local>) -> Result<ContractReport> {
    let contract = vault.read(paths::VAULT_CONTRACT)?.unwrap_or_default();
    let rules = RuleSet::from_contract(&contract);

    let mut findings: Vec<Finding> = Vec::new();
    let mut fixes: Vec<String> = Vec::new();

    // 1. Top-level directories against the allow-list.
    let actual_dirs = vault.list_directories()?;
    let unknown: Vec<&String> = actual_dirs
        .iter()
        .filter(|d| !rules.allowed_dirs.iter().any(|a| a == *d))
        .collect();
    if unknown.is_empty() {
        findings.push(Finding::pass(
            "Top-level vault directories match allowed list",
        ));
    } else {
        let names = unknown
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        findings.push(Finding::fail(format!(
            "Unknown top-level directories: {names}"
        )));
        fixes.push("Update the vault contract or remove unknown directories".to_string());
    }

    // 2. Required files, one finding each.
    for rel in &rules.required_files {
        if vault.exists(rel)? {
            findings.push(Finding::pass(format!("Required file exists: {rel}")));
        } else {
            findings.push(Finding::fail(format!("Missing required file: {rel}")));
            fixes.push(format!("Create {rel}"));
        }
    }

    // 3. Current-focus file, kept as an explicit named finding even when
    // the required list already covers it.
    if vault.exists(paths::NOW)? {
        findings.push(Finding::pass("now.md exists"));
    } else {
        findings.push(Finding::fail("now.md missing"));
        fixes.push(format!("Create {}", paths::NOW));
    }

    // 4. Masterplan has enough valid task lines, done or not.
    let masterplan = vault.read(paths::MASTERPLAN)?.unwrap_or_default();
    let task_lines = masterplan.lines().filter(|l| is_task_line(l)).count();
    if task_lines >= MIN_MASTERPLAN_TASKS {
        findings.push(Finding::pass(format!(
            "masterplan.md has at least {MIN_MASTERPLAN_TASKS} valid task lines"
        )));
    } else {
        findings.push(Finding::fail(format!(
            "masterplan.md has fewer than {MIN_MASTERPLAN_TASKS} valid task lines"
        )));
        fixes.push("Add more tasks with IDs to masterplan.md".to_string());
    }

    // 5. Devlog for the current month.
    let month = now.format("%Y-%m").to_string();
    let devlog = paths::devlog_for_month(&month);
    if vault.exists(&devlog)? {
        findings.push(Finding::pass(format!("Devlog exists for {month}")));
    } else {
        findings.push(Finding::fail(format!("Devlog missing for {month}")));
        fixes.push(format!("Create {devlog}"));
    }

    let status = if findings.iter().any(|f| f.status == CheckStatus::Fail) {
        CheckStatus::Fail
    } else {
        CheckStatus::Pass
    };
    info!(%status, findings = findings.len(), "contract check complete");

    let report = ContractReport {
        status,
        findings,
        suggested_fixes: fixes,
        checked_at: now.format("%Y-%m-%d %H:%M").to_string(),
    };

    ensure_maintenance_header(vault)?;
    vault.append(paths::MAINTENANCE, &render_report(&report))?;

    Ok(report)
}

fn ensure_maintenance_header(vault: &Vault) -> Result<()> {
    if !vault.exists(paths::MAINTENANCE)? {
        vault.write(paths::MAINTENANCE, "# Maintenance Log (Append-only)\n\n")?;
    }
    Ok(())
}

/// Render one report block for the append-only maintenance log.
#[must_use]
pub fn render_report(report: &ContractReport) -> String {
    let mut lines = vec![
        format!("\n## {} — Contract Check", report.checked_at),
        format!("Status: {}", report.status),
        "Findings:".to_string(),
    ];
    for finding in &report.findings {
        lines.push(format!("- [{}] {}", finding.status, finding.message));
    }
    lines.push("Suggested Fixes:".to_string());
    if report.suggested_fixes.is_empty() {
        lines.push("- None".to_string());
    } else {
        for fix in &report.suggested_fixes {
            lines.push(format!("- {fix}"));
        }
    }
    lines.push(String::new());
    lines.join("\n")
}
