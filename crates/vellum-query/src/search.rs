//! Ranked free-text search across the vault.
//!
//! Matching is case-insensitive substring only. Results carry a fixed
//! three-tier priority: file-name hits, heading-line hits, body-line
//! hits. A heading line containing the term contributes BOTH a
//! priority-2 and a priority-3 result; the bias keeps heading hits at
//! the top while still surfacing them with body context.

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::debug;

use vellum_core::{anchor, nearest_heading_title, Result, VellumError};
use vellum_vault::{paths, Vault};

/// Search output is truncated to this many results per run.
pub const MAX_RESULTS: usize = 10;

/// A search hit as returned to callers. Priority and line index are
/// internal ordering fields, stripped before results leave the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub path: String,
    /// Slug of the nearest heading at or above the hit; empty for
    /// file-name hits and hits above the first heading.
    pub anchor: String,
    pub quote: String,
}

struct RankedMatch {
    priority: u8,
    line_index: usize,
    path: String,
    anchor: String,
    quote: String,
}

/// Scan the vault for `term`, rank and truncate matches, overwrite the
/// search-notes document, and return the stripped result set.
///
/// # Errors
///
/// Returns [`VellumError::EmptySearchTerm`] before any scan when the
/// trimmed term is empty.
pub fn run_search(vault: &Vault, term: &str, now: DateTime<Local>) -> Result<Vec<SearchResult>> {
    let term = term.trim();
    if term.is_empty() {
        return Err(VellumError::EmptySearchTerm);
    }
    let term_lower = term.to_lowercase();

    let mut candidates = vault.list_markdown_files()?;
    candidates.extend(vault.list_root_config_files()?);
    candidates.sort();
    candidates.dedup();

    let mut matches: Vec<RankedMatch> = Vec::new();
    for rel in &candidates {
        let Ok(Some(content)) = vault.read(rel) else {
            continue;
        };
        scan_file(rel, &content, &term_lower, &mut matches);
    }
    debug!(term, files = candidates.len(), hits = matches.len(), "search scan done");

    matches.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.path.cmp(&b.path))
            .then_with(|| a.line_index.cmp(&b.line_index))
    });
    matches.truncate(MAX_RESULTS);

    let results: Vec<SearchResult> = matches
        .into_iter()
        .map(|m| SearchResult {
            path: m.path,
            anchor: m.anchor,
            quote: m.quote,
        })
        .collect();

    vault.write(paths::SEARCH_NOTES, &render_notes(term, &results, now))?;
    Ok(results)
}

fn scan_file(rel: &str, content: &str, term_lower: &str, matches: &mut Vec<RankedMatch>) {
    let file_name = rel.rsplit('/').next().unwrap_or(rel);
    if file_name.to_lowercase().contains(term_lower) {
        matches.push(RankedMatch {
            priority: 1,
            line_index: 0,
            path: rel.to_string(),
            anchor: String::new(),
            quote: file_name.to_string(),
        });
    }

    let lines: Vec<&str> = content.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if !line.to_lowercase().contains(term_lower) {
            continue;
        }
        let heading_anchor = nearest_heading_title(&lines, i)
            .map(|title| anchor(&title))
            .unwrap_or_default();

        if line.starts_with('#') {
            matches.push(RankedMatch {
                priority: 2,
                line_index: i,
                path: rel.to_string(),
                anchor: heading_anchor.clone(),
                quote: line.trim().to_string(),
            });
        }
        matches.push(RankedMatch {
            priority: 3,
            line_index: i,
            path: rel.to_string(),
            anchor: heading_anchor,
            quote: context_window(&lines, i),
        });
    }
}

/// Three-line window around the hit: one line above through one line
/// below, clamped at the text edges.
fn context_window(lines: &[&str], i: usize) -> String {
    let start = i.saturating_sub(1);
    let end = (i + 2).min(lines.len());
    lines[start..end].join("\n")
}

/// Render the persisted search-notes document. Fully overwritten on
/// every search.
#[must_use]
pub fn render_notes(term: &str, results: &[SearchResult], now: DateTime<Local>) -> String {
    let ts = now.format("%Y-%m-%d %H:%M");
    let mut out = format!(
        "# Search Notes (Generated)\n\n_This file is overwritten on each search._\n\n## {ts} — find: {term}\n### Results\n"
    );
    if results.is_empty() {
        out.push_str("\n- No matches found.\n");
        return out;
    }
    for (idx, result) in results.iter().enumerate() {
        let anchor_display = if result.anchor.is_empty() {
            "n/a"
        } else {
            &result.anchor
        };
        out.push_str(&format!(
            "\n{}) **{}** — nearest heading: `{}`\n",
            idx + 1,
            result.path,
            anchor_display
        ));
        let quoted = result.quote.replace('\n', "\n> ");
        out.push_str(&format!("\n> {quoted}\n"));
    }
    out
}
