//! Context-bundle assembly from the current-focus document.
//!
//! Collects the now document, the fixed document spine, and whatever the
//! now document links to, into a single bundle of verbatim sources.
//! Missing candidates are skipped, never fabricated.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use vellum_core::{Result, VellumError};
use vellum_vault::{paths, Vault};

/// Default and maximum number of linked sources pulled into a bundle.
pub const DEFAULT_MAX_SOURCES: usize = 10;

/// Documents always offered to the bundle, after the now document.
const SPINE: &[&str] = &[
    paths::ARCHITECTURE,
    paths::VAULT_CONTRACT,
    paths::API_CONTRACT,
    paths::GIT_CONTRACT,
    paths::DECISIONS,
];

static WIKI_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^\]|#]+)(?:#[^\]|]*)?(?:\|[^\]]*)?\]\]").expect("wiki link regex")
});

static MD_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]+\]\(([^)#\s]+)(?:#[^)]*)?\)").expect("md link regex"));

/// One verbatim source included in a bundle.
#[derive(Debug, Clone, Serialize)]
pub struct ContextSource {
    pub path: String,
    pub bytes: usize,
    pub sha256: String,
    pub content: String,
}

/// The assembled context: the now document, the spine, and linked notes.
#[derive(Debug, Clone, Serialize)]
pub struct ContextBundle {
    pub generated_at: String,
    pub sources: Vec<ContextSource>,
}

/// Assemble the current context bundle.
///
/// The now document is mandatory; everything else degrades to "not
/// included" when absent. `max_sources` caps only the linked portion and
/// is clamped to `1..=50` (the spine is always offered).
///
/// # Errors
///
/// Returns [`VellumError::MissingDocument`] when `planning/now.md` does
/// not exist.
pub fn assemble_context(
    vault: &Vault,
    now: DateTime<Local>,
    max_sources: Option<usize>,
) -> Result<ContextBundle> {
    let now_text = vault
        .read(paths::NOW)?
        .ok_or_else(|| VellumError::MissingDocument(paths::NOW.to_string()))?;

    let cap = max_sources
        .unwrap_or(DEFAULT_MAX_SOURCES)
        .clamp(1, 50)
        .min(DEFAULT_MAX_SOURCES);

    let links: Vec<String> = extract_links(&now_text)
        .into_iter()
        .filter(|p| p.ends_with(".md"))
        .take(cap)
        .collect();

    let mut candidates: Vec<String> = vec![paths::NOW.to_string()];
    candidates.extend(SPINE.iter().map(|s| (*s).to_string()));
    candidates.extend(links);

    let mut seen: HashSet<String> = HashSet::new();
    let mut sources = Vec::new();
    for rel in candidates {
        if !seen.insert(rel.clone()) {
            continue;
        }
        let Ok(Some(content)) = vault.read(&rel) else {
            continue;
        };
        let digest = Sha256::digest(content.as_bytes());
        sources.push(ContextSource {
            path: rel,
            bytes: content.len(),
            sha256: format!("{digest:x}"),
            content,
        });
    }
    debug!(sources = sources.len(), "context bundle assembled");

    Ok(ContextBundle {
        generated_at: now.to_rfc3339(),
        sources,
    })
}

/// Wiki links and vault-relative markdown links from the now document,
/// in order of appearance, normalized to `.md` paths.
fn extract_links(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for caps in WIKI_LINK_RE.captures_iter(text) {
        out.push(to_md_path(caps[1].trim()));
    }
    for caps in MD_LINK_RE.captures_iter(text) {
        let target = caps[1].trim();
        if target.contains("://") {
            continue;
        }
        out.push(to_md_path(target));
    }
    out
}

fn to_md_path(link: &str) -> String {
    if link.ends_with(".md") {
        link.to_string()
    } else {
        format!("{link}.md")
    }
}
