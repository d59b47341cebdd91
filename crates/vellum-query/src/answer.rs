//! Constrained natural-language query answering.
//!
//! Intent matching is ordered and the first matching intent wins; no
//! intent is combinable. These are deliberate total orders implemented
//! as sequential scans with first-match short-circuit, not lookups.

use serde::Serialize;
use tracing::debug;

use vellum_core::{anchor, excerpt_below, excerpt_under_heading, extract_section};
use vellum_core::{Document, Result, VellumError};
use vellum_vault::{paths, Vault};

const COMPONENTS_HEADING: &str = "## Components";
const CLOSEST_HEADINGS_SHOWN: usize = 5;

/// An answer plus citations back to the source documents.
#[derive(Debug, Clone, Serialize)]
pub struct QueryAnswer {
    pub answer: String,
    pub citations: Vec<crate::Citation>,
}

/// Answer `question` against the architecture document and the decisions
/// ledger, in that fixed order.
///
/// # Errors
///
/// Returns [`VellumError::EmptyQuestion`] before any document is read
/// when the trimmed question is empty.
pub fn answer_question(vault: &Vault, question: &str) -> Result<QueryAnswer> {
    let question = question.trim();
    if question.is_empty() {
        return Err(VellumError::EmptyQuestion);
    }
    let q = question.to_lowercase();

    let arch = Document::new(
        paths::ARCHITECTURE,
        vault.read(paths::ARCHITECTURE)?.unwrap_or_default(),
    );
    let decisions = Document::new(
        paths::DECISIONS,
        vault.read(paths::DECISIONS)?.unwrap_or_default(),
    );

    // Intent 1: components / responsibilities.
    if q.contains("components") || q.contains("responsibilities") {
        debug!("query intent: components");
        return Ok(components_answer(&arch));
    }

    // Intent 2: where-is / defined lookups over headings.
    if q.contains("where is") || q.contains("defined") {
        debug!("query intent: definition lookup");
        let target = definition_target(question);
        return Ok(definition_answer(&target, &arch, &decisions));
    }

    debug!("query intent: none");
    Ok(QueryAnswer {
        answer: "Not found".to_string(),
        citations: Vec::new(),
    })
}

fn components_answer(arch: &Document) -> QueryAnswer {
    let section = extract_section(arch.text(), COMPONENTS_HEADING);
    if section.is_empty() {
        return QueryAnswer {
            answer: "Not found".to_string(),
            citations: Vec::new(),
        };
    }
    let excerpt = excerpt_under_heading(arch.text(), COMPONENTS_HEADING);
    QueryAnswer {
        answer: section,
        citations: vec![crate::Citation::new(
            arch.path(),
            anchor("Components"),
            excerpt,
        )],
    }
}

/// Derive the lookup phrase: the text after "where is" up to a trailing
/// `?`, or the question with the literal tokens "defined" and "where is"
/// stripped.
fn definition_target(question: &str) -> String {
    if let Some(pos) = find_ignore_ascii_case(question, "where is") {
        let after = &question[pos + "where is".len()..];
        return after.trim_end_matches('?').trim().to_string();
    }
    let stripped = strip_token(&strip_token(question, "defined"), "where is");
    stripped.trim().to_string()
}

/// Byte offset of the first case-insensitive occurrence of an ASCII
/// token, respecting char boundaries of the haystack.
fn find_ignore_ascii_case(text: &str, token: &str) -> Option<usize> {
    let len = token.len();
    if len == 0 || text.len() < len {
        return None;
    }
    (0..=text.len() - len).find(|&i| {
        text.is_char_boundary(i)
            && text.is_char_boundary(i + len)
            && text[i..i + len].eq_ignore_ascii_case(token)
    })
}

/// Remove every case-insensitive occurrence of an ASCII token.
fn strip_token(text: &str, token: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        if rest.len() >= token.len()
            && rest.is_char_boundary(token.len())
            && rest[..token.len()].eq_ignore_ascii_case(token)
        {
            rest = &rest[token.len()..];
        } else {
            let Some(ch) = rest.chars().next() else { break };
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }
    out
}

fn definition_answer(target: &str, arch: &Document, decisions: &Document) -> QueryAnswer {
    let target_lower = target.to_lowercase();
    let documents = [arch, decisions];

    if !target_lower.is_empty() {
        for doc in documents {
            let lines: Vec<&str> = doc.lines().collect();
            for heading in doc.headings() {
                if heading.title.to_lowercase().contains(&target_lower) {
                    let excerpt = excerpt_below(&lines, heading.line_index);
                    let quote = if excerpt.is_empty() {
                        heading.title.clone()
                    } else {
                        excerpt
                    };
                    return QueryAnswer {
                        answer: format!("{} is defined in {}.", heading.title, doc.path()),
                        citations: vec![crate::Citation::new(
                            doc.path(),
                            anchor(&heading.title),
                            quote,
                        )],
                    };
                }
            }
        }
    }

    let closest: Vec<String> = documents
        .iter()
        .flat_map(|doc| doc.headings())
        .take(CLOSEST_HEADINGS_SHOWN)
        .map(|h| h.title)
        .collect();
    QueryAnswer {
        answer: format!("Not found. Closest headings: {}", closest.join(", ")),
        citations: Vec::new(),
    }
}
