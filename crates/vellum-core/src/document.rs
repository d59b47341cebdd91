//! Document type — a markdown file as an ordered sequence of lines.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("heading regex"));

/// A heading derived from a line beginning with one or more `#` characters.
///
/// Headings are ordered by appearance. Titles carry no uniqueness
/// constraint — duplicate titles are legal, and every lookup in this
/// crate resolves to the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// Nesting level, 1..=6 (count of leading `#`).
    pub level: u8,
    /// Title text, trimmed of `#` and surrounding whitespace.
    pub title: String,
    /// Zero-based index of the line the heading appeared on.
    pub line_index: usize,
}

/// A vault document: a relative path plus raw text, viewed as an ordered
/// sequence of lines. Immutable once constructed; callers re-read the
/// underlying file on each operation rather than caching instances.
#[derive(Debug, Clone)]
pub struct Document {
    path: String,
    text: String,
}

impl Document {
    /// Wrap raw text read from `path`.
    #[must_use]
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Vault-relative path this document was read from.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The document as ordered lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    /// All headings, in order of appearance.
    #[must_use]
    pub fn headings(&self) -> Vec<Heading> {
        scan_headings(&self.text)
    }
}

/// Scan text for headings: lines matching `#{1,6}` followed by whitespace
/// and a title. Lines with seven or more `#`, or with no space after the
/// hashes, are not headings.
#[must_use]
pub fn scan_headings(text: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    for (line_index, line) in text.lines().enumerate() {
        if let Some(caps) = HEADING_RE.captures(line) {
            headings.push(Heading {
                level: caps[1].len() as u8,
                title: caps[2].trim().to_string(),
                line_index,
            });
        }
    }
    headings
}

/// Parse a single line as a heading, if it is one.
#[must_use]
pub fn parse_heading_line(line: &str) -> Option<(u8, String)> {
    HEADING_RE
        .captures(line)
        .map(|caps| (caps[1].len() as u8, caps[2].trim().to_string()))
}

/// Title of the nearest heading at or above `line_index`, scanning upward.
#[must_use]
pub fn nearest_heading_title(lines: &[&str], line_index: usize) -> Option<String> {
    if lines.is_empty() {
        return None;
    }
    lines[..=line_index.min(lines.len() - 1)]
        .iter()
        .rev()
        .find_map(|line| parse_heading_line(line).map(|(_, title)| title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_headings_extracts_level_title_and_line() {
        let text = "# Top\n\nbody\n## Second Level\n### Deep  Title\n";
        let headings = scan_headings(text);
        assert_eq!(headings.len(), 3);
        assert_eq!(headings[0].level, 1);
        assert_eq!(headings[0].title, "Top");
        assert_eq!(headings[0].line_index, 0);
        assert_eq!(headings[1].level, 2);
        assert_eq!(headings[1].title, "Second Level");
        assert_eq!(headings[1].line_index, 3);
        assert_eq!(headings[2].title, "Deep  Title");
    }

    #[test]
    fn scan_headings_ignores_non_heading_hash_lines() {
        let text = "#nospace\n####### seven\n#\n## Real\n";
        let headings = scan_headings(text);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].title, "Real");
    }

    #[test]
    fn duplicate_titles_are_kept_in_order() {
        let text = "## Notes\nfirst\n## Notes\nsecond\n";
        let headings = scan_headings(text);
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].line_index, 0);
        assert_eq!(headings[1].line_index, 2);
    }

    #[test]
    fn nearest_heading_scans_upward_inclusive() {
        let text = "## Alpha\nline\n## Beta\nmatch here\n";
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(nearest_heading_title(&lines, 3).as_deref(), Some("Beta"));
        assert_eq!(nearest_heading_title(&lines, 2).as_deref(), Some("Beta"));
        assert_eq!(nearest_heading_title(&lines, 1).as_deref(), Some("Alpha"));
    }

    #[test]
    fn nearest_heading_none_before_first_heading() {
        let text = "preamble\n## First\n";
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(nearest_heading_title(&lines, 0), None);
    }

    #[test]
    fn document_exposes_lines_and_headings() {
        let doc = Document::new("architecture/ARCHITECTURE.md", "# Architecture\n\nbody\n");
        assert_eq!(doc.path(), "architecture/ARCHITECTURE.md");
        assert_eq!(doc.lines().count(), 3);
        assert_eq!(doc.headings()[0].title, "Architecture");
    }
}
