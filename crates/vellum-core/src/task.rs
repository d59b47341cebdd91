//! Checklist task grammar and the progress status index.
//!
//! Task lines follow `- [ ] (ID) description #tag...` with a
//! case-insensitive `x` marking completion. Ids are uppercase
//! alphanumeric-with-dash tokens. Lines that fail the grammar are
//! silently skipped everywhere, never reported.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

static TASK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- \[([ xX])\] \(([A-Z0-9-]+)\) (.+)$").expect("task regex"));

static PHASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##\s+Phase\s+(.+)$").expect("phase regex"));

static DATED_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##\s+(\d{4}-\d{2}-\d{2})").expect("dated header regex"));

static ID_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([A-Z0-9-]+)\)").expect("id token regex"));

/// Tasks untouched in the progress log for longer than this are stale.
pub const STALE_AFTER_DAYS: i64 = 14;

/// A parsed checklist task.
///
/// Tasks are re-derived from document text on every run and never
/// persisted as structured records; only rendered summaries reach disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// Whether the checkbox was marked (`x` or `X`).
    pub done: bool,
    /// Opaque id token, e.g. `T-101`.
    pub id: String,
    /// Description with trailing tags removed.
    pub text: String,
    /// Trailing `#`-prefixed tags, in source order, `#` retained.
    pub tags: Vec<String>,
    /// The `## Phase …` heading the task appeared under, if any.
    pub phase: Option<String>,
}

impl Task {
    /// Whether the task carries `tag` (including its `#` prefix).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Render the task back to checklist form: open checkbox, id,
    /// description, tags in source order.
    #[must_use]
    pub fn render_open(&self) -> String {
        if self.tags.is_empty() {
            format!("- [ ] ({}) {}", self.id, self.text)
        } else {
            format!("- [ ] ({}) {} {}", self.id, self.text, self.tags.join(" "))
        }
    }
}

/// Whether a single line matches the task grammar (done or not).
#[must_use]
pub fn is_task_line(line: &str) -> bool {
    TASK_RE.is_match(line)
}

/// Parse one line against the task grammar. Tags are consumed greedily
/// from the end of the line until the first non-`#` token.
#[must_use]
pub fn parse_task_line(line: &str) -> Option<Task> {
    let caps = TASK_RE.captures(line)?;
    let done = caps[1].eq_ignore_ascii_case("x");
    let id = caps[2].to_string();

    let mut parts: Vec<&str> = caps[3].split_whitespace().collect();
    let mut tags: Vec<String> = Vec::new();
    while parts.last().is_some_and(|p| p.starts_with('#')) {
        if let Some(tag) = parts.pop() {
            tags.insert(0, tag.to_string());
        }
    }

    Some(Task {
        done,
        id,
        text: parts.join(" "),
        tags,
        phase: None,
    })
}

/// Extract every task line from a document, tracking the `## Phase …`
/// heading each task appears under.
#[must_use]
pub fn extract_tasks(text: &str) -> Vec<Task> {
    let mut tasks = Vec::new();
    let mut current_phase: Option<String> = None;

    for line in text.lines() {
        if let Some(caps) = PHASE_RE.captures(line) {
            current_phase = Some(caps[1].trim().to_string());
            continue;
        }
        if let Some(mut task) = parse_task_line(line) {
            task.phase = current_phase.clone();
            tasks.push(task);
        }
    }
    tasks
}

/// Mapping from task id to the most recent date the id was mentioned in
/// the chronological progress log.
///
/// Built by scanning dated section headers (`## YYYY-MM-DD …`) and,
/// within each dated block, every parenthesized id token. Ids mentioned
/// outside any dated block are not indexed. Rebuilt from scratch per
/// triage run.
#[derive(Debug, Clone, Default)]
pub struct StatusIndex {
    last_touched: HashMap<String, NaiveDate>,
}

impl StatusIndex {
    /// Build the index from progress-log text.
    #[must_use]
    pub fn from_progress(text: &str) -> Self {
        let mut last_touched: HashMap<String, NaiveDate> = HashMap::new();
        let mut current_date: Option<NaiveDate> = None;

        for line in text.lines() {
            if let Some(caps) = DATED_HEADER_RE.captures(line.trim()) {
                // An unparseable date (e.g. month 13) is a malformed
                // header, skipped like any other malformed line.
                if let Ok(date) = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d") {
                    current_date = Some(date);
                }
                continue;
            }
            let Some(date) = current_date else { continue };
            for caps in ID_TOKEN_RE.captures_iter(line) {
                let id = caps[1].to_string();
                last_touched
                    .entry(id)
                    .and_modify(|d| *d = (*d).max(date))
                    .or_insert(date);
            }
        }

        Self { last_touched }
    }

    /// Most recent date `id` was mentioned under a dated header, if ever.
    #[must_use]
    pub fn last_touched(&self, id: &str) -> Option<NaiveDate> {
        self.last_touched.get(id).copied()
    }

    /// A task is stale when its id was never mentioned, or when its last
    /// mention is more than [`STALE_AFTER_DAYS`] before `today`.
    #[must_use]
    pub fn is_stale(&self, id: &str, today: NaiveDate) -> bool {
        match self.last_touched(id) {
            None => true,
            Some(date) => (today - date).num_days() > STALE_AFTER_DAYS,
        }
    }

    /// Number of distinct ids indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.last_touched.len()
    }

    /// Whether no ids were indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_touched.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // === Task line grammar ===

    #[test]
    fn parses_open_task_with_tags() {
        let task = parse_task_line("- [ ] (T-101) Wire up the router #blocker #needs-testing")
            .expect("valid task line");
        assert!(!task.done);
        assert_eq!(task.id, "T-101");
        assert_eq!(task.text, "Wire up the router");
        assert_eq!(task.tags, vec!["#blocker", "#needs-testing"]);
    }

    #[test]
    fn parses_done_task_case_insensitive_x() {
        assert!(parse_task_line("- [x] (T-1) Done").unwrap().done);
        assert!(parse_task_line("- [X] (T-2) Also done").unwrap().done);
    }

    #[test]
    fn tags_consume_greedily_from_end_only() {
        let task = parse_task_line("- [ ] (T-3) Fix #api handler #blocker").unwrap();
        assert_eq!(task.text, "Fix #api handler");
        assert_eq!(task.tags, vec!["#blocker"]);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        assert!(parse_task_line("- [ ] no id here").is_none());
        assert!(parse_task_line("- [ ] (t-1) lowercase id").is_none());
        assert!(parse_task_line("* [ ] (T-1) wrong bullet").is_none());
        assert!(parse_task_line("- [y] (T-1) bad marker").is_none());
    }

    #[test]
    fn extract_tasks_tracks_phases() {
        let text = "\
## Phase 1 — Foundations
- [ ] (T-1) First
- [x] (T-2) Second
## Notes
- [ ] (T-3) Phase carries over until the next Phase heading
## Phase 2
- [ ] (T-4) Fourth
";
        let tasks = extract_tasks(text);
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[0].phase.as_deref(), Some("1 — Foundations"));
        assert_eq!(tasks[2].phase.as_deref(), Some("1 — Foundations"));
        assert_eq!(tasks[3].phase.as_deref(), Some("2"));
    }

    #[test]
    fn render_open_always_uses_open_checkbox() {
        let task = parse_task_line("- [x] (T-9) Ship it #needs-testing").unwrap();
        assert_eq!(task.render_open(), "- [ ] (T-9) Ship it #needs-testing");
    }

    // === StatusIndex ===

    #[test]
    fn status_index_records_latest_mention() {
        let progress = "\
## 2026-07-01 — Kickoff
Started (T-1) and (T-2).
## 2026-07-20 — Update
Revisited (T-1).
";
        let index = StatusIndex::from_progress(progress);
        assert_eq!(index.last_touched("T-1"), Some(date(2026, 7, 20)));
        assert_eq!(index.last_touched("T-2"), Some(date(2026, 7, 1)));
        assert_eq!(index.last_touched("T-3"), None);
    }

    #[test]
    fn status_index_ignores_ids_outside_dated_blocks() {
        let progress = "Preamble mentions (T-7).\n## 2026-07-01\n(T-8) only.\n";
        let index = StatusIndex::from_progress(progress);
        assert_eq!(index.last_touched("T-7"), None);
        assert_eq!(index.last_touched("T-8"), Some(date(2026, 7, 1)));
    }

    #[test]
    fn status_index_keeps_max_date_regardless_of_order() {
        let progress = "## 2026-07-20\n(T-1)\n## 2026-07-01\n(T-1)\n";
        let index = StatusIndex::from_progress(progress);
        assert_eq!(index.last_touched("T-1"), Some(date(2026, 7, 20)));
    }

    #[test]
    fn staleness_boundary_is_fourteen_days() {
        let index = StatusIndex::from_progress("## 2026-07-01\n(T-1)\n");
        assert!(!index.is_stale("T-1", date(2026, 7, 15)));
        assert!(index.is_stale("T-1", date(2026, 7, 16)));
        assert!(index.is_stale("NEVER-SEEN", date(2026, 7, 1)));
    }
}
