//! Contract rule set: allowed directories and required files.
//!
//! The rule set is configuration-driven: it is parsed out of the vault's
//! own contract document. When the document is absent, or a section
//! yields nothing, fixed built-in defaults apply, so a half-written
//! contract never silently disables a whole check.

use std::sync::LazyLock;

use regex::Regex;

/// Default top-level directory allow-list.
pub const DEFAULT_ALLOWED_DIRS: &[&str] = &[
    "architecture",
    "planning",
    "devlog",
    "contracts",
    "system",
    "inbox",
    "projects",
    "tasks",
    "explainers",
];

/// Default required-file list.
pub const DEFAULT_REQUIRED_FILES: &[&str] = &[
    "architecture/ARCHITECTURE.md",
    "architecture/DECISIONS.md",
    "planning/masterplan.md",
    "planning/progress.md",
    "planning/now.md",
    "contracts/VAULT_CONTRACT.md",
    "contracts/API_CONTRACT.md",
    "contracts/GIT_CONTRACT.md",
];

static ALLOWED_DIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-\s+([A-Za-z0-9_.-]+)/").expect("allowed dir regex"));

static REQUIRED_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\s]+\.md)`").expect("required file regex"));

/// The resolved structural contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    pub allowed_dirs: Vec<String>,
    pub required_files: Vec<String>,
}

impl RuleSet {
    /// Built-in defaults, used when no contract document is available.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            allowed_dirs: DEFAULT_ALLOWED_DIRS.iter().map(|s| (*s).to_string()).collect(),
            required_files: DEFAULT_REQUIRED_FILES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Parse the rule set from contract-document text, falling back to
    /// the defaults per section when the section yields nothing.
    #[must_use]
    pub fn from_contract(contract: &str) -> Self {
        let mut rules = Self::defaults();

        let allowed = section_lines(contract, "## Allowed Directories")
            .iter()
            .filter_map(|line| ALLOWED_DIR_RE.captures(line))
            .map(|caps| caps[1].to_string())
            .collect::<Vec<_>>();
        if !allowed.is_empty() {
            rules.allowed_dirs = allowed;
        }

        let required = section_lines(contract, "## Required Files")
            .iter()
            .filter_map(|line| REQUIRED_FILE_RE.captures(line))
            .map(|caps| caps[1].to_string())
            .collect::<Vec<_>>();
        if !required.is_empty() {
            rules.required_files = required;
        }

        rules
    }
}

/// Lines under `heading`, stopping at the next level-2 heading. Rule
/// sections are delimited at level 2 specifically so list items and
/// sub-notes inside a section survive.
fn section_lines<'a>(text: &'a str, heading: &str) -> Vec<&'a str> {
    let target = heading.trim().to_lowercase();
    let mut collected = Vec::new();
    let mut inside = false;
    for line in text.lines() {
        if line.trim().to_lowercase() == target {
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
    collected
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "\
# Vault Contract

## Allowed Directories
- architecture/
- planning/
- system/

## Required Files
- `architecture/ARCHITECTURE.md` is the map
- `planning/masterplan.md`

## Other Section
- devlog/
";

    #[test]
    fn parses_allowed_dirs_from_contract() {
        let rules = RuleSet::from_contract(CONTRACT);
        assert_eq!(rules.allowed_dirs, vec!["architecture", "planning", "system"]);
    }

    #[test]
    fn parses_required_files_from_contract() {
        let rules = RuleSet::from_contract(CONTRACT);
        assert_eq!(
            rules.required_files,
            vec!["architecture/ARCHITECTURE.md", "planning/masterplan.md"]
        );
    }

    #[test]
    fn sections_outside_the_rule_heading_are_ignored() {
        let rules = RuleSet::from_contract(CONTRACT);
        assert!(!rules.allowed_dirs.contains(&"devlog".to_string()));
    }

    #[test]
    fn empty_contract_falls_back_to_defaults() {
        let rules = RuleSet::from_contract("");
        assert_eq!(rules, RuleSet::defaults());
    }

    #[test]
    fn missing_section_falls_back_per_section() {
        let contract = "## Allowed Directories\n- inbox/\n";
        let rules = RuleSet::from_contract(contract);
        assert_eq!(rules.allowed_dirs, vec!["inbox"]);
        assert_eq!(rules.required_files, RuleSet::defaults().required_files);
    }
}
