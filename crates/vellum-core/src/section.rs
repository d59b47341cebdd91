//! Section and excerpt extraction keyed by an exact heading line.
//!
//! Both operations match the full `#`-prefixed heading string (e.g.
//! `## Components`) case-insensitively against trimmed line content, and
//! stop at the next line starting with `#` at ANY level. Stopping at any
//! level is intentional: a citation excerpt must never run into an
//! unrelated subsection.

/// Find the line index of `heading` in `lines`, matching the trimmed
/// line content case-insensitively.
fn find_heading_line(lines: &[&str], heading: &str) -> Option<usize> {
    let target = heading.trim().to_lowercase();
    lines
        .iter()
        .position(|line| line.trim().to_lowercase() == target)
}

/// Extract the verbatim block of lines between `heading` and the next
/// heading of any level (or end-of-text), joined with newlines and
/// trimmed of surrounding whitespace.
///
/// Returns an empty string if the heading is absent.
#[must_use]
pub fn extract_section(text: &str, heading: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let Some(start) = find_heading_line(&lines, heading) else {
        return String::new();
    };

    let mut collected = Vec::new();
    for line in &lines[start + 1..] {
        if line.starts_with('#') {
            break;
        }
        collected.push(*line);
    }
    collected.join("\n").trim().to_string()
}

/// Short excerpt under `heading`: at most the first 3 non-empty lines
/// before the stop condition, each trimmed, joined with a single space.
///
/// Returns an empty string if the heading is absent.
#[must_use]
pub fn excerpt_under_heading(text: &str, heading: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let Some(start) = find_heading_line(&lines, heading) else {
        return String::new();
    };
    excerpt_below(&lines, start)
}

/// Excerpt of the lines following `line_index`: same collection rule as
/// [`excerpt_under_heading`], keyed by position instead of heading text.
/// Used when the caller already located a heading (possibly a duplicate
/// occurrence) and must not re-resolve it by title.
#[must_use]
pub fn excerpt_below(lines: &[&str], line_index: usize) -> String {
    let mut collected = Vec::new();
    for line in lines.iter().skip(line_index + 1) {
        if line.starts_with('#') {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        collected.push(trimmed);
        if collected.len() == 3 {
            break;
        }
    }
    collected.join(" ")
}
