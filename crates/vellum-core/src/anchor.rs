//! Heading-anchor slug generation.
//!
//! Stored anchors in existing vault documents resolve against exactly
//! this character class, so the algorithm is fixed: it is not a
//! general-purpose slugify.

/// Derive a URL-style anchor from a heading title.
///
/// Lower-cases the title, deletes every character that is not a
/// lower-case ASCII letter, digit, whitespace, or hyphen, then collapses
/// each run of whitespace to a single hyphen and prefixes `#`.
///
/// Pure and total: the result depends on the title text only, never on
/// heading level or position.
#[must_use]
pub fn anchor(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(kept.len() + 1);
    slug.push('#');
    let mut pending_gap = false;
    for c in kept.trim().chars() {
        if c.is_whitespace() {
            pending_gap = true;
            continue;
        }
        if pending_gap {
            slug.push('-');
            pending_gap = false;
        }
        slug.push(c);
    }
    slug
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn anchor_lowercases_and_hyphenates() {
        assert_eq!(anchor("Components"), "#components");
        assert_eq!(anchor("Decisions (ADR-lite)"), "#decisions-adr-lite");
        assert_eq!(anchor("Weekly  Maintenance"), "#weekly-maintenance");
    }

    #[test]
    fn anchor_deletes_disallowed_characters() {
        assert_eq!(anchor("What? A Heading!"), "#what-a-heading");
        assert_eq!(anchor("C++ & Rust"), "#c-rust");
    }

    #[test]
    fn anchor_preserves_existing_hyphens() {
        assert_eq!(anchor("2025-08 Devlog"), "#2025-08-devlog");
    }

    #[test]
    fn anchor_of_empty_title_is_bare_hash() {
        assert_eq!(anchor(""), "#");
        assert_eq!(anchor("???"), "#");
    }

    proptest! {
        #[test]
        fn anchor_starts_with_hash(title in ".*") {
            prop_assert!(anchor(&title).starts_with('#'));
        }

        #[test]
        fn anchor_has_no_uppercase_or_whitespace(title in ".*") {
            let slug = anchor(&title);
            prop_assert!(!slug.chars().any(|c| c.is_uppercase()));
            prop_assert!(!slug.chars().any(char::is_whitespace));
        }

        #[test]
        fn anchor_is_idempotent_on_slug_body(title in ".*") {
            let slug = anchor(&title);
            prop_assert_eq!(anchor(&slug[1..]), slug.clone());
        }
    }
}
