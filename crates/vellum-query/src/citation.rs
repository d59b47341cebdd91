//! Citation type — points an answer back to its source text.

use serde::Serialize;

/// A `(path, anchor, quote)` triple. The anchor is a heading slug of the
/// form `#slug`, empty when no heading precedes the quoted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    pub path: String,
    pub anchor: String,
    pub quote: String,
}

impl Citation {
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        anchor: impl Into<String>,
        quote: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            anchor: anchor.into(),
            quote: quote.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn citation_serializes_all_three_fields() {
        let citation = Citation::new("architecture/ARCHITECTURE.md", "#components", "Router.");
        let json = serde_json::to_value(&citation).unwrap();
        assert_eq!(json["path"], "architecture/ARCHITECTURE.md");
        assert_eq!(json["anchor"], "#components");
        assert_eq!(json["quote"], "Router.");
    }
}
