//! # Named-Entity Tags
//!
//! Tag vocabulary shared by the corpus loader, the external taggers and the
//! reconciler. Upstream tools emit slightly different tag sets (`GPE`, `ORG`,
//! `NORP`, ...); those are kept verbatim until [`NerTag::normalized`] is
//! applied.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named-entity tag attached to one token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NerTag {
    Person,
    Location,
    Organization,
    /// Outside any entity (`O`).
    Outside,
    /// Any other upstream tag, kept as written (e.g. `GPE`, `DATE`, `NORP`).
    Other(String),
}

impl NerTag {
    /// Parses a raw tag exactly as an upstream tool wrote it.
    ///
    /// No normalization happens here: `GPE` stays `Other("GPE")`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PERSON" => NerTag::Person,
            "LOCATION" => NerTag::Location,
            "ORGANIZATION" => NerTag::Organization,
            "O" | "" => NerTag::Outside,
            other => NerTag::Other(other.to_string()),
        }
    }

    /// Maps upstream aliases onto the canonical vocabulary:
    /// `GPE` becomes `LOCATION` and `ORG` becomes `ORGANIZATION`.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            NerTag::Other(ref raw) if raw == "GPE" => NerTag::Location,
            NerTag::Other(ref raw) if raw == "ORG" => NerTag::Organization,
            tag => tag,
        }
    }

    /// Returns `true` for the `O` tag.
    pub fn is_outside(&self) -> bool {
        matches!(self, NerTag::Outside)
    }

    /// The tag as written in corpora and feature files.
    pub fn as_str(&self) -> &str {
        match self {
            NerTag::Person => "PERSON",
            NerTag::Location => "LOCATION",
            NerTag::Organization => "ORGANIZATION",
            NerTag::Outside => "O",
            NerTag::Other(raw) => raw,
        }
    }
}

impl fmt::Display for NerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(word, tag)` pair of a tag sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaggedWord {
    pub word: String,
    pub tag: NerTag,
}

impl TaggedWord {
    pub fn new(word: impl Into<String>, tag: NerTag) -> Self {
        Self {
            word: word.into(),
            tag,
        }
    }
}

/// Per-token NER tags for one sentence, in token order.
pub type TagSequence = Vec<TaggedWord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_tags() {
        assert_eq!(NerTag::parse("PERSON"), NerTag::Person);
        assert_eq!(NerTag::parse("LOCATION"), NerTag::Location);
        assert_eq!(NerTag::parse("ORGANIZATION"), NerTag::Organization);
        assert_eq!(NerTag::parse("O"), NerTag::Outside);
    }

    #[test]
    fn test_parse_keeps_upstream_tags() {
        assert_eq!(NerTag::parse("GPE"), NerTag::Other("GPE".into()));
        assert_eq!(NerTag::parse("NORP").to_string(), "NORP");
    }

    #[test]
    fn test_normalized() {
        assert_eq!(NerTag::parse("GPE").normalized(), NerTag::Location);
        assert_eq!(NerTag::parse("ORG").normalized(), NerTag::Organization);
        assert_eq!(
            NerTag::parse("NORP").normalized(),
            NerTag::Other("NORP".into())
        );
        assert_eq!(NerTag::Person.normalized(), NerTag::Person);
    }

    #[test]
    fn test_display_roundtrip() {
        for raw in ["PERSON", "LOCATION", "ORGANIZATION", "O", "DATE"] {
            assert_eq!(NerTag::parse(raw).to_string(), raw);
        }
    }
}
