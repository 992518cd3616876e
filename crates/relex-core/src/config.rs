//! # Extraction Configuration
//!
//! Knobs shared by the reconciler and the feature extractor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RelexError;
use crate::types::NerTag;

/// Default half-width of the lexical window around an entity.
pub const DEFAULT_WINDOW_RADIUS: usize = 3;

/// Title words that belong to the following person name.
pub const DEFAULT_TITLES: &[&str] = &["Mrs.", "Ms."];

/// POS tags counted over the whole sentence, in feature order.
pub const DEFAULT_TAGS_OF_INTEREST: &[&str] = &["PROPN", "PRON", "NOUN"];

/// The relation a dataset is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    /// PERSON lives in LOCATION.
    LiveIn,
    /// PERSON works for ORGANIZATION.
    WorkFor,
}

impl RelationKind {
    /// Relation name as it appears in annotation files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LiveIn => "Live_In",
            Self::WorkFor => "Work_For",
        }
    }

    /// Entity tag of the relation's second argument.
    pub fn object_tag(self) -> NerTag {
        match self {
            Self::LiveIn => NerTag::Location,
            Self::WorkFor => NerTag::Organization,
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = RelexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "live-in" => Ok(Self::LiveIn),
            "work-for" => Ok(Self::WorkFor),
            other => Err(RelexError::InvalidConfig(format!(
                "unknown relation {other:?} (expected live-in or work-for)"
            ))),
        }
    }
}

/// Which POS column fills the window features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PosLayer {
    /// Simplified tags (`PROPN`, `VERB`, ...).
    Coarse,
    /// Fine-grained tags (`NNP`, `VBZ`, ...).
    Fine,
}

/// Configuration for NER reconciliation and feature extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Relation whose object tag drives candidate generation.
    pub relation: RelationKind,
    /// Number of tokens on each side of an entity.
    pub window_radius: usize,
    /// Words that are merged into a following PERSON.
    pub titles: Vec<String>,
    /// Simplified POS tags whose sentence counts are emitted.
    pub tags_of_interest: Vec<String>,
    /// POS column used inside the entity windows.
    pub window_pos: PosLayer,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            relation: RelationKind::LiveIn,
            window_radius: DEFAULT_WINDOW_RADIUS,
            titles: DEFAULT_TITLES.iter().map(|s| s.to_string()).collect(),
            tags_of_interest: DEFAULT_TAGS_OF_INTEREST
                .iter()
                .map(|s| s.to_string())
                .collect(),
            window_pos: PosLayer::Coarse,
        }
    }
}

impl ExtractorConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target relation.
    pub fn with_relation(mut self, relation: RelationKind) -> Self {
        self.relation = relation;
        self
    }

    /// Set the window radius.
    pub fn with_window_radius(mut self, radius: usize) -> Self {
        self.window_radius = radius;
        self
    }

    /// Replace the title words.
    pub fn with_titles<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.titles = titles.into_iter().map(Into::into).collect();
        self
    }

    /// Select the POS column used in windows.
    pub fn with_window_pos(mut self, layer: PosLayer) -> Self {
        self.window_pos = layer;
        self
    }

    /// Tag of the relation's second argument.
    pub fn object_tag(&self) -> NerTag {
        self.relation.object_tag()
    }

    /// Checks that the configuration can produce a feature vector.
    pub fn validate(&self) -> crate::Result<()> {
        if self.window_radius == 0 {
            return Err(RelexError::InvalidConfig(
                "window_radius must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
