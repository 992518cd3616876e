//! # Relex
//!
//! Facade over the relex crates.
//!
//! - [`relex_core`]: corpus loading, NER reconciliation, spans, dependency routes,
//!   feature extraction and serialization.
//! - [`relex_dataset`]: candidate generation, labeling and cached feature-file
//!   builds.

pub use relex_core;
pub use relex_dataset;

pub use relex_core::{
    extract_spans, feature_line, join_routes, load_corpus, reconcile, Corpus, EntitySpan,
    ExtractorConfig, FeatureExtractor, FeatureVector, Label, NerTag, PathIndex, RelationKind,
    RelexError, Result, Sentence,
};
pub use relex_dataset::{Annotations, DatasetBuilder, DatasetConfig, RunStats};
