//! # Relex Dataset
//!
//! Turns an annotated corpus into a labeled feature file: candidate pairs are
//! generated per sentence, labeled against gold annotations, and passed
//! through the feature extractor. NER tagging and dependency path indexing
//! are cached on disk between runs.

pub mod annotations;
pub mod cache;
pub mod candidates;
pub mod config;
pub mod pipeline;

pub use annotations::Annotations;
pub use cache::StageCache;
pub use candidates::{candidate_pairs, CandidatePair};
pub use config::{default_cache_dir, DatasetConfig};
pub use pipeline::{CorpusPaths, DatasetBuilder, Example, RunStats, TaggedCorpus};
