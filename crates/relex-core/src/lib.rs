//! # Relex Core
//!
//! Feature extraction for relation classification over a parsed,
//! NER-annotated corpus. Sentences are loaded, their entity tags reconciled
//! against a second tagger, entities collapsed into spans, and every
//! (person, object) pair turned into a fixed-order feature vector.
//!
//! ## Quick Start
//!
//! ```rust
//! use relex_core::corpus::parse_corpus;
//! use relex_core::dependency::PathIndex;
//! use relex_core::features::FeatureExtractor;
//! use relex_core::ner::{extract_spans, EntityIndex};
//! use relex_core::ExtractorConfig;
//!
//! let text = "\n#id: s1\n\
//! 1\tJohn\tJohn\tNNP\tPROPN\t2\tnsubj\tPERSON\n\
//! 2\tlives\tlive\tVBZ\tVERB\t0\tROOT\tO\n\
//! 3\tin\tin\tIN\tADP\t2\tprep\tO\n\
//! 4\tBoston\tBoston\tNNP\tPROPN\t3\tpobj\tGPE\n";
//!
//! let config = ExtractorConfig::default();
//! let corpus = parse_corpus(text.as_bytes()).unwrap();
//! let sentence = corpus.get("s1").unwrap();
//!
//! let spans = extract_spans(&sentence.ner_tags(&config.titles));
//! let entities = EntityIndex::new(&spans);
//! let paths = PathIndex::build(sentence).unwrap();
//!
//! let extractor = FeatureExtractor::new(config).unwrap();
//! let features = extractor
//!     .extract(&spans[0], &spans[1], sentence, &paths, entities.tag_count())
//!     .unwrap();
//! assert_eq!(features.len(), 54);
//! ```
pub mod config;
pub mod corpus;
pub mod dependency;
pub mod error;
pub mod features;
pub mod ner;
pub mod persist;
pub mod serialize;
pub mod types;

// Re-export primary API
pub use config::{ExtractorConfig, PosLayer, RelationKind};
pub use corpus::{load_corpus, parse_corpus, Corpus, CorpusBuilder};
pub use dependency::{join_routes, PathHop, PathIndex, Route};
pub use error::{RelexError, Result};
pub use features::FeatureExtractor;
pub use ner::{
    extract_spans, reconcile, EntityIndex, EntitySpan, GazetteerTagger, NamedEntityTagger,
    StanfordTagger,
};
pub use serialize::{feature_line, write_feature_file, FeatureWriter};
pub use types::{FeatureValue, FeatureVector, Label, NerTag, Sentence, TokenRecord};
