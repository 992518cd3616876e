pub mod feature;
pub mod tag;
pub mod token;

pub use feature::{FeatureValue, FeatureVector, Label};
pub use tag::{NerTag, TagSequence, TaggedWord};
pub use token::{Sentence, TokenRecord, POSSESSIVE_TAG, ROOT_LABEL};
