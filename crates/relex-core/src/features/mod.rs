//! Feature extraction for candidate relation pairs.

pub mod extractor;
pub mod window;

pub use extractor::FeatureExtractor;
pub use window::{ordered_pairs, window_around, Window, END_MARKER, START_MARKER};
