//! Text rendering of labeled feature vectors.
//!
//! One line per candidate:
//!
//! ```text
//! <label> feature_number_0=<v0> feature_number_1=<v1> ...
//! ```

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::types::{FeatureVector, Label};

const FEATURE_PREFIX: &str = "feature_number_";

/// Render one labeled vector, including the trailing newline.
///
/// # Examples
/// ```
/// use relex_core::serialize::feature_line;
/// use relex_core::types::{FeatureVector, Label};
///
/// let mut v = FeatureVector::new();
/// v.push("Yes");
/// v.push(3usize);
/// v.push("the");
/// assert_eq!(
///     feature_line(Label::Positive, &v),
///     "1 feature_number_0=Yes feature_number_1=3 feature_number_2=the\n"
/// );
/// ```
pub fn feature_line(label: Label, features: &FeatureVector) -> String {
    let mut line = label.to_string();
    for (i, value) in features.iter().enumerate() {
        let _ = write!(line, " {FEATURE_PREFIX}{i}={value}");
    }
    line.push('\n');
    line
}

/// Streams feature lines into a writer.
pub struct FeatureWriter<W: Write> {
    inner: W,
    lines: usize,
    positives: usize,
}

impl<W: Write> FeatureWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            lines: 0,
            positives: 0,
        }
    }

    pub fn write(&mut self, label: Label, features: &FeatureVector) -> Result<()> {
        self.inner.write_all(feature_line(label, features).as_bytes())?;
        self.lines += 1;
        if label.is_positive() {
            self.positives += 1;
        }
        Ok(())
    }

    /// Lines written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn positives(&self) -> usize {
        self.positives
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Write a whole batch to `path`, replacing any existing file.
pub fn write_feature_file<P: AsRef<Path>>(
    path: P,
    rows: &[(Label, FeatureVector)],
) -> Result<usize> {
    let path = path.as_ref();
    let mut writer = FeatureWriter::new(BufWriter::new(File::create(path)?));
    for (label, features) in rows {
        writer.write(*label, features)?;
    }
    let written = writer.lines();
    info!(
        path = %path.display(),
        lines = written,
        positives = writer.positives(),
        "wrote feature file"
    );
    writer.finish()?;
    Ok(written)
}
