//! # Gold Annotations
//!
//! Tab-separated relation annotations, one relation instance per line:
//!
//! ```text
//! sent1	Ms. Smith	Live_In	Paris	( Ms. Smith lives in the city of Paris . )
//! ```
//!
//! Only lines whose third field names the configured relation become
//! positives, but every sentence id in the file counts as annotated.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use relex_core::{Label, RelationKind};
use tracing::info;

/// Annotated `(sentence, person, object)` triples for one relation.
#[derive(Debug, Clone)]
pub struct Annotations {
    relation: RelationKind,
    pairs: HashSet<(String, String, String)>,
    /// Every sentence id seen, whatever its relation.
    sentences: HashSet<String>,
}

impl Annotations {
    /// An annotation set with no positives.
    pub fn empty(relation: RelationKind) -> Self {
        Self {
            relation,
            pairs: HashSet::new(),
            sentences: HashSet::new(),
        }
    }

    /// Load an annotation file.
    pub fn load<P: AsRef<Path>>(path: P, relation: RelationKind) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open annotations {}", path.display()))?;
        let annotations = Self::from_reader(BufReader::new(file), relation)
            .with_context(|| format!("failed to parse annotations {}", path.display()))?;
        info!(
            path = %path.display(),
            relation = %relation,
            pairs = annotations.len(),
            sentences = annotations.sentences.len(),
            "loaded annotations"
        );
        Ok(annotations)
    }

    pub fn from_reader<R: BufRead>(reader: R, relation: RelationKind) -> Result<Self> {
        let mut annotations = Self::empty(relation);

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            if fields.len() < 4 {
                bail!(
                    "line {}: expected at least 4 tab-separated fields, found {}",
                    i + 1,
                    fields.len()
                );
            }
            annotations.mark_sentence(fields[0]);
            if fields[2] != relation.as_str() {
                continue;
            }

            annotations.insert(fields[0], fields[1], fields[3]);
        }

        Ok(annotations)
    }

    /// Record `sentence_id` as annotated without adding a positive pair.
    pub fn mark_sentence(&mut self, sentence_id: &str) {
        self.sentences.insert(sentence_id.to_string());
    }

    /// Record `person` and `object` as related in `sentence_id`.
    pub fn insert(&mut self, sentence_id: &str, person: &str, object: &str) {
        self.mark_sentence(sentence_id);
        self.pairs.insert((
            sentence_id.to_string(),
            person.to_string(),
            object.to_string(),
        ));
    }

    pub fn contains(&self, sentence_id: &str, person: &str, object: &str) -> bool {
        // Tuple lookup needs owned keys.
        self.pairs.contains(&(
            sentence_id.to_string(),
            person.to_string(),
            object.to_string(),
        ))
    }

    /// Gold label of a candidate; anything not annotated is negative.
    pub fn label(&self, sentence_id: &str, person: &str, object: &str) -> Label {
        Label::from(self.contains(sentence_id, person, object))
    }

    /// Whether `sentence_id` appears in the annotations under any relation.
    pub fn has_sentence(&self, sentence_id: &str) -> bool {
        self.sentences.contains(sentence_id)
    }

    pub fn relation(&self) -> RelationKind {
        self.relation
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
