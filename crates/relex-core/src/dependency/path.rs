//! # Root Paths
//!
//! For every token, the chain of dependency edges leading up to the root.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{RelexError, Result};
use crate::types::Sentence;

/// One edge on the way to the root: the token `index`/`word` attaches to
/// `head` with `label`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathHop {
    pub head: usize,
    pub label: String,
    pub word: String,
    pub index: usize,
}

/// Root paths of every token of one sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathIndex {
    /// `paths[i]` is the path of token `i + 1`.
    paths: Vec<Vec<PathHop>>,
    words: Vec<String>,
}

impl PathIndex {
    /// Compute the root path of every token in `sentence`.
    ///
    /// # Errors
    ///
    /// - `CycleDetected` if a head chain revisits a token before reaching a
    ///   `ROOT` label;
    /// - `InvalidHead` if a chain reaches head `0` (or a missing token)
    ///   without passing a `ROOT` label.
    pub fn build(sentence: &Sentence) -> Result<Self> {
        let n = sentence.len();
        let mut paths = Vec::with_capacity(n);

        for start in &sentence.tokens {
            let mut visited = vec![false; n + 1];
            let mut path = Vec::new();
            let mut current = start;

            while !current.is_root() {
                if visited[current.index] {
                    warn!(sentence = %sentence.id, index = current.index, "dependency cycle");
                    return Err(RelexError::CycleDetected {
                        sentence_id: sentence.id.clone(),
                        index: current.index,
                    });
                }
                visited[current.index] = true;

                path.push(PathHop {
                    head: current.head_index,
                    label: current.dependency_label.clone(),
                    word: current.word.clone(),
                    index: current.index,
                });

                current = sentence.token(current.head_index).ok_or_else(|| {
                    RelexError::InvalidHead {
                        sentence_id: sentence.id.clone(),
                        index: current.index,
                        head: current.head_index,
                    }
                })?;
            }

            paths.push(path);
        }

        Ok(Self {
            paths,
            words: sentence.tokens.iter().map(|t| t.word.clone()).collect(),
        })
    }

    /// Root path of the token at 1-based `index`.
    pub fn path(&self, index: usize) -> Option<&[PathHop]> {
        index
            .checked_sub(1)
            .and_then(|i| self.paths.get(i))
            .map(Vec::as_slice)
    }

    /// Root path of the last token spelled `word`.
    ///
    /// Repeated words shadow earlier occurrences; prefer [`PathIndex::path`]
    /// when the token index is known.
    pub fn by_word(&self, word: &str) -> Option<&[PathHop]> {
        self.words
            .iter()
            .rposition(|w| w == word)
            .map(|i| self.paths[i].as_slice())
    }

    /// Word-keyed view of all paths; later occurrences of a word overwrite
    /// earlier ones.
    pub fn word_map(&self) -> HashMap<&str, &[PathHop]> {
        self.words
            .iter()
            .zip(&self.paths)
            .map(|(w, p)| (w.as_str(), p.as_slice()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
