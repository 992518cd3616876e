//! # Annotated Corpus
//!
//! Sentences of a token-per-line corpus produced by an external tagger and
//! dependency parser. A [`CorpusBuilder`] accumulates sentences while a file
//! is read; [`CorpusBuilder::finalize`] freezes them into a read-only
//! [`Corpus`].

pub mod loader;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{RelexError, Result};
use crate::types::Sentence;

pub use loader::{load_corpus, parse_corpus};

/// Read-only mapping from sentence identifier to sentence, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    sentences: Vec<Sentence>,
    by_id: HashMap<String, usize>,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Sentence> {
        self.by_id.get(id).map(|&i| &self.sentences[i])
    }

    /// Iterates sentences in the order they appeared in the source file.
    pub fn iter(&self) -> std::slice::Iter<'_, Sentence> {
        self.sentences.iter()
    }

    /// Total number of tokens over all sentences.
    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(Sentence::len).sum()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Sentence;
    type IntoIter = std::slice::Iter<'a, Sentence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sentences.iter()
    }
}

/// Incremental constructor for a [`Corpus`].
#[derive(Debug, Default)]
pub struct CorpusBuilder {
    sentences: Vec<Sentence>,
    by_id: HashMap<String, usize>,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a complete sentence.
    ///
    /// # Errors
    ///
    /// Returns `RelexError::DuplicateSentence` if the identifier was already added.
    pub fn push(&mut self, sentence: Sentence) -> Result<()> {
        if self.by_id.contains_key(&sentence.id) {
            return Err(RelexError::DuplicateSentence(sentence.id));
        }
        self.by_id.insert(sentence.id.clone(), self.sentences.len());
        self.sentences.push(sentence);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Freezes the accumulated sentences.
    pub fn finalize(self) -> Corpus {
        Corpus {
            sentences: self.sentences,
            by_id: self.by_id,
        }
    }
}
