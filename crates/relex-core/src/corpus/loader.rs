//! # Corpus Loader
//!
//! Reads the token-per-line corpus format:
//!
//! ```text
//! #id: sent1
//! #text: Ms. Smith lives in Paris .
//! 1	Ms.	Ms.	NNP	PROPN	2	compound	O
//! 2	Smith	Smith	NNP	PROPN	3	nsubj	PERSON
//! ...
//!
//! #id: sent2
//! ```
//!
//! The first non-blank line after a blank line is a header whose last token
//! is the sentence identifier. Body lines start with the numeric token index;
//! any other line is a comment.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use super::{Corpus, CorpusBuilder};
use crate::error::{RelexError, Result};
use crate::types::{Sentence, TokenRecord};

/// index, word, lemma, fine POS, coarse POS, head, label, NER.
pub const MIN_COLUMNS: usize = 8;

/// Load a corpus file.
///
/// # Errors
///
/// Any malformed body line aborts loading of the whole file.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let corpus = parse_corpus(BufReader::new(file))?;
    info!(
        path = %path.display(),
        sentences = corpus.len(),
        tokens = corpus.token_count(),
        "loaded corpus"
    );
    Ok(corpus)
}

/// Parse a corpus from any buffered reader.
pub fn parse_corpus<R: BufRead>(reader: R) -> Result<Corpus> {
    let mut builder = CorpusBuilder::new();
    let mut current: Option<PendingSentence> = None;
    let mut awaiting_header = true;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();

        if fields.is_empty() {
            if let Some(pending) = current.take() {
                builder.push(pending.finish()?)?;
            }
            awaiting_header = true;
            continue;
        }

        if awaiting_header {
            // Non-empty, so `last` always exists.
            let id = fields[fields.len() - 1].to_string();
            current = Some(PendingSentence::new(id));
            awaiting_header = false;
            continue;
        }

        if !fields[0].chars().all(|c| c.is_ascii_digit()) {
            debug!(line = line_no, "skipping comment line");
            continue;
        }

        if let Some(pending) = current.as_mut() {
            pending.push_row(line_no, &fields)?;
        }
    }

    if let Some(pending) = current.take() {
        builder.push(pending.finish()?)?;
    }

    Ok(builder.finalize())
}

/// A sentence whose body lines are still being read.
struct PendingSentence {
    id: String,
    tokens: Vec<TokenRecord>,
    /// Source line of every token, for error reporting.
    lines: Vec<usize>,
}

impl PendingSentence {
    fn new(id: String) -> Self {
        Self {
            id,
            tokens: Vec::new(),
            lines: Vec::new(),
        }
    }

    fn push_row(&mut self, line: usize, fields: &[&str]) -> Result<()> {
        if fields.len() < MIN_COLUMNS {
            return Err(RelexError::MalformedLine {
                line,
                reason: format!(
                    "expected at least {MIN_COLUMNS} columns, found {}",
                    fields.len()
                ),
            });
        }

        let index = parse_index(line, "token index", fields[0])?;
        let expected = self.tokens.len() + 1;
        if index != expected {
            return Err(RelexError::MalformedLine {
                line,
                reason: format!("token index {index} out of sequence (expected {expected})"),
            });
        }

        self.tokens.push(TokenRecord {
            index,
            word: fields[1].to_string(),
            lemma: fields[2].to_string(),
            fine_pos: fields[3].to_string(),
            coarse_pos: fields[4].to_string(),
            head_index: parse_index(line, "head index", fields[5])?,
            dependency_label: fields[6].to_string(),
            raw_ner: fields[fields.len() - 1].to_string(),
        });
        self.lines.push(line);
        Ok(())
    }

    fn finish(self) -> Result<Sentence> {
        let n = self.tokens.len();
        for (token, &line) in self.tokens.iter().zip(&self.lines) {
            if token.head_index > n {
                return Err(RelexError::MalformedLine {
                    line,
                    reason: format!(
                        "head index {} outside sentence of {n} tokens",
                        token.head_index
                    ),
                });
            }
        }
        Ok(Sentence::new(self.id, self.tokens))
    }
}

fn parse_index(line: usize, what: &str, raw: &str) -> Result<usize> {
    raw.parse().map_err(|_| RelexError::MalformedLine {
        line,
        reason: format!("{what} {raw:?} is not a non-negative integer"),
    })
}
