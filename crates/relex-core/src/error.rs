use thiserror::Error;

/// Errors that can occur while loading corpora and extracting features.
#[derive(Debug, Error)]
pub enum RelexError {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A corpus line could not be parsed. Loading of the whole file is aborted.
    #[error("malformed corpus line {line}: {reason}")]
    MalformedLine {
        /// 1-based line number in the corpus file.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// The same sentence identifier appeared twice in one corpus.
    #[error("duplicate sentence identifier {0:?}")]
    DuplicateSentence(String),

    /// Two NER tag sequences for one sentence have different lengths.
    #[error("NER sequences are misaligned: {primary} tags vs {secondary} tags")]
    NerLengthMismatch {
        /// Length of the primary sequence.
        primary: usize,
        /// Length of the sequence it was compared against.
        secondary: usize,
    },

    /// Two NER tag sequences disagree on the word at a position.
    #[error("NER sequences disagree at position {position}: {primary:?} vs {secondary:?}")]
    NerTokenMismatch {
        /// 0-based position in the sequences.
        position: usize,
        /// Word from the primary sequence.
        primary: String,
        /// Word from the secondary sequence.
        secondary: String,
    },

    /// Walking head links revisited a token without reaching the root.
    #[error("dependency cycle detected in sentence {sentence_id:?} at token {index}")]
    CycleDetected {
        /// Sentence in which the cycle was found.
        sentence_id: String,
        /// Token index that was visited twice.
        index: usize,
    },

    /// A token points at a head that does not exist.
    #[error("token {index} in sentence {sentence_id:?} has invalid head {head}")]
    InvalidHead {
        /// Sentence containing the token.
        sentence_id: String,
        /// 1-based token index.
        index: usize,
        /// The offending head index.
        head: usize,
    },

    /// An entity span does not line up with the sentence tokens.
    #[error("entity span {text:?} does not match tokens {start}..={end}")]
    SpanMisaligned {
        /// Surface text of the span.
        text: String,
        /// 1-based first token index.
        start: usize,
        /// 1-based last token index.
        end: usize,
    },

    /// An external named-entity tagger failed or produced unusable output.
    #[error("tagger error: {0}")]
    Tagger(String),

    /// A regex pattern failed to compile.
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for relex operations.
pub type Result<T> = std::result::Result<T, RelexError>;
