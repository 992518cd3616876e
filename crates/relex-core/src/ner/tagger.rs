use crate::error::Result;
use crate::types::TagSequence;

/// A named-entity tagger that labels pre-tokenized sentences.
///
/// Taggers are constructed once, from explicitly supplied model paths or
/// dictionaries, and handed to whichever component needs them.
pub trait NamedEntityTagger {
    /// Tag one sentence. The result has exactly one entry per input word.
    fn tag(&self, words: &[String]) -> Result<TagSequence>;

    /// Tag many sentences at once. Implementations backed by an external
    /// process override this to amortize start-up cost.
    fn tag_batch(&self, sentences: &[Vec<String>]) -> Result<Vec<TagSequence>> {
        sentences.iter().map(|words| self.tag(words)).collect()
    }

    /// Short name for logs.
    fn name(&self) -> &str;

    /// Identifies the tagger's model or dictionary. Two taggers with equal
    /// fingerprints tag every sentence the same way.
    fn fingerprint(&self) -> String {
        self.name().to_string()
    }
}

impl<T: NamedEntityTagger + ?Sized> NamedEntityTagger for Box<T> {
    fn tag(&self, words: &[String]) -> Result<TagSequence> {
        (**self).tag(words)
    }

    fn tag_batch(&self, sentences: &[Vec<String>]) -> Result<Vec<TagSequence>> {
        (**self).tag_batch(sentences)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn fingerprint(&self) -> String {
        (**self).fingerprint()
    }
}
