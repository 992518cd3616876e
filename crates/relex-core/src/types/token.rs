use serde::{Deserialize, Serialize};

use super::tag::{NerTag, TagSequence, TaggedWord};

/// Dependency label that marks the sentence root.
pub const ROOT_LABEL: &str = "ROOT";

/// Fine-grained tag of the possessive marker (`'s`).
pub const POSSESSIVE_TAG: &str = "POS";

/// One parsed token, as emitted by the upstream tagger/parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// 1-based position within the sentence.
    pub index: usize,
    pub word: String,
    pub lemma: String,
    /// Fine-grained POS tag (`NNP`, `DT`, `POS`, ...).
    pub fine_pos: String,
    /// Simplified POS tag (`PROPN`, `VERB`, `DET`, ...).
    pub coarse_pos: String,
    /// 1-based index of the syntactic head, `0` for the root.
    pub head_index: usize,
    pub dependency_label: String,
    /// NER column of the corpus row, unnormalized.
    pub raw_ner: String,
}

impl TokenRecord {
    /// Returns `true` if this token is the root of the dependency tree.
    pub fn is_root(&self) -> bool {
        self.dependency_label == ROOT_LABEL
    }

    /// Returns `true` for determiners under either tag set.
    pub fn is_determiner(&self) -> bool {
        self.fine_pos == "DT" || self.coarse_pos == "DET"
    }

    /// The raw NER column parsed as a tag.
    pub fn raw_tag(&self) -> NerTag {
        NerTag::parse(&self.raw_ner)
    }
}

/// A sentence of the annotated corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub id: String,
    pub tokens: Vec<TokenRecord>,
}

impl Sentence {
    pub fn new(id: impl Into<String>, tokens: Vec<TokenRecord>) -> Self {
        Self {
            id: id.into(),
            tokens,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Looks up a token by its 1-based index.
    pub fn token(&self, index: usize) -> Option<&TokenRecord> {
        index.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    pub fn words(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.word.clone()).collect()
    }

    /// The corpus's own NER view of this sentence.
    ///
    /// - `GPE` is rewritten to `LOCATION`;
    /// - possessive markers are forced to `O`;
    /// - a `PERSON` token directly after one of `titles` pulls the title into
    ///   the person.
    pub fn ner_tags(&self, titles: &[String]) -> TagSequence {
        let mut tags: TagSequence = Vec::with_capacity(self.tokens.len());

        for token in &self.tokens {
            let mut tag = token.raw_tag();
            if matches!(tag, NerTag::Other(ref raw) if raw == "GPE") {
                tag = NerTag::Location;
            }
            if token.fine_pos == POSSESSIVE_TAG {
                tag = NerTag::Outside;
            }
            if tag == NerTag::Person {
                if let Some(prev) = tags.last_mut() {
                    if titles.iter().any(|t| *t == prev.word) {
                        prev.tag = NerTag::Person;
                    }
                }
            }
            tags.push(TaggedWord::new(token.word.clone(), tag));
        }

        tags
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Builds a token from the seven parser columns plus a raw NER tag.
    pub fn token(
        index: usize,
        word: &str,
        lemma: &str,
        fine: &str,
        coarse: &str,
        head: usize,
        label: &str,
        ner: &str,
    ) -> TokenRecord {
        TokenRecord {
            index,
            word: word.into(),
            lemma: lemma.into(),
            fine_pos: fine.into(),
            coarse_pos: coarse.into(),
            head_index: head,
            dependency_label: label.into(),
            raw_ner: ner.into(),
        }
    }

    /// "Ms. Smith lives in the city of Paris ."
    pub fn smith_in_paris() -> Sentence {
        Sentence::new(
            "sent1",
            vec![
                token(1, "Ms.", "Ms.", "NNP", "PROPN", 2, "compound", "O"),
                token(2, "Smith", "Smith", "NNP", "PROPN", 3, "nsubj", "PERSON"),
                token(3, "lives", "live", "VBZ", "VERB", 0, "ROOT", "O"),
                token(4, "in", "in", "IN", "ADP", 3, "prep", "O"),
                token(5, "the", "the", "DT", "DET", 6, "det", "O"),
                token(6, "city", "city", "NN", "NOUN", 4, "pobj", "O"),
                token(7, "of", "of", "IN", "ADP", 6, "prep", "O"),
                token(8, "Paris", "Paris", "NNP", "PROPN", 7, "pobj", "GPE"),
                token(9, ".", ".", ".", "PUNCT", 3, "punct", "O"),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn titles() -> Vec<String> {
        vec!["Mrs.".into(), "Ms.".into()]
    }

    #[test]
    fn test_token_lookup_is_one_based() {
        let sentence = smith_in_paris();
        assert_eq!(sentence.token(1).unwrap().word, "Ms.");
        assert_eq!(sentence.token(9).unwrap().word, ".");
        assert!(sentence.token(0).is_none());
        assert!(sentence.token(10).is_none());
    }

    #[test]
    fn test_ner_tags_title_and_gpe() {
        let tags = smith_in_paris().ner_tags(&titles());
        assert_eq!(tags[0], TaggedWord::new("Ms.", NerTag::Person));
        assert_eq!(tags[1].tag, NerTag::Person);
        assert_eq!(tags[7], TaggedWord::new("Paris", NerTag::Location));
        assert_eq!(tags[2].tag, NerTag::Outside);
    }

    #[test]
    fn test_ner_tags_possessive_is_outside() {
        let sentence = Sentence::new(
            "s",
            vec![
                token(1, "Obama", "Obama", "NNP", "PROPN", 3, "poss", "PERSON"),
                token(2, "'s", "'s", "POS", "PART", 1, "case", "PERSON"),
                token(3, "dog", "dog", "NN", "NOUN", 0, "ROOT", "O"),
            ],
        );
        let tags = sentence.ner_tags(&titles());
        assert_eq!(tags[0].tag, NerTag::Person);
        assert_eq!(tags[1].tag, NerTag::Outside);
    }

    #[test]
    fn test_is_determiner() {
        assert!(token(1, "the", "the", "DT", "DET", 0, "ROOT", "O").is_determiner());
        assert!(token(1, "a", "a", "X", "DET", 0, "ROOT", "O").is_determiner());
        assert!(!token(1, "in", "in", "IN", "ADP", 0, "ROOT", "O").is_determiner());
    }
}
