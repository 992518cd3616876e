//! # Entity Spans
//!
//! Collapses runs of identical tags into multi-word entities.
//!
//! Span boundaries use the same 1-based, inclusive token indices as
//! [`TokenRecord::index`](crate::types::TokenRecord::index).

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::types::{NerTag, TagSequence};

/// A maximal run of same-tag tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Words of the run joined by single spaces.
    pub text: String,
    pub tag: NerTag,
    /// 1-based index of the first token.
    pub start: usize,
    /// 1-based index of the last token.
    pub end: usize,
}

impl EntitySpan {
    /// Number of tokens covered.
    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    pub fn first_word(&self) -> &str {
        self.text.split(' ').next().unwrap_or_default()
    }

    pub fn last_word(&self) -> &str {
        self.text.rsplit(' ').next().unwrap_or_default()
    }
}

/// Extract all entity spans from a reconciled tag sequence.
///
/// # Examples
/// ```
/// use relex_core::ner::extract_spans;
/// use relex_core::types::{NerTag, TaggedWord};
///
/// let tags = vec![
///     TaggedWord::new("Ms.", NerTag::Person),
///     TaggedWord::new("Smith", NerTag::Person),
///     TaggedWord::new("left", NerTag::Outside),
/// ];
/// let spans = extract_spans(&tags);
/// assert_eq!(spans.len(), 1);
/// assert_eq!(spans[0].text, "Ms. Smith");
/// assert_eq!(spans[0].end, 2);
/// ```
pub fn extract_spans(tags: &TagSequence) -> Vec<EntitySpan> {
    let mut spans = Vec::new();
    let mut i = 0;

    while i < tags.len() {
        let tag = &tags[i].tag;
        if tag.is_outside() {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < tags.len() && tags[j].tag == *tag {
            j += 1;
        }

        let text = tags[i..j]
            .iter()
            .map(|t| t.word.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        spans.push(EntitySpan {
            text,
            tag: tag.clone(),
            start: i + 1,
            end: j,
        });
        i = j;
    }

    spans
}

/// Entity spans of one sentence grouped by tag and surface text.
#[derive(Debug, Clone, Default)]
pub struct EntityIndex {
    /// tag -> surface text -> occurrences, texts in first-seen order.
    groups: HashMap<NerTag, Vec<(String, Vec<EntitySpan>)>>,
    tags: BTreeSet<NerTag>,
}

impl EntityIndex {
    pub fn new(spans: &[EntitySpan]) -> Self {
        let mut index = Self::default();
        for span in spans {
            index.tags.insert(span.tag.clone());
            let groups = index.groups.entry(span.tag.clone()).or_default();
            match groups.iter_mut().find(|(text, _)| *text == span.text) {
                Some((_, occurrences)) => occurrences.push(span.clone()),
                None => groups.push((span.text.clone(), vec![span.clone()])),
            }
        }
        index
    }

    /// Distinct surface texts carrying `tag`, with all their occurrences.
    pub fn grouped(&self, tag: &NerTag) -> &[(String, Vec<EntitySpan>)] {
        self.groups.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct entity tags in the sentence.
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaggedWord;
    use proptest::prelude::*;

    fn seq(pairs: &[(&str, NerTag)]) -> TagSequence {
        pairs
            .iter()
            .map(|(w, t)| TaggedWord::new(*w, t.clone()))
            .collect()
    }

    #[test]
    fn test_runs_become_spans() {
        let tags = seq(&[
            ("John", NerTag::Person),
            ("Smith", NerTag::Person),
            ("of", NerTag::Outside),
            ("New", NerTag::Location),
            ("York", NerTag::Location),
            ("IBM", NerTag::Organization),
        ]);
        let spans = extract_spans(&tags);
        assert_eq!(spans.len(), 3);
        assert_eq!(
            spans[0],
            EntitySpan {
                text: "John Smith".into(),
                tag: NerTag::Person,
                start: 1,
                end: 2
            }
        );
        assert_eq!(spans[1].text, "New York");
        assert_eq!((spans[1].start, spans[1].end), (4, 5));
        assert_eq!(spans[2].text, "IBM");
        assert_eq!((spans[2].start, spans[2].end), (6, 6));
        assert_eq!(spans[2].len(), 1);
    }

    #[test]
    fn test_all_outside_yields_nothing() {
        let tags = seq(&[("a", NerTag::Outside), ("b", NerTag::Outside)]);
        assert!(extract_spans(&tags).is_empty());
        assert!(extract_spans(&Vec::new()).is_empty());
    }

    #[test]
    fn test_first_and_last_word() {
        let span = EntitySpan {
            text: "Ms. Jane Smith".into(),
            tag: NerTag::Person,
            start: 3,
            end: 5,
        };
        assert_eq!(span.first_word(), "Ms.");
        assert_eq!(span.last_word(), "Smith");
    }

    #[test]
    fn test_entity_index_groups_by_text() {
        let tags = seq(&[
            ("Paris", NerTag::Location),
            ("and", NerTag::Outside),
            ("Rome", NerTag::Location),
            ("and", NerTag::Outside),
            ("Paris", NerTag::Location),
            ("Bob", NerTag::Person),
        ]);
        let index = EntityIndex::new(&extract_spans(&tags));
        let locations = index.grouped(&NerTag::Location);
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].0, "Paris");
        assert_eq!(locations[0].1.len(), 2);
        assert_eq!(locations[1].0, "Rome");
        assert_eq!(index.tag_count(), 2);
        assert!(index.grouped(&NerTag::Organization).is_empty());
    }

    fn tag_strategy() -> impl Strategy<Value = NerTag> {
        prop_oneof![
            Just(NerTag::Outside),
            Just(NerTag::Person),
            Just(NerTag::Location),
            Just(NerTag::Organization),
        ]
    }

    proptest! {
        #[test]
        fn spans_never_overlap(tags in proptest::collection::vec(tag_strategy(), 0..40)) {
            let sequence: TagSequence = tags
                .iter()
                .enumerate()
                .map(|(i, t)| TaggedWord::new(format!("w{i}"), t.clone()))
                .collect();
            let spans = extract_spans(&sequence);

            let mut covered = vec![0usize; sequence.len() + 1];
            for span in &spans {
                prop_assert!(span.start >= 1 && span.start <= span.end);
                prop_assert!(span.end <= sequence.len());
                for idx in span.start..=span.end {
                    covered[idx] += 1;
                    prop_assert_eq!(&sequence[idx - 1].tag, &span.tag);
                }
            }
            prop_assert!(covered.iter().all(|&c| c <= 1));

            let tagged = sequence.iter().filter(|t| !t.tag.is_outside()).count();
            let in_spans: usize = spans.iter().map(EntitySpan::len).sum();
            prop_assert_eq!(tagged, in_spans);
        }
    }
}
