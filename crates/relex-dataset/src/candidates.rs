//! Candidate (person, object) pairs of one sentence.

use relex_core::ner::{EntityIndex, EntitySpan};
use relex_core::NerTag;

/// A person span paired with a possible relation object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePair {
    pub person: EntitySpan,
    pub object: EntitySpan,
}

/// Pair every distinct person text with every distinct `object_tag` text.
///
/// When a text occurs more than once, the two occurrences closest to each
/// other are used; ties go to the earliest pair.
pub fn candidate_pairs(entities: &EntityIndex, object_tag: &NerTag) -> Vec<CandidatePair> {
    let persons = entities.grouped(&NerTag::Person);
    let objects = entities.grouped(object_tag);

    let mut pairs = Vec::with_capacity(persons.len() * objects.len());
    for (_, person_spans) in persons {
        for (_, object_spans) in objects {
            if let Some(pair) = nearest(person_spans, object_spans) {
                pairs.push(pair);
            }
        }
    }
    pairs
}

fn nearest(persons: &[EntitySpan], objects: &[EntitySpan]) -> Option<CandidatePair> {
    persons
        .iter()
        .flat_map(|p| objects.iter().map(move |o| (p, o)))
        .min_by_key(|(p, o)| p.start.abs_diff(o.start))
        .map(|(p, o)| CandidatePair {
            person: p.clone(),
            object: o.clone(),
        })
}
