//! # Pairwise Feature Extractor
//!
//! Turns one (person, object) candidate into the ordered feature vector the
//! classifier consumes. Column order:
//!
//! | # | Feature |
//! |---|---------|
//! | 1 | `Yes`/`No` dependency connection |
//! | 2 | dependency distance (`999` when disconnected) |
//! | 3 | person window block |
//! | 4 | tag-of-interest counts |
//! | 5 | dependency route labels, route POS |
//! | 6 | route crosses a person, route crosses a location |
//! | 7 | sorted verb lemmas |
//! | 8 | object window block |
//! | 9 | token distance between the span starts |
//! | 10 | tag-of-interest counts, repeated |
//! | 11 | entity count, twice |
//!
//! A window block holds the lemmas left of the span, the POS window, lemma
//! pairs inside each half, POS pairs inside the right half, and the coarse
//! POS sequence before the span.

use tracing::debug;

use super::window::{ordered_pairs, window_around};
use crate::config::{ExtractorConfig, PosLayer};
use crate::dependency::{join_routes, PathIndex};
use crate::error::{RelexError, Result};
use crate::ner::EntitySpan;
use crate::types::{FeatureVector, Sentence};

const CONNECTED: &str = "Yes";
const DISCONNECTED: &str = "No";
const VERB: &str = "VERB";

/// Builds feature vectors for candidate pairs.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: ExtractorConfig,
}

impl FeatureExtractor {
    /// Create an extractor.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration is unusable.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Number of values in every vector this extractor produces.
    pub fn feature_count(&self) -> usize {
        let counts = self.config.tags_of_interest.len();
        2 + 2 * self.block_len() + 2 * counts + 2 + 2 + 1 + 1 + 2
    }

    fn block_len(&self) -> usize {
        let k = self.config.window_radius;
        let half_pairs = k * k.saturating_sub(1) / 2;
        k + 2 * k + 3 * half_pairs + 1
    }

    /// Extract the features of `person` paired with `object`.
    ///
    /// `paths` must be the index of `sentence`, and `entity_count` the
    /// number of distinct entity tags found in it.
    ///
    /// # Errors
    ///
    /// Returns `SpanMisaligned` if either span does not line up with the
    /// sentence tokens.
    pub fn extract(
        &self,
        person: &EntitySpan,
        object: &EntitySpan,
        sentence: &Sentence,
        paths: &PathIndex,
        entity_count: usize,
    ) -> Result<FeatureVector> {
        check_alignment(person, sentence)?;
        check_alignment(object, sentence)?;

        let route = join_routes(
            paths.path(person.start).unwrap_or_default(),
            paths.path(object.start).unwrap_or_default(),
            sentence,
        );
        debug!(
            sentence = %sentence.id,
            person = %person.text,
            object = %object.text,
            distance = route.distance,
            "extracting pair"
        );

        let mut features = FeatureVector::new();
        features.push(if route.connected() { CONNECTED } else { DISCONNECTED });
        features.push(route.distance);

        self.push_block(&mut features, person, sentence);
        self.push_counts(&mut features, sentence);

        features.push(route.joined_labels());
        features.push(route.joined_pos());
        features.push(route.crosses_person);
        features.push(route.crosses_location);

        let mut verbs: Vec<&str> = sentence
            .tokens
            .iter()
            .filter(|t| t.coarse_pos == VERB)
            .map(|t| t.lemma.as_str())
            .collect();
        verbs.sort_unstable();
        features.push(verbs.join("_"));

        self.push_block(&mut features, object, sentence);
        features.push(person.start.abs_diff(object.start));
        self.push_counts(&mut features, sentence);
        features.push(entity_count);
        features.push(entity_count);

        Ok(features)
    }

    fn push_block(&self, features: &mut FeatureVector, span: &EntitySpan, sentence: &Sentence) {
        let k = self.config.window_radius;
        let span_range = span.start - 1..span.end;

        let lemmas: Vec<&str> = sentence.tokens.iter().map(|t| t.lemma.as_str()).collect();
        let pos: Vec<&str> = sentence
            .tokens
            .iter()
            .map(|t| match self.config.window_pos {
                PosLayer::Coarse => t.coarse_pos.as_str(),
                PosLayer::Fine => t.fine_pos.as_str(),
            })
            .collect();

        let lemma_window = window_around(&lemmas, span_range.clone(), k);
        let pos_window = window_around(&pos, span_range, k);

        features.extend(lemma_window.left.iter().copied());
        features.extend(pos_window.items());
        features.extend(ordered_pairs(&lemma_window.left));
        features.extend(ordered_pairs(&lemma_window.right));
        features.extend(ordered_pairs(&pos_window.right));

        let preceding: Vec<&str> = sentence.tokens[..span.start - 1]
            .iter()
            .map(|t| t.coarse_pos.as_str())
            .collect();
        features.push(preceding.join("_"));
    }

    fn push_counts(&self, features: &mut FeatureVector, sentence: &Sentence) {
        for tag in &self.config.tags_of_interest {
            let count = sentence.tokens.iter().filter(|t| t.coarse_pos == *tag).count();
            features.push(count);
        }
    }
}

fn check_alignment(span: &EntitySpan, sentence: &Sentence) -> Result<()> {
    let misaligned = || RelexError::SpanMisaligned {
        text: span.text.clone(),
        start: span.start,
        end: span.end,
    };

    if span.start == 0 || span.end < span.start {
        return Err(misaligned());
    }
    let first = sentence.token(span.start).ok_or_else(misaligned)?;
    let last = sentence.token(span.end).ok_or_else(misaligned)?;
    if first.word != span.first_word() || last.word != span.last_word() {
        return Err(misaligned());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::DISCONNECTED_DISTANCE;
    use crate::features::window::{END_MARKER, START_MARKER};
    use crate::types::token::fixtures::smith_in_paris;
    use crate::types::{FeatureValue, NerTag};

    fn span(text: &str, tag: NerTag, start: usize, end: usize) -> EntitySpan {
        EntitySpan {
            text: text.into(),
            tag,
            start,
            end,
        }
    }

    fn render(features: &FeatureVector) -> Vec<String> {
        features.iter().map(ToString::to_string).collect()
    }

    fn extract(person: &EntitySpan, object: &EntitySpan, config: ExtractorConfig) -> Vec<String> {
        let sentence = smith_in_paris();
        let paths = PathIndex::build(&sentence).unwrap();
        let extractor = FeatureExtractor::new(config).unwrap();
        let features = extractor
            .extract(person, object, &sentence, &paths, 2)
            .unwrap();
        assert_eq!(features.len(), extractor.feature_count());
        render(&features)
    }

    #[test]
    fn test_default_schema_has_54_columns() {
        let extractor = FeatureExtractor::new(ExtractorConfig::default()).unwrap();
        assert_eq!(extractor.feature_count(), 54);
        let extractor =
            FeatureExtractor::new(ExtractorConfig::default().with_window_radius(1)).unwrap();
        assert_eq!(extractor.feature_count(), 2 + 2 * 4 + 6 + 8);
    }

    #[test]
    fn test_full_vector_for_disconnected_pair() {
        let person = span("Ms. Smith", NerTag::Person, 1, 2);
        let paris = span("Paris", NerTag::Location, 8, 8);
        let got = extract(&person, &paris, ExtractorConfig::default());

        let s = START_MARKER;
        let e = END_MARKER;
        let ss = format!("{s}_{s}");
        let ee = format!("{e}_{e}");
        let dot_e = format!("._{e}");
        let punct_e = format!("PUNCT_{e}");
        let expected: Vec<&str> = vec![
            "No", "999",
            // person block
            s, s, s,
            s, s, s, "VERB", "ADP", "DET",
            ss.as_str(), ss.as_str(), ss.as_str(),
            "live_in", "live_the", "in_the",
            "VERB_ADP", "VERB_DET", "ADP_DET",
            "",
            // counts
            "3", "0", "1",
            // route
            "", "", "False", "False",
            // verbs
            "live",
            // object block
            "the", "city", "of",
            "DET", "NOUN", "ADP", "PUNCT", e, e,
            "the_city", "the_of", "city_of",
            dot_e.as_str(), dot_e.as_str(), ee.as_str(),
            punct_e.as_str(), punct_e.as_str(), ee.as_str(),
            "PROPN_PROPN_VERB_ADP_DET_NOUN_ADP",
            // tail
            "7", "3", "0", "1", "2", "2",
        ];
        assert_eq!(got, expected);
    }

    #[test]
    fn test_connected_pair_carries_route() {
        let city = span("city", NerTag::Person, 6, 6);
        let paris = span("Paris", NerTag::Location, 8, 8);
        let got = extract(&city, &paris, ExtractorConfig::default());
        assert_eq!(got[0], "Yes");
        assert_eq!(got[1], "4");
        assert_eq!(got[24], "pobj1_prep1");
        assert_eq!(got[25], "IN_NN");
    }

    #[test]
    fn test_fine_window_layer() {
        let person = span("Ms. Smith", NerTag::Person, 1, 2);
        let paris = span("Paris", NerTag::Location, 8, 8);
        let got = extract(
            &person,
            &paris,
            ExtractorConfig::default().with_window_pos(PosLayer::Fine),
        );
        assert_eq!(&got[8..11], &["VBZ", "IN", "DT"]);
        // The preceding sequence always uses simplified tags.
        assert_eq!(got[47], "PROPN_PROPN_VERB_ADP_DET_NOUN_ADP");
    }

    #[test]
    fn test_booleans_render_capitalized() {
        let person = span("Ms. Smith", NerTag::Person, 1, 2);
        let paris = span("Paris", NerTag::Location, 8, 8);
        let sentence = smith_in_paris();
        let paths = PathIndex::build(&sentence).unwrap();
        let features = FeatureExtractor::new(ExtractorConfig::default())
            .unwrap()
            .extract(&person, &paris, &sentence, &paths, 1)
            .unwrap();
        assert_eq!(features.get(1), Some(&FeatureValue::Int(DISCONNECTED_DISTANCE as i64)));
        assert_eq!(features.get(26), Some(&FeatureValue::Bool(false)));
    }

    #[test]
    fn test_misaligned_span_is_rejected() {
        let sentence = smith_in_paris();
        let paths = PathIndex::build(&sentence).unwrap();
        let extractor = FeatureExtractor::new(ExtractorConfig::default()).unwrap();
        let person = span("Ms. Smith", NerTag::Person, 1, 2);

        for bad in [
            span("Paris", NerTag::Location, 7, 7),
            span("Paris", NerTag::Location, 0, 0),
            span("Paris", NerTag::Location, 12, 12),
            span("Paris", NerTag::Location, 8, 7),
        ] {
            let err = extractor
                .extract(&person, &bad, &sentence, &paths, 2)
                .unwrap_err();
            assert!(matches!(err, RelexError::SpanMisaligned { .. }));
        }
    }

    #[test]
    fn test_zero_radius_is_rejected() {
        let err = FeatureExtractor::new(ExtractorConfig::default().with_window_radius(0)).unwrap_err();
        assert!(matches!(err, RelexError::InvalidConfig(_)));
    }
}
