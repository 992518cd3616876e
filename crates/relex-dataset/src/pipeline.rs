//! # Dataset Pipeline
//!
//! corpus -> reconciled NER -> spans + root paths -> candidates -> labeled
//! feature lines.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use relex_core::dependency::PathIndex;
use relex_core::ner::{extract_spans, reconcile, EntityIndex, NamedEntityTagger};
use relex_core::serialize::FeatureWriter;
use relex_core::types::TagSequence;
use relex_core::{load_corpus, Corpus, FeatureExtractor, FeatureVector, Label, RelexError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::annotations::Annotations;
use crate::cache::StageCache;
use crate::candidates::candidate_pairs;
use crate::config::DatasetConfig;

/// Reconciled NER tags of every sentence, by sentence id.
pub type TaggedCorpus = HashMap<String, TagSequence>;

/// Root paths of every sentence, by sentence id.
pub type CorpusPaths = HashMap<String, PathIndex>;

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub sentences: usize,
    /// Sentences left out because the annotation file never mentions them.
    pub unannotated: usize,
    /// Sentences that produced at least one candidate.
    pub sentences_with_candidates: usize,
    pub candidates: usize,
    pub positives: usize,
    /// Candidates dropped because their spans did not line up with the tokens.
    pub skipped: usize,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sentences ({} unannotated, {} with candidates), {} candidates, {} positive, {} skipped",
            self.sentences,
            self.unannotated,
            self.sentences_with_candidates,
            self.candidates,
            self.positives,
            self.skipped
        )
    }
}

/// One labeled candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub sentence_id: String,
    pub person: String,
    pub object: String,
    pub label: Label,
    pub features: FeatureVector,
}

/// Builds labeled feature files from a corpus.
pub struct DatasetBuilder {
    config: DatasetConfig,
    extractor: FeatureExtractor,
    tagger: Option<Box<dyn NamedEntityTagger>>,
}

impl DatasetBuilder {
    /// Create a builder that reconciles the corpus tags against themselves.
    pub fn new(config: DatasetConfig) -> Result<Self> {
        let extractor = FeatureExtractor::new(config.extractor.clone())?;
        Ok(Self {
            config,
            extractor,
            tagger: None,
        })
    }

    /// Use `tagger` as the primary NER source; the corpus tags fill its gaps.
    pub fn with_tagger(mut self, tagger: Box<dyn NamedEntityTagger>) -> Self {
        self.tagger = Some(tagger);
        self
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    fn tagger_name(&self) -> &str {
        self.tagger.as_ref().map_or("corpus", |t| t.name())
    }

    /// Everything the reconciled tags depend on besides the corpus itself.
    fn ner_settings(&self) -> Result<String> {
        let tagger = self
            .tagger
            .as_ref()
            .map_or_else(|| "corpus".to_string(), |t| t.fingerprint());
        Ok(serde_json::to_string(&(tagger, &self.config.extractor))?)
    }

    /// Reconciled tags for every sentence of `corpus`.
    pub fn tag_corpus(&self, corpus: &Corpus) -> Result<TaggedCorpus> {
        let titles = &self.config.extractor.titles;
        let corpus_tags: Vec<TagSequence> = corpus.iter().map(|s| s.ner_tags(titles)).collect();

        let primary = match &self.tagger {
            Some(tagger) => {
                let words: Vec<Vec<String>> = corpus.iter().map(|s| s.words()).collect();
                info!(tagger = tagger.name(), sentences = words.len(), "tagging corpus");
                tagger
                    .tag_batch(&words)
                    .with_context(|| format!("{} tagger failed", tagger.name()))?
            }
            None => corpus_tags.clone(),
        };
        if primary.len() != corpus_tags.len() {
            bail!(
                "{} tagger returned {} sentences for {} inputs",
                self.tagger_name(),
                primary.len(),
                corpus_tags.len()
            );
        }

        corpus
            .iter()
            .zip(primary.iter().zip(&corpus_tags))
            .map(|(sentence, (primary, secondary))| {
                let tags = reconcile(primary, secondary, &sentence.tokens, &self.config.extractor)
                    .with_context(|| format!("cannot reconcile sentence {}", sentence.id))?;
                Ok((sentence.id.clone(), tags))
            })
            .collect()
    }

    /// Root paths for every sentence of `corpus`.
    pub fn index_paths(&self, corpus: &Corpus) -> Result<CorpusPaths> {
        corpus
            .iter()
            .map(|sentence| {
                let index = PathIndex::build(sentence)
                    .with_context(|| format!("bad dependency tree in sentence {}", sentence.id))?;
                Ok((sentence.id.clone(), index))
            })
            .collect()
    }

    /// Label and extract every candidate of `corpus`, in corpus order.
    ///
    /// Unless `annotated_only` is switched off, sentences the annotations
    /// never mention produce no candidates.
    pub fn build(
        &self,
        corpus: &Corpus,
        tags: &TaggedCorpus,
        paths: &CorpusPaths,
        annotations: &Annotations,
    ) -> Result<(Vec<Example>, RunStats)> {
        let object_tag = self.config.extractor.object_tag();
        let mut examples = Vec::new();
        let mut stats = RunStats::default();

        for sentence in corpus {
            stats.sentences += 1;
            if self.config.annotated_only && !annotations.has_sentence(&sentence.id) {
                debug!(sentence = %sentence.id, "not annotated, skipping");
                stats.unannotated += 1;
                continue;
            }

            let sentence_tags = tags
                .get(&sentence.id)
                .with_context(|| format!("no NER tags for sentence {}", sentence.id))?;
            let sentence_paths = paths
                .get(&sentence.id)
                .with_context(|| format!("no dependency paths for sentence {}", sentence.id))?;

            let spans = extract_spans(sentence_tags);
            let entities = EntityIndex::new(&spans);
            let candidates = candidate_pairs(&entities, &object_tag);
            debug!(
                sentence = %sentence.id,
                spans = spans.len(),
                candidates = candidates.len(),
                "sentence"
            );
            if !candidates.is_empty() {
                stats.sentences_with_candidates += 1;
            }

            for pair in candidates {
                let features = match self.extractor.extract(
                    &pair.person,
                    &pair.object,
                    sentence,
                    sentence_paths,
                    entities.tag_count(),
                ) {
                    Ok(features) => features,
                    Err(e @ RelexError::SpanMisaligned { .. }) => {
                        warn!(sentence = %sentence.id, error = %e, "skipping candidate");
                        stats.skipped += 1;
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };

                let label = annotations.label(&sentence.id, &pair.person.text, &pair.object.text);
                stats.candidates += 1;
                if label.is_positive() {
                    stats.positives += 1;
                }
                examples.push(Example {
                    sentence_id: sentence.id.clone(),
                    person: pair.person.text,
                    object: pair.object.text,
                    label,
                    features,
                });
            }
        }

        Ok((examples, stats))
    }

    /// Full run: load, tag, index, extract and write `output`.
    ///
    /// Tagging and path indexing are cached when a cache directory is
    /// configured. NER entries are keyed by the corpus contents, the tagger
    /// and the extractor settings; path entries by the corpus contents.
    pub fn run(&self, corpus_path: &Path, annotations: &Annotations, output: &Path) -> Result<RunStats> {
        let corpus = load_corpus(corpus_path)
            .with_context(|| format!("failed to load corpus {}", corpus_path.display()))?;

        let cache = StageCache::for_corpus(
            self.config.cache_dir.as_deref(),
            corpus_path,
            self.config.refresh_cache,
        )?;
        let ner_kind = format!("ner-{}", self.tagger_name());
        let tags: TaggedCorpus =
            cache.get_or_compute(&ner_kind, &self.ner_settings()?, || self.tag_corpus(&corpus))?;
        let paths: CorpusPaths = cache.get_or_compute("paths", "", || self.index_paths(&corpus))?;

        let (examples, stats) = self.build(&corpus, &tags, &paths, annotations)?;

        let file = File::create(output)
            .with_context(|| format!("failed to create {}", output.display()))?;
        let mut writer = FeatureWriter::new(BufWriter::new(file));
        for example in &examples {
            writer.write(example.label, &example.features)?;
        }
        writer.finish()?.flush()?;

        info!(output = %output.display(), %stats, "feature file written");
        Ok(stats)
    }
}
