//! # Gazetteer Tagger
//!
//! Dictionary and pattern based tagging. A gazetteer file holds one entry per
//! line, tab separated:
//!
//! ```text
//! # phrases match whole token sequences, longest first
//! New York	LOCATION
//! Justice Department	ORGANIZATION
//! # `re:` entries match a single token against an anchored regex
//! re:[A-Z][a-z]+ville	LOCATION
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;
use tracing::info;

use super::tagger::NamedEntityTagger;
use crate::error::{RelexError, Result};
use crate::types::{NerTag, TagSequence, TaggedWord};

const RULE_PREFIX: &str = "re:";

/// Rule/dictionary-based tagger.
#[derive(Debug, Default)]
pub struct GazetteerTagger {
    /// First word -> (phrase words, tag), longest phrase first.
    phrases: HashMap<String, Vec<(Vec<String>, NerTag)>>,
    rules: Vec<(Regex, NerTag)>,
}

impl GazetteerTagger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a gazetteer file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let tagger = Self::from_reader(BufReader::new(File::open(path)?))?;
        info!(
            path = %path.display(),
            phrases = tagger.phrase_count(),
            rules = tagger.rules.len(),
            "loaded gazetteer"
        );
        Ok(tagger)
    }

    /// Parse gazetteer entries from a reader.
    ///
    /// # Errors
    ///
    /// `MalformedLine` for entries without a tag column, `RegexError` for
    /// invalid `re:` patterns.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut tagger = Self::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (entry, tag) = trimmed
                .rsplit_once('\t')
                .ok_or_else(|| RelexError::MalformedLine {
                    line: i + 1,
                    reason: "gazetteer entry needs a tab-separated tag".into(),
                })?;
            let tag = NerTag::parse(tag.trim()).normalized();

            match entry.strip_prefix(RULE_PREFIX) {
                Some(pattern) => tagger.add_rule(pattern, tag)?,
                None => tagger.add_phrase(entry, tag),
            }
        }

        Ok(tagger)
    }

    /// Add a whitespace-separated phrase.
    pub fn add_phrase(&mut self, phrase: &str, tag: NerTag) {
        let words: Vec<String> = phrase.split_whitespace().map(str::to_string).collect();
        let Some(first) = words.first().cloned() else {
            return;
        };
        let entries = self.phrases.entry(first).or_default();
        entries.push((words, tag));
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Add a single-token rule. The pattern must match the whole token.
    pub fn add_rule(&mut self, pattern: &str, tag: NerTag) -> Result<()> {
        let re = Regex::new(&format!("^(?:{pattern})$"))?;
        self.rules.push((re, tag));
        Ok(())
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.values().map(Vec::len).sum()
    }

    fn match_phrase(&self, words: &[String]) -> Option<(usize, &NerTag)> {
        let candidates = self.phrases.get(words.first()?)?;
        candidates
            .iter()
            .find(|(phrase, _)| words.len() >= phrase.len() && words[..phrase.len()] == phrase[..])
            .map(|(phrase, tag)| (phrase.len(), tag))
    }

    fn match_rule(&self, word: &str) -> Option<&NerTag> {
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(word))
            .map(|(_, tag)| tag)
    }
}

impl NamedEntityTagger for GazetteerTagger {
    fn tag(&self, words: &[String]) -> Result<TagSequence> {
        let mut tags: Vec<NerTag> = vec![NerTag::Outside; words.len()];
        let mut i = 0;

        while i < words.len() {
            if let Some((len, tag)) = self.match_phrase(&words[i..]) {
                for slot in &mut tags[i..i + len] {
                    *slot = tag.clone();
                }
                i += len;
                continue;
            }
            if let Some(tag) = self.match_rule(&words[i]) {
                tags[i] = tag.clone();
            }
            i += 1;
        }

        Ok(words
            .iter()
            .zip(tags)
            .map(|(word, tag)| TaggedWord::new(word.clone(), tag))
            .collect())
    }

    fn name(&self) -> &str {
        "gazetteer"
    }

    /// Every phrase and rule, in a stable order.
    fn fingerprint(&self) -> String {
        let mut phrases: Vec<String> = self
            .phrases
            .values()
            .flatten()
            .map(|(words, tag)| format!("{}={}", words.join(" "), tag.as_str()))
            .collect();
        phrases.sort_unstable();

        let rules = self
            .rules
            .iter()
            .map(|(re, tag)| format!("{}={}", re.as_str(), tag.as_str()));

        std::iter::once(self.name().to_string())
            .chain(phrases)
            .chain(rules)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
