//! # Stanford NER Tagger
//!
//! Runs the Stanford CRF classifier as a subprocess. The jar and the
//! serialized classifier are supplied by the caller; nothing is looked up
//! from fixed locations.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::tagger::NamedEntityTagger;
use crate::error::{RelexError, Result};
use crate::types::{NerTag, TagSequence, TaggedWord};

const CLASSIFIER_MAIN: &str = "edu.stanford.nlp.ie.crf.CRFClassifier";
const WHITESPACE_TOKENIZER: &str = "edu.stanford.nlp.process.WhitespaceTokenizer";

/// Named-entity tagger backed by `stanford-ner.jar`.
#[derive(Debug, Clone)]
pub struct StanfordTagger {
    java: PathBuf,
    jar: PathBuf,
    model: PathBuf,
    max_memory: String,
}

impl StanfordTagger {
    /// Create a tagger for the given jar and classifier model.
    ///
    /// # Errors
    ///
    /// Returns `RelexError::Tagger` if either file does not exist.
    pub fn new(jar: impl Into<PathBuf>, model: impl Into<PathBuf>) -> Result<Self> {
        let jar = jar.into();
        let model = model.into();
        for path in [&jar, &model] {
            if !path.exists() {
                return Err(RelexError::Tagger(format!(
                    "Stanford NER file not found at {}",
                    path.display()
                )));
            }
        }
        Ok(Self {
            java: PathBuf::from("java"),
            jar,
            model,
            max_memory: "1000m".into(),
        })
    }

    /// Use a specific `java` executable.
    pub fn with_java(mut self, java: impl Into<PathBuf>) -> Self {
        self.java = java.into();
        self
    }

    /// Set the JVM heap limit (e.g. `"2g"`).
    pub fn with_max_memory(mut self, max_memory: impl Into<String>) -> Self {
        self.max_memory = max_memory.into();
        self
    }

    pub fn model(&self) -> &Path {
        &self.model
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.java);
        cmd.arg(format!("-mx{}", self.max_memory))
            .arg("-cp")
            .arg(&self.jar)
            .arg(CLASSIFIER_MAIN)
            .arg("-loadClassifier")
            .arg(&self.model)
            .arg("-readStdin")
            .arg("-outputFormat")
            .arg("slashTags")
            .arg("-tokenizerFactory")
            .arg(WHITESPACE_TOKENIZER)
            .arg("-tokenizerOptions")
            .arg("tokenizeNLs=false");
        cmd
    }
}

impl NamedEntityTagger for StanfordTagger {
    fn tag(&self, words: &[String]) -> Result<TagSequence> {
        let mut batch = self.tag_batch(&[words.to_vec()])?;
        Ok(batch.pop().unwrap_or_default())
    }

    fn tag_batch(&self, sentences: &[Vec<String>]) -> Result<Vec<TagSequence>> {
        if sentences.iter().all(Vec::is_empty) {
            return Ok(sentences.iter().map(|_| Vec::new()).collect());
        }

        let input: String = sentences
            .iter()
            .map(|words| words.join(" ") + "\n")
            .collect();

        let mut child = self
            .command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RelexError::Tagger(format!("failed to start java: {e}")))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RelexError::Tagger("stdin of tagger not captured".into()))?;
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        writer
            .join()
            .map_err(|_| RelexError::Tagger("stdin writer panicked".into()))??;

        if !output.status.success() {
            return Err(RelexError::Tagger(format!(
                "Stanford NER exited with {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(sentences = sentences.len(), "Stanford NER finished");
        split_slash_tags(&stdout, sentences)
    }

    fn name(&self) -> &str {
        "stanford"
    }

    fn fingerprint(&self) -> String {
        format!("stanford:{}:{}", self.jar.display(), self.model.display())
    }
}

/// Parse `word/TAG` output and cut it back into the input sentences.
///
/// The whitespace tokenizer keeps tokens one-to-one with the input, so the
/// flattened output is re-split by sentence length regardless of how the
/// classifier laid out its lines.
pub fn split_slash_tags(output: &str, sentences: &[Vec<String>]) -> Result<Vec<TagSequence>> {
    let mut tags = output.split_whitespace().map(|item| {
        item.rsplit_once('/')
            .map(|(_, tag)| NerTag::parse(tag))
            .ok_or_else(|| RelexError::Tagger(format!("token {item:?} has no /TAG suffix")))
    });

    let mut result = Vec::with_capacity(sentences.len());
    for words in sentences {
        let mut tagged = Vec::with_capacity(words.len());
        for word in words {
            let tag = tags.next().ok_or_else(|| {
                RelexError::Tagger("tagger output is shorter than its input".into())
            })??;
            tagged.push(TaggedWord::new(word.clone(), tag));
        }
        result.push(tagged);
    }

    if tags.next().is_some() {
        return Err(RelexError::Tagger(
            "tagger output is longer than its input".into(),
        ));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_split_slash_tags() {
        let sentences = vec![words("John lives in Boston ."), words("Hi")];
        let output = "John/PERSON lives/O in/O Boston/LOCATION ./O\nHi/O\n";
        let tagged = split_slash_tags(output, &sentences).unwrap();
        assert_eq!(tagged.len(), 2);
        assert_eq!(tagged[0][0], TaggedWord::new("John", NerTag::Person));
        assert_eq!(tagged[0][3].tag, NerTag::Location);
        assert_eq!(tagged[1][0].tag, NerTag::Outside);
    }

    #[test]
    fn test_split_ignores_line_layout() {
        let sentences = vec![words("a b"), words("c")];
        let tagged = split_slash_tags("a/O b/O c/PERSON", &sentences).unwrap();
        assert_eq!(tagged[1][0].tag, NerTag::Person);
    }

    #[test]
    fn test_slash_inside_word() {
        let sentences = vec![words("1/2")];
        let tagged = split_slash_tags("1/2/O", &sentences).unwrap();
        assert_eq!(tagged[0][0].word, "1/2");
        assert_eq!(tagged[0][0].tag, NerTag::Outside);
    }

    #[test]
    fn test_length_mismatch() {
        let sentences = vec![words("a b")];
        assert!(split_slash_tags("a/O", &sentences).is_err());
        assert!(split_slash_tags("a/O b/O c/O", &sentences).is_err());
        assert!(split_slash_tags("a b", &sentences).is_err());
    }

    #[test]
    fn test_missing_files_are_rejected() {
        let err = StanfordTagger::new("/nonexistent/stanford-ner.jar", "/nonexistent/model.gz")
            .unwrap_err();
        assert!(matches!(err, RelexError::Tagger(_)));
    }

    #[test]
    fn test_fingerprint_names_model() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("stanford-ner.jar");
        let conll = dir.path().join("conll.ser.gz");
        let muc = dir.path().join("muc.ser.gz");
        for path in [&jar, &conll, &muc] {
            std::fs::write(path, b"").unwrap();
        }

        let a = StanfordTagger::new(&jar, &conll).unwrap();
        let b = StanfordTagger::new(&jar, &muc).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert!(a.fingerprint().contains("conll.ser.gz"));
        assert_eq!(a.name(), b.name());
    }
}
