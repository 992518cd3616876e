//! # NER Reconciliation
//!
//! Merges the tags of two independent taggers into one sequence per sentence.

use tracing::debug;

use crate::config::ExtractorConfig;
use crate::error::{RelexError, Result};
use crate::types::{NerTag, TagSequence, TokenRecord};

/// Reconcile `primary` with `secondary` for the sentence made of `tokens`.
///
/// Per position, left to right:
/// 1. a primary `O` yields to a differing secondary tag;
/// 2. the adopted tag is normalized (`ORG`, `GPE`);
/// 3. a primary `PERSON` turns a preceding title word into `PERSON`;
/// 4. a primary location tag turns a preceding determiner into `O`.
///
/// Rules 3 and 4 look at the *primary* tag at the current position and
/// rewrite the already adopted previous entry.
///
/// # Errors
///
/// `NerLengthMismatch` if the three sequences differ in length,
/// `NerTokenMismatch` if the taggers disagree on a word.
pub fn reconcile(
    primary: &TagSequence,
    secondary: &TagSequence,
    tokens: &[TokenRecord],
    config: &ExtractorConfig,
) -> Result<TagSequence> {
    if primary.len() != secondary.len() {
        return Err(RelexError::NerLengthMismatch {
            primary: primary.len(),
            secondary: secondary.len(),
        });
    }
    if primary.len() != tokens.len() {
        return Err(RelexError::NerLengthMismatch {
            primary: primary.len(),
            secondary: tokens.len(),
        });
    }

    let location = config.object_tag();
    let mut merged: TagSequence = Vec::with_capacity(primary.len());

    for (i, (first, second)) in primary.iter().zip(secondary).enumerate() {
        if first.word != second.word {
            return Err(RelexError::NerTokenMismatch {
                position: i,
                primary: first.word.clone(),
                secondary: second.word.clone(),
            });
        }

        let mut adopted = first.clone();
        if first.tag != second.tag && first.tag.is_outside() {
            adopted.tag = second.tag.clone();
        }
        adopted.tag = adopted.tag.normalized();

        if i > 0 {
            if first.tag == NerTag::Person
                && config.titles.iter().any(|t| *t == merged[i - 1].word)
            {
                merged[i - 1].tag = NerTag::Person;
            }
            if first.tag == location && tokens[i - 1].is_determiner() {
                debug!(word = %merged[i - 1].word, "dropping determiner from location");
                merged[i - 1].tag = NerTag::Outside;
            }
        }

        merged.push(adopted);
    }

    Ok(merged)
}
