use std::fmt;

use serde::{Deserialize, Serialize};

/// A single scalar in a feature vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureValue {
    Str(String),
    Int(i64),
    /// Rendered as `True` / `False`, the spelling the classifier was trained on.
    Bool(bool),
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
        }
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<usize> for FeatureValue {
    fn from(value: usize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Ordered feature values for one candidate pair.
///
/// The position of every value is part of the classifier-facing contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector(Vec<FeatureValue>);

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<FeatureValue>) {
        self.0.push(value.into());
    }

    pub fn extend<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<FeatureValue>,
    {
        self.0.extend(values.into_iter().map(Into::into));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&FeatureValue> {
        self.0.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeatureValue> {
        self.0.iter()
    }
}

impl From<Vec<FeatureValue>> for FeatureVector {
    fn from(values: Vec<FeatureValue>) -> Self {
        Self(values)
    }
}

impl<'a> IntoIterator for &'a FeatureVector {
    type Item = &'a FeatureValue;
    type IntoIter = std::slice::Iter<'a, FeatureValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Gold label of a candidate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Negative,
    Positive,
}

impl Label {
    pub fn is_positive(self) -> bool {
        self == Label::Positive
    }
}

impl From<bool> for Label {
    fn from(positive: bool) -> Self {
        if positive {
            Label::Positive
        } else {
            Label::Negative
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Negative => write!(f, "0"),
            Label::Positive => write!(f, "1"),
        }
    }
}
