//! Context windows around entity spans.

use std::ops::Range;

/// Pads windows that run off the start of the sentence.
pub const START_MARKER: &str = "!!!!START!!!";
/// Pads windows that run off the end of the sentence.
pub const END_MARKER: &str = "!!!!END!!!";

/// The `radius` items on each side of a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window<'a> {
    /// Items before the span, nearest last.
    pub left: Vec<&'a str>,
    /// Items after the span, nearest first.
    pub right: Vec<&'a str>,
}

impl<'a> Window<'a> {
    /// Left then right half.
    pub fn items(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.left.iter().chain(&self.right).copied()
    }
}

/// Take `radius` items on each side of the 0-based `span` of `seq`.
///
/// The span itself is skipped, so a multi-token entity behaves like a single
/// token. Missing positions are filled with [`START_MARKER`] and
/// [`END_MARKER`].
pub fn window_around<'a>(seq: &[&'a str], span: Range<usize>, radius: usize) -> Window<'a> {
    let left = (1..=radius)
        .rev()
        .map(|offset| {
            span.start
                .checked_sub(offset)
                .and_then(|i| seq.get(i))
                .copied()
                .unwrap_or(START_MARKER)
        })
        .collect();

    let right = (0..radius)
        .map(|offset| seq.get(span.end + offset).copied().unwrap_or(END_MARKER))
        .collect();

    Window { left, right }
}

/// Every `a_b` for `a` before `b` in `items`.
pub fn ordered_pairs(items: &[&str]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .flat_map(|(i, a)| items[i + 1..].iter().map(move |b| format!("{a}_{b}")))
        .collect()
}
