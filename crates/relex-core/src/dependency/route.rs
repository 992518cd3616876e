//! # Route Join
//!
//! Joins two root paths into the route between their tokens.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::path::PathHop;
use crate::types::{NerTag, Sentence};

/// Distance reported when two paths share no hop.
pub const DISCONNECTED_DISTANCE: usize = 999;

/// Routes shorter than this count as connected.
pub const CONNECTED_THRESHOLD: usize = 100;

/// Suffix on labels collected from the longer path.
const UP: &str = "1";
/// Suffix on labels collected from the shorter path.
const DOWN: &str = "0";

/// The dependency route between two tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub distance: usize,
    /// Dependency labels with a direction suffix, longer path first.
    pub labels: Vec<String>,
    /// Fine POS of each collected hop's head token.
    pub pos: Vec<String>,
    /// A non-endpoint hop on the route belongs to a `PERSON` token.
    pub crosses_person: bool,
    /// A non-endpoint hop on the route belongs to a location token.
    pub crosses_location: bool,
}

impl Route {
    /// The route between two tokens whose paths never meet.
    pub fn disconnected() -> Self {
        Self {
            distance: DISCONNECTED_DISTANCE,
            labels: Vec::new(),
            pos: Vec::new(),
            crosses_person: false,
            crosses_location: false,
        }
    }

    pub fn connected(&self) -> bool {
        self.distance < CONNECTED_THRESHOLD
    }

    pub fn joined_labels(&self) -> String {
        self.labels.join("_")
    }

    pub fn joined_pos(&self) -> String {
        self.pos.join("_")
    }

    /// Walk `path` until the first hop found in `other`, collecting the hops
    /// passed on the way. Returns the 1-based position of the shared hop.
    fn scan(
        &mut self,
        path: &[PathHop],
        other: &HashSet<&PathHop>,
        suffix: &str,
        sentence: &Sentence,
    ) -> usize {
        for (i, hop) in path.iter().enumerate().map(|(i, h)| (i + 1, h)) {
            if other.contains(hop) {
                return i;
            }

            if i > 1 {
                if let Some(token) = sentence.token(hop.index) {
                    let tag = token.raw_tag();
                    self.crosses_person |= tag == NerTag::Person;
                    self.crosses_location |= tag.normalized() == NerTag::Location;
                }
            }

            self.labels.push(format!("{}{suffix}", hop.label));
            self.pos.push(
                sentence
                    .token(hop.head)
                    .map(|t| t.fine_pos.clone())
                    .unwrap_or_default(),
            );
        }
        0
    }
}

/// Join the root paths `a` and `b` of two tokens of `sentence`.
///
/// Paths connect only through a shared hop. The longer path (the second on
/// ties) is walked first and its labels carry a `1` suffix; the shorter one
/// follows with a `0` suffix. The distance is the sum of the 1-based
/// positions of the first shared hop on each side, which makes it symmetric
/// in `a` and `b`.
///
/// # Examples
///
/// ```
/// use relex_core::dependency::{join_routes, DISCONNECTED_DISTANCE};
/// use relex_core::types::Sentence;
///
/// let route = join_routes(&[], &[], &Sentence::new("s", Vec::new()));
/// assert_eq!(route.distance, DISCONNECTED_DISTANCE);
/// assert!(!route.connected());
/// ```
pub fn join_routes(a: &[PathHop], b: &[PathHop], sentence: &Sentence) -> Route {
    let set_a: HashSet<&PathHop> = a.iter().collect();
    let set_b: HashSet<&PathHop> = b.iter().collect();

    if set_a.is_disjoint(&set_b) {
        return Route::disconnected();
    }

    let (longest, shortest, longest_set, shortest_set) = if a.len() > b.len() {
        (a, b, &set_a, &set_b)
    } else {
        (b, a, &set_b, &set_a)
    };

    let mut route = Route {
        distance: 0,
        ..Route::disconnected()
    };
    let i = route.scan(longest, shortest_set, UP, sentence);
    let j = route.scan(shortest, longest_set, DOWN, sentence);
    route.distance = i + j;
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::PathIndex;
    use crate::types::token::fixtures::{smith_in_paris, token};
    use proptest::prelude::*;

    fn hop(head: usize, label: &str, word: &str, index: usize) -> PathHop {
        PathHop {
            head,
            label: label.into(),
            word: word.into(),
            index,
        }
    }

    #[test]
    fn test_constants_are_consistent() {
        assert!(DISCONNECTED_DISTANCE >= CONNECTED_THRESHOLD);
        assert!(!Route::disconnected().connected());
    }

    #[test]
    fn test_nested_paths_join() {
        let sentence = smith_in_paris();
        let index = PathIndex::build(&sentence).unwrap();

        let route = join_routes(index.path(8).unwrap(), index.path(6).unwrap(), &sentence);
        assert_eq!(route.distance, 4);
        assert_eq!(route.labels, vec!["pobj1", "prep1"]);
        assert_eq!(route.pos, vec!["IN", "NN"]);
        assert_eq!(route.joined_labels(), "pobj1_prep1");
        assert_eq!(route.joined_pos(), "IN_NN");
        assert!(route.connected());
        assert!(!route.crosses_person);
        assert!(!route.crosses_location);
    }

    #[test]
    fn test_paths_meeting_only_at_root_are_disconnected() {
        let sentence = smith_in_paris();
        let index = PathIndex::build(&sentence).unwrap();

        let route = join_routes(index.path(2).unwrap(), index.path(8).unwrap(), &sentence);
        assert_eq!(route, Route::disconnected());
        assert_eq!(route.joined_labels(), "");
    }

    #[test]
    fn test_empty_path_is_disconnected() {
        let sentence = smith_in_paris();
        let index = PathIndex::build(&sentence).unwrap();
        let route = join_routes(index.path(3).unwrap(), index.path(8).unwrap(), &sentence);
        assert_eq!(route.distance, DISCONNECTED_DISTANCE);
    }

    #[test]
    fn test_tie_walks_second_argument_first() {
        let shared = hop(9, "root", "x", 5);
        let a = vec![hop(5, "nsubj", "a", 1), shared.clone()];
        let b = vec![hop(5, "dobj", "b", 2), shared];
        let sentence = Sentence::new("s", Vec::new());

        let route = join_routes(&a, &b, &sentence);
        assert_eq!(route.distance, 4);
        assert_eq!(route.labels, vec!["dobj1", "nsubj0"]);
        // Head tokens are missing from the empty sentence.
        assert_eq!(route.pos, vec!["", ""]);
    }

    #[test]
    fn test_crossing_flags_skip_first_hop() {
        let sentence = Sentence::new(
            "s",
            vec![
                token(1, "Bob", "Bob", "NNP", "PROPN", 2, "nsubj", "PERSON"),
                token(2, "met", "meet", "VBD", "VERB", 3, "dep", "O"),
                token(3, "Ann", "Ann", "NNP", "PROPN", 4, "dep", "PERSON"),
                token(4, "Rome", "Rome", "NNP", "PROPN", 6, "dep", "GPE"),
                token(5, "x", "x", "NN", "NOUN", 6, "dep", "O"),
                token(6, "went", "go", "VBD", "VERB", 7, "dep", "O"),
                token(7, "home", "home", "NN", "NOUN", 0, "ROOT", "O"),
            ],
        );
        let index = PathIndex::build(&sentence).unwrap();

        // Bob: 1 -> 2 -> 3 -> 4 -> 6 -> 7, x: 5 -> 6 -> 7.
        let route = join_routes(index.path(1).unwrap(), index.path(5).unwrap(), &sentence);
        assert_eq!(route.distance, 7);
        assert!(route.crosses_person);
        assert!(route.crosses_location);

        // Starting at Ann, her own hop is the first and is not counted.
        let route = join_routes(index.path(3).unwrap(), index.path(5).unwrap(), &sentence);
        assert!(!route.crosses_person);
        assert!(route.crosses_location);
    }

    fn chain_sentence(heads: &[usize]) -> Sentence {
        let mut tokens: Vec<_> = heads
            .iter()
            .enumerate()
            .map(|(i, &head)| token(i + 1, "w", "w", "NN", "NOUN", head, "dep", "O"))
            .collect();
        tokens[0].head_index = 0;
        tokens[0].dependency_label = "ROOT".into();
        Sentence::new("p", tokens)
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(
            raw in prop::collection::vec(0usize..64, 1..16),
            x in 0usize..16,
            y in 0usize..16,
        ) {
            // Every token attaches to an earlier one, so the heads form a tree.
            let heads: Vec<usize> = raw
                .iter()
                .enumerate()
                .map(|(i, r)| if i == 0 { 0 } else { r % i + 1 })
                .collect();
            let sentence = chain_sentence(&heads);
            let index = PathIndex::build(&sentence).unwrap();
            let n = sentence.len();
            let (x, y) = (x % n + 1, y % n + 1);

            let forward = join_routes(index.path(x).unwrap(), index.path(y).unwrap(), &sentence);
            let backward = join_routes(index.path(y).unwrap(), index.path(x).unwrap(), &sentence);
            prop_assert_eq!(forward.distance, backward.distance);
            prop_assert_eq!(forward.labels.len(), backward.labels.len());
            prop_assert_eq!(forward.connected(), backward.connected());
        }
    }
}
