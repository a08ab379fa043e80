//! Randomized option ordering.
//!
//! A question's correct answer and distractors are merged and shuffled once
//! per question display. [`OptionCache`] keeps that order stable until the
//! question set changes so the position of each option never moves under the
//! user.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::Question;

/// Merge the correct answer and all distractor texts into one shuffled list.
///
/// The output holds every option exactly once. A question with no
/// distractors yields just its correct answer.
pub fn shuffle_options<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Vec<String> {
    let mut options: Vec<String> = Vec::with_capacity(question.distractors.len() + 1);
    options.push(question.correct_answer.clone());
    options.extend(question.distractors.iter().map(|d| d.text.clone()));
    options.shuffle(rng);
    options
}

/// Letter label for the option at `index` (A, B, C, ...).
pub fn option_label(index: usize) -> String {
    let mut n = index;
    let mut label = Vec::new();
    loop {
        label.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}

/// Parse a letter label back into an option index.
pub fn parse_option_label(label: &str) -> Option<usize> {
    let label = label.trim();
    if label.is_empty() || !label.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let mut index = 0usize;
    for c in label.to_ascii_uppercase().bytes() {
        index = index.checked_mul(26)?.checked_add((c - b'A') as usize + 1)?;
    }
    Some(index - 1)
}

/// Memoized presentation order, keyed by question identity.
#[derive(Debug, Default)]
pub struct OptionCache {
    orders: HashMap<String, Vec<String>>,
}

impl OptionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The presentation order for `question`, shuffling on first request.
    pub fn get_or_shuffle<R: Rng + ?Sized>(&mut self, question: &Question, rng: &mut R) -> &[String] {
        self.orders
            .entry(question.identity().to_string())
            .or_insert_with(|| shuffle_options(question, rng))
    }

    /// The cached order, if the question has been displayed already.
    pub fn get(&self, question: &Question) -> Option<&[String]> {
        self.orders.get(question.identity()).map(Vec::as_slice)
    }

    /// Forget every cached order.
    pub fn invalidate(&mut self) {
        self.orders.clear();
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Distractor;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(distractors: &[&str]) -> Question {
        Question {
            id: None,
            question: "What is 9 - 3?".into(),
            question_de: String::new(),
            correct_answer: "6".into(),
            distractors: distractors.iter().map(|d| Distractor::authored(*d)).collect(),
            is_generated: None,
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let q = question(&["5", "7", "12"]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let mut options = shuffle_options(&q, &mut rng);
            assert_eq!(options.len(), 4);
            options.sort();
            assert_eq!(options, vec!["12", "5", "6", "7"]);
        }
    }

    #[test]
    fn shuffle_eventually_moves_the_correct_answer() {
        let q = question(&["5", "7", "12"]);
        let mut rng = StdRng::seed_from_u64(42);
        let positions: std::collections::HashSet<usize> = (0..100)
            .map(|_| {
                shuffle_options(&q, &mut rng)
                    .iter()
                    .position(|o| o == "6")
                    .unwrap()
            })
            .collect();
        assert!(positions.len() > 1);
    }

    #[test]
    fn no_distractors_yields_only_the_answer() {
        let q = question(&[]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(shuffle_options(&q, &mut rng), vec!["6"]);
    }

    #[test]
    fn cache_returns_same_order_until_invalidated() {
        let q = question(&["1", "2", "3", "4", "5", "7", "8"]);
        let mut rng = StdRng::seed_from_u64(3);
        let mut cache = OptionCache::new();

        let first = cache.get_or_shuffle(&q, &mut rng).to_vec();
        for _ in 0..10 {
            assert_eq!(cache.get_or_shuffle(&q, &mut rng), first.as_slice());
        }
        assert_eq!(cache.len(), 1);

        cache.invalidate();
        assert!(cache.is_empty());
        assert!(cache.get(&q).is_none());
    }

    #[test]
    fn labels_round_trip() {
        assert_eq!(option_label(0), "A");
        assert_eq!(option_label(3), "D");
        assert_eq!(option_label(25), "Z");
        assert_eq!(option_label(26), "AA");
        assert_eq!(parse_option_label("b"), Some(1));
        assert_eq!(parse_option_label(" D "), Some(3));
        assert_eq!(parse_option_label("AA"), Some(26));
        assert_eq!(parse_option_label("1"), None);
        assert_eq!(parse_option_label(""), None);
    }
}
