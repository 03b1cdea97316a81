//! Generation of the content part of a line, sized to a byte budget.

use crate::words::WordIndex;
use rand::{distr::Alphanumeric, Rng};

/// Below this many remaining bytes the dictionary generator asks for one
/// final word that fills the budget exactly.
const TERMINAL_THRESHOLD: usize = 8;

#[derive(Debug, Clone)]
pub enum ContentGenerator {
    /// Alphanumeric noise of exactly the requested length.
    Random,
    /// Space separated dictionary words, never longer than the requested length.
    Dictionary(WordIndex),
}

impl ContentGenerator {
    pub fn new(words: Option<WordIndex>) -> Self {
        match words {
            Some(words) => Self::Dictionary(words),
            None => Self::Random,
        }
    }

    pub fn generate<R: Rng + ?Sized>(&self, budget: usize, rng: &mut R) -> String {
        match self {
            Self::Random => random_string(budget, rng),
            Self::Dictionary(words) => word_string(words, budget, rng),
        }
    }
}

fn random_string<R: Rng + ?Sized>(len: usize, rng: &mut R) -> String {
    rng.sample_iter(Alphanumeric)
        .map(char::from)
        .take(len)
        .collect()
}

fn word_string<R: Rng + ?Sized>(words: &WordIndex, budget: usize, rng: &mut R) -> String {
    let mut buf = String::with_capacity(budget);

    loop {
        let separator = usize::from(!buf.is_empty());
        let remaining = match budget.checked_sub(buf.len() + separator) {
            Some(0) | None => break,
            Some(remaining) => remaining,
        };

        if remaining < TERMINAL_THRESHOLD {
            // A bucket for the exact remainder may be missing; settle for a
            // shorter word and stop either way.
            let last = words
                .random_word_of_length(remaining, rng)
                .or_else(|| words.random_word_below(remaining, rng));
            if let Some(word) = last {
                push_word(&mut buf, word);
            }
            break;
        }

        // Leave room for a separator and at least one more byte.
        match words.random_word_below(remaining - 1, rng) {
            Some(word) => push_word(&mut buf, word),
            None => break,
        }
    }

    debug_assert!(buf.len() <= budget);
    buf
}

fn push_word(buf: &mut String, word: &str) {
    if !buf.is_empty() {
        buf.push(' ');
    }
    buf.push_str(word);
}
