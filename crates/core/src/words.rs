//! Dictionary words bucketed by their byte length, so that a word of a given
//! length can be sampled in constant time.

use crate::err::{Error, Result};
use rand::{seq::IndexedRandom, Rng};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Number of random lengths [WordIndex::random_word_below] tries before it
/// falls back to scanning the populated buckets.
const RANDOM_LENGTH_ATTEMPTS: usize = 32;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WordIndex {
    /// Every word in the bucket under key `n` is exactly `n` bytes long.
    /// Buckets are never empty.
    buckets: BTreeMap<usize, Vec<String>>,
    words: usize,
}

impl WordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a newline-delimited dictionary file.
    pub fn load(path: &Path) -> Result<Self> {
        let to_err = |source| Error::Dictionary {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(to_err)?;
        let mut index = Self::new();
        index.read_all(BufReader::new(file)).map_err(to_err)?;
        Ok(index)
    }

    /// Add every line of `reader` to the index, trimming surrounding whitespace.
    pub fn read_all<R: BufRead>(&mut self, reader: R) -> std::io::Result<()> {
        for line in reader.lines() {
            self.add(line?.trim());
        }
        Ok(())
    }

    /// Insert a word into the bucket keyed by its length. Empty words are ignored.
    pub fn add(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        self.buckets
            .entry(word.len())
            .or_insert_with(|| Vec::with_capacity(32))
            .push(word.to_owned());
        self.words += 1;
    }

    /// Total number of words in the index.
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// The words of exactly `len` bytes, in insertion order.
    pub fn bucket(&self, len: usize) -> &[String] {
        self.buckets.get(&len).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The populated word lengths, ascending.
    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.keys().copied()
    }

    /// Length of the shortest word in the index.
    pub fn shortest(&self) -> Option<usize> {
        self.buckets.keys().next().copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.bucket(word.len()).iter().any(|w| w == word)
    }

    /// A uniformly chosen word of exactly `n` bytes, or `None` if no such word
    /// was loaded.
    pub fn random_word_of_length<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Option<&str> {
        self.buckets
            .get(&n)
            .and_then(|bucket| bucket.choose(rng))
            .map(String::as_str)
    }

    /// A word strictly shorter than `n` bytes.
    ///
    /// Lengths in `0..n` are sampled at random a bounded number of times. If
    /// none of them hit a populated bucket, a bucket is picked uniformly among
    /// the populated ones below `n`. Returns `None` only when the index holds
    /// no word shorter than `n`.
    pub fn random_word_below<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Option<&str> {
        if n == 0 {
            return None;
        }

        for _ in 0..RANDOM_LENGTH_ATTEMPTS {
            let len = rng.random_range(0..n);
            if let Some(word) = self.random_word_of_length(len, rng) {
                return Some(word);
            }
        }

        let candidates = self
            .buckets
            .range(..n)
            .map(|(_, bucket)| bucket.as_slice())
            .collect::<Vec<_>>();
        candidates
            .choose(rng)
            .copied()
            .and_then(|bucket| bucket.choose(rng))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod test {
    use super::WordIndex;
    use crate::err::Error;
    use anyhow::Result;
    use rand::{rngs::SmallRng, SeedableRng};
    use std::{collections::HashSet, io::Write};

    fn index_of(words: &[&str]) -> WordIndex {
        let mut index = WordIndex::new();
        for word in words {
            index.add(word);
        }
        index
    }

    #[test]
    fn buckets_hold_words_of_their_length() {
        let index = index_of(&["a", "bb", "cc", "ddd", "eeee", "f"]);
        assert_eq!(index.len(), 6);
        assert_eq!(index.lengths().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        for len in index.lengths() {
            assert!(index.bucket(len).iter().all(|w| w.len() == len));
        }
        assert_eq!(index.bucket(2), &["bb".to_owned(), "cc".to_owned()]);
        assert!(index.bucket(7).is_empty());
    }

    #[test]
    fn random_word_of_length_is_exact_or_none() {
        let index = index_of(&["a", "bb", "cc", "ddd"]);
        let mut rng = SmallRng::seed_from_u64(1);

        for _ in 0..100 {
            assert_eq!(index.random_word_of_length(2, &mut rng).map(str::len), Some(2));
        }
        assert_eq!(index.random_word_of_length(0, &mut rng), None);
        assert_eq!(index.random_word_of_length(5, &mut rng), None);
    }

    #[test]
    fn random_word_of_length_reaches_every_word() {
        let index = index_of(&["ab", "cd", "ef"]);
        let mut rng = SmallRng::seed_from_u64(2);

        let seen = (0..300)
            .filter_map(|_| index.random_word_of_length(2, &mut rng))
            .collect::<HashSet<_>>();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn random_word_below_is_strictly_shorter() {
        let index = index_of(&["a", "bb", "ccc", "dddddddddd"]);
        let mut rng = SmallRng::seed_from_u64(3);

        for _ in 0..200 {
            let word = index.random_word_below(4, &mut rng).unwrap();
            assert!(word.len() < 4);
        }
    }

    #[test]
    fn random_word_below_terminates_without_candidates() {
        let index = index_of(&["dddddddddd"]);
        let mut rng = SmallRng::seed_from_u64(4);

        assert_eq!(index.random_word_below(10, &mut rng), None);
        assert_eq!(index.random_word_below(0, &mut rng), None);
        assert_eq!(index.random_word_below(11, &mut rng), Some("dddddddddd"));
    }

    #[test]
    fn random_word_below_falls_back_on_sparse_buckets() {
        // A single short word in a very wide range is unlikely to be hit by
        // random lengths alone.
        let index = index_of(&["x"]);
        let mut rng = SmallRng::seed_from_u64(5);

        assert_eq!(index.random_word_below(100_000, &mut rng), Some("x"));
    }

    #[test]
    fn read_all_trims_and_skips_blank_lines() -> Result<()> {
        let mut index = WordIndex::new();
        index.read_all("  apple \n\n\tpear\r\n   \nfig".as_bytes())?;

        assert_eq!(index.len(), 3);
        assert!(index.contains("apple"));
        assert!(index.contains("pear"));
        assert!(index.contains("fig"));
        assert_eq!(index.shortest(), Some(3));
        Ok(())
    }

    #[test]
    fn load_is_independent_of_order() -> Result<()> {
        let words = ["kiwi", "plum", "apple", "fig", "banana", "date", "a"];

        let mut forward = tempfile::NamedTempFile::new()?;
        writeln!(forward, "{}", words.join("\n"))?;
        let mut backward = tempfile::NamedTempFile::new()?;
        let mut reversed = words;
        reversed.reverse();
        writeln!(backward, "{}", reversed.join("\n"))?;

        let a = WordIndex::load(forward.path())?;
        let b = WordIndex::load(backward.path())?;
        let a_again = WordIndex::load(forward.path())?;
        assert_eq!(a, a_again);

        assert_eq!(a.lengths().collect::<Vec<_>>(), b.lengths().collect::<Vec<_>>());
        for len in a.lengths() {
            let a_set = a.bucket(len).iter().collect::<HashSet<_>>();
            let b_set = b.bucket(len).iter().collect::<HashSet<_>>();
            assert_eq!(a_set, b_set);
        }
        Ok(())
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = WordIndex::load(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, Error::Dictionary { .. }));
    }
}
