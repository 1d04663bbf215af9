//! Frequency analysis for fixed-width bit-words.
//!
//! Splits a byte buffer into `wordbits`-wide words, counting how often
//! each distinct word occurs. The leftover bits at the end of the input
//! (strictly fewer than `wordbits`) form the tail, which is carried
//! through the archive verbatim because it cannot hold a complete word.

use std::collections::HashMap;

use crate::bitstream::{BitReader, BitString};

/// Occurrence counts for the distinct words of one input.
#[derive(Debug, Clone, Default)]
pub struct WordHistogram {
    counts: HashMap<BitString, u64>,
    total: u64,
}

impl WordHistogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `word`.
    pub fn record(&mut self, word: BitString) {
        *self.counts.entry(word).or_insert(0) += 1;
        self.total += 1;
    }

    /// Number of distinct words observed.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Total number of words observed.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns true if no words were observed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Count for a specific word (0 if never observed).
    pub fn get(&self, word: &BitString) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Iterate over (word, count) pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&BitString, u64)> {
        self.counts.iter().map(|(w, &c)| (w, c))
    }

    /// Shannon entropy of the distribution, in bits per word.
    ///
    /// Returns 0.0 for an empty histogram.
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        self.counts
            .values()
            .map(|&c| {
                let prob = c as f64 / total;
                -prob * prob.log2()
            })
            .sum()
    }
}

/// Split `input` into full `wordbits`-wide words and a trailing remainder.
///
/// Every full-width word is counted in the histogram, including the last
/// one when the input length divides evenly; the tail is only ever the
/// genuinely short remainder (empty for an evenly dividing input). The
/// encode loop in [`crate::codec`] applies the identical rule, which
/// keeps the table and the compressed stream consistent.
pub fn split_words(input: &[u8], wordbits: usize) -> (WordHistogram, BitString) {
    let mut histogram = WordHistogram::new();
    let mut reader = BitReader::new(input);
    loop {
        let word = reader.read(wordbits);
        if word.len() < wordbits {
            return (histogram, word);
        }
        histogram.record(word);
    }
}
