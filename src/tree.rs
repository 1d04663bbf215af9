//! Huffman code tree construction and code assignment.
//!
//! The tree lives in a flat arena: each node records its weight, an
//! optional word (leaves only), and its parent's index plus the branch
//! label on the edge to that parent. Parent links let a leaf derive its
//! code by walking upward and reversing the collected labels, without any
//! ownership cycles.

use std::collections::BTreeMap;

use crate::bitstream::BitString;
use crate::frequency::WordHistogram;
use crate::pqueue::MinHeap;
use crate::{HfzError, HfzResult};

#[derive(Debug, Clone)]
struct Node {
    weight: u64,
    /// The word this leaf stands for (`None` for internal nodes).
    word: Option<BitString>,
    parent: Option<usize>,
    /// Label on the edge up to the parent: `false` for the first-merged
    /// child, `true` for the second. Unassigned until the tree is built.
    branch: Option<bool>,
}

/// A Huffman tree over the distinct words of one histogram.
#[derive(Debug, Clone)]
pub struct CodeTree {
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl CodeTree {
    /// Create an unbuilt tree holding one leaf per distinct word.
    ///
    /// Leaves are laid out in sorted word order so construction is
    /// deterministic regardless of histogram iteration order.
    pub fn from_histogram(histogram: &WordHistogram) -> Self {
        let mut pairs: Vec<(&BitString, u64)> = histogram.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));

        let nodes = pairs
            .into_iter()
            .map(|(word, count)| Node {
                weight: count,
                word: Some(word.clone()),
                parent: None,
                branch: None,
            })
            .collect();

        CodeTree { nodes, root: None }
    }

    /// Merge leaves into a full tree and assign branch labels.
    ///
    /// Repeatedly pops the two lowest-weight nodes from a min-heap; the
    /// first popped gets branch `0`, the second branch `1`. Ties are
    /// broken by insertion sequence, which is deterministic and only
    /// needs to hold within a single compress run (decode reads the
    /// transmitted table, not a rebuilt tree).
    pub fn build(&mut self) {
        if self.nodes.is_empty() {
            return;
        }
        if self.nodes.len() == 1 {
            // A lone word still needs a nonempty code; give it "0".
            self.nodes[0].branch = Some(false);
            self.root = Some(0);
            return;
        }

        let mut heap: MinHeap<(u64, u32, usize)> = MinHeap::new();
        let mut seq = 0u32;
        for (i, node) in self.nodes.iter().enumerate() {
            heap.push((node.weight, seq, i));
            seq += 1;
        }

        while heap.len() > 1 {
            let (first_weight, _, first) = heap.pop().unwrap();
            let (second_weight, _, second) = heap.pop().unwrap();

            let merged = self.nodes.len();
            self.nodes[first].parent = Some(merged);
            self.nodes[first].branch = Some(false);
            self.nodes[second].parent = Some(merged);
            self.nodes[second].branch = Some(true);

            let weight = first_weight + second_weight;
            self.nodes.push(Node {
                weight,
                word: None,
                parent: None,
                branch: None,
            });
            heap.push((weight, seq, merged));
            seq += 1;
        }

        self.root = heap.pop().map(|(_, _, i)| i);
    }

    /// Derive the code for the leaf at `index` by walking parent links
    /// root-ward and reversing the collected branch labels.
    fn code_of(&self, index: usize) -> HfzResult<BitString> {
        // Single-leaf tree: the leaf is its own root and carries "0".
        if self.nodes[index].parent.is_none() {
            let bit = self.nodes[index].branch.ok_or(HfzError::InvalidState)?;
            let mut code = BitString::new();
            code.push(bit);
            return Ok(code);
        }

        let mut labels = Vec::new();
        let mut idx = index;
        while let Some(parent) = self.nodes[idx].parent {
            labels.push(self.nodes[idx].branch.ok_or(HfzError::InvalidState)?);
            idx = parent;
        }
        Ok(labels.into_iter().rev().collect())
    }

    /// Collect the word → code mapping for every leaf.
    ///
    /// Fails with [`HfzError::InvalidState`] if the tree has not been
    /// built yet.
    pub fn code_table(&self) -> HfzResult<CodeTable> {
        if self.root.is_none() {
            return Err(HfzError::InvalidState);
        }
        let mut codes = BTreeMap::new();
        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(word) = &node.word {
                codes.insert(word.clone(), self.code_of(i)?);
            }
        }
        Ok(CodeTable { codes })
    }
}

/// Immutable word → code mapping ("conversation table").
///
/// Built once per compress run; decode derives its inverse. Keyed by a
/// `BTreeMap` so iteration order, and with it archive serialization, is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<BitString, BitString>,
}

impl CodeTable {
    /// Build the code table for a histogram in one step.
    pub fn from_histogram(histogram: &WordHistogram) -> HfzResult<Self> {
        let mut tree = CodeTree::from_histogram(histogram);
        tree.build();
        tree.code_table()
    }

    /// Reassemble a table from deserialized (word, code) pairs.
    pub fn from_pairs<I: IntoIterator<Item = (BitString, BitString)>>(pairs: I) -> Self {
        CodeTable {
            codes: pairs.into_iter().collect(),
        }
    }

    /// Look up the code for `word`.
    pub fn get(&self, word: &BitString) -> Option<&BitString> {
        self.codes.get(word)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterate over (word, code) pairs in sorted word order.
    pub fn iter(&self) -> impl Iterator<Item = (&BitString, &BitString)> {
        self.codes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::split_words;

    fn bits(s: &str) -> BitString {
        s.chars().map(|c| c == '1').collect()
    }

    fn histogram_of(pairs: &[(&str, u64)]) -> WordHistogram {
        let mut histogram = WordHistogram::new();
        for &(word, count) in pairs {
            for _ in 0..count {
                histogram.record(bits(word));
            }
        }
        histogram
    }

    fn is_prefix(a: &BitString, b: &BitString) -> bool {
        a.len() <= b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
    }

    #[test]
    fn test_table_before_build_is_invalid_state() {
        let histogram = histogram_of(&[("000", 3), ("001", 1)]);
        let tree = CodeTree::from_histogram(&histogram);
        assert_eq!(tree.code_table(), Err(HfzError::InvalidState));
    }

    #[test]
    fn test_single_word_gets_code_zero() {
        let histogram = histogram_of(&[("10101010", 42)]);
        let table = CodeTable::from_histogram(&histogram).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&bits("10101010")), Some(&bits("0")));
    }

    #[test]
    fn test_two_words_get_one_bit_codes() {
        let histogram = histogram_of(&[("000", 5), ("111", 3)]);
        let table = CodeTable::from_histogram(&histogram).unwrap();
        let a = table.get(&bits("000")).unwrap();
        let b = table.get(&bits("111")).unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let histogram = histogram_of(&[
            ("0000", 17),
            ("0001", 9),
            ("0010", 9),
            ("0011", 4),
            ("0100", 2),
            ("0101", 1),
            ("0110", 1),
        ]);
        let table = CodeTable::from_histogram(&histogram).unwrap();
        let codes: Vec<&BitString> = table.iter().map(|(_, c)| c).collect();
        for i in 0..codes.len() {
            for j in 0..codes.len() {
                if i != j {
                    assert!(
                        !is_prefix(codes[i], codes[j]),
                        "code {} is a prefix of {}",
                        codes[i],
                        codes[j]
                    );
                }
            }
        }
    }

    #[test]
    fn test_frequent_words_get_shorter_codes() {
        let histogram = histogram_of(&[("0000", 100), ("0001", 10), ("0010", 1)]);
        let table = CodeTable::from_histogram(&histogram).unwrap();
        let frequent = table.get(&bits("0000")).unwrap().len();
        let rare = table.get(&bits("0010")).unwrap().len();
        assert!(frequent <= rare);
    }

    #[test]
    fn test_construction_is_deterministic() {
        let input: Vec<u8> = (0..200).map(|i| (i * 31 % 256) as u8).collect();
        let (histogram, _) = split_words(&input, 6);
        let first = CodeTable::from_histogram(&histogram).unwrap();
        let second = CodeTable::from_histogram(&histogram).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_code_lengths_match_entropy_bound() {
        // Average code length must lie within one bit of the entropy.
        let input: Vec<u8> = (0..1024).map(|i| (i % 7) as u8).collect();
        let (histogram, _) = split_words(&input, 8);
        let table = CodeTable::from_histogram(&histogram).unwrap();

        let total = histogram.total() as f64;
        let mean: f64 = histogram
            .iter()
            .map(|(word, count)| table.get(word).unwrap().len() as f64 * count as f64 / total)
            .sum();
        let entropy = histogram.entropy();
        assert!(
            mean >= entropy - 1e-9 && mean < entropy + 1.0,
            "mean code length {mean} vs entropy {entropy}"
        );
    }
}
