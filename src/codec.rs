//! The encode/decode engine tying the pieces together.
//!
//! Compression: split the input into fixed-width words, build a code
//! table from the word histogram, replace each word with its code, and
//! serialize table + content + bit count + tail into an archive.
//! Decompression inverts the table into a binary trie and walks it one
//! bit at a time, which resolves each prefix-free code in a single pass
//! instead of rescanning the table per bit.

use crate::bitstream::{BitReader, BitString};
use crate::format::Archive;
use crate::frequency::split_words;
use crate::tree::CodeTable;
use crate::{HfzError, HfzResult};

/// Compress `input` using `wordbits`-wide symbols.
///
/// An empty input produces an empty output. `wordbits` must be at least
/// 1; widths above ~32 are accepted but rarely compress well.
pub fn compress(input: &[u8], wordbits: usize) -> HfzResult<Vec<u8>> {
    if wordbits == 0 {
        return Err(HfzError::Unsupported);
    }
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let (histogram, tail) = split_words(input, wordbits);
    if histogram.is_empty() {
        // Input shorter than one word: everything rides in the tail.
        return Archive {
            table: CodeTable::default(),
            content: Vec::new(),
            content_length: 0,
            tail,
        }
        .to_bytes();
    }

    let table = CodeTable::from_histogram(&histogram)?;
    let (content, content_length) = encode_content(input, wordbits, &table)?;

    Archive {
        table,
        content,
        content_length,
        tail,
    }
    .to_bytes()
}

/// Decompress an archive produced by [`compress`].
///
/// An empty input produces an empty output.
pub fn decompress(input: &[u8]) -> HfzResult<Vec<u8>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    let archive = Archive::from_bytes(input)?;
    decode_content(&archive)
}

/// Re-read the full words of `input` and append each word's code.
///
/// Applies the same word/tail split rule as the frequency pass, so every
/// full word has a table entry; a missing one means the table and the
/// document disagree.
fn encode_content(input: &[u8], wordbits: usize, table: &CodeTable) -> HfzResult<(Vec<u8>, u32)> {
    let mut accumulator = BitString::new();
    let mut reader = BitReader::new(input);
    loop {
        let word = reader.read(wordbits);
        if word.len() < wordbits {
            break;
        }
        let code = table.get(&word).ok_or(HfzError::MissingSymbol)?;
        accumulator.extend(code);
    }
    let content_length =
        u32::try_from(accumulator.len()).map_err(|_| HfzError::Unsupported)?;
    Ok((accumulator.into_bytes(), content_length))
}

#[derive(Debug, Default)]
struct TrieNode {
    children: [Option<usize>; 2],
    word: Option<BitString>,
}

/// Binary decoding trie built from the inverted code table.
///
/// Each code traces a root-to-leaf path; prefix-freeness guarantees
/// words only ever sit on leaves.
#[derive(Debug, Default)]
struct DecodeTrie {
    nodes: Vec<TrieNode>,
}

impl DecodeTrie {
    fn from_table(table: &CodeTable) -> HfzResult<Self> {
        let mut trie = DecodeTrie {
            nodes: vec![TrieNode::default()],
        };
        for (word, code) in table.iter() {
            trie.insert(code, word.clone())?;
        }
        Ok(trie)
    }

    /// Insert one code path. A table that is not prefix-free cannot
    /// resolve unique codes, so conflicts are corrupt streams.
    fn insert(&mut self, code: &BitString, word: BitString) -> HfzResult<()> {
        let mut idx = 0;
        for bit in code.iter() {
            if self.nodes[idx].word.is_some() {
                return Err(HfzError::CorruptStream);
            }
            let slot = bit as usize;
            idx = match self.nodes[idx].children[slot] {
                Some(next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[idx].children[slot] = Some(next);
                    next
                }
            };
        }
        let node = &mut self.nodes[idx];
        if node.word.is_some() || node.children.iter().any(Option::is_some) {
            return Err(HfzError::CorruptStream);
        }
        node.word = Some(word);
        Ok(())
    }
}

/// Walk the compressed bits through the trie, emitting one word per
/// resolved code, until exactly `content_length` bits are consumed; then
/// append the tail verbatim.
fn decode_content(archive: &Archive) -> HfzResult<Vec<u8>> {
    let trie = DecodeTrie::from_table(&archive.table)?;
    let mut reader = BitReader::new(&archive.content);
    let mut output = BitString::new();

    let content_length = archive.content_length as usize;
    let mut consumed = 0usize;

    while consumed < content_length {
        let mut idx = 0;
        loop {
            let bit = reader.read_bit().ok_or(HfzError::CorruptStream)?;
            consumed += 1;
            if consumed > content_length {
                // A symbol straddling the end means the bit count and
                // the table disagree.
                return Err(HfzError::CorruptStream);
            }
            idx = trie.nodes[idx].children[bit as usize].ok_or(HfzError::CorruptStream)?;
            if let Some(word) = &trie.nodes[idx].word {
                output.extend(word);
                break;
            }
        }
    }

    output.extend(&archive.tail);
    Ok(output.into_bytes())
}
