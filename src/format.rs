//! The on-disk archive layout.
//!
//! Everything is built from length-prefixed cells: a 4-byte big-endian
//! unsigned length followed by that many payload bytes. The archive is
//!
//! ```text
//! cell( table block )        per pair: cell(u32 word bits + packed word)
//!                                      cell(u32 code bits + packed code)
//! u32   content length       exact compressed bit count (not bytes)
//! cell( compressed content ) byte-padded bit stream
//! cell( tail )               u32 tail bits + packed tail
//! ```
//!
//! Bit lengths are carried explicitly so words and codes survive the
//! round trip bit-exact, leading zeros included.

use crate::bitstream::{BitReader, BitString};
use crate::tree::CodeTable;
use crate::{HfzError, HfzResult};

/// The deserialized contents of one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    pub table: CodeTable,
    pub content: Vec<u8>,
    /// Exact number of compressed bits in `content`; the byte padding
    /// beyond it must never be decoded.
    pub content_length: u32,
    pub tail: BitString,
}

/// Append a cell (u32 big-endian length + payload) to `out`.
fn write_cell(out: &mut Vec<u8>, payload: &[u8]) -> HfzResult<()> {
    let len = u32::try_from(payload.len()).map_err(|_| HfzError::Unsupported)?;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(payload);
    Ok(())
}

/// Split the next cell off the front of `data`.
///
/// Returns (payload, rest). Fails with [`HfzError::MalformedFile`] if the
/// cell claims more bytes than remain.
fn read_cell(data: &[u8]) -> HfzResult<(&[u8], &[u8])> {
    if data.len() < 4 {
        return Err(HfzError::MalformedFile);
    }
    let len = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    let rest = &data[4..];
    if len > rest.len() {
        return Err(HfzError::MalformedFile);
    }
    Ok((&rest[..len], &rest[len..]))
}

/// Encode a bit string as u32 big-endian bit count + packed bits.
fn pack_bits(bits: &BitString) -> HfzResult<Vec<u8>> {
    let len = u32::try_from(bits.len()).map_err(|_| HfzError::Unsupported)?;
    let mut out = Vec::with_capacity(4 + bits.as_bytes().len());
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(bits.as_bytes());
    Ok(out)
}

/// Decode a bit string from u32 big-endian bit count + packed bits.
fn unpack_bits(payload: &[u8]) -> HfzResult<BitString> {
    if payload.len() < 4 {
        return Err(HfzError::MalformedFile);
    }
    let len = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;
    let packed = &payload[4..];
    if len > packed.len() * 8 {
        return Err(HfzError::MalformedFile);
    }
    Ok(BitReader::new(packed).read(len))
}

fn serialize_table(table: &CodeTable) -> HfzResult<Vec<u8>> {
    let mut block = Vec::new();
    for (word, code) in table.iter() {
        write_cell(&mut block, &pack_bits(word)?)?;
        write_cell(&mut block, &pack_bits(code)?)?;
    }
    Ok(block)
}

fn deserialize_table(mut block: &[u8]) -> HfzResult<CodeTable> {
    let mut pairs = Vec::new();
    while !block.is_empty() {
        let (word_payload, rest) = read_cell(block)?;
        let (code_payload, rest) = read_cell(rest)?;
        block = rest;

        let word = unpack_bits(word_payload)?;
        let code = unpack_bits(code_payload)?;
        // An empty code can never match any bit prefix.
        if code.is_empty() {
            return Err(HfzError::MalformedFile);
        }
        pairs.push((word, code));
    }
    Ok(CodeTable::from_pairs(pairs))
}

impl Archive {
    /// Serialize the archive into its byte layout.
    pub fn to_bytes(&self) -> HfzResult<Vec<u8>> {
        let mut out = Vec::new();
        write_cell(&mut out, &serialize_table(&self.table)?)?;
        out.extend_from_slice(&self.content_length.to_be_bytes());
        write_cell(&mut out, &self.content)?;
        write_cell(&mut out, &pack_bits(&self.tail)?)?;
        Ok(out)
    }

    /// Parse an archive from bytes.
    ///
    /// Trailing bytes after the tail cell are ignored.
    pub fn from_bytes(data: &[u8]) -> HfzResult<Archive> {
        let (table_block, rest) = read_cell(data)?;
        let table = deserialize_table(table_block)?;

        if rest.len() < 4 {
            return Err(HfzError::MalformedFile);
        }
        let content_length = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]);
        let rest = &rest[4..];

        let (content, rest) = read_cell(rest)?;
        let (tail_payload, _) = read_cell(rest)?;
        let tail = unpack_bits(tail_payload)?;

        Ok(Archive {
            table,
            content: content.to_vec(),
            content_length,
            tail,
        })
    }
}
