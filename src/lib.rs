//! hfz – Huffman compression over fixed-width bit-words.
//!
//! The input byte stream is read as a sequence of `wordbits`-wide bit
//! groups ("words"); an optimal prefix-free code is built from the word
//! frequency distribution and the archive stores the code table, the
//! compressed bits, their exact bit count, and the verbatim sub-word
//! tail, so decompression is exact.
//!
//! ```
//! let data = b"mississippi river delta";
//! let packed = hfz::compress(data, 8).unwrap();
//! let unpacked = hfz::decompress(&packed).unwrap();
//! assert_eq!(unpacked, data);
//! ```

pub mod bitstream;
pub mod codec;
pub mod format;
pub mod frequency;
pub mod pqueue;
pub mod tree;

#[cfg(test)]
mod validation;

pub use codec::{compress, decompress};

/// Error types for hfz operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HfzError {
    /// A code was requested from a tree node before the tree was built.
    InvalidState,
    /// A document word has no entry in the code table during encode.
    MissingSymbol,
    /// The compressed bits cannot be resolved to a unique code, or run
    /// out before the recorded content length.
    CorruptStream,
    /// A length-prefixed cell claims more bytes than the buffer holds.
    MalformedFile,
    /// Zero-width words, or a payload too large for the archive's
    /// 32-bit length fields.
    Unsupported,
}

impl std::fmt::Display for HfzError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidState => write!(f, "code tree is not built yet"),
            Self::MissingSymbol => write!(f, "word missing from code table"),
            Self::CorruptStream => write!(f, "compressed stream is corrupt"),
            Self::MalformedFile => write!(f, "malformed archive"),
            Self::Unsupported => write!(f, "unsupported parameter or size"),
        }
    }
}

impl std::error::Error for HfzError {}

pub type HfzResult<T> = Result<T, HfzError>;
