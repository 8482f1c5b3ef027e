//! Error types for dictionary construction, queries, and the binary codec.

use thiserror::Error;

/// Crate-wide `Result` type, defaulting the error to [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All failure modes this library can report.
///
/// Construction errors come from [`Builder::insert`](crate::dawg::Builder::insert),
/// argument errors from [`Dawg::anagrams`](crate::dawg::Dawg::anagrams), and the
/// decode errors from [`Dawg::deserialize`](crate::dawg::Dawg::deserialize) and
/// [`Dawg::load`](crate::dawg::Dawg::load). I/O errors are surfaced verbatim.
#[derive(Debug, Error)]
pub enum Error {
    /// Words were not inserted in strictly ascending byte order.
    ///
    /// Duplicate words are reported through this variant as well, since a
    /// repeated word is not strictly greater than its predecessor.
    #[error("word {word:?} is not strictly greater than the previous word {previous:?}")]
    OrderViolation {
        /// The word inserted immediately before the offending one.
        previous: String,
        /// The word that violated the ordering.
        word: String,
    },

    /// An empty word was passed to the builder.
    #[error("words must be non-empty")]
    EmptyWord,

    /// The anagram target length was zero.
    #[error("anagram target length must be at least 1")]
    ZeroLength,

    /// A fixed position falls outside the target word length.
    #[error("fixed position {position} is outside the target length {word_length}")]
    FixedOutOfRange {
        /// The offending 0-based position.
        position: usize,
        /// The requested word length.
        word_length: usize,
    },

    /// The same fixed position was constrained more than once.
    #[error("fixed position {0} was given more than once")]
    DuplicateFixed(usize),

    /// The encoded buffer ended before the structure it promised.
    #[error("unexpected end of buffer at offset {offset}: {needed} more bytes needed")]
    UnexpectedEof {
        /// Cursor position at which the read was attempted.
        offset: usize,
        /// Number of bytes the read required.
        needed: usize,
    },

    /// A node's stored id does not match its position in the node array.
    #[error("node id {found} does not match its position {expected}")]
    IdMismatch {
        /// The position the node was decoded at.
        expected: u32,
        /// The id stored in the buffer.
        found: u32,
    },

    /// An edge points at a node index beyond the node array.
    #[error("edge child {child} is out of range for a graph of {node_count} nodes")]
    ChildOutOfRange {
        /// The out-of-range child index.
        child: u32,
        /// Total number of nodes in the graph.
        node_count: u32,
    },

    /// The buffer holds more bytes than the encoded graph accounts for.
    #[error("{0} trailing bytes after the last node")]
    TrailingBytes(usize),

    /// The buffer encodes a graph with no nodes; even an empty dictionary
    /// has a root.
    #[error("a graph must contain at least the root node")]
    EmptyGraph,

    /// An I/O error from reading or writing a file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
