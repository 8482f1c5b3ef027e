/// DAWG builder for constructing dictionaries from sorted word lists.
pub mod builder;
/// Internal byte-level codec for the dense binary format.
pub(crate) mod codec;
/// Indexed graph representation, lookup, and file round-tripping.
pub mod graph;
/// Rack-constrained anagram search.
pub mod search;

pub use builder::{Builder, IntoWord};
pub use graph::Dawg;
pub use search::DEFAULT_BLANK;
