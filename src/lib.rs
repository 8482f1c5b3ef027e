//! # dawglex
//!
//! A compact dictionary engine built on a minimal
//! [DAWG](https://en.wikipedia.org/wiki/Deterministic_acyclic_finite_state_automaton)
//! (Directed Acyclic Word Graph).
//!
//! A DAWG is a minimal acyclic finite-state automaton: a trie whose
//! equivalent suffixes are merged, giving compact storage and O(word
//! length) membership checks. Construction follows the incremental
//! algorithm of [Daciuk et al. (2000)](https://arxiv.org/abs/cs/0007009v1):
//! words arrive in sorted order and equivalent subgraphs are merged online.
//!
//! ## Features
//!
//! - **Compact**: suffix sharing minimizes node count; the compiled graph
//!   is a flat array indexed by `u32`
//! - **Fast**: O(word length) lookups, branch-and-bound anagram search
//! - **Portable**: a dense little-endian binary format for saving and
//!   loading compiled dictionaries
//! - **Rack search**: anagram enumeration with per-position constraints
//!   and wildcard tiles
//! - **Thread-safe**: a compiled [`Dawg`] is immutable and freely shared
//!
//! ## Quick Start
//!
//! ```
//! use dawglex::{Builder, Dawg, DEFAULT_BLANK};
//!
//! let mut builder = Builder::new();
//! for word in ["act", "cat", "cats", "cot"] {
//!     builder.insert(word).unwrap();
//! }
//! let dawg = builder.build();
//!
//! assert!(dawg.contains("cat"));
//! assert!(!dawg.contains("dog"));
//!
//! // Which three-letter words fit a rack of c, a, t?
//! let found = dawg.anagrams(b"cat", 3, &[], DEFAULT_BLANK).unwrap();
//! assert_eq!(found.len(), 2); // "act" and "cat"
//!
//! // Round-trip through the binary format.
//! let restored = Dawg::deserialize(&dawg.serialize()).unwrap();
//! assert!(restored.contains("cats"));
//! ```

#![warn(missing_docs)]

/// Core DAWG data structures: builder, indexed graph, codec, and search.
pub mod dawg;
/// Error types and the crate-wide `Result` alias.
pub mod errors;

pub use dawg::{Builder, Dawg, IntoWord, DEFAULT_BLANK};
pub use errors::{Error, Result};
