use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use smallvec::SmallVec;

use crate::errors::Result;

use super::builder::{Builder, BuilderNode, ROOT};
use super::codec;

/// An immutable node of the indexed graph.
///
/// Edges carry the index of their destination node rather than a reference,
/// so the whole graph lives in one flat array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) terminal: bool,
    /// Outgoing edges, sorted by letter.
    pub(crate) edges: SmallVec<[(u8, u32); 4]>,
}

impl Node {
    /// Returns the index of the node that letter's edge leads to, or `None`
    /// if no such edge exists.
    #[inline]
    pub(crate) fn get(&self, letter: u8) -> Option<u32> {
        // Unrolled by 2: exposes load-level parallelism and beats both
        // binary search and a scalar loop on the short edge lists real
        // dictionaries produce.
        let chunks = self.edges.chunks_exact(2);
        let remainder = chunks.remainder();
        for chunk in chunks {
            if chunk[0].0 == letter {
                return Some(chunk[0].1);
            }
            if chunk[1].0 == letter {
                return Some(chunk[1].1);
            }
        }
        for &(l, child) in remainder {
            if l == letter {
                return Some(child);
            }
        }
        None
    }
}

/// A compiled, immutable DAWG dictionary.
///
/// Obtained from [`Builder::build`], [`Dawg::deserialize`], or
/// [`Dawg::load`]. The graph owns a flat array of nodes with the root at
/// index 0; it has no interior mutability, so shared references can be used
/// from any number of threads at once.
///
/// # Examples
///
/// ```
/// use dawglex::{Builder, Dawg};
///
/// let mut builder = Builder::new();
/// for word in ["act", "cat", "cot"] {
///     builder.insert(word).unwrap();
/// }
/// let dawg = builder.build();
///
/// assert!(dawg.contains("cat"));
/// assert!(!dawg.contains("dog"));
///
/// let restored = Dawg::deserialize(&dawg.serialize()).unwrap();
/// assert_eq!(restored.node_count(), dawg.node_count());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dawg {
    pub(crate) nodes: Vec<Node>,
}

impl Dawg {
    /// Flattens a finalized builder arena into the indexed representation.
    ///
    /// Nodes displaced during canonicalization are unreachable from the
    /// root and get dropped here; survivors are renumbered densely in
    /// ascending arena order, which places the root at index 0.
    pub(crate) fn from_arena(arena: &[BuilderNode]) -> Self {
        let mut reachable = vec![false; arena.len()];
        reachable[ROOT as usize] = true;
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            for &(_, child) in &arena[id as usize].edges {
                if !reachable[child as usize] {
                    reachable[child as usize] = true;
                    stack.push(child);
                }
            }
        }

        let mut remap = vec![0u32; arena.len()];
        let mut next = 0u32;
        for (id, live) in reachable.iter().enumerate() {
            if *live {
                remap[id] = next;
                next += 1;
            }
        }

        let mut nodes = Vec::with_capacity(next as usize);
        for (id, live) in reachable.iter().enumerate() {
            if *live {
                let source = &arena[id];
                nodes.push(Node {
                    terminal: source.terminal,
                    edges: source
                        .edges
                        .iter()
                        .map(|&(letter, child)| (letter, remap[child as usize]))
                        .collect(),
                });
            }
        }
        debug_assert_eq!(nodes.len(), next as usize, "dense indices must have no gaps");
        Dawg { nodes }
    }

    /// Assembles a graph from already-validated nodes (the decoder's path).
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        Dawg { nodes }
    }

    #[inline]
    pub(crate) fn node(&self, index: u32) -> &Node {
        &self.nodes[index as usize]
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the given word is in the dictionary.
    ///
    /// The word is folded to ASCII lowercase byte by byte before the walk;
    /// bytes without a matching edge (including any non-ASCII byte) make
    /// the lookup miss.
    ///
    /// # Examples
    ///
    /// ```
    /// use dawglex::Builder;
    ///
    /// let mut builder = Builder::new();
    /// builder.insert("cart").unwrap();
    /// let dawg = builder.build();
    ///
    /// assert!(dawg.contains("cart"));
    /// assert!(dawg.contains("CART"));
    /// assert!(!dawg.contains("car"));
    /// ```
    pub fn contains(&self, word: &str) -> bool {
        self.contains_bytes(word.as_bytes())
    }

    /// Byte-level variant of [`contains`](Dawg::contains) for dictionaries
    /// built from raw byte sequences.
    pub fn contains_bytes(&self, word: &[u8]) -> bool {
        let mut current = ROOT;
        for &byte in word {
            match self.node(current).get(byte.to_ascii_lowercase()) {
                Some(child) => current = child,
                None => return false,
            }
        }
        self.node(current).terminal
    }

    /// Returns `true` if any word in the dictionary starts with `prefix`.
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        let mut current = ROOT;
        for &byte in prefix.as_bytes() {
            match self.node(current).get(byte.to_ascii_lowercase()) {
                Some(child) => current = child,
                None => return false,
            }
        }
        true
    }

    /// Collects every word in the dictionary, in lexicographic order.
    pub fn words(&self) -> Vec<String> {
        let mut words = Vec::new();
        let mut prefix = Vec::new();
        self.collect_words(ROOT, &mut prefix, &mut words);
        words
    }

    fn collect_words(&self, index: u32, prefix: &mut Vec<u8>, words: &mut Vec<String>) {
        let node = self.node(index);
        if node.terminal {
            words.push(String::from_utf8_lossy(prefix).into_owned());
        }
        for &(letter, child) in &node.edges {
            prefix.push(letter);
            self.collect_words(child, prefix, words);
            prefix.pop();
        }
    }

    /// Encodes the graph into the dense binary format.
    pub fn serialize(&self) -> Vec<u8> {
        codec::encode(self)
    }

    /// Decodes a graph from the dense binary format.
    ///
    /// # Errors
    ///
    /// Fails with a decode error on truncated input, a node id that does
    /// not match its position, an edge child out of range, or trailing
    /// bytes after the last node.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        codec::decode(bytes)
    }

    /// Writes the serialized graph to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.serialize())?;
        Ok(())
    }

    /// Reads and decodes a serialized graph from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::deserialize(&bytes)
    }

    /// Builds a dictionary from a word-list file and writes the compiled
    /// binary to `output`.
    ///
    /// The input is read one word per line. Empty lines and lines starting
    /// with `#` are skipped. Lines must already be sorted in ascending byte
    /// order; the build fails with an order violation otherwise. The file
    /// is never sorted internally.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from either file and builder errors from
    /// malformed input.
    pub fn build_from_file(
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<Self> {
        let file = File::open(input)?;
        let mut reader = BufReader::new(file);
        let mut builder = Builder::new();

        // Calling read_line repeatedly lets us reuse one string instead of
        // allocating a fresh one per line.
        let mut buf = String::with_capacity(80);
        loop {
            match reader.read_line(&mut buf) {
                Ok(0) => break,
                Err(e) => return Err(e.into()),
                _ => {}
            }
            let word = buf.trim_end();
            if !word.is_empty() && !is_comment(word) {
                builder.insert(word)?;
            }
            buf.clear();
        }

        let dawg = builder.build();
        dawg.save(output)?;
        Ok(dawg)
    }
}

/// Returns true if this line is a comment.
pub(crate) fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

#[cfg(test)]
mod test {
    use super::*;

    fn build(words: &[&str]) -> Dawg {
        let mut builder = Builder::new();
        for word in words {
            builder.insert(*word).unwrap();
        }
        builder.build()
    }

    #[test]
    fn basic_word_lookup() {
        let dawg = build(&["bake", "cake", "fake", "lake"]);
        assert!(dawg.contains("bake"));
        assert!(dawg.contains("cake"));
        assert!(!dawg.contains("make"));
        assert!(!dawg.contains("bak"));
        assert!(!dawg.contains("bakes"));
    }

    #[test]
    fn empty_dictionary() {
        let dawg = Builder::new().build();
        assert_eq!(dawg.node_count(), 1);
        assert!(!dawg.contains(""));
        assert!(!dawg.contains("a"));
        assert!(dawg.words().is_empty());
        assert!(dawg.contains_prefix(""));
    }

    #[test]
    fn non_ascii_lookup_misses() {
        let dawg = build(&["cafe"]);
        assert!(!dawg.contains("café"));
    }

    #[test]
    fn prefix_checks() {
        let dawg = build(&["bake", "baked", "cake"]);
        assert!(dawg.contains_prefix("ba"));
        assert!(dawg.contains_prefix("bake"));
        assert!(dawg.contains_prefix("BAKED"));
        assert!(!dawg.contains_prefix("bakes"));
        assert!(!dawg.contains_prefix("ma"));
    }

    #[test]
    fn words_returns_inserted_set_in_order() {
        let list = ["act", "cat", "cats", "cot"];
        let dawg = build(&list);
        assert_eq!(dawg.words(), list);
    }

    #[test]
    fn root_is_index_zero_and_all_nodes_reachable() {
        let dawg = build(&["car", "cars", "cart", "cat", "cats"]);
        let mut seen = vec![false; dawg.node_count()];
        seen[0] = true;
        let mut stack = vec![0u32];
        while let Some(index) = stack.pop() {
            for &(_, child) in &dawg.node(index).edges {
                assert!((child as usize) < dawg.node_count());
                if !seen[child as usize] {
                    seen[child as usize] = true;
                    stack.push(child);
                }
            }
        }
        assert!(seen.iter().all(|&s| s), "unreachable node left after flatten");
    }

    #[test]
    fn suffixes_are_shared() {
        let testdata = [
            "asuffix",
            "bsuffix",
            "cdesuffix",
            "fffffffsuffix",
            "inbetween",
            "jsuffix",
            "xxsuffix",
        ];
        let dawg = build(&testdata);
        // Every word ending in "suffix" must funnel into the same node at
        // the start of the shared tail.
        let suffix_node = dawg
            .node(dawg.node(0).get(b'a').unwrap())
            .get(b's')
            .unwrap();
        for prefix_letter in [b'b', b'j'] {
            let node = dawg
                .node(dawg.node(0).get(prefix_letter).unwrap())
                .get(b's')
                .unwrap();
            assert_eq!(node, suffix_node);
        }
    }

    #[test]
    fn edge_lists_stay_sorted_after_flatten() {
        let dawg = build(&["ant", "bat", "cow", "dog", "eel", "fox"]);
        for node in &dawg.nodes {
            assert!(node.edges.windows(2).all(|w| w[0].0 < w[1].0));
        }
    }

    #[test]
    fn dawg_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Dawg>();
    }

    #[test]
    fn shared_lookups_across_threads() {
        let dawg = build(&["act", "cat", "cot"]);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    assert!(dawg.contains("cat"));
                    assert!(!dawg.contains("dog"));
                });
            }
        });
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.dawg");
        let dawg = build(&["act", "cat", "cats"]);
        dawg.save(&path).unwrap();
        let restored = Dawg::load(&path).unwrap();
        assert_eq!(restored, dawg);
        assert!(restored.contains("cats"));
    }

    #[test]
    fn load_missing_file_surfaces_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Dawg::load(dir.path().join("absent.dawg")).unwrap_err();
        assert!(matches!(err, crate::errors::Error::Io(_)));
    }

    #[test]
    fn build_from_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("words.txt");
        let output = dir.path().join("words.dawg");
        std::fs::write(&input, "# tiny lexicon\nact\n\ncat\ncats\n").unwrap();

        let dawg = Dawg::build_from_file(&input, &output).unwrap();
        assert_eq!(dawg.words(), ["act", "cat", "cats"]);

        let loaded = Dawg::load(&output).unwrap();
        assert_eq!(loaded, dawg);
    }

    #[test]
    fn build_from_file_rejects_unsorted_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("words.txt");
        let output = dir.path().join("words.dawg");
        std::fs::write(&input, "cat\nact\n").unwrap();

        let err = Dawg::build_from_file(&input, &output).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::Error::OrderViolation { .. }
        ));
        assert!(!output.exists());
    }

    #[test]
    fn comment_that_starts_with_pound() {
        assert!(is_comment("# This is a comment"));
    }

    #[test]
    fn comment_with_whitespace_before_pound() {
        assert!(is_comment("        # This is a comment with whitespace"));
    }

    #[test]
    fn non_comment() {
        assert!(!is_comment("reverberate"));
    }

    #[test]
    fn non_comment_whitespace() {
        assert!(!is_comment(" reverberate"));
    }
}
