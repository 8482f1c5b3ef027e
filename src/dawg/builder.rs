use hashbrown::HashMap;
use mark_last::MarkLastIterator;
use smallvec::SmallVec;

use crate::errors::{Error, Result};

use super::graph::Dawg;

/// Index of a builder node inside the builder's arena.
pub(crate) type NodeId = u32;

/// The root always occupies the first arena slot.
pub(crate) const ROOT: NodeId = 0;

/// Trait for types that can be used as a word when building a DAWG.
///
/// Implemented for common string and byte-sequence types so that
/// [`Builder::insert`] accepts them directly without manual conversion.
pub trait IntoWord {
    /// Collects this word into a byte buffer.
    fn collect_word(self) -> SmallVec<[u8; 32]>;
}

impl IntoWord for &str {
    fn collect_word(self) -> SmallVec<[u8; 32]> {
        self.bytes().collect()
    }
}

impl IntoWord for &&str {
    fn collect_word(self) -> SmallVec<[u8; 32]> {
        self.bytes().collect()
    }
}

impl IntoWord for String {
    fn collect_word(self) -> SmallVec<[u8; 32]> {
        self.into_bytes().into_iter().collect()
    }
}

impl IntoWord for &String {
    fn collect_word(self) -> SmallVec<[u8; 32]> {
        self.bytes().collect()
    }
}

impl IntoWord for &[u8] {
    fn collect_word(self) -> SmallVec<[u8; 32]> {
        self.iter().copied().collect()
    }
}

impl IntoWord for Vec<u8> {
    fn collect_word(self) -> SmallVec<[u8; 32]> {
        self.into_iter().collect()
    }
}

impl<const N: usize> IntoWord for [u8; N] {
    fn collect_word(self) -> SmallVec<[u8; 32]> {
        self.into_iter().collect()
    }
}

impl<const N: usize> IntoWord for &[u8; N] {
    fn collect_word(self) -> SmallVec<[u8; 32]> {
        self.iter().copied().collect()
    }
}

/// A mutable node of the graph under construction.
///
/// Lives in the builder's arena and is addressed by its [`NodeId`]; the
/// arena index doubles as the node's identity for signature purposes.
#[derive(Debug, Default)]
pub(crate) struct BuilderNode {
    pub(crate) terminal: bool,
    /// Outgoing edges, kept sorted by letter.
    pub(crate) edges: SmallVec<[(u8, NodeId); 4]>,
}

impl BuilderNode {
    fn new(terminal: bool) -> Self {
        BuilderNode {
            terminal,
            edges: SmallVec::new(),
        }
    }

    /// Inserts or replaces the edge labeled `letter`, keeping edges sorted.
    fn set_edge(&mut self, letter: u8, child: NodeId) {
        match self.edges.binary_search_by_key(&letter, |&(l, _)| l) {
            Ok(pos) => self.edges[pos].1 = child,
            Err(pos) => self.edges.insert(pos, (letter, child)),
        }
    }

    /// The node's structural signature: finality plus the letter-sorted
    /// edge list. Children referenced here are canonical arena indices by
    /// the time the signature is consulted, so index equality witnesses
    /// subgraph equality.
    fn signature(&self) -> Signature {
        Signature {
            terminal: self.terminal,
            edges: self.edges.clone(),
        }
    }
}

/// Key into the canonicalization register.
///
/// Two builder nodes are interchangeable iff their signatures are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Signature {
    terminal: bool,
    edges: SmallVec<[(u8, NodeId); 4]>,
}

/// One frame of the unchecked suffix spine: `parent --letter--> child`.
struct SpineFrame {
    parent: NodeId,
    letter: u8,
    child: NodeId,
}

/// An incremental builder for minimal DAWGs.
///
/// Words must be inserted in strictly ascending byte order; the builder
/// canonicalizes shared suffixes online, so the graph is minimal the
/// moment [`build`](Builder::build) returns. All input is folded to ASCII
/// lowercase before it enters the graph.
///
/// # Examples
///
/// ```
/// use dawglex::dawg::Builder;
///
/// let mut builder = Builder::new();
/// for word in ["bake", "cake", "fake", "lake"] {
///     builder.insert(word).unwrap();
/// }
/// let dawg = builder.build();
///
/// assert!(dawg.contains("cake"));
/// assert!(!dawg.contains("ake"));
/// ```
pub struct Builder {
    /// Arena of nodes; the root sits at index 0. Nodes displaced during
    /// canonicalization stay behind as unreachable slots and are skipped
    /// when the graph is flattened.
    nodes: Vec<BuilderNode>,
    /// The previously inserted word, already lowercase-folded.
    previous: SmallVec<[u8; 32]>,
    /// Spine of the last inserted word that has not been canonicalized yet,
    /// ordered root-side first.
    unchecked: Vec<SpineFrame>,
    /// Canonical representative for every signature seen so far.
    register: HashMap<Signature, NodeId>,
}

impl Builder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Builder {
            nodes: vec![BuilderNode::new(false)],
            previous: SmallVec::new(),
            unchecked: Vec::new(),
            register: HashMap::new(),
        }
    }

    /// Inserts a word into the DAWG under construction.
    ///
    /// The word can be any type implementing [`IntoWord`], including `&str`,
    /// `String`, `&[u8]`, `Vec<u8>`, or fixed-size byte arrays. Letters are
    /// folded to ASCII lowercase before insertion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyWord`] for an empty word and
    /// [`Error::OrderViolation`] when the word (after folding) is not
    /// strictly greater than the previously inserted one.
    pub fn insert(&mut self, word: impl IntoWord) -> Result<()> {
        let mut word = word.collect_word();
        if word.is_empty() {
            return Err(Error::EmptyWord);
        }
        for byte in word.iter_mut() {
            *byte = byte.to_ascii_lowercase();
        }
        if word.as_slice() <= self.previous.as_slice() {
            return Err(Error::OrderViolation {
                previous: String::from_utf8_lossy(&self.previous).into_owned(),
                word: String::from_utf8_lossy(&word).into_owned(),
            });
        }

        let common = common_prefix_len(&word, &self.previous);
        self.canonicalize_suffix(common);

        // The suffix spine now ends at depth `common`; grow it with fresh
        // nodes for the remaining letters, marking the last one terminal.
        let mut parent = self.unchecked.last().map_or(ROOT, |frame| frame.child);
        for (last, letter) in word[common..].iter().copied().mark_last() {
            let child = self.alloc(BuilderNode::new(last));
            self.nodes[parent as usize].set_edge(letter, child);
            self.unchecked.push(SpineFrame {
                parent,
                letter,
                child,
            });
            parent = child;
        }

        self.previous = word;
        Ok(())
    }

    /// Finalizes construction and flattens the minimized graph.
    ///
    /// Consuming the builder is what seals the graph: there is no way to
    /// insert into a finalized DAWG.
    pub fn build(mut self) -> Dawg {
        self.canonicalize_suffix(0);
        Dawg::from_arena(&self.nodes)
    }

    fn alloc(&mut self, node: BuilderNode) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    /// Pops spine frames until only `target_len` remain, replacing each
    /// popped child with its canonical representative.
    ///
    /// Frames are popped deepest-first, so every node's children are
    /// already canonical when its own signature is looked up.
    fn canonicalize_suffix(&mut self, target_len: usize) {
        while self.unchecked.len() > target_len {
            let frame = self.unchecked.pop().expect("spine length checked above");
            let signature = self.nodes[frame.child as usize].signature();
            if let Some(&canonical) = self.register.get(&signature) {
                // Reparent onto the representative; the duplicate child
                // becomes unreachable and is dropped at flatten time.
                self.nodes[frame.parent as usize].set_edge(frame.letter, canonical);
            } else {
                self.register.insert(signature, frame.child);
            }
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
