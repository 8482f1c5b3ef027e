//! Dense binary format for compiled graphs.
//!
//! Layout (all integers little-endian, no framing or padding):
//!
//! ```text
//! u32 node_count
//! for each node, in index order:
//!     u8  terminal (0 or 1)
//!     u32 id (the node's own index; stored for validation)
//!     u8  edge_count
//!     edge_count × { u8 letter, u32 child_index }
//! ```

use smallvec::SmallVec;

use crate::errors::{Error, Result};

use super::graph::{Dawg, Node};

/// Append-only little-endian byte sink.
pub(crate) struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        ByteWriter {
            buf: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub(crate) fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    #[inline]
    pub(crate) fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Little-endian byte source with a moving read cursor.
pub(crate) struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        ByteReader { buf, pos: 0 }
    }

    /// Number of unread bytes.
    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(Error::UnexpectedEof {
                offset: self.pos,
                needed: len - self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    #[inline]
    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    #[inline]
    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// Encodes a graph into the binary format, nodes in ascending index order.
pub(crate) fn encode(dawg: &Dawg) -> Vec<u8> {
    let edge_total: usize = dawg.nodes.iter().map(|n| n.edges.len()).sum();
    let mut writer = ByteWriter::with_capacity(4 + dawg.nodes.len() * 6 + edge_total * 5);

    writer.write_u32(dawg.nodes.len() as u32);
    for (index, node) in dawg.nodes.iter().enumerate() {
        debug_assert!(node.edges.len() < 256);
        writer.write_u8(node.terminal as u8);
        writer.write_u32(index as u32);
        writer.write_u8(node.edges.len() as u8);
        for &(letter, child) in &node.edges {
            writer.write_u8(letter);
            writer.write_u32(child);
        }
    }
    writer.into_bytes()
}

/// Decodes a graph from the binary format, validating structure as it goes.
pub(crate) fn decode(bytes: &[u8]) -> Result<Dawg> {
    let mut reader = ByteReader::new(bytes);

    let node_count = reader.read_u32()?;
    if node_count == 0 {
        return Err(Error::EmptyGraph);
    }

    let mut nodes = Vec::with_capacity(node_count as usize);
    for expected in 0..node_count {
        let terminal = reader.read_u8()? != 0;
        let id = reader.read_u32()?;
        if id != expected {
            return Err(Error::IdMismatch {
                expected,
                found: id,
            });
        }

        let edge_count = reader.read_u8()?;
        let mut edges = SmallVec::with_capacity(edge_count as usize);
        for _ in 0..edge_count {
            let letter = reader.read_u8()?;
            let child = reader.read_u32()?;
            if child >= node_count {
                return Err(Error::ChildOutOfRange { child, node_count });
            }
            edges.push((letter, child));
        }
        nodes.push(Node { terminal, edges });
    }

    if reader.remaining() > 0 {
        return Err(Error::TrailingBytes(reader.remaining()));
    }
    Ok(Dawg::from_nodes(nodes))
}
