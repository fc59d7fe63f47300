//! Huffman tree construction.
//!
//! Merging pulls the two lowest entries from an ordered set keyed by
//! `(frequency, identity)`. A leaf's identity is its byte value (0-255); an
//! internal node's identity is `256 + index` into the node arena. The key ranges
//! never overlap, so ties on frequency resolve leaves first, then lower byte
//! values, then earlier internal nodes. The result is fully deterministic.

use std::collections::BTreeSet;

use crate::frequency::FrequencyTable;

/// Identity offset for internal nodes in the priority key.
const INTERNAL_KEY_BASE: u16 = 256;

/// Reference to a tree node: a leaf byte or an index into the internal arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    Leaf(u8),
    Internal(usize),
}

impl NodeRef {
    fn key(self) -> u16 {
        match self {
            NodeRef::Leaf(byte) => byte as u16,
            NodeRef::Internal(index) => INTERNAL_KEY_BASE + index as u16,
        }
    }

    fn from_key(key: u16) -> Self {
        if key < INTERNAL_KEY_BASE {
            NodeRef::Leaf(key as u8)
        } else {
            NodeRef::Internal((key - INTERNAL_KEY_BASE) as usize)
        }
    }
}

/// An internal node. Always has exactly two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalNode {
    pub weight: u64,
    /// `children[0]` is the lower-priority entry removed first and takes bit 0
    pub children: [NodeRef; 2],
}

/// A Huffman tree over the byte values present in some input.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<InternalNode>,
    root: NodeRef,
}

impl HuffmanTree {
    /// Build the tree for `freqs`.
    ///
    /// Returns `None` when no byte value has a non-zero count. A single
    /// distinct value produces a tree whose root is that leaf.
    pub fn from_frequencies(freqs: &FrequencyTable) -> Option<Self> {
        let mut queue: BTreeSet<(u64, u16)> = freqs
            .iter()
            .map(|(byte, count)| (count, NodeRef::Leaf(byte).key()))
            .collect();
        let mut nodes: Vec<InternalNode> = Vec::with_capacity(queue.len().saturating_sub(1));

        loop {
            let (first_weight, first_key) = queue.pop_first()?;
            let Some((second_weight, second_key)) = queue.pop_first() else {
                return Some(Self {
                    nodes,
                    root: NodeRef::from_key(first_key),
                });
            };

            let merged = NodeRef::Internal(nodes.len());
            let weight = first_weight + second_weight;
            nodes.push(InternalNode {
                weight,
                children: [NodeRef::from_key(first_key), NodeRef::from_key(second_key)],
            });
            queue.insert((weight, merged.key()));
        }
    }

    /// Build the tree directly from input bytes.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        Self::from_frequencies(&FrequencyTable::from_bytes(data))
    }

    pub fn root(&self) -> NodeRef {
        self.root
    }

    /// Look up an internal node by arena index.
    pub fn node(&self, index: usize) -> Option<&InternalNode> {
        self.nodes.get(index)
    }

    /// Internal nodes in creation order.
    pub fn internal_nodes(&self) -> &[InternalNode] {
        &self.nodes
    }

    /// Number of leaves, which is one more than the number of merges.
    pub fn leaf_count(&self) -> usize {
        self.nodes.len() + 1
    }
}
