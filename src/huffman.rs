use std::collections::HashMap;
use std::fmt;

use log::{debug, trace};

use crate::error::{HuffError, Result};
use crate::frequency::FreqTable;

/// Index of a node inside a [`HuffmanTree`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Leaf {
        byte: u8,
        freq: u64,
    },
    Internal {
        freq: u64,
        zero: Option<NodeId>,
        one: Option<NodeId>,
    },
}

impl Node {
    pub fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } => *freq,
            Node::Internal { freq, .. } => *freq,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Binary code tree stored as an arena. Children only ever point at nodes
/// allocated before the parent (compression) or below it (header decoding),
/// so the structure cannot contain cycles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// A tree holding only an empty internal root, grown by [`HuffmanTree::insert_code`].
    pub(crate) fn with_empty_root() -> Self {
        HuffmanTree {
            nodes: vec![Node::Internal {
                freq: 0,
                zero: None,
                one: None,
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Child reached from `id` by following `bit` (`false` = 0-child).
    pub fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match self.node(id) {
            Node::Leaf { .. } => None,
            Node::Internal { zero, one, .. } => {
                if bit {
                    *one
                } else {
                    *zero
                }
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn set_child(&mut self, parent: NodeId, bit: bool, child: NodeId) {
        if let Node::Internal { zero, one, .. } = &mut self.nodes[parent.0] {
            if bit {
                *one = Some(child);
            } else {
                *zero = Some(child);
            }
        }
    }

    /// Grows the tree along `code`, allocating internal nodes on demand, and
    /// places a leaf for `byte` at its end.
    pub(crate) fn insert_code(&mut self, byte: u8, code: &Code) -> Result<()> {
        let bits = code.bits();
        let Some((&last, path)) = bits.split_last() else {
            return Err(HuffError::malformed(format!(
                "empty code for byte {:#04x}",
                byte
            )));
        };

        let mut cursor = self.root;
        for &bit in path {
            cursor = match self.child(cursor, bit) {
                Some(next) if self.node(next).is_leaf() => {
                    return Err(HuffError::malformed(format!(
                        "code {} for byte {:#04x} extends another code",
                        code, byte
                    )));
                }
                Some(next) => next,
                None => {
                    let next = self.push(Node::Internal {
                        freq: 0,
                        zero: None,
                        one: None,
                    });
                    self.set_child(cursor, bit, next);
                    next
                }
            };
        }

        if self.child(cursor, last).is_some() {
            return Err(HuffError::malformed(format!(
                "code {} for byte {:#04x} collides with another code",
                code, byte
            )));
        }
        let leaf = self.push(Node::Leaf { byte, freq: 0 });
        self.set_child(cursor, last, leaf);
        Ok(())
    }
}

/// Builds the code tree by repeatedly merging the two lowest-count nodes.
///
/// The working list is kept in descending count order. Leaves start in
/// ascending byte order and are stably sorted, and every merged parent is
/// placed before the first node with a strictly lower count, so equal inputs
/// always yield the same tree.
pub fn build_huffman_tree(frequencies: &FreqTable) -> Result<HuffmanTree> {
    if frequencies.is_empty() {
        return Err(HuffError::EmptyInput);
    }
    debug!(
        "Building Huffman Tree from {} unique symbols",
        frequencies.unique_symbols()
    );

    let mut tree = HuffmanTree {
        nodes: Vec::with_capacity(2 * frequencies.unique_symbols()),
        root: NodeId(0),
    };
    let mut work: Vec<NodeId> = frequencies
        .iter()
        .map(|(byte, freq)| tree.push(Node::Leaf { byte, freq }))
        .collect();
    work.sort_by(|a, b| tree.node(*b).freq().cmp(&tree.node(*a).freq()));

    if let &[lone] = work.as_slice() {
        let freq = tree.node(lone).freq();
        tree.root = tree.push(Node::Internal {
            freq,
            zero: None,
            one: Some(lone),
        });
        return Ok(tree);
    }

    while let (Some(one), Some(two)) = (work.pop(), work.pop()) {
        let freq = tree.node(one).freq() + tree.node(two).freq();
        let parent = tree.push(Node::Internal {
            freq,
            zero: Some(two),
            one: Some(one),
        });
        if work.is_empty() {
            tree.root = parent;
            break;
        }
        let pos = work.partition_point(|id| tree.node(*id).freq() >= freq);
        work.insert(pos, parent);
    }

    debug!("Tree construction complete, {} nodes", tree.nodes.len());
    Ok(tree)
}

/// A non-empty bit string assigned to one leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn new(bits: Vec<bool>) -> Self {
        Code(bits)
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Byte to code mapping, remembering the order in which leaves were found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
    order: Vec<u8>,
}

impl CodeTable {
    fn new() -> Self {
        CodeTable {
            codes: vec![None; 256],
            order: Vec::new(),
        }
    }

    pub fn get(&self, byte: u8) -> Option<&Code> {
        self.codes[byte as usize].as_ref()
    }

    /// Entries in pre-order discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.order
            .iter()
            .filter_map(|&b| self.codes[b as usize].as_ref().map(|c| (b, c)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn inverse(&self) -> HashMap<Code, u8> {
        self.iter().map(|(b, c)| (c.clone(), b)).collect()
    }
}

/// Walks the tree depth-first, 0-child before 1-child, and returns the code of
/// every leaf together with the payload length in bits (code length times
/// count, summed over all leaves).
pub fn derive_codes(tree: &HuffmanTree) -> (CodeTable, u64) {
    let mut table = CodeTable::new();
    let mut total_bits = 0u64;
    let mut stack = vec![(tree.root(), Vec::new())];

    while let Some((id, prefix)) = stack.pop() {
        match tree.node(id) {
            Node::Leaf { byte, freq } => {
                trace!(
                    "Assigning code to byte {:#04x} ('{}') : '{}'",
                    byte,
                    (*byte as char).escape_default(),
                    Code(prefix.clone())
                );
                total_bits += prefix.len() as u64 * freq;
                table.codes[*byte as usize] = Some(Code(prefix));
                table.order.push(*byte);
            }
            Node::Internal { zero, one, .. } => {
                if let Some(one) = one {
                    let mut path = prefix.clone();
                    path.push(true);
                    stack.push((*one, path));
                }
                if let Some(zero) = zero {
                    let mut path = prefix;
                    path.push(false);
                    stack.push((*zero, path));
                }
            }
        }
    }

    (table, total_bits)
}
