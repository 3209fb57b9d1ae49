//! A byte-indexed prefix tree of code table entries.
//!
//! Nodes live in one arena and are addressed by [`NodeId`]. A parent owns its children through
//! the arena, there are no back references, and nodes are never removed.
use crate::alloc::vec::Vec;
use crate::Code;

/// Handle of a node in a [`Trie`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

/// A forward-only tree over byte sequences.
///
/// Each node stands for the sequence of edge labels leading to it from the root and may carry
/// the code assigned to that sequence.
///
/// To avoid using too much memory we keep nodes with few successors in a short form. This form
/// doesn't offer lookup by indexing but instead does a linear search. Nodes are promoted to a
/// full 256-entry table once the short form overflows.
pub struct Trie {
    nodes: Vec<Node>,
    simples: Vec<Simple>,
    complex: Vec<Full>,
}

#[derive(Clone, Copy)]
struct Node {
    code: Option<Code>,
    successors: Successors,
}

#[derive(Clone, Copy)]
enum Successors {
    NoSuccessor,
    Simple(u32),
    Full(u32),
}

const SHORT: usize = 16;

/// Marks an empty slot in a full table.
const VACANT: u32 = u32::MAX;

#[derive(Clone, Copy)]
struct Simple {
    nodes: [u32; SHORT],
    chars: [u8; SHORT],
    count: u8,
}

#[derive(Clone, Copy)]
struct Full {
    char_continuation: [u32; 256],
}

impl Trie {
    /// Create a tree holding only the root.
    pub fn new() -> Self {
        Trie::with_capacity(1)
    }

    /// Create a tree with room for `nodes` nodes, the root included.
    pub fn with_capacity(nodes: usize) -> Self {
        let mut trie = Trie {
            nodes: Vec::with_capacity(nodes.max(1)),
            simples: Vec::new(),
            complex: Vec::new(),
        };
        trie.push_node();
        trie
    }

    /// The root, standing for the empty sequence.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The number of nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds its root, so this is never true. Provided for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The code assigned to the sequence of `node`, if any.
    pub fn code(&self, node: NodeId) -> Option<Code> {
        self.node(node).code
    }

    /// Assign a code to the sequence of `node`.
    ///
    /// # Panics
    ///
    /// When the node already carries a code. Codes are never reassigned.
    pub fn set_code(&mut self, node: NodeId, code: Code) {
        let slot = &mut self.nodes[node.index()].code;
        assert!(
            slot.is_none(),
            "node {:?} already carries code {:?}, refusing {}",
            node,
            slot,
            code
        );
        *slot = Some(code);
    }

    /// The child of `node` along the edge `ch`.
    ///
    /// A missing edge is the normal answer for a sequence that has not been seen yet.
    pub fn child(&self, node: NodeId, ch: u8) -> Option<NodeId> {
        match self.node(node).successors {
            Successors::NoSuccessor => None,
            Successors::Simple(idx) => {
                let nexts = &self.simples[idx as usize];
                let successors = nexts
                    .nodes
                    .iter()
                    .zip(nexts.chars.iter())
                    .take(usize::from(nexts.count));
                for (&snode, &sch) in successors {
                    if sch == ch {
                        return Some(NodeId(snode));
                    }
                }

                None
            }
            Successors::Full(idx) => {
                let full = &self.complex[idx as usize];
                match full.char_continuation[usize::from(ch)] {
                    VACANT => None,
                    next => Some(NodeId(next)),
                }
            }
        }
    }

    /// Follow `seq` edge by edge starting at `from`.
    ///
    /// Stops at the first missing edge. Never modifies the tree.
    pub fn walk(&self, from: NodeId, seq: &[u8]) -> Option<NodeId> {
        seq.iter().try_fold(from, |node, &ch| self.child(node, ch))
    }

    /// The number of direct children of `node`.
    pub fn successors(&self, node: NodeId) -> usize {
        match self.node(node).successors {
            Successors::NoSuccessor => 0,
            Successors::Simple(idx) => usize::from(self.simples[idx as usize].count),
            Successors::Full(idx) => self.complex[idx as usize]
                .char_continuation
                .iter()
                .filter(|&&next| next != VACANT)
                .count(),
        }
    }

    /// If the successors of `node` are kept in a full 256-entry table.
    pub fn is_full_table(&self, node: NodeId) -> bool {
        match self.node(node).successors {
            Successors::Full(_) => true,
            _ => false,
        }
    }

    /// Keep the successors of `node` in a full 256-entry table from now on.
    ///
    /// Nodes are promoted on their own when the short form overflows. Calling this up front
    /// suits nodes known to get many children, like the root of a code table.
    pub fn make_full(&mut self, node: NodeId) {
        let mut full = Full {
            char_continuation: [VACANT; 256],
        };
        match self.node(node).successors {
            Successors::Full(_) => return,
            Successors::NoSuccessor => {}
            Successors::Simple(idx) => {
                let simple = &self.simples[idx as usize];
                let successors = simple
                    .chars
                    .iter()
                    .zip(simple.nodes.iter())
                    .take(usize::from(simple.count));
                for (&pch, &pnode) in successors {
                    full.char_continuation[usize::from(pch)] = pnode;
                }
            }
        }

        let new_key = Successors::Full(self.complex.len() as u32);
        self.complex.push(full);
        self.nodes[node.index()].successors = new_key;
    }

    /// Add a child of `parent` along the edge `ch`.
    ///
    /// # Panics
    ///
    /// When the edge already exists. Overwriting it would detach an existing sequence, see
    /// [`try_insert`] for the checked form.
    ///
    /// [`try_insert`]: #method.try_insert
    pub fn insert(&mut self, parent: NodeId, ch: u8) -> NodeId {
        match self.try_insert(parent, ch) {
            Ok(node) => node,
            Err(existing) => panic!(
                "edge {:#04x} of node {:?} already leads to {:?}",
                ch, parent, existing
            ),
        }
    }

    /// Add a child of `parent` along the edge `ch`.
    ///
    /// Return Ok with the new node, or Err with the node the edge already leads to. The tree is
    /// left unchanged in the latter case.
    pub fn try_insert(&mut self, parent: NodeId, ch: u8) -> Result<NodeId, NodeId> {
        if let Some(existing) = self.child(parent, ch) {
            return Err(existing);
        }

        let next = self.push_node();
        self.link(parent, ch, next);
        Ok(next)
    }

    fn link(&mut self, parent: NodeId, ch: u8, next: NodeId) {
        match self.node(parent).successors {
            Successors::NoSuccessor => {
                let new_key = Successors::Simple(self.simples.len() as u32);
                let mut simple = Simple::default();
                simple.nodes[0] = next.0;
                simple.chars[0] = ch;
                simple.count = 1;
                self.simples.push(simple);
                self.nodes[parent.index()].successors = new_key;
            }
            Successors::Simple(idx) if usize::from(self.simples[idx as usize].count) < SHORT => {
                let nexts = &mut self.simples[idx as usize];
                let nidx = usize::from(nexts.count);
                nexts.chars[nidx] = ch;
                nexts.nodes[nidx] = next.0;
                nexts.count += 1;
            }
            Successors::Simple(_) => {
                self.make_full(parent);
                self.link(parent, ch, next);
            }
            Successors::Full(idx) => {
                let full = &mut self.complex[idx as usize];
                full.char_continuation[usize::from(ch)] = next.0;
            }
        }
    }

    fn push_node(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            code: None,
            successors: Successors::NoSuccessor,
        });
        id
    }

    fn node(&self, node: NodeId) -> &Node {
        &self.nodes[node.index()]
    }
}

impl Default for Trie {
    fn default() -> Self {
        Trie::new()
    }
}

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for Simple {
    fn default() -> Self {
        Simple {
            nodes: [0; SHORT],
            chars: [0; SHORT],
            count: 0,
        }
    }
}
