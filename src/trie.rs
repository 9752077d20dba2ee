//! Trie keyed by sorted state sequences.
//!
//! The subset construction canonicalizes each set of NFA states as the
//! sorted sequence of its members and needs a stable mapping from that
//! sequence to a single merged DFA state. A trie over the id sequence gives
//! that mapping with lookup time linear in the key length, and two
//! encounters of the same subset are guaranteed to land on the same node.
//!
//! Nodes live in an arena (a `Vec` indexed by `NodeIdx`) and children are
//! kept as a sorted inline vector, searched by binary search.

use std::fmt;

use smallvec::SmallVec;

use crate::state::StateId;

/// Index into the trie arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
struct NodeIdx(u32);

impl NodeIdx {
    fn get(self) -> usize {
        self.0 as usize
    }
}

/// A node in the state trie, stored in the arena.
#[derive(Default)]
struct TrieNode {
    /// Children as (id, index) pairs, kept sorted by id.
    children: SmallVec<[(StateId, NodeIdx); 4]>,
    /// Merged state stored at the end of a key, if any.
    value: Option<StateId>,
}

/// Error returned by [`StateTrie::insert`] for a key that is already bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyPresent;

impl fmt::Display for AlreadyPresent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key already present in trie")
    }
}

impl std::error::Error for AlreadyPresent {}

/// Arena-backed trie mapping sorted state sequences to merged state ids.
pub struct StateTrie {
    nodes: Vec<TrieNode>,
    root: NodeIdx,
}

impl Default for StateTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl StateTrie {
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        nodes.push(TrieNode::default());
        Self {
            nodes,
            root: NodeIdx(0),
        }
    }

    /// Allocate a new node in the arena.
    fn alloc(&mut self) -> NodeIdx {
        let idx = self.nodes.len();
        self.nodes.push(TrieNode::default());
        NodeIdx(idx as u32)
    }

    /// Find or create the child of `parent` for the given id.
    fn get_or_create_child(&mut self, parent: NodeIdx, id: StateId) -> NodeIdx {
        let children = &self.nodes[parent.get()].children;
        match children.binary_search_by_key(&id, |&(key, _)| key) {
            Ok(pos) => children[pos].1,
            Err(pos) => {
                let child = self.alloc();
                self.nodes[parent.get()].children.insert(pos, (id, child));
                child
            }
        }
    }

    /// Walk an existing path for `key`, without creating nodes.
    fn walk(&self, key: &[StateId]) -> Option<NodeIdx> {
        let mut node = self.root;
        for &id in key {
            let children = &self.nodes[node.get()].children;
            match children.binary_search_by_key(&id, |&(k, _)| k) {
                Ok(pos) => node = children[pos].1,
                Err(_) => return None,
            }
        }
        Some(node)
    }

    /// Look up the value stored for `key`.
    pub fn lookup(&self, key: &[StateId]) -> Option<StateId> {
        self.walk(key).and_then(|node| self.nodes[node.get()].value)
    }

    /// Bind `key` to `value`. Fails if the key is already bound.
    pub fn insert(&mut self, key: &[StateId], value: StateId) -> Result<(), AlreadyPresent> {
        let mut node = self.root;
        for &id in key {
            node = self.get_or_create_child(node, id);
        }
        let slot = &mut self.nodes[node.get()].value;
        if slot.is_some() {
            return Err(AlreadyPresent);
        }
        *slot = Some(value);
        Ok(())
    }
}
