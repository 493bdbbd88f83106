//! The code table: a binary trie threaded by insertion order.
//!
//! Every string ever entered keeps a node in the trie; a string is *coded*
//! while it additionally holds a code point. Coded nodes form a linked list
//! in insertion order, and along that list codes run `0, 1, 2, ...` without
//! gaps. Nodes live in an arena and refer to each other by index, so the
//! parent, child and list links form no ownership cycles.
//!
//! A node whose both children exist can never again end a longest match, so
//! its code is dead weight on the wire. Such codes are queued when the
//! second child appears and retired one at a time by
//! [`drop_oldest_redundant`], shrinking the code space the serializer has
//! to address. [`restore_all_codes`] undoes all of that at the end of a
//! stream.
//!
//! [`drop_oldest_redundant`]: CodeTable::drop_oldest_redundant
//! [`restore_all_codes`]: CodeTable::restore_all_codes

use std::collections::VecDeque;

use crate::Code;

/// Handle to one node of the trie, stable for the table's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(u32);

const ROOT: NodeId = NodeId(0);

struct Node {
    /// The bit this node appends to its parent's string. Unused on the root.
    bit: bool,
    /// Length in bits of the string ending here; zero on the root.
    depth: usize,
    /// Absent on the root only.
    parent: Option<NodeId>,
    children: [Option<NodeId>; 2],
    /// Next coded node in insertion order.
    next: Option<NodeId>,
    code: Option<Code>,
}

pub struct CodeTable {
    /// Every node ever created, in insertion order. The arena owns the
    /// trie; all links between nodes are indices into it.
    nodes: Vec<Node>,
    /// First coded node of the threaded list.
    head: Option<NodeId>,
    /// Code point to node, for coded nodes only.
    index: Vec<NodeId>,
    /// Nodes whose code can no longer be emitted, oldest first. Queued by
    /// id rather than code so entries survive the renumbering a drop does.
    redundant: VecDeque<NodeId>,
}

impl CodeTable {
    /// A table seeded with the two one-bit strings, coded `0` and `1`.
    pub fn new() -> Self {
        let root = Node {
            bit: false,
            depth: 0,
            parent: None,
            children: [None; 2],
            next: None,
            code: None,
        };
        let mut table = CodeTable {
            nodes: vec![root],
            head: None,
            index: Vec::new(),
            redundant: VecDeque::new(),
        };
        table.derive(ROOT, false);
        table.derive(ROOT, true);
        table
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    /// Number of coded strings.
    ///
    /// This can be less than [`strings`] when codes have been retired; it
    /// is the space size the serializer must address.
    ///
    /// [`strings`]: CodeTable::strings
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Number of strings stored in the trie, coded or not.
    pub fn strings(&self) -> usize {
        self.nodes.len() - 1
    }

    pub(crate) fn root(&self) -> NodeId {
        ROOT
    }

    pub(crate) fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        self.node(id).children[usize::from(bit)]
    }

    pub(crate) fn code(&self, id: NodeId) -> Option<Code> {
        self.node(id).code
    }

    pub fn contains_string(&self, string: &[bool]) -> bool {
        self.find_string(string).is_some()
    }

    pub fn contains_code(&self, code: Code) -> bool {
        code < self.index.len()
    }

    /// Walks the trie along `string`; `None` where the walk falls off.
    pub fn find_string(&self, string: &[bool]) -> Option<NodeId> {
        let mut cursor = ROOT;
        for &bit in string {
            cursor = self.child(cursor, bit)?;
        }
        Some(cursor)
    }

    /// The node currently holding `code`.
    pub fn find_code(&self, code: Code) -> Option<NodeId> {
        self.index.get(code).copied()
    }

    /// The code currently assigned to `string`, or `None` if it has been
    /// retired. Asking about a string that was never inserted is a caller
    /// bug.
    pub fn code_of(&self, string: &[bool]) -> Option<Code> {
        let node = self.find_string(string).expect("string is not in the table");
        self.node(node).code
    }

    /// The bit string holding `code`. Its length equals the node's depth.
    pub fn string_of(&self, code: Code) -> Vec<bool> {
        let mut string = Vec::new();
        self.copy_string(code, &mut string);
        string
    }

    /// Reconstructs the string for `code` into `into` by walking parent
    /// links, replacing the previous contents.
    pub(crate) fn copy_string(&self, code: Code, into: &mut Vec<bool>) {
        let node = self.find_code(code).expect("code is not in the table");
        into.clear();
        into.resize(self.node(node).depth, false);
        let mut cursor = node;
        for slot in into.iter_mut().rev() {
            *slot = self.node(cursor).bit;
            cursor = self.node(cursor).parent.expect("walked above the root");
        }
    }

    /// Inserts `string`, whose prefix must already be present, and assigns
    /// it the next code.
    pub fn insert(&mut self, string: &[bool]) -> NodeId {
        let (&bit, prefix) = string.split_last().expect("cannot insert the empty string");
        let parent = self.find_string(prefix).expect("prefix is not in the table");
        self.derive(parent, bit)
    }

    /// Adds the string `parent ++ bit` without re-walking the prefix. The
    /// child slot must be empty.
    pub(crate) fn derive(&mut self, parent: NodeId, bit: bool) -> NodeId {
        debug_assert!(self.child(parent, bit).is_none(), "string is already present");
        let id = NodeId(self.nodes.len() as u32);
        let code = self.index.len();
        self.nodes.push(Node {
            bit,
            depth: self.node(parent).depth + 1,
            parent: Some(parent),
            children: [None; 2],
            next: None,
            code: Some(code),
        });

        match self.index.last().copied() {
            Some(last) => self.node_mut(last).next = Some(id),
            None => self.head = Some(id),
        }
        self.index.push(id);

        self.node_mut(parent).children[usize::from(bit)] = Some(id);
        // With both children present the parent can never end a longest
        // match again; queue its code for retirement.
        let parent_node = self.node(parent);
        if parent_node.code.is_some() && parent_node.children.iter().all(Option::is_some) {
            self.redundant.push_back(parent);
        }
        id
    }

    /// Retires the oldest redundant code, if any.
    ///
    /// The node stays in the trie uncoded; every later code moves down by
    /// one so the code space stays contiguous.
    pub fn drop_oldest_redundant(&mut self) {
        let Some(id) = self.redundant.pop_front() else {
            return;
        };
        let code = self.node(id).code.expect("queued nodes are coded");

        let next = self.node(id).next;
        match code.checked_sub(1) {
            Some(prev) => {
                let prev_id = self.index[prev];
                self.node_mut(prev_id).next = next;
            }
            None => self.head = next,
        }
        let node = self.node_mut(id);
        node.next = None;
        node.code = None;

        self.index.remove(code);
        for later in code..self.index.len() {
            let later_id = self.index[later];
            self.node_mut(later_id).code = Some(later);
        }
    }

    /// Gives every string in the table a code again.
    ///
    /// Codes are handed out in insertion order, so previously retired
    /// strings get a code back but not necessarily their old one. The
    /// redundant queue is cleared.
    pub fn restore_all_codes(&mut self) {
        self.redundant.clear();
        self.index.clear();
        let total = self.nodes.len();
        for position in 1..total {
            let node = &mut self.nodes[position];
            node.code = Some(position - 1);
            node.next = if position + 1 < total {
                Some(NodeId(position as u32 + 1))
            } else {
                None
            };
            self.index.push(NodeId(position as u32));
        }
        self.head = Some(NodeId(1));
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl CodeTable {
    /// Asserts the structural invariants tying the trie, the code index,
    /// the threaded list and the redundant queue together.
    pub(crate) fn check_invariants(&self) {
        // The threaded walk visits codes 0, 1, 2, ... in order.
        let mut walked = Vec::new();
        let mut cursor = self.head;
        while let Some(id) = cursor {
            walked.push(self.node(id).code.expect("threaded nodes are coded"));
            cursor = self.node(id).next;
        }
        assert_eq!(walked, (0..self.len()).collect::<Vec<_>>());

        // The index and the per-node codes agree.
        for (code, &id) in self.index.iter().enumerate() {
            assert_eq!(self.node(id).code, Some(code));
        }

        // String and code lookups invert each other.
        for code in 0..self.len() {
            assert_eq!(self.code_of(&self.string_of(code)), Some(code));
        }

        // Queued nodes are still coded, have both children, and appear at
        // most once. The converse does not hold across a restore, which
        // clears the queue while re-coding two-children nodes.
        for (position, &id) in self.redundant.iter().enumerate() {
            let node = self.node(id);
            assert!(node.code.is_some());
            assert!(node.children.iter().all(Option::is_some));
            assert!(!self.redundant.iter().take(position).any(|&other| other == id));
        }
    }
}
