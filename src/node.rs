use crate::board::Board;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

/// Handle of a [`SearchNode`] inside the [`NodeArena`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

/// A board reached by the search, linked to the node it was expanded from.
#[derive(Debug)]
pub struct SearchNode {
    board: Rc<Board>,
    parent: Option<NodeId>,
    path_length: usize,
}

impl SearchNode {
    pub fn board(&self) -> &Rc<Board> {
        &self.board
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Slides made from the root to reach this board.
    pub fn path_length(&self) -> usize {
        self.path_length
    }

    /// Frontier key: moves so far plus the manhattan estimate of the rest.
    pub fn priority(&self) -> usize {
        self.path_length + self.board.manhattan()
    }
}

/// Owns every node of one search. Nodes only point upward, so a path is
/// recovered by following parents back to the root.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&mut self, board: Rc<Board>) -> NodeId {
        self.insert(SearchNode {
            board,
            parent: None,
            path_length: 0,
        })
    }

    pub fn child(&mut self, parent: NodeId, board: Rc<Board>) -> NodeId {
        let path_length = self.get(parent).path_length + 1;
        self.insert(SearchNode {
            board,
            parent: Some(parent),
            path_length,
        })
    }

    /// # Panics
    ///
    /// If `id` was handed out by a different arena.
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Boards from the root to `id`, both inclusive.
    pub fn path_to(&self, id: NodeId) -> Vec<Rc<Board>> {
        let mut path = Vec::with_capacity(self.get(id).path_length + 1);
        let mut current = Some(id);
        while let Some(id) = current {
            let node = self.get(id);
            path.push(Rc::clone(&node.board));
            current = node.parent;
        }
        path.reverse();
        path
    }

    fn insert(&mut self, node: SearchNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct FrontierEntry {
    priority: usize,
    sequence: u64,
    node: NodeId,
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reversed for a min-heap. Equal priorities pop in insertion order.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Nodes waiting to be expanded, lowest priority first.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    inserted: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId, priority: usize) {
        self.heap.push(FrontierEntry {
            priority,
            sequence: self.inserted,
            node,
        });
        self.inserted += 1;
    }

    pub fn pop_min(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|entry| entry.node)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
