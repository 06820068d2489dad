use crate::board::{Board, Pos};
use std::ops::{Index, IndexMut};

/// Stable identifier of a node inside a [`NodePool`]. Stays valid as the pool
/// grows; replaces the owning-pointer graph of a classical A* implementation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline(always)] fn index(self) -> usize { self.0 as usize }
}

/// One search-tree node: an owned board snapshot plus search bookkeeping.
/// Equality is board content only; cost, estimates and parentage never
/// distinguish two nodes.
#[derive(Clone, Debug)]
pub struct Node {
    pub board: Board,
    /// Moves made from the root of this search tree.
    pub cost: u32,
    /// Estimated moves remaining, from the plugged heuristic.
    pub heuristic: u32,
    /// `cost + heuristic`; the frontier orders by this.
    pub estimate: u32,
    pub blank: Pos,
    /// Board content hash, computed once per node.
    pub hash: u64,
    /// Back-reference into the pool; `None` for the root.
    pub parent: Option<NodeId>,
}

impl PartialEq for Node {
    #[inline] fn eq(&self, other: &Self) -> bool { self.board == other.board }
}

impl Eq for Node {}

/// Arena owning every node of one search. A released slot keeps its board
/// buffer and is handed out again by the next allocation, so steady-state
/// expansion allocates nothing.
pub struct NodePool {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
}

impl NodePool {
    pub fn new() -> Self {
        Self { nodes: Vec::with_capacity(1024), free: Vec::new() }
    }

    /// Number of slots ever created, recycled ones included.
    #[inline(always)] pub fn len(&self) -> usize { self.nodes.len() }

    /// True only before the first root is seeded; releasing a node returns
    /// its slot to the free list without shrinking the pool.
    #[inline(always)] pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Seeds a search tree: cost 0, no parent, blank position and hash taken
    /// from `board`.
    pub fn insert_root(&mut self, board: Board, heuristic: u32) -> NodeId {
        let blank = board.blank_pos();
        let hash = board.content_hash();
        self.push(Node { cost: 0, heuristic, estimate: heuristic, blank, hash, parent: None, board })
    }

    /// New node initialized as an exact copy of `src`. Reuses a released
    /// slot's buffer when one is available.
    pub fn alloc_copy(&mut self, src: NodeId) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                let (dst, src) = self.pair_mut(id, src);
                dst.board.copy_from(&src.board);
                dst.cost = src.cost;
                dst.heuristic = src.heuristic;
                dst.estimate = src.estimate;
                dst.blank = src.blank;
                dst.hash = src.hash;
                dst.parent = src.parent;
                id
            }
            None => {
                let copy = self.nodes[src.index()].clone();
                self.push(copy)
            }
        }
    }

    /// Returns a slot to the free list.
    ///
    /// Legal only for a node that was never handed to the frontier or the
    /// visited set; anything still referring to `id` would silently observe
    /// the slot's next occupant.
    pub fn release(&mut self, id: NodeId) {
        self.free.push(id);
    }

    fn push(&mut self, node: Node) -> NodeId {
        assert!(self.nodes.len() < u32::MAX as usize, "node pool exhausted");
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Mutable access to `a` together with shared access to `b`.
    fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node, &Node) {
        let (a, b) = (a.index(), b.index());
        debug_assert_ne!(a, b);
        if a < b {
            let (left, right) = self.nodes.split_at_mut(b);
            (&mut left[a], &right[0])
        } else {
            let (left, right) = self.nodes.split_at_mut(a);
            (&mut right[0], &left[b])
        }
    }
}

impl Default for NodePool {
    fn default() -> Self { Self::new() }
}

impl Index<NodeId> for NodePool {
    type Output = Node;
    #[inline(always)] fn index(&self, id: NodeId) -> &Node { &self.nodes[id.index()] }
}

impl IndexMut<NodeId> for NodePool {
    #[inline(always)] fn index_mut(&mut self, id: NodeId) -> &mut Node { &mut self.nodes[id.index()] }
}
