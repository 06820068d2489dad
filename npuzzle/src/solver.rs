use crate::board::{Board, Pos, BLANK};
use crate::heuristic::Heuristic;
use crate::pool::{NodeId, NodePool};
use crate::stats::SearchStats;
use arrayvec::ArrayVec;
use log::debug;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Blank moves tried during expansion, as (row, column) offsets.
const MOVES: [(i32, i32); 4] = [(0, 1), (0, -1), (-1, 0), (1, 0)];

/// Frontier key. The heap yields the smallest total estimate first; among
/// equal estimates the larger accumulated cost wins, preferring the deeper,
/// more progressed path.
#[derive(Clone, Copy)]
struct FrontierEntry {
    estimate: u32,
    cost: u32,
    id: NodeId,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| self.cost.cmp(&other.cost))
    }
}

impl PartialOrd for FrontierEntry {
    #[inline(always)] fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl PartialEq for FrontierEntry {
    #[inline(always)] fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for FrontierEntry {}

/// Expanded states, keyed by board hash with equality resolved through the
/// pool, so hash collisions cannot conflate distinct boards.
#[derive(Default)]
struct VisitedSet {
    buckets: FxHashMap<u64, Vec<NodeId>>,
    len: usize,
}

impl VisitedSet {
    /// Canonical stored id of a board equal to `board`, if any.
    fn find(&self, pool: &NodePool, hash: u64, board: &Board) -> Option<NodeId> {
        self.buckets
            .get(&hash)?
            .iter()
            .copied()
            .find(|&id| pool[id].board == *board)
    }

    /// No-op when an equal board is already stored.
    fn insert(&mut self, pool: &NodePool, id: NodeId) {
        let node = &pool[id];
        let bucket = self.buckets.entry(node.hash).or_default();
        if bucket.iter().any(|&stored| pool[stored].board == node.board) {
            return;
        }
        bucket.push(id);
        self.len += 1;
    }

    #[inline(always)] fn len(&self) -> usize { self.len }
}

/// Outcome of one [`Solver::step`] call.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Step {
    /// More work remains; call [`Solver::step`] again.
    Running,
    /// The goal board was dequeued; [`Solver::path`] holds the move sequence.
    Solved,
    /// The frontier emptied without reaching the goal: no solution exists.
    Exhausted,
}

/// Best-first sliding-puzzle search over pool-allocated nodes.
///
/// One instance searches start towards goal one [`step`](Solver::step) at a
/// time. Two instances with swapped endpoints form a meet-in-the-middle pair:
/// an external driver steps both alternately and polls
/// [`stitch_paths`](Solver::stitch_paths) until the paths touch.
pub struct Solver<H: Heuristic> {
    pool: NodePool,
    frontier: BinaryHeap<FrontierEntry>,
    visited: VisitedSet,
    goal: Board,
    heuristic: H,
    /// Most recently dequeued node: the anchor of [`path`](Solver::path) and
    /// of collision tests.
    last: Option<NodeId>,
    /// Reused neighbor buffer, cleared by each expansion.
    scratch: ArrayVec<NodeId, 4>,
    stats: SearchStats,
    solved: bool,
}

impl<H: Heuristic> Solver<H> {
    /// Seeds the search at `start`; [`step`](Solver::step) reports
    /// [`Step::Solved`] once `goal` is dequeued. The root's heuristic is
    /// computed here.
    ///
    /// # Panics
    /// Panics if the two boards differ in size.
    pub fn new(start: Board, goal: Board, heuristic: H) -> Self {
        assert_eq!(start.size(), goal.size(), "start and goal dimensions differ");
        let mut pool = NodePool::new();
        let root_heuristic = heuristic.estimate(&start);
        let root = pool.insert_root(start, root_heuristic);
        let mut frontier = BinaryHeap::new();
        frontier.push(FrontierEntry { estimate: root_heuristic, cost: 0, id: root });
        Self {
            pool,
            frontier,
            visited: VisitedSet::default(),
            goal,
            heuristic,
            last: None,
            scratch: ArrayVec::new(),
            stats: SearchStats::default(),
            solved: false,
        }
    }

    /// One state-machine advancement: dequeues the best candidate, tests it
    /// against the goal and otherwise expands it. Duplicate neighbors go back
    /// to the pool; survivors enter the frontier and count into
    /// `total_states`. A terminal result latches: later calls keep reporting
    /// it without touching the search tree.
    pub fn step(&mut self) -> Step {
        if self.solved {
            return Step::Solved;
        }
        let Some(entry) = self.frontier.pop() else {
            return Step::Exhausted;
        };
        let top = entry.id;
        self.last = Some(top);
        if self.pool[top].heuristic == 0 && self.pool[top].board == self.goal {
            self.visited.insert(&self.pool, top);
            self.solved = true;
            return Step::Solved;
        }
        self.expand(top);
        for &neighbor in &self.scratch {
            let node = &self.pool[neighbor];
            if self.visited.find(&self.pool, node.hash, &node.board).is_some() {
                self.pool.release(neighbor);
            } else {
                self.stats.total_states += 1;
                self.frontier.push(FrontierEntry {
                    estimate: node.estimate,
                    cost: node.cost,
                    id: neighbor,
                });
            }
        }
        self.visited.insert(&self.pool, top);
        let live = self.frontier.len() + self.visited.len();
        if live > self.stats.max_states {
            self.stats.max_states = live;
        }
        Step::Running
    }

    /// Steps until the search terminates and returns the terminal state.
    pub fn run(&mut self) -> Step {
        loop {
            match self.step() {
                Step::Running => {}
                done => {
                    debug!("search finished as {:?} with {}", done, self.stats);
                    return done;
                }
            }
        }
    }

    /// Materializes every in-bounds blank move of `top` into the scratch
    /// buffer: board copied, cells swapped, bookkeeping recomputed.
    fn expand(&mut self, top: NodeId) {
        self.scratch.clear();
        let bound = self.goal.size() as i32;
        let blank = self.pool[top].blank;
        let parent_cost = self.pool[top].cost;
        for (dr, dc) in MOVES {
            let row = blank.row as i32 + dr;
            let col = blank.col as i32 + dc;
            if row < 0 || row >= bound || col < 0 || col >= bound {
                continue;
            }
            let (row, col) = (row as usize, col as usize);
            let id = self.pool.alloc_copy(top);
            let node = &mut self.pool[id];
            let moved = node.board.tile(row, col);
            *node.board.tile_mut(row, col) = BLANK;
            *node.board.tile_mut(blank.row, blank.col) = moved;
            node.cost = parent_cost + 1;
            node.heuristic = self.heuristic.estimate(&node.board);
            node.estimate = node.cost + node.heuristic;
            node.blank = Pos { row, col };
            node.parent = Some(top);
            node.hash = node.board.content_hash();
            self.scratch.push(id);
        }
    }

    /// Boards from the root to the most recently dequeued node, root first.
    /// Empty before the first [`step`](Solver::step).
    pub fn path(&self) -> Vec<Board> {
        match self.last {
            Some(id) => {
                let node = &self.pool[id];
                self.canonical_path(node.hash, &node.board)
            }
            None => Vec::new(),
        }
    }

    /// Boards from the root to the expanded node whose content equals
    /// `board`, root first. Empty when no such node has been expanded; the
    /// returned chain belongs to the stored instance, never to `board`.
    pub fn path_to(&self, board: &Board) -> Vec<Board> {
        self.canonical_path(board.content_hash(), board)
    }

    fn canonical_path(&self, hash: u64, board: &Board) -> Vec<Board> {
        match self.visited.find(&self.pool, hash, board) {
            Some(id) => self.path_from(id),
            None => Vec::new(),
        }
    }

    fn path_from(&self, id: NodeId) -> Vec<Board> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(id) = cursor {
            let node = &self.pool[id];
            path.push(node.board.clone());
            cursor = node.parent;
        }
        path.reverse();
        path
    }

    /// Whether this solver's most recently dequeued node already appears
    /// among `other`'s expanded states. Touching visited sets end a
    /// bidirectional run; the combined path is valid but not guaranteed to
    /// be minimal.
    pub fn collides_with<H2: Heuristic>(&self, other: &Solver<H2>) -> bool {
        match self.last {
            Some(id) => {
                let node = &self.pool[id];
                other.visited.find(&other.pool, node.hash, &node.board).is_some()
            }
            None => false,
        }
    }

    /// Start-to-goal sequence for a meet-in-the-middle pair, where `forward`
    /// searches start to goal and `backward` goal to start: the forward path
    /// to the meeting board, then the backward path away from it, with the
    /// meeting board kept once. Empty while the searches have not met; keep
    /// stepping both and ask again.
    pub fn stitch_paths<H2: Heuristic>(forward: &Solver<H>, backward: &Solver<H2>) -> Vec<Board> {
        if forward.collides_with(backward) {
            let Some(meet) = forward.last else { return Vec::new() };
            let mut path = forward.path();
            let mut tail = backward.path_to(&forward.pool[meet].board);
            tail.pop();
            tail.reverse();
            path.append(&mut tail);
            path
        } else if backward.collides_with(forward) {
            let mut path = Solver::stitch_paths(backward, forward);
            path.reverse();
            path
        } else {
            Vec::new()
        }
    }

    /// Diagnostics counters for the search so far.
    #[inline] pub fn stats(&self) -> SearchStats { self.stats }
}
