use crate::board::{Board, Pos, BLANK};

/// Distance-to-goal estimator consumed by the solver.
///
/// For minimum-length solutions the estimate must never exceed the true number
/// of remaining moves (admissibility). The solver trusts this contract and
/// performs no runtime check.
pub trait Heuristic {
    fn estimate(&self, board: &Board) -> u32;
}

/// Zero estimator; turns the best-first search into uniform-cost search.
impl Heuristic for () {
    #[inline(always)] fn estimate(&self, _board: &Board) -> u32 { 0 }
}

/// Where every tile value sits in `goal`, indexed by tile value.
fn goal_positions(goal: &Board) -> Vec<Pos> {
    let mut positions = vec![Pos { row: 0, col: 0 }; goal.cells()];
    for row in 0..goal.size() {
        for col in 0..goal.size() {
            positions[goal.tile(row, col) as usize] = Pos { row, col };
        }
    }
    positions
}

/// Sum over non-blank tiles of row plus column distance to the tile's cell in
/// the goal. Admissible: each move shifts one tile by one cell.
pub struct Manhattan {
    positions: Vec<Pos>,
}

impl Manhattan {
    pub fn new(goal: &Board) -> Self {
        Self { positions: goal_positions(goal) }
    }
}

impl Heuristic for Manhattan {
    fn estimate(&self, board: &Board) -> u32 {
        let mut sum = 0;
        for row in 0..board.size() {
            for col in 0..board.size() {
                let tile = board.tile(row, col);
                if tile == BLANK { continue; }
                let target = self.positions[tile as usize];
                sum += (row.abs_diff(target.row) + col.abs_diff(target.col)) as u32;
            }
        }
        sum
    }
}

/// Number of non-blank tiles away from their goal cell. Admissible but weak;
/// mostly useful as a baseline.
pub struct MisplacedTiles {
    positions: Vec<Pos>,
}

impl MisplacedTiles {
    pub fn new(goal: &Board) -> Self {
        Self { positions: goal_positions(goal) }
    }
}

impl Heuristic for MisplacedTiles {
    fn estimate(&self, board: &Board) -> u32 {
        let mut count = 0;
        for row in 0..board.size() {
            for col in 0..board.size() {
                let tile = board.tile(row, col);
                if tile != BLANK && self.positions[tile as usize] != (Pos { row, col }) {
                    count += 1;
                }
            }
        }
        count
    }
}

/// One point per non-blank tile out of its goal row and one more per tile out
/// of its goal column. Admissible: a tile out of its row needs at least one
/// vertical move, out of its column at least one horizontal move.
pub struct TilesOut {
    positions: Vec<Pos>,
}

impl TilesOut {
    pub fn new(goal: &Board) -> Self {
        Self { positions: goal_positions(goal) }
    }
}

impl Heuristic for TilesOut {
    fn estimate(&self, board: &Board) -> u32 {
        let mut count = 0;
        for row in 0..board.size() {
            for col in 0..board.size() {
                let tile = board.tile(row, col);
                if tile == BLANK { continue; }
                let target = self.positions[tile as usize];
                count += (target.row != row) as u32 + (target.col != col) as u32;
            }
        }
        count
    }
}
