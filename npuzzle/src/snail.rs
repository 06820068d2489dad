use crate::board::{Board, Pos, Tile, BLANK};
use log::trace;
use rand::Rng;

/// Blank moves tried by the scrambler, as (row, column) offsets. The order is
/// load-bearing: draws index into it, so it determines what a seed replays.
const MOVES: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Linear cell indices in inward spiral order: starts at the top-left corner,
/// runs rightward, then down, left and up, shrinking the walked bounds each
/// time a side is exhausted. The goal numbering and the solvability parity are
/// both defined over this traversal.
pub fn spiral_order(size: usize) -> Vec<usize> {
    let bound = size as i32;
    let mut order = Vec::with_capacity(size * size);
    let (mut x, mut y) = (0i32, 0i32);
    let (mut step_x, mut step_y) = (1i32, 0i32);
    let (mut max_x, mut max_y) = (0i32, 0i32);
    for _ in 0..size * size {
        order.push(y as usize * size + x as usize);
        let next_x = x + step_x;
        let next_y = y + step_y;
        if next_x < 0
            || next_x >= bound
            || (step_x != 0 && if step_x > 0 { next_x >= bound + max_x } else { next_x < -max_x })
        {
            if next_x <= 0 || (step_x < 0 && next_x < -max_x) {
                max_x -= 1;
            }
            step_y = step_x;
            step_x = 0;
        } else if next_y < 0
            || next_y >= bound
            || (step_y != 0 && if step_y > 0 { next_y >= bound + max_y } else { next_y < -max_y })
        {
            if next_y >= bound || (step_y > 0 && next_y >= bound + max_y) {
                max_y -= 1;
            }
            step_x = -step_y;
            step_y = 0;
        }
        x += step_x;
        y += step_y;
    }
    order
}

/// The goal arrangement: `1..size*size` laid along the spiral, blank on the
/// spiral's final cell (the center for odd sizes, one left of it for even).
///
/// # Panics
/// Panics when `size` is zero, or above 256 where tile values would overflow
/// [`Tile`].
pub fn canonical_goal(size: usize) -> Board {
    assert!(size > 0, "boards have at least one cell");
    assert!(size <= 256, "tile values are u16, which caps the side length at 256");
    let order = spiral_order(size);
    let mut board = Board::filled(size);
    for (index, &cell) in order[..order.len() - 1].iter().enumerate() {
        *board.tile_mut(cell / size, cell % size) = (index + 1) as Tile;
    }
    board
}

/// Solvability via inversion parity of the spiral linearization (the ordering
/// [`canonical_goal`] uses; row-major parity tests the wrong goal). Legal
/// slides never change this parity, so a board reaches the goal exactly when
/// its parity matches the goal's even one.
pub fn is_solvable(board: &Board) -> bool {
    let order = spiral_order(board.size());
    let tiles = board.tiles();
    let mut inversions = 0usize;
    for i in 0..order.len() {
        for j in i + 1..order.len() {
            let earlier = tiles[order[i]];
            let later = tiles[order[j]];
            if earlier != BLANK && later != BLANK && earlier > later {
                inversions += 1;
            }
        }
    }
    inversions % 2 == 0
}

/// Scrambles [`canonical_goal`] with `swap_count` random blank moves, or a
/// drawn count in `[0, 1400)` when `swap_count` is zero. A direction that
/// would leave the grid is rejected but still consumes one unit of the
/// budget, so a given generator state always replays the same board. Every
/// applied move is a legal slide, hence the result is always solvable.
///
/// # Panics
/// Panics when `size` is outside the range [`canonical_goal`] accepts.
pub fn generate_solvable<R: Rng>(size: usize, swap_count: usize, rng: &mut R) -> Board {
    let mut board = canonical_goal(size);
    let mut blank = board.blank_pos();
    let mut remaining = if swap_count == 0 { rng.gen_range(0..1400) } else { swap_count };
    trace!("scrambling a {}x{} board with {} blank moves", size, size, remaining);
    while remaining > 0 {
        let (dr, dc) = MOVES[rng.gen_range(0..4)];
        let row = blank.row as i32 + dr;
        let col = blank.col as i32 + dc;
        if row >= 0 && row < size as i32 && col >= 0 && col < size as i32 {
            let (row, col) = (row as usize, col as usize);
            *board.tile_mut(blank.row, blank.col) = board.tile(row, col);
            *board.tile_mut(row, col) = BLANK;
            blank = Pos { row, col };
        }
        remaining -= 1;
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn as_coords(size: usize, order: &[usize]) -> Vec<(usize, usize)> {
        order.iter().map(|&cell| (cell / size, cell % size)).collect()
    }

    #[test]
    fn test_spiral_order_3() {
        assert_eq!(
            as_coords(3, &spiral_order(3)),
            [(0, 0), (0, 1), (0, 2), (1, 2), (2, 2), (2, 1), (2, 0), (1, 0), (1, 1)]
        );
    }

    #[test]
    fn test_spiral_order_2() {
        assert_eq!(as_coords(2, &spiral_order(2)), [(0, 0), (0, 1), (1, 1), (1, 0)]);
    }

    #[test]
    fn test_spiral_order_covers_every_cell() {
        for size in 1..=8 {
            let mut order = spiral_order(size);
            order.sort_unstable();
            assert_eq!(order, (0..size * size).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_canonical_goal_3() {
        assert_eq!(canonical_goal(3).tiles(), &[1, 2, 3,  8, 0, 4,  7, 6, 5]);
    }

    #[test]
    fn test_canonical_goal_4() {
        assert_eq!(
            canonical_goal(4).tiles(),
            &[1, 2, 3, 4,  12, 13, 14, 5,  11, 0, 15, 6,  10, 9, 8, 7]
        );
    }

    #[test]
    fn test_canonical_goal_largest_size() {
        let board = canonical_goal(256);
        assert_eq!(board.tiles().iter().max(), Some(&65535));
        assert_eq!(board.tiles().iter().filter(|&&tile| tile == BLANK).count(), 1);
    }

    #[test]
    #[should_panic(expected = "caps the side length")]
    fn test_canonical_goal_rejects_oversized_board() {
        canonical_goal(257);
    }

    #[test]
    fn test_goal_is_solvable() {
        for size in 1..=6 {
            assert!(is_solvable(&canonical_goal(size)));
        }
    }

    #[test]
    fn test_slides_preserve_solvability() {
        // Every legal slide out of the goal keeps the board solvable.
        let goal = canonical_goal(3);
        let blank = goal.blank_pos();
        for (dr, dc) in MOVES {
            let row = blank.row as i32 + dr;
            let col = blank.col as i32 + dc;
            if row < 0 || row >= 3 || col < 0 || col >= 3 { continue; }
            let mut slid = goal.clone();
            *slid.tile_mut(blank.row, blank.col) = slid.tile(row as usize, col as usize);
            *slid.tile_mut(row as usize, col as usize) = BLANK;
            assert!(is_solvable(&slid), "slide ({dr},{dc}) broke solvability");
        }
    }

    #[test]
    fn test_tile_swap_flips_solvability() {
        // Swapping two non-blank tiles is not a legal move and flips the
        // parity; swapping them back restores it.
        let mut board = canonical_goal(3);
        *board.tile_mut(0, 0) = 2;
        *board.tile_mut(0, 1) = 1;
        assert!(!is_solvable(&board));
        *board.tile_mut(0, 0) = 1;
        *board.tile_mut(0, 1) = 2;
        assert!(is_solvable(&board));
    }

    #[test]
    fn test_generate_always_solvable() {
        for seed in 0..4 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for swap_count in [0, 1, 17, 500] {
                let board = generate_solvable(4, swap_count, &mut rng);
                assert!(is_solvable(&board), "seed {seed}, {swap_count} swaps");
                let mut tiles = board.tiles().to_vec();
                tiles.sort_unstable();
                assert_eq!(tiles, (0..16).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = generate_solvable(3, 120, &mut ChaCha8Rng::seed_from_u64(7));
        let b = generate_solvable(3, 120, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_zero_moves_board() {
        // One cell: every direction is rejected, the budget just drains.
        let board = generate_solvable(1, 3, &mut ChaCha8Rng::seed_from_u64(0));
        assert_eq!(board.tiles(), &[0]);
    }
}
