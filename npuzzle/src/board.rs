use rustc_hash::FxHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Value stored in one board cell.
pub type Tile = u16;

/// Value marking the empty cell.
pub const BLANK: Tile = 0;

/// Grid coordinate, row first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

/// Violation of the board contract: square grid holding every value
/// in `0..size*size` exactly once.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    #[error("board size must be positive")]
    ZeroSize,
    #[error("expected {expected} tiles, found {found}")]
    WrongTileCount { found: usize, expected: usize },
    #[error("tile {0} does not fit a board of this size")]
    TileOutOfRange(Tile),
    #[error("tile {0} occurs more than once")]
    DuplicatedTile(Tile),
}

/// Error reported by [`Board::from_text`].
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("the input contains no board size")]
    MissingSize,
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Square sliding-puzzle board: one contiguous row-major buffer with exactly
/// one blank cell. Equality and [`content_hash`](Board::content_hash) depend on
/// cell contents only.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    size: usize,
    tiles: Box<[Tile]>,
}

impl Board {
    /// Builds a board from row-major `tiles`, validating the tile set:
    /// `size*size` values, each of `0..size*size` exactly once.
    pub fn from_tiles(size: usize, tiles: Vec<Tile>) -> Result<Self, BoardError> {
        if size == 0 {
            return Err(BoardError::ZeroSize);
        }
        let cells = size * size;
        if tiles.len() != cells {
            return Err(BoardError::WrongTileCount { found: tiles.len(), expected: cells });
        }
        let mut seen = vec![false; cells];
        for &tile in &tiles {
            let index = tile as usize;
            if index >= cells {
                return Err(BoardError::TileOutOfRange(tile));
            }
            if seen[index] {
                return Err(BoardError::DuplicatedTile(tile));
            }
            seen[index] = true;
        }
        Ok(Self { size, tiles: tiles.into_boxed_slice() })
    }

    /// Parses the classic text format: `#` starts a comment running to the end
    /// of the line, the first number is the side length, the remaining
    /// `size*size` numbers are the row-major tiles.
    pub fn from_text(text: &str) -> Result<Self, ParseError> {
        let mut numbers = Vec::new();
        for line in text.lines() {
            let code = match line.find('#') {
                Some(comment) => &line[..comment],
                None => line,
            };
            numbers.extend(code.split_whitespace());
        }
        let mut numbers = numbers.into_iter();
        let size = match numbers.next() {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| ParseError::InvalidNumber(token.to_string()))?,
            None => return Err(ParseError::MissingSize),
        };
        let tiles = numbers
            .map(|token| token.parse::<Tile>().map_err(|_| ParseError::InvalidNumber(token.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_tiles(size, tiles)?)
    }

    /// All-blank board, filled in by the goal construction.
    pub(crate) fn filled(size: usize) -> Self {
        Self { size, tiles: vec![BLANK; size * size].into_boxed_slice() }
    }

    /// Side length.
    #[inline(always)] pub fn size(&self) -> usize { self.size }

    /// Number of cells (`size*size`).
    #[inline(always)] pub fn cells(&self) -> usize { self.tiles.len() }

    /// Row-major view of the cells.
    #[inline(always)] pub fn tiles(&self) -> &[Tile] { &self.tiles }

    #[inline(always)] pub fn tile(&self, row: usize, col: usize) -> Tile {
        self.tiles[row * self.size + col]
    }

    /// Mutable cell access; neighbor construction swaps cells through this.
    #[inline(always)] pub fn tile_mut(&mut self, row: usize, col: usize) -> &mut Tile {
        &mut self.tiles[row * self.size + col]
    }

    /// Position of the blank cell.
    ///
    /// # Panics
    /// Panics if the board holds no blank; boards built through the public
    /// constructors always hold exactly one.
    pub fn blank_pos(&self) -> Pos {
        let index = self
            .tiles
            .iter()
            .position(|&tile| tile == BLANK)
            .expect("board has no blank cell");
        Pos { row: index / self.size, col: index % self.size }
    }

    /// Deterministic hash of the cell contents. Boards with equal content hash
    /// equally, which the visited set relies on.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.tiles.hash(&mut hasher);
        hasher.finish()
    }

    /// Overwrites the cells with those of `src`, reusing this buffer.
    pub(crate) fn copy_from(&mut self, src: &Board) {
        debug_assert_eq!(self.size, src.size);
        self.tiles.copy_from_slice(&src.tiles);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.cells() - 1).to_string().len();
        for row in 0..self.size {
            if row > 0 {
                f.write_str("\n")?;
            }
            for col in 0..self.size {
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{:>width$}", self.tile(row, col))?;
            }
        }
        Ok(())
    }
}
