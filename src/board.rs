use rand::{seq::SliceRandom, thread_rng, Rng};
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

/// Direction a tile slides into the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Left, Move::Down, Move::Right];

    /// Offset from the blank to the tile that moves into it.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (1, 0),
            Move::Left => (0, 1),
            Move::Down => (-1, 0),
            Move::Right => (0, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

/// Renders as the arrow of the sliding tile followed by its name, e.g. `↑ up`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (arrow, name) = match self {
            Move::Up => ('↑', "up"),
            Move::Left => ('←', "left"),
            Move::Down => ('↓', "down"),
            Move::Right => ('→', "right"),
        };
        write!(f, "{} {}", arrow, name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseBoardError {
    #[error("Missing board dimension")]
    MissingDimension,
    #[error("Invalid number {0:?}")]
    InvalidNumber(String),
    #[error("Invalid row count, expected {expected} rows but got {actual}")]
    RowCount { expected: usize, actual: usize },
    #[error("Invalid row length in row {row}, expected {expected} tiles but got {actual}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Tile out of range, expected a value below {limit} but got {tile}")]
    TileOutOfRange { tile: u32, limit: usize },
    #[error("Tile {0} appears more than once")]
    DuplicateTile(u32),
}

/// One configuration of an n×n sliding puzzle. `0` is the blank.
///
/// A board never changes after construction. Its heuristics, blank
/// position, neighbors and twin are computed on first use and kept for the
/// lifetime of the value.
///
/// `Board::new` does not validate its input: callers must hand it a square
/// grid holding every value of `0..n²` exactly once. Parsing through
/// [`FromStr`] validates.
#[derive(Clone)]
pub struct Board {
    size: usize,
    tiles: Vec<Vec<u32>>,
    hamming: OnceCell<usize>,
    manhattan: OnceCell<usize>,
    blank: OnceCell<Option<(usize, usize)>>,
    neighbors: OnceCell<Vec<Rc<Board>>>,
    twin: OnceCell<Box<Board>>,
}

impl Board {
    pub fn new(tiles: Vec<Vec<u32>>) -> Self {
        Self {
            size: tiles.len(),
            tiles,
            hamming: OnceCell::new(),
            manhattan: OnceCell::new(),
            blank: OnceCell::new(),
            neighbors: OnceCell::new(),
            twin: OnceCell::new(),
        }
    }

    /// The solved board of the given dimension.
    pub fn goal(size: usize) -> Self {
        let mut tiles = Vec::with_capacity(size);
        let mut value = 1;

        for i in 0..size {
            let mut row = Vec::with_capacity(size);
            for j in 0..size {
                if i == size - 1 && j == size - 1 {
                    row.push(0);
                } else {
                    row.push(value);
                    value += 1;
                }
            }
            tiles.push(row);
        }

        Self::new(tiles)
    }

    /// A solvable board reached by `steps` random slides away from the goal.
    /// A slide never undoes the one just made.
    pub fn scramble<R: Rng + ?Sized>(size: usize, steps: usize, rng: &mut R) -> Self {
        let mut board = Self::goal(size);
        let mut last_move: Option<Move> = None;

        for _ in 0..steps {
            let candidates: Vec<(Move, Board)> = Move::ALL
                .iter()
                .filter(|&&dir| last_move.map_or(true, |last| dir != last.opposite()))
                .filter_map(|&dir| board.slide(dir).map(|next| (dir, next)))
                .collect();

            let Some((dir, next)) = candidates.choose(&mut *rng) else {
                break;
            };
            last_move = Some(*dir);
            board = next.unevaluated();
        }

        board
    }

    pub fn dimension(&self) -> usize {
        self.size
    }

    pub fn tile_at(&self, row: usize, col: usize) -> Option<u32> {
        self.tiles.get(row)?.get(col).copied()
    }

    pub fn tiles(&self) -> &[Vec<u32>] {
        &self.tiles
    }

    pub fn is_goal(&self) -> bool {
        self.hamming() == 0
    }

    /// Number of tiles out of place, not counting the blank.
    pub fn hamming(&self) -> usize {
        *self.hamming.get_or_init(|| {
            self.cells()
                .filter(|&(row, col, value)| {
                    value != 0 && value as usize != self.size * row + col + 1
                })
                .count()
        })
    }

    /// Sum of the grid distances of every tile from its goal cell.
    pub fn manhattan(&self) -> usize {
        *self.manhattan.get_or_init(|| {
            self.cells()
                .filter(|&(_, _, value)| value != 0)
                .map(|(row, col, value)| {
                    let target = (value - 1) as usize;
                    row.abs_diff(target / self.size) + col.abs_diff(target % self.size)
                })
                .sum()
        })
    }

    /// `None` only for a malformed board without a blank.
    pub fn blank_position(&self) -> Option<(usize, usize)> {
        *self.blank.get_or_init(|| {
            self.cells()
                .find(|&(_, _, value)| value == 0)
                .map(|(row, col, _)| (row, col))
        })
    }

    /// The board after sliding a tile in direction `dir`, if such a tile
    /// exists next to the blank.
    pub fn slide(&self, dir: Move) -> Option<Board> {
        let (row, col) = self.blank_position()?;
        let (dx, dy) = dir.as_offset();

        let new_row = row.checked_add_signed(dx)?;
        let new_col = col.checked_add_signed(dy)?;
        let tile = self.tile_at(new_row, new_col)?;

        let mut tiles = self.tiles.clone();
        tiles[row][col] = tile;
        tiles[new_row][new_col] = 0;
        Some(Self::new(tiles))
    }

    /// Every board one slide away, in [`Move::ALL`] order.
    pub fn neighbors(&self) -> &[Rc<Board>] {
        self.neighbors.get_or_init(|| {
            Move::ALL
                .iter()
                .filter_map(|&dir| self.slide(dir))
                .map(Rc::new)
                .collect()
        })
    }

    /// The slide that turns `self` into `next`, if they are neighbors.
    pub fn move_to(&self, next: &Board) -> Option<Move> {
        Move::ALL
            .into_iter()
            .find(|&dir| self.slide(dir).map_or(false, |board| board == *next))
    }

    pub fn twin(&self) -> &Board {
        self.twin_with(&mut thread_rng())
    }

    /// Like [`Board::twin`], drawing the swapped pair from `rng`. Only the
    /// first call on a board consults the random source; later calls return
    /// the memoized twin.
    pub fn twin_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &Board {
        self.twin.get_or_init(|| Box::new(self.swap_random_pair(rng)))
    }

    /// Inversion parity test for solvability. The solver never asks this;
    /// it decides solvability by racing the board against its twin.
    pub fn has_solvable_parity(&self) -> bool {
        let inversions = self.inversions();

        if self.size % 2 == 1 {
            inversions % 2 == 0
        } else {
            let empty_row = self.blank_position().map_or(0, |(row, _)| row);
            (inversions + empty_row) % 2 == 1
        }
    }

    /// Pairs of tiles that appear in row-major order ahead of a smaller tile.
    fn inversions(&self) -> usize {
        let order: Vec<u32> = self
            .cells()
            .map(|(_, _, value)| value)
            .filter(|&value| value != 0)
            .collect();
        let mut count = 0;
        for (i, &earlier) in order.iter().enumerate() {
            count += order[i + 1..].iter().filter(|&&later| later < earlier).count();
        }
        count
    }

    fn swap_random_pair<R: Rng + ?Sized>(&self, rng: &mut R) -> Board {
        // With fewer than two tiles there is nothing to swap.
        if self.cells().filter(|&(_, _, value)| value != 0).count() < 2 {
            return self.unevaluated();
        }

        loop {
            let first = (rng.gen_range(0..self.size), rng.gen_range(0..self.size));
            let second = (rng.gen_range(0..self.size), rng.gen_range(0..self.size));
            if first == second {
                continue;
            }

            let (Some(a), Some(b)) = (
                self.tile_at(first.0, first.1),
                self.tile_at(second.0, second.1),
            ) else {
                continue;
            };
            if a == 0 || b == 0 {
                continue;
            }

            let mut tiles = self.tiles.clone();
            tiles[first.0][first.1] = b;
            tiles[second.0][second.1] = a;
            return Self::new(tiles);
        }
    }

    /// Same grid, nothing cached.
    fn unevaluated(&self) -> Board {
        Self::new(self.tiles.clone())
    }

    fn cells(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        self.tiles.iter().enumerate().flat_map(|(row, tiles)| {
            tiles
                .iter()
                .enumerate()
                .map(move |(col, &value)| (row, col, value))
        })
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        // The cached heuristics reject most mismatches before the full scan.
        self.size == other.size
            && self.hamming() == other.hamming()
            && self.manhattan() == other.manhattan()
            && self.tiles == other.tiles
    }
}

impl Eq for Board {}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board").field("tiles", &self.tiles).finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.size)?;
        for row in &self.tiles {
            for &val in row {
                write!(f, "{:2} ", val)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses the `Display` format: the dimension, then one line per row.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().map(str::trim).filter(|line| !line.is_empty());

        let header = lines.next().ok_or(ParseBoardError::MissingDimension)?;
        let size: usize = header
            .parse()
            .map_err(|_| ParseBoardError::InvalidNumber(header.to_string()))?;

        // The header is untrusted; rows are only accepted as they arrive.
        let mut tiles = Vec::new();
        for (row, line) in lines.enumerate() {
            let values = line
                .split_whitespace()
                .map(|token| {
                    token
                        .parse::<u32>()
                        .map_err(|_| ParseBoardError::InvalidNumber(token.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            if values.len() != size {
                return Err(ParseBoardError::RowLength {
                    row,
                    expected: size,
                    actual: values.len(),
                });
            }
            tiles.push(values);
        }
        if tiles.len() != size {
            return Err(ParseBoardError::RowCount {
                expected: size,
                actual: tiles.len(),
            });
        }

        let limit = size * size;
        let mut seen = vec![false; limit];
        for &tile in tiles.iter().flatten() {
            let index = tile as usize;
            if index >= limit {
                return Err(ParseBoardError::TileOutOfRange { tile, limit });
            }
            if seen[index] {
                return Err(ParseBoardError::DuplicateTile(tile));
            }
            seen[index] = true;
        }

        Ok(Self::new(tiles))
    }
}
