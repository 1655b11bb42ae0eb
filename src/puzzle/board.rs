//! Sliding tile board
//!
//! Cells are stored row-major; `0` is the blank. A board of side `n` always
//! holds a permutation of `0..n*n`, and `empty` always indexes the `0`.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

/// Smallest and largest supported board sides
pub const MIN_SIDE: usize = 2;
pub const MAX_SIDE: usize = 15;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Unsupported board side {0} (expected 2..=15)")]
    UnsupportedSide(usize),
    #[error("Expected {expected} cells, found {found}")]
    WrongLength { expected: usize, found: usize },
    #[error("Cell value {0} is out of range or repeated")]
    NotAPermutation(u8),
}

/// Move direction, named for the way the neighbouring tile slides.
/// The blank travels the opposite way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The move that undoes this one
    pub fn inverse(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    side: usize,
    cells: Vec<u8>,
    empty: usize,
}

impl Board {
    /// Canonical arrangement: `1..n*n` then the blank.
    ///
    /// `side` is clamped into the supported range.
    pub fn solved(side: usize) -> Self {
        let side = side.clamp(MIN_SIDE, MAX_SIDE);
        let len = side * side;
        let mut cells: Vec<u8> = (1..len).map(|v| v as u8).collect();
        cells.push(0);
        Self {
            side,
            cells,
            empty: len - 1,
        }
    }

    /// Build a board from an explicit arrangement
    pub fn from_cells(side: usize, cells: Vec<u8>) -> Result<Self, BoardError> {
        if !(MIN_SIDE..=MAX_SIDE).contains(&side) {
            return Err(BoardError::UnsupportedSide(side));
        }
        let len = side * side;
        if cells.len() != len {
            return Err(BoardError::WrongLength {
                expected: len,
                found: cells.len(),
            });
        }

        let mut seen = vec![false; len];
        for &value in &cells {
            let slot = seen
                .get_mut(value as usize)
                .ok_or(BoardError::NotAPermutation(value))?;
            if *slot {
                return Err(BoardError::NotAPermutation(value));
            }
            *slot = true;
        }

        // Every value 0..len seen exactly once, so the blank is present
        let empty = cells.iter().position(|&v| v == 0).unwrap_or_default();
        Ok(Self { side, cells, empty })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Index of the blank
    pub fn empty_pos(&self) -> usize {
        self.empty
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Where the blank would go for `direction`, if that move is legal
    pub fn blank_target(&self, direction: Direction) -> Option<usize> {
        let n = self.side;
        let row = self.empty / n;
        let col = self.empty % n;
        match direction {
            Direction::Up if row < n - 1 => Some(self.empty + n),
            Direction::Down if row > 0 => Some(self.empty - n),
            Direction::Left if col < n - 1 => Some(self.empty + 1),
            Direction::Right if col > 0 => Some(self.empty - 1),
            _ => None,
        }
    }

    /// Slide a tile into the blank. Returns false (and changes nothing) if
    /// the blank is already against the relevant edge.
    pub fn slide(&mut self, direction: Direction) -> bool {
        let Some(target) = self.blank_target(direction) else {
            return false;
        };
        self.cells.swap(self.empty, target);
        self.empty = target;
        true
    }

    /// True iff the board is in canonical order
    pub fn is_solved(&self) -> bool {
        let last = self.cells.len() - 1;
        self.cells
            .iter()
            .enumerate()
            .all(|(i, &v)| if i == last { v == 0 } else { v as usize == i + 1 })
    }

    /// Whether the canonical order is reachable by sliding
    pub fn is_solvable(&self) -> bool {
        let tiles: Vec<u8> = self.cells.iter().copied().filter(|&v| v != 0).collect();
        let mut inversions = 0usize;
        for (i, a) in tiles.iter().enumerate() {
            inversions += tiles[i + 1..].iter().filter(|&b| b < a).count();
        }

        if self.side % 2 == 1 {
            inversions % 2 == 0
        } else {
            let blank_row = self.empty / self.side;
            (inversions + blank_row) % 2 == 1
        }
    }

    /// Uniform shuffle of every cell. Half of the results can't be solved.
    pub fn shuffle_naive<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cells.shuffle(rng);
        self.empty = self
            .cells
            .iter()
            .position(|&v| v == 0)
            .unwrap_or_default();
    }

    /// Random walk of legal moves, never stepping straight back
    pub fn scramble_walk<R: Rng + ?Sized>(&mut self, rng: &mut R, steps: usize) {
        let mut last: Option<Direction> = None;
        for _ in 0..steps {
            let options: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|d| Some(d.inverse()) != last && self.blank_target(*d).is_some())
                .collect();
            if let Some(&dir) = options.choose(rng) {
                self.slide(dir);
                last = Some(dir);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_solved_layout() {
        let board = Board::solved(3);
        assert_eq!(board.cells(), &[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert_eq!(board.empty_pos(), 8);
        assert!(board.is_solved());
        assert!(board.is_solvable());
    }

    #[test]
    fn test_from_cells_validation() {
        assert_eq!(
            Board::from_cells(1, vec![0]),
            Err(BoardError::UnsupportedSide(1))
        );
        assert_eq!(
            Board::from_cells(2, vec![1, 2, 0]),
            Err(BoardError::WrongLength { expected: 4, found: 3 })
        );
        assert_eq!(
            Board::from_cells(2, vec![1, 1, 2, 0]),
            Err(BoardError::NotAPermutation(1))
        );
        assert_eq!(
            Board::from_cells(2, vec![1, 9, 2, 0]),
            Err(BoardError::NotAPermutation(9))
        );
        let board = Board::from_cells(2, vec![1, 0, 2, 3]).unwrap();
        assert_eq!(board.empty_pos(), 1);
    }

    #[test]
    fn test_edges_block_moves() {
        // Blank in the bottom-right corner
        let board = Board::solved(3);
        assert_eq!(board.blank_target(Direction::Up), None);
        assert_eq!(board.blank_target(Direction::Left), None);
        assert_eq!(board.blank_target(Direction::Down), Some(5));
        assert_eq!(board.blank_target(Direction::Right), Some(7));

        // Blank in the top-left corner
        let board = Board::from_cells(3, vec![0, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(board.blank_target(Direction::Down), None);
        assert_eq!(board.blank_target(Direction::Right), None);
        assert_eq!(board.blank_target(Direction::Up), Some(3));
        assert_eq!(board.blank_target(Direction::Left), Some(1));
    }

    #[test]
    fn test_blocked_slide_changes_nothing() {
        let mut board = Board::solved(4);
        let before = board.clone();
        assert!(!board.slide(Direction::Up));
        assert_eq!(board, before);
    }

    #[test]
    fn test_solvability_parity() {
        // Classic 15-puzzle with 14 and 15 swapped
        let mut cells: Vec<u8> = (1..16).collect();
        cells.swap(13, 14);
        cells.push(0);
        let board = Board::from_cells(4, cells).unwrap();
        assert!(!board.is_solvable());

        let board = Board::from_cells(3, vec![2, 1, 3, 4, 5, 6, 7, 8, 0]).unwrap();
        assert!(!board.is_solvable());

        // One legal move away from solved
        let mut board = Board::solved(4);
        board.slide(Direction::Down);
        assert!(board.is_solvable());
    }

    #[test]
    fn test_scramble_walk_stays_solvable() {
        let mut rng = Pcg32::seed_from_u64(7);
        for side in [3, 4, 5] {
            let mut board = Board::solved(side);
            board.scramble_walk(&mut rng, 500);
            assert!(board.is_solvable());
            assert_eq!(board.cells()[board.empty_pos()], 0);
        }
    }
}
