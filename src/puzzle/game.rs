//! Puzzle game state machine
//!
//! `Unsolved -> Unsolved` on each legal move, `Unsolved -> Solved` once the
//! board is back in canonical order. `Solved` only leaves via reset or a
//! size change.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::{Board, BoardError, Direction};
use crate::input::Key;

/// Board sizes offered in the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridSize {
    #[default]
    Three,
    Four,
    Five,
}

impl GridSize {
    pub const ALL: [GridSize; 3] = [GridSize::Three, GridSize::Four, GridSize::Five];

    pub fn side(&self) -> usize {
        match self {
            GridSize::Three => 3,
            GridSize::Four => 4,
            GridSize::Five => 5,
        }
    }

    pub fn from_side(side: usize) -> Option<Self> {
        match side {
            3 => Some(GridSize::Three),
            4 => Some(GridSize::Four),
            5 => Some(GridSize::Five),
            _ => None,
        }
    }

    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            GridSize::Three => "3x3 (Easy)",
            GridSize::Four => "4x4 (Medium)",
            GridSize::Five => "5x5 (Hard)",
        }
    }
}

/// How a fresh board is scrambled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShuffleMode {
    /// Uniform shuffle of all cells; may be unsolvable
    #[default]
    Naive,
    /// Random walk from the solved board; always solvable
    Solvable,
}

impl ShuffleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShuffleMode::Naive => "naive",
            ShuffleMode::Solvable => "solvable",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "naive" | "random" => Some(ShuffleMode::Naive),
            "solvable" | "walk" => Some(ShuffleMode::Solvable),
            _ => None,
        }
    }
}

/// Random-walk length per cell for `ShuffleMode::Solvable`
const WALK_STEPS_PER_CELL: usize = 20;

/// Result of a move command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Blank is against that edge
    Blocked,
    /// Board already solved; moves are ignored
    AlreadySolved,
}

#[derive(Debug, Clone)]
pub struct PuzzleGame {
    size: GridSize,
    shuffle: ShuffleMode,
    board: Board,
    moves: u32,
    solved: bool,
    rng: Pcg32,
}

impl PuzzleGame {
    /// New game with a freshly shuffled board
    pub fn new(size: GridSize, shuffle: ShuffleMode, seed: u64) -> Self {
        let mut game = Self {
            size,
            shuffle,
            board: Board::solved(size.side()),
            moves: 0,
            solved: true,
            rng: Pcg32::seed_from_u64(seed),
        };
        game.reset();
        game
    }

    /// Start from a specific arrangement (replays, tests)
    pub fn with_board(board: Board, shuffle: ShuffleMode, seed: u64) -> Result<Self, BoardError> {
        let size =
            GridSize::from_side(board.side()).ok_or(BoardError::UnsupportedSide(board.side()))?;
        let solved = board.is_solved();
        Ok(Self {
            size,
            shuffle,
            board,
            moves: 0,
            solved,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    /// Fresh shuffled board of the current size; move counter back to 0
    pub fn reset(&mut self) {
        let mut board = Board::solved(self.size.side());
        match self.shuffle {
            ShuffleMode::Naive => board.shuffle_naive(&mut self.rng),
            ShuffleMode::Solvable => {
                let steps = board.len() * WALK_STEPS_PER_CELL;
                board.scramble_walk(&mut self.rng, steps);
                while board.is_solved() {
                    board.scramble_walk(&mut self.rng, board.side());
                }
            }
        }
        log::debug!(
            "Shuffled {}x{} board ({}): {:?}",
            self.size.side(),
            self.size.side(),
            self.shuffle.as_str(),
            board.cells()
        );

        self.solved = board.is_solved();
        self.board = board;
        self.moves = 0;
    }

    /// Switch board size; always regenerates, like picking from the menu
    pub fn set_size(&mut self, size: GridSize) {
        log::info!("Puzzle size set to {}", size.label());
        self.size = size;
        self.reset();
    }

    /// Apply one move command
    pub fn move_blank(&mut self, direction: Direction) -> MoveOutcome {
        if self.solved {
            return MoveOutcome::AlreadySolved;
        }
        if !self.board.slide(direction) {
            return MoveOutcome::Blocked;
        }

        self.moves += 1;
        self.solved = self.board.is_solved();
        if self.solved {
            log::info!("Puzzle solved in {} moves", self.moves);
        }
        MoveOutcome::Moved
    }

    /// Keyboard input. Returns true if the key was used.
    pub fn handle_key(&mut self, key: Key) -> bool {
        let direction = match key {
            Key::ArrowUp => Direction::Up,
            Key::ArrowDown => Direction::Down,
            Key::ArrowLeft => Direction::Left,
            Key::ArrowRight => Direction::Right,
            Key::Other => return false,
        };
        self.move_blank(direction) == MoveOutcome::Moved
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn shuffle(&self) -> ShuffleMode {
        self.shuffle
    }
}
