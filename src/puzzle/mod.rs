//! Sliding tile puzzle
//!
//! The board is a flat permutation of `0..n*n` with `0` as the blank. Moves
//! are discrete commands; there is no clock.

pub mod board;
pub mod game;
pub mod swipe;

pub use board::{Board, BoardError, Direction};
pub use game::{GridSize, MoveOutcome, PuzzleGame, ShuffleMode};
pub use swipe::{SwipeTracker, swipe_direction};
