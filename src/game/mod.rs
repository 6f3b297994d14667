//! Core Connect Four game logic: board representation, player types, and the
//! engine that applies moves and detects wins and ties.

mod board;
mod engine;
mod player;

pub use board::{Board, Cell, Line, DIRECTIONS, HEIGHT, RUN_LENGTH, WIDTH};
pub use engine::{GameEngine, GameEvent, GameResult, MoveOutcome, Placement};
pub use player::Player;
