//! Position evaluation.
//!
//! Scores a settled board from a given player's perspective. Several
//! interchangeable strategies share one contract and one terminal rule.

pub(crate) mod heuristic;

use crate::board::{BoardState, PlayerId};

pub use heuristic::{is_decisive, terminal_score, Strategy, LOSS_SCORE, WIN_SCORE};

/// Scores `board` for `player` with the baseline strategy.
pub fn evaluate(board: &BoardState, player: PlayerId) -> i32 {
    Strategy::Baseline.evaluate(board, player)
}

/// Scores `board` for `player` with the given strategy.
pub fn evaluate_with(strategy: Strategy, board: &BoardState, player: PlayerId) -> i32 {
    strategy.evaluate(board, player)
}
