//! Search and planning.
//!
//! Explores the game tree of placements with alpha-beta minimax, scoring
//! leaves with the evaluation heuristics.

pub mod minimax;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::{BoardState, PlayerId};
use crate::eval::Strategy;

pub use minimax::{opponent_of, SearchInfo, SearchResult, Searcher};

/// Runs an unshuffled alpha-beta search with the given strategy and
/// returns the utility from `root`'s perspective.
#[allow(clippy::too_many_arguments)]
pub fn search(
    board: &BoardState,
    depth: u32,
    maximizing: bool,
    root: PlayerId,
    players: u8,
    alpha: i32,
    beta: i32,
    strategy: Strategy,
) -> i32 {
    Searcher::new(strategy, SmallRng::seed_from_u64(0))
        .shuffle(false)
        .search(board, depth, maximizing, root, players, alpha, beta)
}
