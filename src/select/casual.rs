//! Casual tier: cheap static cell scoring with a random pick among the top.
//!
//! Each legal cell is scored by how close it is to exploding, how central
//! it is, how much enemy material sits next to it, and whether it is
//! already ours, plus a little jitter. The move is drawn uniformly from
//! the best few so the tier stays beatable.

use std::cmp::Ordering;

use rand::Rng;

use crate::board::{neighbors, BoardState, Coord, Move, PlayerId};
use crate::movegen::legal_moves;

const NEAR_BOOM_WEIGHT: f64 = 2.5;
const CENTER_WEIGHT: f64 = 1.2;
const OWN_BONUS: f64 = 0.15;
const JITTER: f64 = 0.25;

/// Static desirability of placing at `at`, without jitter.
pub fn cell_score(board: &BoardState, at: Coord, player: PlayerId) -> f64 {
    let cell = board.cell(at);
    let near_boom = if cell.count + 1 >= board.capacity_at(at) {
        1.0
    } else {
        0.0
    };

    let cx = (board.cols() as f64 - 1.0) / 2.0;
    let cy = (board.rows() as f64 - 1.0) / 2.0;
    let center = 1.0 / (1.0 + (at.x as f64 - cx).hypot(at.y as f64 - cy));

    let mut pressure = 0.0;
    for n in neighbors(at.x, at.y, board).iter() {
        let nc = board.cell(*n);
        if matches!(nc.owner, Some(p) if p != player) {
            pressure += nc.count.min(2) as f64;
        }
    }

    let own = if cell.owner == Some(player) {
        OWN_BONUS
    } else {
        0.0
    };

    near_boom * NEAR_BOOM_WEIGHT + center * CENTER_WEIGHT + pressure / 4.0 + own
}

/// Picks uniformly among the `pool` best-scored legal cells.
pub fn casual_move(
    board: &BoardState,
    player: PlayerId,
    pool: usize,
    rng: &mut impl Rng,
) -> Option<Move> {
    let mut scored: Vec<(Move, f64)> = legal_moves(board, player)
        .into_iter()
        .map(|m| {
            let jitter = rng.gen_range(-JITTER / 2.0..JITTER / 2.0);
            (m, cell_score(board, m, player) + jitter)
        })
        .collect();
    if scored.is_empty() {
        return None;
    }
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    let top = pool.max(1).min(scored.len());
    Some(scored[rng.gen_range(0..top)].0)
}
