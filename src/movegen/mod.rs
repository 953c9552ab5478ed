//! Legal move generation.
//!
//! A player may place on any unblocked cell that is empty or already
//! theirs. Every selector tier and the search share this enumeration.

use rand::Rng;

use crate::board::{BoardState, Move, PlayerId};

/// Returns every legal placement for `player`, in row-major order.
pub fn legal_moves(board: &BoardState, player: PlayerId) -> Vec<Move> {
    board
        .iter()
        .filter(|(_, cell)| cell.accepts(player))
        .map(|(at, _)| at)
        .collect()
}

/// Returns true if `player` has at least one legal placement.
pub fn has_legal_move(board: &BoardState, player: PlayerId) -> bool {
    board.cells().iter().any(|cell| cell.accepts(player))
}

/// Picks a uniformly random legal placement for `player`.
pub fn random_move(board: &BoardState, player: PlayerId, rng: &mut impl Rng) -> Option<Move> {
    let legal = legal_moves(board, player);
    if legal.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..legal.len());
    Some(legal[idx])
}

/// Fraction of unblocked cells holding at least one orb.
pub fn occupancy(board: &BoardState) -> f64 {
    let open = board.open_cells();
    if open == 0 {
        return 1.0;
    }
    let filled = board
        .cells()
        .iter()
        .filter(|c| !c.blocked && !c.is_empty())
        .count();
    filled as f64 / open as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, Coord};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_board() -> BoardState {
        let mut board = BoardState::with_blocked(3, 3, 2, &[Coord::new(1, 1)]);
        board.set_cell(Coord::new(0, 0), Cell::owned(0, 1));
        board.set_cell(Coord::new(2, 0), Cell::owned(1, 2));
        board
    }

    #[test]
    fn legal_moves_exclude_blocked_and_foreign() {
        let board = sample_board();
        let moves = legal_moves(&board, 0);
        assert_eq!(moves.len(), 7);
        assert!(moves.contains(&Coord::new(0, 0)));
        assert!(!moves.contains(&Coord::new(2, 0)));
        assert!(!moves.contains(&Coord::new(1, 1)));
    }

    #[test]
    fn legal_moves_row_major() {
        let board = BoardState::new(2, 2, 2);
        assert_eq!(
            legal_moves(&board, 0),
            vec![
                Coord::new(0, 0),
                Coord::new(1, 0),
                Coord::new(0, 1),
                Coord::new(1, 1)
            ]
        );
    }

    #[test]
    fn random_move_is_legal_and_seeded() {
        let board = sample_board();
        for seed in 0..20 {
            let a = random_move(&board, 1, &mut SmallRng::seed_from_u64(seed)).unwrap();
            let b = random_move(&board, 1, &mut SmallRng::seed_from_u64(seed)).unwrap();
            assert_eq!(a, b);
            assert!(board.cell(a).accepts(1));
        }
    }

    #[test]
    fn no_moves_on_fully_foreign_board() {
        let mut board = BoardState::new(2, 2, 2);
        for (at, _) in BoardState::new(2, 2, 2).iter() {
            board.set_cell(at, Cell::owned(1, 1));
        }
        assert!(legal_moves(&board, 0).is_empty());
        assert!(!has_legal_move(&board, 0));
        assert_eq!(random_move(&board, 0, &mut SmallRng::seed_from_u64(1)), None);
    }

    #[test]
    fn occupancy_ignores_blocked_cells() {
        let board = sample_board();
        assert!((occupancy(&board) - 2.0 / 8.0).abs() < 1e-9);
    }
}
