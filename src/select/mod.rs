//! Move selection by difficulty tier.
//!
//! Every tier shares the same legality rule and breaks ties between
//! equally scored moves uniformly at random, using the caller's random
//! source so that seeded games replay exactly.

pub mod casual;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{BoardState, Move, PlayerId};
use crate::config::EngineConfig;
use crate::eval::Strategy;
use crate::movegen::{legal_moves, occupancy, random_move};
use crate::resolve::Resolver;
use crate::search::Searcher;

pub use casual::casual_move;

/// A named move-selection tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniform random legal move.
    Easy,
    /// Static cell scoring, random among the top few.
    Casual,
    /// One ply, maximizing own orb count.
    Greedy,
    /// One ply with the configured evaluation strategy.
    #[default]
    Medium,
    /// Alpha-beta search at the configured depth.
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Casual,
        Difficulty::Greedy,
        Difficulty::Medium,
        Difficulty::Hard,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Casual => "casual",
            Difficulty::Greedy => "greedy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_name(s: &str) -> Option<Difficulty> {
        Difficulty::ALL.into_iter().find(|d| d.name() == s)
    }

    /// Parses a comma-separated tier list such as `medium,hard`. Any
    /// unknown or empty name rejects the whole list.
    pub fn parse_list(s: &str) -> Option<Vec<Difficulty>> {
        s.split(',').map(|t| Difficulty::from_name(t.trim())).collect()
    }
}

/// Drops one ply on dense boards.
pub fn adaptive_depth(board: &BoardState, depth: u32, dense_occupancy: f64) -> u32 {
    if depth > 1 && occupancy(board) > dense_occupancy {
        depth - 1
    } else {
        depth
    }
}

fn searcher<R: Rng>(strategy: Strategy, config: &EngineConfig, rng: R) -> Searcher<R> {
    Searcher::new(strategy, rng)
        .shuffle(config.shuffle_moves)
        .with_resolver(Resolver::new(config.max_waves))
}

/// One-ply lookahead: simulates every legal move and keeps the best
/// scores under `strategy`.
pub fn one_ply(
    board: &BoardState,
    player: PlayerId,
    strategy: Strategy,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> Option<Move> {
    searcher(strategy, config, rng).choose(board, player, 1)
}

/// How a deep request is carried out on a given board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// The player has no legal placement.
    NoMove,
    /// Too many candidates for a deep search.
    OnePly,
    /// Alpha-beta to this many plies.
    Deep(u32),
}

/// Picks the search for `player` at `depth`. Candidate counts above
/// `ceiling` fall back to one ply; dense boards lose one ply.
pub fn plan(
    board: &BoardState,
    player: PlayerId,
    depth: u32,
    ceiling: Option<usize>,
    config: &EngineConfig,
) -> Plan {
    let candidates = legal_moves(board, player).len();
    if candidates == 0 {
        return Plan::NoMove;
    }
    match ceiling {
        Some(max) if candidates > max => {
            debug!("{} candidates exceed {}; falling back to one ply", candidates, max);
            Plan::OnePly
        }
        _ => Plan::Deep(adaptive_depth(board, depth, config.dense_occupancy)),
    }
}

fn run_plan(
    board: &BoardState,
    player: PlayerId,
    plan: Plan,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> Option<Move> {
    match plan {
        Plan::NoMove => None,
        Plan::OnePly => one_ply(board, player, config.strategy, config, rng),
        Plan::Deep(depth) => searcher(config.strategy, config, rng).choose(board, player, depth),
    }
}

/// Deep alpha-beta search to `depth` plies, counting the root placement.
///
/// Falls back to `one_ply` when the candidate count exceeds
/// `config.max_search_moves`.
pub fn deep(
    board: &BoardState,
    player: PlayerId,
    depth: u32,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> Option<Move> {
    let chosen = plan(board, player, depth, Some(config.max_search_moves), config);
    run_plan(board, player, chosen, config, rng)
}

/// Chooses a move for `player` at the given tier. Returns `None` when the
/// player has no legal placement.
pub fn select_move(
    board: &BoardState,
    player: PlayerId,
    difficulty: Difficulty,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> Option<Move> {
    match difficulty {
        Difficulty::Easy => random_move(board, player, rng),
        Difficulty::Casual => casual_move(board, player, config.casual_pool, rng),
        Difficulty::Greedy => one_ply(board, player, Strategy::Material, config, rng),
        Difficulty::Medium => one_ply(board, player, config.strategy, config, rng),
        Difficulty::Hard => deep(board, player, config.hard_depth, config, rng),
    }
}

/// Recommends a move for `player` by searching to `config.hint_depth`,
/// independent of the opponents' difficulty.
///
/// Unlike the hard tier the hint ignores `max_search_moves`, so it stays
/// a full search on wide boards; only density can shorten it.
pub fn hint(
    board: &BoardState,
    player: PlayerId,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> Option<Move> {
    let chosen = plan(board, player, config.hint_depth, None, config);
    run_plan(board, player, chosen, config, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, Coord};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn c(x: usize, y: usize) -> Coord {
        Coord::new(x, y)
    }

    /// Player 0 can wipe out player 1 by exploding (0,0).
    fn winning_position() -> BoardState {
        let mut board = BoardState::new(3, 3, 2);
        board.set_cell(c(0, 0), Cell::owned(0, 1));
        board.set_cell(c(1, 0), Cell::owned(1, 1));
        board.mark_moved(0);
        board.mark_moved(1);
        board
    }

    #[test]
    fn every_tier_returns_a_legal_move() {
        let board = winning_position();
        let config = EngineConfig::default();
        for difficulty in Difficulty::ALL {
            for seed in 0..5 {
                let mut rng = SmallRng::seed_from_u64(seed);
                let m = select_move(&board, 0, difficulty, &config, &mut rng)
                    .unwrap_or_else(|| panic!("{:?} returned no move", difficulty));
                assert!(board.cell(m).accepts(0), "{:?} chose illegal {}", difficulty, m);
            }
        }
    }

    #[test]
    fn search_tiers_take_the_win() {
        let board = winning_position();
        let config = EngineConfig::default();
        for difficulty in [Difficulty::Medium, Difficulty::Hard] {
            let mut rng = SmallRng::seed_from_u64(11);
            assert_eq!(select_move(&board, 0, difficulty, &config, &mut rng), Some(c(0, 0)));
        }
        let mut rng = SmallRng::seed_from_u64(11);
        assert_eq!(hint(&board, 0, &config, &mut rng), Some(c(0, 0)));
    }

    #[test]
    fn no_move_when_board_is_foreign() {
        let mut board = BoardState::new(2, 2, 2);
        for y in 0..2 {
            for x in 0..2 {
                board.set_cell(c(x, y), Cell::owned(1, 1));
            }
        }
        let config = EngineConfig::default();
        for difficulty in Difficulty::ALL {
            let mut rng = SmallRng::seed_from_u64(0);
            assert_eq!(select_move(&board, 0, difficulty, &config, &mut rng), None);
        }
        assert_eq!(hint(&board, 0, &config, &mut SmallRng::seed_from_u64(0)), None);
    }

    #[test]
    fn ties_are_spread_across_equal_moves() {
        // Four symmetric corners tie on an empty board.
        let board = BoardState::new(3, 3, 2);
        let config = EngineConfig::default();
        let mut seen = std::collections::HashSet::new();
        for seed in 0..64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            seen.insert(select_move(&board, 0, Difficulty::Medium, &config, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 4);
        for corner in [c(0, 0), c(2, 0), c(0, 2), c(2, 2)] {
            assert!(seen.contains(&corner));
        }
    }

    #[test]
    fn seeded_selection_is_reproducible() {
        let board = winning_position();
        let config = EngineConfig::default();
        for difficulty in Difficulty::ALL {
            let a = select_move(&board, 1, difficulty, &config, &mut SmallRng::seed_from_u64(5));
            let b = select_move(&board, 1, difficulty, &config, &mut SmallRng::seed_from_u64(5));
            assert_eq!(a, b, "{:?}", difficulty);
        }
    }

    #[test]
    fn adaptive_depth_drops_on_dense_boards() {
        let mut board = BoardState::new(2, 2, 2);
        assert_eq!(adaptive_depth(&board, 3, 0.55), 3);
        board.set_cell(c(0, 0), Cell::owned(0, 1));
        board.set_cell(c(1, 0), Cell::owned(1, 1));
        board.set_cell(c(0, 1), Cell::owned(0, 1));
        assert_eq!(adaptive_depth(&board, 3, 0.55), 2);
        assert_eq!(adaptive_depth(&board, 1, 0.55), 1);
    }

    #[test]
    fn wide_boards_fall_back_to_one_ply() {
        let board = BoardState::new(9, 9, 2);
        let config = EngineConfig::default();
        assert_eq!(
            plan(&board, 0, config.hard_depth, Some(config.max_search_moves), &config),
            Plan::OnePly
        );
        for seed in 0..8 {
            let hard = select_move(
                &board,
                0,
                Difficulty::Hard,
                &config,
                &mut SmallRng::seed_from_u64(seed),
            );
            let shallow = one_ply(
                &board,
                0,
                config.strategy,
                &config,
                &mut SmallRng::seed_from_u64(seed),
            );
            assert_eq!(hard, shallow, "seed {}", seed);
        }
    }

    #[test]
    fn hint_ignores_the_candidate_ceiling() {
        let board = BoardState::new(9, 9, 2);
        let config = EngineConfig::default();
        assert_eq!(plan(&board, 0, config.hint_depth, None, &config), Plan::Deep(4));

        // A 3x3 board over a ceiling of 2 still gets a full search.
        let small = winning_position();
        let narrow = EngineConfig {
            max_search_moves: 2,
            ..EngineConfig::default()
        };
        assert_eq!(
            plan(&small, 0, narrow.hint_depth, Some(narrow.max_search_moves), &narrow),
            Plan::OnePly
        );
        assert_eq!(plan(&small, 0, narrow.hint_depth, None, &narrow), Plan::Deep(4));
        let mut rng = SmallRng::seed_from_u64(11);
        assert_eq!(hint(&small, 0, &narrow, &mut rng), Some(c(0, 0)));
    }

    #[test]
    fn dense_boards_shorten_the_plan() {
        let mut board = BoardState::new(2, 2, 2);
        board.set_cell(c(0, 0), Cell::owned(0, 1));
        board.set_cell(c(1, 0), Cell::owned(1, 1));
        board.set_cell(c(0, 1), Cell::owned(0, 1));
        let config = EngineConfig::default();
        assert_eq!(plan(&board, 0, 4, None, &config), Plan::Deep(3));
        assert_eq!(plan(&board, 0, 4, Some(1), &config), Plan::OnePly);
    }

    #[test]
    fn difficulty_names_roundtrip() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_name(d.name()), Some(d));
        }
        assert_eq!(Difficulty::from_name("impossible"), None);
    }

    #[test]
    fn tier_lists() {
        assert_eq!(
            Difficulty::parse_list("medium,hard"),
            Some(vec![Difficulty::Medium, Difficulty::Hard])
        );
        assert_eq!(Difficulty::parse_list("easy"), Some(vec![Difficulty::Easy]));
        assert_eq!(Difficulty::parse_list("medium,bogus"), None);
        assert_eq!(Difficulty::parse_list("medium,"), None);
        assert_eq!(Difficulty::parse_list(""), None);
    }
}
