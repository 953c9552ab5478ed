//! Heuristic position evaluation.
//!
//! Scores a settled board from one player's perspective. Scores are not
//! zero-sum: evaluating the same board for two players gives two
//! independent numbers, not negations of each other.
//!
//! Every strategy shares the terminal rule in `terminal_score`; they differ
//! only in their positional terms.

use serde::{Deserialize, Serialize};

use crate::board::{neighbors, BoardState, Cell, Coord, PlayerId};

/// Score of a won position. Dominates any positional score.
pub const WIN_SCORE: i32 = 1_000_000;

/// Score of a lost position.
pub const LOSS_SCORE: i32 = -WIN_SCORE;

/// A named evaluation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Orb material, criticality, and corner/edge preference.
    #[default]
    Baseline,
    /// Heavy material weights with a flat orb differential.
    Aggressive,
    /// Small weights; rewards contiguous critical blocks and punishes
    /// cells sitting next to enemy critical cells.
    Tactical,
    /// Prefers corners and edges regardless of criticality.
    Positional,
    /// Own orb count only.
    Material,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Baseline,
        Strategy::Aggressive,
        Strategy::Tactical,
        Strategy::Positional,
        Strategy::Material,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Baseline => "baseline",
            Strategy::Aggressive => "aggressive",
            Strategy::Tactical => "tactical",
            Strategy::Positional => "positional",
            Strategy::Material => "material",
        }
    }

    pub fn from_name(s: &str) -> Option<Strategy> {
        Strategy::ALL.into_iter().find(|st| st.name() == s)
    }

    /// Scores `board` for `player` with this strategy.
    pub fn evaluate(self, board: &BoardState, player: PlayerId) -> i32 {
        if let Some(t) = terminal_score(board, player) {
            return t;
        }
        match self {
            Strategy::Baseline => baseline(board, player),
            Strategy::Aggressive => aggressive(board, player),
            Strategy::Tactical => tactical(board, player),
            Strategy::Positional => positional(board, player),
            Strategy::Material => board.orbs_of(player) as i32,
        }
    }
}

/// Returns the sentinel for a decided position, or `None` if play goes on.
///
/// Nothing is decided until every player has placed at least once. After
/// that, a player with no orbs facing any enemy orbs has lost, and a
/// player holding orbs while every enemy holds none has won.
pub fn terminal_score(board: &BoardState, player: PlayerId) -> Option<i32> {
    if !board.all_moved() {
        return None;
    }
    let (mine, theirs) = orb_split(board, player);
    if mine == 0 && theirs > 0 {
        Some(LOSS_SCORE)
    } else if mine > 0 && theirs == 0 {
        Some(WIN_SCORE)
    } else {
        None
    }
}

/// Returns true if `score` is a win or loss sentinel.
#[inline]
pub fn is_decisive(score: i32) -> bool {
    score.abs() >= WIN_SCORE
}

fn orb_split(board: &BoardState, player: PlayerId) -> (u32, u32) {
    let mut mine = 0;
    let mut theirs = 0;
    for cell in board.cells() {
        match cell.owner {
            Some(p) if p == player => mine += cell.count,
            Some(_) => theirs += cell.count,
            None => {}
        }
    }
    (mine, theirs)
}

#[inline]
fn is_critical(board: &BoardState, at: Coord, cell: &Cell) -> bool {
    cell.count + 1 == board.capacity_at(at)
}

#[inline]
fn is_enemy(cell: &Cell, player: PlayerId) -> bool {
    matches!(cell.owner, Some(p) if p != player)
}

/// Counts enemy critical cells adjacent to `at`, and sums their
/// `(5 - capacity)` threat weights.
fn enemy_threats(board: &BoardState, at: Coord, player: PlayerId) -> (i32, i32) {
    let mut count = 0;
    let mut weight = 0;
    for n in neighbors(at.x, at.y, board).iter() {
        let nc = board.cell(*n);
        if is_enemy(nc, player) && is_critical(board, *n, nc) {
            count += 1;
            weight += 5 - board.capacity_at(*n) as i32;
        }
    }
    (count, weight)
}

const BASE_OWN_ORB: i32 = 10;
const BASE_ENEMY_ORB: i32 = 12;
const BASE_OWN_CRITICAL: i32 = 50;
const BASE_ENEMY_CRITICAL_UNIT: i32 = 20;
const BASE_CORNER: i32 = 6;
const BASE_EDGE: i32 = 3;

fn baseline(board: &BoardState, player: PlayerId) -> i32 {
    let mut score = 0;
    for (at, cell) in board.iter() {
        if cell.blocked || cell.is_empty() {
            continue;
        }
        let cap = board.capacity_at(at) as i32;
        let critical = is_critical(board, at, cell);
        let count = cell.count as i32;
        if cell.owner == Some(player) {
            score += count * BASE_OWN_ORB;
            if critical {
                score += BASE_OWN_CRITICAL;
            } else if cap == 2 {
                score += BASE_CORNER;
            } else if cap == 3 {
                score += BASE_EDGE;
            }
        } else {
            score -= count * BASE_ENEMY_ORB;
            if critical {
                // Corners are the cheapest to set off, so they weigh most.
                score -= BASE_ENEMY_CRITICAL_UNIT * (5 - cap);
            }
        }
    }
    score
}

fn aggressive(board: &BoardState, player: PlayerId) -> i32 {
    let mut score = 0;
    let mut mine = 0;
    let mut theirs = 0;
    for (at, cell) in board.iter() {
        if cell.blocked || cell.is_empty() {
            continue;
        }
        let count = cell.count as i32;
        let near_boom = cell.count + 1 >= board.capacity_at(at);
        if cell.owner == Some(player) {
            mine += count;
            score += count * 10;
            if near_boom {
                score += 50;
            }
        } else {
            theirs += count;
            score -= count * 12;
            if near_boom {
                score -= 60;
            }
        }
    }
    score + (mine - theirs) * 20
}

fn tactical(board: &BoardState, player: PlayerId) -> i32 {
    let mut score = 0;
    for (at, cell) in board.iter() {
        if cell.blocked || cell.owner != Some(player) {
            continue;
        }
        score += cell.count as i32;

        let critical = is_critical(board, at, cell);
        if critical {
            score += 2;
            for n in neighbors(at.x, at.y, board).iter() {
                let nc = board.cell(*n);
                if nc.owner == Some(player) && is_critical(board, *n, nc) {
                    score += 2;
                }
            }
        }

        let (threats, weight) = enemy_threats(board, at, player);
        score -= weight;
        if threats == 0 {
            match board.capacity_at(at) {
                2 => score += 3,
                3 => score += 2,
                _ => {}
            }
            if critical {
                score += 2;
            }
        }
    }
    score
}

fn positional(board: &BoardState, player: PlayerId) -> i32 {
    let mut score = 0;
    for (at, cell) in board.iter() {
        if cell.blocked || cell.owner != Some(player) {
            continue;
        }
        let cap = board.capacity_at(at) as i32;
        score += cell.count as i32;
        match cap {
            2 => score += 3,
            3 => score += 1,
            _ => {}
        }
        let (threats, _) = enemy_threats(board, at, player);
        score -= threats * (5 - cap);
        if threats == 0 && is_critical(board, at, cell) {
            score += 2;
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: usize, y: usize) -> Coord {
        Coord::new(x, y)
    }

    fn both_moved(board: &mut BoardState) {
        board.mark_moved(0);
        board.mark_moved(1);
    }

    #[test]
    fn no_terminal_before_everyone_moved() {
        let mut board = BoardState::new(3, 3, 2);
        board.set_cell(c(0, 0), Cell::owned(0, 1));
        board.mark_moved(0);
        assert_eq!(terminal_score(&board, 0), None);
        assert!(!is_decisive(Strategy::Baseline.evaluate(&board, 0)));
        assert!(!is_decisive(Strategy::Baseline.evaluate(&board, 1)));
    }

    #[test]
    fn terminal_sentinels_after_everyone_moved() {
        let mut board = BoardState::new(3, 3, 2);
        board.set_cell(c(1, 1), Cell::owned(1, 3));
        both_moved(&mut board);
        for strategy in Strategy::ALL {
            assert_eq!(strategy.evaluate(&board, 1), WIN_SCORE, "{:?}", strategy);
            assert_eq!(strategy.evaluate(&board, 0), LOSS_SCORE, "{:?}", strategy);
        }
    }

    #[test]
    fn baseline_prefers_own_material() {
        let mut a = BoardState::new(4, 4, 2);
        a.set_cell(c(1, 1), Cell::owned(0, 2));
        let mut b = a.clone();
        b.set_cell(c(2, 2), Cell::owned(1, 1));
        assert!(Strategy::Baseline.evaluate(&a, 0) > Strategy::Baseline.evaluate(&b, 0));
    }

    #[test]
    fn baseline_enemy_critical_penalty_scales_with_corner() {
        let mut corner = BoardState::new(4, 4, 2);
        corner.set_cell(c(0, 0), Cell::owned(1, 1));
        let mut interior = BoardState::new(4, 4, 2);
        interior.set_cell(c(1, 1), Cell::owned(1, 3));
        // corner: -12 - 60; interior: -36 - 20
        assert_eq!(baseline(&corner, 0), -72);
        assert_eq!(baseline(&interior, 0), -56);
    }

    #[test]
    fn baseline_own_terms() {
        let mut board = BoardState::new(4, 4, 2);
        board.set_cell(c(0, 0), Cell::owned(0, 1)); // critical corner: 10 + 50
        board.set_cell(c(1, 0), Cell::owned(0, 1)); // edge: 10 + 3
        board.set_cell(c(1, 1), Cell::owned(0, 1)); // interior: 10
        assert_eq!(baseline(&board, 0), 83);
    }

    #[test]
    fn perspectives_are_not_negations() {
        let mut board = BoardState::new(3, 3, 2);
        board.set_cell(c(0, 0), Cell::owned(0, 1));
        board.set_cell(c(2, 2), Cell::owned(1, 1));
        both_moved(&mut board);
        let s0 = Strategy::Baseline.evaluate(&board, 0);
        let s1 = Strategy::Baseline.evaluate(&board, 1);
        assert_eq!(s0, s1);
        assert_ne!(s0, -s1);
    }

    #[test]
    fn tactical_punishes_enemy_critical_neighbor() {
        let mut safe = BoardState::new(4, 4, 2);
        safe.set_cell(c(1, 1), Cell::owned(0, 1));
        let mut threatened = safe.clone();
        threatened.set_cell(c(1, 0), Cell::owned(1, 2));
        assert_eq!(tactical(&safe, 0), 1);
        assert_eq!(tactical(&threatened, 0), 1 - 2);
    }

    #[test]
    fn tactical_contiguous_critical_bonus() {
        let mut board = BoardState::new(4, 4, 2);
        board.set_cell(c(0, 0), Cell::owned(0, 1));
        board.set_cell(c(1, 0), Cell::owned(0, 2));
        // each: orbs + 2 critical + 2 contiguous + positional + 2 safe critical
        assert_eq!(tactical(&board, 0), (1 + 2 + 2 + 3 + 2) + (2 + 2 + 2 + 2 + 2));
    }

    #[test]
    fn positional_prefers_corners() {
        let mut corner = BoardState::new(4, 4, 2);
        corner.set_cell(c(0, 0), Cell::owned(0, 1));
        let mut interior = BoardState::new(4, 4, 2);
        interior.set_cell(c(1, 1), Cell::owned(0, 1));
        assert!(positional(&corner, 0) > positional(&interior, 0));
    }

    #[test]
    fn material_counts_own_orbs() {
        let mut board = BoardState::new(3, 3, 2);
        board.set_cell(c(0, 0), Cell::owned(0, 1));
        board.set_cell(c(1, 1), Cell::owned(0, 3));
        board.set_cell(c(2, 2), Cell::owned(1, 1));
        assert_eq!(Strategy::Material.evaluate(&board, 0), 4);
    }

    #[test]
    fn strategy_names_roundtrip() {
        for s in Strategy::ALL {
            assert_eq!(Strategy::from_name(s.name()), Some(s));
        }
        assert_eq!(Strategy::from_name("nope"), None);
    }
}
