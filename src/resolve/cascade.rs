//! Wave-based chain-reaction resolution.
//!
//! A placement adds one orb to the target cell. Every cell at or above its
//! capacity then explodes together as one wave: it sheds `capacity` orbs and
//! hands one to each unblocked neighbor, converting that neighbor to the
//! acting player. The over-capacity set is recomputed from the board after
//! each wave until it is empty or the wave cap is reached.
//!
//! Within a wave the per-cell order is irrelevant: recipients always become
//! the acting player and counts only add, so the wave commutes.

use log::trace;

use crate::board::{neighbors, BoardState, Coord, PlayerId};

/// Default cap on cascade waves per placement.
pub const DEFAULT_MAX_WAVES: usize = 500;

/// Why a placement was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    #[error("cell {0} is off the board")]
    OffBoard(Coord),

    #[error("cell {0} is blocked")]
    Blocked(Coord),

    #[error("cell {at} is owned by player {owner}")]
    Occupied { at: Coord, owner: PlayerId },
}

/// How a cascade ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No cell is over capacity.
    Settled,
    /// The wave cap was hit; the board is returned as it stood.
    Truncated,
    /// A single player owns every orb after everyone has moved.
    Decided,
}

/// The settled board plus statistics about the cascade that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub board: BoardState,
    /// Number of waves processed.
    pub waves: usize,
    /// Number of individual cell explosions.
    pub explosions: usize,
    pub outcome: Outcome,
}

/// Reusable resolver that keeps its wave buffers between calls.
///
/// Allocate once and call `resolve()` per placement; only the returned
/// board is freshly allocated.
#[derive(Debug, Clone)]
pub struct Resolver {
    max_waves: usize,
    stop_when_decided: bool,
    wave: Vec<usize>,
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver::new(DEFAULT_MAX_WAVES)
    }
}

impl Resolver {
    /// Creates a resolver that processes at most `max_waves` waves.
    pub fn new(max_waves: usize) -> Self {
        Resolver {
            max_waves: max_waves.max(1),
            stop_when_decided: false,
            wave: Vec::new(),
        }
    }

    /// Stops a cascade early once every player has moved and one player
    /// owns every orb. Off by default.
    pub fn stop_when_decided(mut self, enabled: bool) -> Self {
        self.stop_when_decided = enabled;
        self
    }

    pub fn max_waves(&self) -> usize {
        self.max_waves
    }

    /// Checks whether `player` may place at `at` on `board`.
    pub fn check(board: &BoardState, at: Coord, player: PlayerId) -> Result<(), IllegalMove> {
        let cell = board.get(at).ok_or(IllegalMove::OffBoard(at))?;
        if cell.blocked {
            return Err(IllegalMove::Blocked(at));
        }
        match cell.owner {
            Some(owner) if owner != player => Err(IllegalMove::Occupied { at, owner }),
            _ => Ok(()),
        }
    }

    /// Applies a placement to a clone of `board` and resolves the cascade.
    pub fn resolve(
        &mut self,
        board: &BoardState,
        at: Coord,
        player: PlayerId,
    ) -> Result<Resolution, IllegalMove> {
        Self::check(board, at, player)?;

        let mut next = board.clone();
        next.mark_moved(player);
        {
            let cell = next.cell_mut(at);
            cell.count += 1;
            cell.owner = Some(player);
        }

        let mut waves = 0;
        let mut explosions = 0;
        let mut outcome = Outcome::Settled;

        loop {
            self.collect_wave(&next);
            if self.wave.is_empty() {
                break;
            }
            if waves >= self.max_waves {
                trace!(
                    "cascade from {} truncated after {} waves ({} pending)",
                    at,
                    waves,
                    self.wave.len()
                );
                outcome = Outcome::Truncated;
                break;
            }
            if self.stop_when_decided && next.all_moved() && next.sole_owner().is_some() {
                outcome = Outcome::Decided;
                break;
            }

            waves += 1;
            for i in 0..self.wave.len() {
                let c = next.coord_of(self.wave[i]);
                let cap = next.capacity_at(c);
                let cell = next.cell_mut(c);
                if cell.count < cap {
                    continue;
                }
                cell.count -= cap;
                if cell.count == 0 {
                    cell.owner = None;
                }
                explosions += 1;

                for n in neighbors(c.x, c.y, &next).iter() {
                    let target = next.cell_mut(*n);
                    target.owner = Some(player);
                    target.count += 1;
                }
            }
        }

        Ok(Resolution {
            board: next,
            waves,
            explosions,
            outcome,
        })
    }

    /// Fills the wave buffer with every unblocked over-capacity cell,
    /// in row-major order. Indices are unique by construction.
    fn collect_wave(&mut self, board: &BoardState) {
        self.wave.clear();
        for (i, cell) in board.cells().iter().enumerate() {
            if cell.blocked || cell.count == 0 {
                continue;
            }
            if cell.count >= board.capacity_at(board.coord_of(i)) {
                self.wave.push(i);
            }
        }
    }

    /// Convenience wrapper returning only the settled board.
    pub fn simulate(
        &mut self,
        board: &BoardState,
        at: Coord,
        player: PlayerId,
    ) -> Result<BoardState, IllegalMove> {
        self.resolve(board, at, player).map(|r| r.board)
    }
}

/// Applies one placement and resolves all cascades into a new snapshot.
///
/// Fails without side effects if the target is off the board, blocked, or
/// owned by another player. Pure: identical inputs give identical output.
pub fn simulate(
    board: &BoardState,
    at: Coord,
    player: PlayerId,
) -> Result<BoardState, IllegalMove> {
    Resolver::default().simulate(board, at, player)
}
