//! Cell and player primitives.

/// Index of a player in the fixed players sequence.
pub type PlayerId = u8;

/// Maximum number of players a board can seat.
pub const MAX_PLAYERS: usize = 8;

/// Largest orb count a single cell may be set up with.
pub const MAX_CELL_ORBS: u32 = 999;

/// A grid position as `(x, y)`: column then row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Coord { x, y }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// A placement target. The acting player is implied by the caller.
pub type Move = Coord;

/// One grid position.
///
/// `owner` is `None` exactly when `count == 0`. Blocked cells never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub owner: Option<PlayerId>,
    pub count: u32,
    pub blocked: bool,
}

impl Cell {
    /// An empty, unblocked cell.
    pub const EMPTY: Cell = Cell {
        owner: None,
        count: 0,
        blocked: false,
    };

    /// A blocked cell.
    pub const BLOCKED: Cell = Cell {
        owner: None,
        count: 0,
        blocked: true,
    };

    /// A cell holding `count` orbs of `player`.
    pub const fn owned(player: PlayerId, count: u32) -> Self {
        Cell {
            owner: Some(player),
            count,
            blocked: false,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if `player` may place here: unblocked and either
    /// unclaimed or already theirs.
    #[inline]
    pub fn accepts(&self, player: PlayerId) -> bool {
        !self.blocked && (self.owner.is_none() || self.owner == Some(player))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cell_accepts_anyone() {
        assert!(Cell::EMPTY.accepts(0));
        assert!(Cell::EMPTY.accepts(3));
    }

    #[test]
    fn owned_cell_accepts_only_owner() {
        let c = Cell::owned(1, 2);
        assert!(c.accepts(1));
        assert!(!c.accepts(0));
    }

    #[test]
    fn blocked_cell_accepts_nobody() {
        assert!(!Cell::BLOCKED.accepts(0));
        assert!(Cell::BLOCKED.is_empty());
    }

    #[test]
    fn coord_display() {
        assert_eq!(Coord::new(3, 1).to_string(), "3,1");
    }
}
