//! Board snapshot representation.
//!
//! A `BoardState` is a fixed-size grid stored as one flat row-major
//! `Vec<Cell>`, so cloning a snapshot is a single allocation and a memcpy.
//! Snapshots handed to search are never mutated; simulation clones first.

use super::cell::{Cell, Coord, PlayerId, MAX_PLAYERS};
use super::geometry::capacity;

/// Largest row or column count accepted from protocol input.
pub const MAX_DIMENSION: usize = 64;

/// Complete board state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardState {
    rows: usize,
    cols: usize,
    players: u8,
    /// Bit `p` is set once player `p` has placed at least once.
    moved: u32,
    cells: Vec<Cell>,
}

impl BoardState {
    /// Creates an empty, unblocked `rows` x `cols` board for `players` players.
    pub fn new(rows: usize, cols: usize, players: u8) -> Self {
        debug_assert!(rows >= 1 && cols >= 1);
        debug_assert!(players as usize <= MAX_PLAYERS);
        BoardState {
            rows,
            cols,
            players,
            moved: 0,
            cells: vec![Cell::EMPTY; rows * cols],
        }
    }

    /// Creates an empty board with the given cells blocked.
    pub fn with_blocked(rows: usize, cols: usize, players: u8, blocked: &[Coord]) -> Self {
        let mut board = BoardState::new(rows, cols, players);
        for &c in blocked {
            board.set_blocked(c);
        }
        board
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of seated players.
    #[inline]
    pub fn players(&self) -> u8 {
        self.players
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        c.x < self.cols && c.y < self.rows
    }

    #[inline]
    pub(crate) fn index(&self, c: Coord) -> usize {
        c.y * self.cols + c.x
    }

    #[inline]
    pub(crate) fn coord_of(&self, idx: usize) -> Coord {
        Coord::new(idx % self.cols, idx / self.cols)
    }

    /// Returns the cell at `c`. Panics if `c` is off the grid.
    #[inline]
    pub fn cell(&self, c: Coord) -> &Cell {
        &self.cells[self.index(c)]
    }

    #[inline]
    pub(crate) fn cell_mut(&mut self, c: Coord) -> &mut Cell {
        let idx = self.index(c);
        &mut self.cells[idx]
    }

    /// Returns the cell at `c`, or `None` if off the grid.
    pub fn get(&self, c: Coord) -> Option<&Cell> {
        if self.contains(c) {
            Some(self.cell(c))
        } else {
            None
        }
    }

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterates `(coord, cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.coord_of(i), cell))
    }

    /// Capacity of the cell at `c`.
    #[inline]
    pub fn capacity_at(&self, c: Coord) -> u32 {
        capacity(c.x, c.y, self.rows, self.cols)
    }

    /// Marks a cell as blocked, clearing anything it held.
    pub fn set_blocked(&mut self, c: Coord) {
        *self.cell_mut(c) = Cell::BLOCKED;
    }

    /// Overwrites a cell. Used to build positions for setup and tests.
    pub fn set_cell(&mut self, c: Coord, cell: Cell) {
        debug_assert_eq!(cell.owner.is_none(), cell.count == 0);
        *self.cell_mut(c) = cell;
    }

    /// Returns true if `player` has placed at least once.
    #[inline]
    pub fn has_moved(&self, player: PlayerId) -> bool {
        self.moved & (1 << player) != 0
    }

    /// Records that `player` has placed at least once.
    #[inline]
    pub fn mark_moved(&mut self, player: PlayerId) {
        self.moved |= 1 << player;
    }

    /// Returns true once every seated player has placed at least once.
    #[inline]
    pub fn all_moved(&self) -> bool {
        let all = (1u32 << self.players) - 1;
        self.moved & all == all
    }

    /// Raw moved bitmask.
    #[inline]
    pub fn moved_mask(&self) -> u32 {
        self.moved
    }

    pub(crate) fn set_moved_mask(&mut self, mask: u32) {
        self.moved = mask;
    }

    /// Total orbs held by `player`.
    pub fn orbs_of(&self, player: PlayerId) -> u32 {
        self.cells
            .iter()
            .filter(|c| c.owner == Some(player))
            .map(|c| c.count)
            .sum()
    }

    /// Orb totals for every seated player, indexed by player.
    pub fn orb_counts(&self) -> Vec<u32> {
        let mut counts = vec![0u32; self.players as usize];
        for cell in &self.cells {
            if let Some(p) = cell.owner {
                if let Some(slot) = counts.get_mut(p as usize) {
                    *slot += cell.count;
                }
            }
        }
        counts
    }

    /// Total orbs on the board.
    pub fn total_orbs(&self) -> u32 {
        self.cells.iter().map(|c| c.count).sum()
    }

    /// Number of unblocked cells.
    pub fn open_cells(&self) -> usize {
        self.cells.iter().filter(|c| !c.blocked).count()
    }

    /// Returns the sole orb holder if exactly one player owns every orb.
    pub fn sole_owner(&self) -> Option<PlayerId> {
        let mut owner = None;
        for cell in &self.cells {
            match (cell.owner, owner) {
                (None, _) => {}
                (Some(p), None) => owner = Some(p),
                (Some(p), Some(q)) if p != q => return None,
                _ => {}
            }
        }
        owner
    }
}
