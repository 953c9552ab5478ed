//! Capacity and neighbor geometry.
//!
//! A cell's capacity depends only on how many board edges it touches:
//! corners explode at 2, edges at 3, interior cells at 4. Neighbors are the
//! up-to-four orthogonal cells that exist and are not blocked.
//!
//! Both functions are O(1) and allocation-free; the resolver and every
//! evaluator pass call them once per cell.

use super::cell::Coord;
use super::state::BoardState;

/// Edge classification of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Corner,
    Edge,
    Interior,
}

impl CellKind {
    /// Classifies `(x, y)` on a `rows` x `cols` grid.
    #[inline]
    pub const fn of(x: usize, y: usize, rows: usize, cols: usize) -> CellKind {
        let edges = (y == 0) as u8
            + (y + 1 == rows) as u8
            + (x == 0) as u8
            + (x + 1 == cols) as u8;
        match edges {
            0 => CellKind::Interior,
            1 => CellKind::Edge,
            _ => CellKind::Corner,
        }
    }

    /// Orb count at which a cell of this kind explodes.
    #[inline]
    pub const fn capacity(self) -> u32 {
        match self {
            CellKind::Corner => 2,
            CellKind::Edge => 3,
            CellKind::Interior => 4,
        }
    }
}

/// Explosion threshold of `(x, y)`: 2 for corners, 3 for edges, 4 otherwise.
#[inline]
pub const fn capacity(x: usize, y: usize, rows: usize, cols: usize) -> u32 {
    CellKind::of(x, y, rows, cols).capacity()
}

/// Fixed-size list of up to four neighbor coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    items: [Coord; 4],
    len: u8,
}

impl Neighbors {
    #[inline]
    fn push(&mut self, c: Coord) {
        self.items[self.len as usize] = c;
        self.len += 1;
    }

    #[inline]
    pub fn as_slice(&self) -> &[Coord] {
        &self.items[..self.len as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coord> {
        self.as_slice().iter()
    }
}

impl<'a> IntoIterator for &'a Neighbors {
    type Item = &'a Coord;
    type IntoIter = std::slice::Iter<'a, Coord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Orthogonal, on-grid, unblocked neighbors of `(x, y)`.
///
/// Order is left, right, up, down.
#[inline]
pub fn neighbors(x: usize, y: usize, board: &BoardState) -> Neighbors {
    let rows = board.rows();
    let cols = board.cols();
    let mut out = Neighbors {
        items: [Coord::new(0, 0); 4],
        len: 0,
    };
    let mut consider = |c: Coord| {
        if !board.cell(c).blocked {
            out.push(c);
        }
    };
    if x > 0 {
        consider(Coord::new(x - 1, y));
    }
    if x + 1 < cols {
        consider(Coord::new(x + 1, y));
    }
    if y > 0 {
        consider(Coord::new(x, y - 1));
    }
    if y + 1 < rows {
        consider(Coord::new(x, y + 1));
    }
    out
}
