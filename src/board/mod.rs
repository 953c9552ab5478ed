//! Board representation and geometry.
//!
//! Contains the cell and player primitives, the flat-array board snapshot,
//! and the capacity/neighbor rules every other module builds on.

pub mod cell;
pub mod geometry;
pub mod state;

pub use cell::{Cell, Coord, Move, PlayerId, MAX_CELL_ORBS, MAX_PLAYERS};
pub use geometry::{capacity, neighbors, CellKind, Neighbors};
pub use state::{BoardState, MAX_DIMENSION};
