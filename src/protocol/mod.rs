//! Engine text protocol.
//!
//! Board notation for whole positions, and the line-oriented command
//! parser the binary reads from stdin.

pub mod notation;
pub mod parser;

pub use notation::{encode_board, parse_board, parse_coord, NotationError};
pub use parser::{parse_command, Command, NewGameParams};
