//! fission engine library.
//!
//! Exposes the board model, cascade resolver, evaluation, search, move
//! selection, game loop and protocol modules for use by integration tests
//! and the binary entry points.

pub mod board;
pub mod config;
pub mod engine;
pub mod eval;
pub mod game;
pub mod movegen;
pub mod protocol;
pub mod resolve;
pub mod search;
pub mod select;
pub mod selfplay;
