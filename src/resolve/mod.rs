//! Placement resolution.
//!
//! Applies one placement to a board snapshot and resolves the resulting
//! chain reaction, wave by wave, into a new settled snapshot.

pub mod cascade;

pub use cascade::{simulate, IllegalMove, Outcome, Resolution, Resolver, DEFAULT_MAX_WAVES};
