//! Minimax with alpha-beta pruning over simulated placements.
//!
//! Every node receives its own board snapshot produced by the resolver, so
//! the recursion shares no mutable board state. Utilities are always
//! expressed from the root player's perspective.
//!
//! With more than two players, minimizing plies are played by
//! `(root + 1) % players` only. Later opponents are not modelled.

use std::time::Instant;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{BoardState, Move, PlayerId};
use crate::eval::{is_decisive, Strategy, LOSS_SCORE, WIN_SCORE};
use crate::movegen::legal_moves;
use crate::resolve::Resolver;

/// Search statistics for one root call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchInfo {
    pub depth: u32,
    pub nodes: u64,
    pub score: i32,
    pub elapsed_ms: u64,
}

/// Result of a root search: every move sharing the best score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub best: Vec<Move>,
    pub info: SearchInfo,
}

/// Returns the player acting on a minimizing ply below `root`.
#[inline]
pub fn opponent_of(root: PlayerId, players: u8) -> PlayerId {
    ((root as u16 + 1) % players.max(1) as u16) as PlayerId
}

/// Alpha-beta searcher. Holds the evaluation strategy, a reusable resolver
/// and the random source used to shuffle move lists.
pub struct Searcher<R> {
    strategy: Strategy,
    resolver: Resolver,
    rng: R,
    shuffle: bool,
    nodes: u64,
}

impl<R: Rng> Searcher<R> {
    /// Creates a searcher that shuffles move lists with `rng`.
    pub fn new(strategy: Strategy, rng: R) -> Self {
        Searcher {
            strategy,
            resolver: Resolver::default(),
            rng,
            shuffle: true,
            nodes: 0,
        }
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Enables or disables move-list shuffling.
    pub fn shuffle(mut self, enabled: bool) -> Self {
        self.shuffle = enabled;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Nodes visited since construction.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Recursive alpha-beta minimax.
    ///
    /// Returns the evaluation at `depth == 0`, at a decided position, or
    /// when the acting player has no legal placement.
    #[allow(clippy::too_many_arguments)]
    pub fn search(
        &mut self,
        board: &BoardState,
        depth: u32,
        maximizing: bool,
        root: PlayerId,
        players: u8,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;
        let current = self.strategy.evaluate(board, root);
        if depth == 0 || is_decisive(current) {
            return current;
        }

        let acting = if maximizing {
            root
        } else {
            opponent_of(root, players)
        };
        let mut moves = legal_moves(board, acting);
        if moves.is_empty() {
            return current;
        }
        if self.shuffle {
            moves.shuffle(&mut self.rng);
        }

        let mut best: Option<i32> = None;
        for m in moves {
            let child = match self.resolver.simulate(board, m, acting) {
                Ok(b) => b,
                Err(_) => continue,
            };
            let value = self.search(&child, depth - 1, !maximizing, root, players, alpha, beta);
            if maximizing {
                let b = best.map_or(value, |b| b.max(value));
                best = Some(b);
                alpha = alpha.max(b);
            } else {
                let b = best.map_or(value, |b| b.min(value));
                best = Some(b);
                beta = beta.min(b);
            }
            if beta <= alpha {
                break;
            }
        }
        best.unwrap_or(current)
    }

    /// Scores every legal root move for `player` and returns all moves
    /// sharing the best score.
    ///
    /// `depth` counts the root placement itself, so `depth == 1` is a
    /// one-ply lookahead. The window is narrowed to `best - 1` after each
    /// move so that equal-scoring moves are still scored exactly.
    pub fn best_moves(&mut self, board: &BoardState, player: PlayerId, depth: u32) -> SearchResult {
        let start = Instant::now();
        let nodes_before = self.nodes;
        let players = board.players();
        let depth = depth.max(1);

        let mut moves = legal_moves(board, player);
        if self.shuffle {
            moves.shuffle(&mut self.rng);
        }

        let mut best: Vec<Move> = Vec::new();
        let mut best_score = i32::MIN;
        for m in moves {
            let child = match self.resolver.simulate(board, m, player) {
                Ok(b) => b,
                Err(_) => continue,
            };
            let alpha = if best.is_empty() {
                LOSS_SCORE - 1
            } else {
                best_score - 1
            };
            let beta = WIN_SCORE + 1;
            let value = self.search(&child, depth - 1, false, player, players, alpha, beta);
            if best.is_empty() || value > best_score {
                best_score = value;
                best.clear();
                best.push(m);
            } else if value == best_score {
                best.push(m);
            }
        }

        let info = SearchInfo {
            depth,
            nodes: self.nodes - nodes_before,
            score: if best.is_empty() { 0 } else { best_score },
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        debug!(
            "search player={} depth={} nodes={} score={} ties={} ({}ms)",
            player,
            info.depth,
            info.nodes,
            info.score,
            best.len(),
            info.elapsed_ms
        );
        SearchResult { best, info }
    }

    /// Picks uniformly among the best root moves.
    pub fn choose(&mut self, board: &BoardState, player: PlayerId, depth: u32) -> Option<Move> {
        let result = self.best_moves(board, player, depth);
        result.best.choose(&mut self.rng).copied()
    }
}
