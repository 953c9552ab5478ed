//! Live game state: turn order, elimination, win detection and undo.
//!
//! Wraps a board with the sequencing a real match needs. Real moves are
//! resolved with early decision enabled, so a cascade stops as soon as one
//! player owns every orb after everyone has placed.

use log::info;

use crate::board::{BoardState, Coord, PlayerId};
use crate::resolve::{IllegalMove, Outcome, Resolver, DEFAULT_MAX_WAVES};

/// Errors from game actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("the game is over")]
    Finished,

    #[error("illegal move: {0}")]
    Illegal(#[from] IllegalMove),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("player {0} is not seated")]
    UnknownPlayer(PlayerId),
}

/// Largest chain reactions seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameStats {
    pub longest_chain: usize,
    pub most_explosions: usize,
}

/// What a single real move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub at: Coord,
    pub player: PlayerId,
    pub waves: usize,
    pub explosions: usize,
    pub outcome: Outcome,
    pub winner: Option<PlayerId>,
}

#[derive(Debug, Clone)]
struct Snapshot {
    board: BoardState,
    current: PlayerId,
    moves: u32,
    winner: Option<PlayerId>,
    stats: GameStats,
}

/// A match in progress.
#[derive(Debug, Clone)]
pub struct Game {
    board: BoardState,
    current: PlayerId,
    moves: u32,
    winner: Option<PlayerId>,
    stats: GameStats,
    history: Vec<Snapshot>,
    resolver: Resolver,
}

impl Game {
    /// Starts a game on an empty board with player 0 to move.
    pub fn new(rows: usize, cols: usize, players: u8) -> Self {
        Game::from_board(BoardState::new(rows, cols, players), 0)
    }

    /// Starts a game from an existing position.
    pub fn from_board(board: BoardState, current: PlayerId) -> Self {
        let mut game = Game {
            board,
            current,
            moves: 0,
            winner: None,
            stats: GameStats::default(),
            history: Vec::new(),
            resolver: Resolver::new(DEFAULT_MAX_WAVES).stop_when_decided(true),
        };
        game.winner = game.decided_winner();
        game
    }

    /// Sets the wave cap used for real moves.
    pub fn set_max_waves(&mut self, max_waves: usize) {
        self.resolver = Resolver::new(max_waves).stop_when_decided(true);
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// The player to act.
    pub fn current(&self) -> PlayerId {
        self.current
    }

    /// Real moves played so far.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn stats(&self) -> GameStats {
        self.stats
    }

    /// Orb totals indexed by player.
    pub fn scores(&self) -> Vec<u32> {
        self.board.orb_counts()
    }

    /// Returns true if `player` has placed before and now holds no orbs.
    pub fn is_eliminated(&self, player: PlayerId) -> bool {
        self.board.has_moved(player) && self.board.orbs_of(player) == 0
    }

    /// Hands the turn to `player`.
    pub fn set_current(&mut self, player: PlayerId) -> Result<(), GameError> {
        if player >= self.board.players() {
            return Err(GameError::UnknownPlayer(player));
        }
        self.current = player;
        Ok(())
    }

    /// Places for the current player, resolves the cascade, checks for a
    /// winner and advances the turn.
    pub fn play(&mut self, at: Coord) -> Result<MoveReport, GameError> {
        if self.is_over() {
            return Err(GameError::Finished);
        }
        let player = self.current;
        let resolution = self.resolver.resolve(&self.board, at, player)?;

        self.history.push(self.snapshot());
        self.board = resolution.board;
        self.moves += 1;
        self.stats.longest_chain = self.stats.longest_chain.max(resolution.waves);
        self.stats.most_explosions = self.stats.most_explosions.max(resolution.explosions);

        self.winner = self.decided_winner();
        match self.winner {
            Some(w) => info!("player {} wins after {} moves", w, self.moves),
            None => self.advance(),
        }

        Ok(MoveReport {
            at,
            player,
            waves: resolution.waves,
            explosions: resolution.explosions,
            outcome: resolution.outcome,
            winner: self.winner,
        })
    }

    /// Skips the current player's turn, e.g. when they have no legal move.
    pub fn pass(&mut self) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::Finished);
        }
        self.history.push(self.snapshot());
        self.advance();
        Ok(())
    }

    /// Restores the state before the last move or pass.
    pub fn undo(&mut self) -> Result<(), GameError> {
        let prev = self.history.pop().ok_or(GameError::NothingToUndo)?;
        self.board = prev.board;
        self.current = prev.current;
        self.moves = prev.moves;
        self.winner = prev.winner;
        self.stats = prev.stats;
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            current: self.current,
            moves: self.moves,
            winner: self.winner,
            stats: self.stats,
        }
    }

    /// The sole surviving player once everyone has placed.
    fn decided_winner(&self) -> Option<PlayerId> {
        if !self.board.all_moved() {
            return None;
        }
        self.board.sole_owner()
    }

    /// Moves the turn to the next player who has not been eliminated.
    fn advance(&mut self) {
        let players = self.board.players();
        for _ in 0..players {
            self.current = (self.current + 1) % players;
            if !self.is_eliminated(self.current) {
                return;
            }
        }
    }
}
