//! Engine state management.
//!
//! Holds the current game, engine configuration, default tier and random
//! source between commands, and answers `go`, `hint` and `play`.

use std::io::{self, Write};

use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::{BoardState, Coord, PlayerId};
use crate::config::{ConfigError, EngineConfig};
use crate::game::{Game, GameError};
use crate::protocol::notation::{encode_board, parse_board, NotationError};
use crate::protocol::parser::NewGameParams;
use crate::select::{hint, select_move, Difficulty};

/// Errors surfaced by engine commands.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to parse position: {0}")]
    Notation(#[from] NotationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Game(#[from] GameError),
}

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub game: Game,
    pub config: EngineConfig,
    pub difficulty: Difficulty,
    rng: SmallRng,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    /// Creates an engine with a default-sized empty game and an entropy
    /// seeded random source.
    pub fn new() -> Self {
        Engine::with_rng(SmallRng::from_entropy())
    }

    /// Creates an engine whose choices replay exactly for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Engine::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        let params = NewGameParams::default();
        Engine {
            game: Game::new(params.rows, params.cols, params.players),
            config: EngineConfig::default(),
            difficulty: Difficulty::default(),
            rng,
        }
    }

    /// Replaces the configuration, keeping the game's wave cap in sync.
    pub fn set_config(&mut self, config: EngineConfig) {
        self.game.set_max_waves(config.max_waves);
        self.config = config;
    }

    /// Starts a fresh game.
    pub fn new_game(&mut self, params: &NewGameParams) {
        let board =
            BoardState::with_blocked(params.rows, params.cols, params.players, &params.blocked);
        self.game = Game::from_board(board, 0);
        self.game.set_max_waves(self.config.max_waves);
        info!(
            "new game {}x{} with {} players ({} blocked)",
            params.rows,
            params.cols,
            params.players,
            params.blocked.len()
        );
    }

    /// Replaces the board with a position in notation. The player to act
    /// is kept if still seated, otherwise reset to 0.
    pub fn set_position(&mut self, notation: &str) -> Result<(), EngineError> {
        let board = parse_board(notation)?;
        let current = if self.game.current() < board.players() {
            self.game.current()
        } else {
            0
        };
        self.game = Game::from_board(board, current);
        self.game.set_max_waves(self.config.max_waves);
        Ok(())
    }

    /// Sets the player to act.
    pub fn set_player(&mut self, player: PlayerId) -> Result<(), EngineError> {
        self.game.set_current(player)?;
        Ok(())
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Sets an engine option. `Seed` reseeds the random source; every
    /// other name is a configuration field.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), EngineError> {
        let value = value.unwrap_or("");
        if name == "Seed" {
            let seed: u64 = value.parse().map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
            })?;
            self.rng = SmallRng::seed_from_u64(seed);
            return Ok(());
        }
        let mut config = self.config.clone();
        config.set(name, value)?;
        self.set_config(config);
        Ok(())
    }

    /// Handles the handshake: writes id, options, and `fissionok`.
    pub fn handle_handshake<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let c = &self.config;
        writeln!(out, "id name fission")?;
        writeln!(out, "id author fission")?;
        writeln!(
            out,
            "option name HardDepth type spin default {} min 1 max 8",
            c.hard_depth
        )?;
        writeln!(
            out,
            "option name HintDepth type spin default {} min 1 max 8",
            c.hint_depth
        )?;
        writeln!(
            out,
            "option name DenseOccupancy type string default {}",
            c.dense_occupancy
        )?;
        writeln!(
            out,
            "option name MaxSearchMoves type spin default {} min 1 max 1024",
            c.max_search_moves
        )?;
        writeln!(
            out,
            "option name MaxWaves type spin default {} min 1 max 100000",
            c.max_waves
        )?;
        writeln!(
            out,
            "option name Strategy type combo default {} var baseline var aggressive var tactical var positional var material",
            c.strategy.name()
        )?;
        writeln!(
            out,
            "option name CasualPool type spin default {} min 1 max 64",
            c.casual_pool
        )?;
        writeln!(
            out,
            "option name ShuffleMoves type check default {}",
            c.shuffle_moves
        )?;
        writeln!(out, "option name Seed type string default entropy")?;
        writeln!(out, "fissionok")?;
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Chooses a move for the player to act without playing it.
    pub fn best_move(&mut self, difficulty: Option<Difficulty>) -> Option<Coord> {
        if self.game.is_over() {
            return None;
        }
        let difficulty = difficulty.unwrap_or(self.difficulty);
        select_move(
            self.game.board(),
            self.game.current(),
            difficulty,
            &self.config,
            &mut self.rng,
        )
    }

    /// Handles `go`: writes `bestmove x,y` or `bestmove none`.
    pub fn handle_go<W: Write>(
        &mut self,
        difficulty: Option<Difficulty>,
        out: &mut W,
    ) -> io::Result<()> {
        match self.best_move(difficulty) {
            Some(m) => writeln!(out, "bestmove {}", m)?,
            None => writeln!(out, "bestmove none")?,
        }
        out.flush()
    }

    /// Handles `hint`: writes `hint x,y` or `hint none`.
    pub fn handle_hint<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let suggestion = if self.game.is_over() {
            None
        } else {
            hint(
                self.game.board(),
                self.game.current(),
                &self.config,
                &mut self.rng,
            )
        };
        match suggestion {
            Some(m) => writeln!(out, "hint {}", m)?,
            None => writeln!(out, "hint none")?,
        }
        out.flush()
    }

    /// Handles `play`: applies the move, then writes the board and any
    /// winner. Illegal moves are reported and leave the game unchanged.
    pub fn handle_play<W: Write>(&mut self, at: Coord, out: &mut W) -> io::Result<()> {
        match self.game.play(at) {
            Ok(report) => {
                self.write_board(out)?;
                if let Some(w) = report.winner {
                    writeln!(out, "winner {}", w)?;
                }
            }
            Err(e) => {
                warn!("play {} rejected: {}", at, e);
                writeln!(out, "illegal {}", e)?;
            }
        }
        out.flush()
    }

    /// Handles `undo`.
    pub fn handle_undo<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        match self.game.undo() {
            Ok(()) => self.write_board(out)?,
            Err(e) => writeln!(out, "illegal {}", e)?,
        }
        out.flush()
    }

    /// Handles `show`.
    pub fn handle_show<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.write_board(out)?;
        out.flush()
    }

    fn write_board<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "board {}", encode_board(self.game.board()))?;
        writeln!(out, "turn {}", self.game.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Strategy;

    fn output<F>(engine: &mut Engine, f: F) -> String
    where
        F: FnOnce(&mut Engine, &mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(engine, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn new_engine_has_default_game() {
        let engine = Engine::with_seed(1);
        assert_eq!(engine.game.board().rows(), 9);
        assert_eq!(engine.game.board().cols(), 9);
        assert_eq!(engine.game.board().players(), 2);
        assert_eq!(engine.difficulty, Difficulty::Medium);
    }

    #[test]
    fn handshake_lists_options() {
        let mut engine = Engine::with_seed(1);
        let out = output(&mut engine, |e, b| e.handle_handshake(b));
        assert!(out.starts_with("id name fission"));
        assert!(out.contains("option name HardDepth type spin default 3"));
        assert!(out.contains("option name Strategy type combo default baseline"));
        assert_eq!(out.lines().last(), Some("fissionok"));
    }

    #[test]
    fn isready_outputs_readyok() {
        let mut engine = Engine::with_seed(1);
        assert_eq!(output(&mut engine, |e, b| e.handle_isready(b)).trim(), "readyok");
    }

    #[test]
    fn set_position_and_go() {
        let mut engine = Engine::with_seed(4);
        engine.set_position("3x3:2/a1,b1,./.,.,./.,.,./ab").unwrap();
        let out = output(&mut engine, |e, b| e.handle_go(Some(Difficulty::Medium), b));
        assert_eq!(out.trim(), "bestmove 0,0");
    }

    #[test]
    fn set_position_invalid() {
        let mut engine = Engine::with_seed(1);
        let before = engine.game.board().clone();
        assert!(matches!(
            engine.set_position("garbage"),
            Err(EngineError::Notation(_))
        ));
        assert_eq!(engine.game.board(), &before);
    }

    #[test]
    fn play_reports_board_and_winner() {
        let mut engine = Engine::with_seed(1);
        engine.new_game(&NewGameParams {
            rows: 3,
            cols: 3,
            players: 2,
            blocked: vec![],
        });
        output(&mut engine, |e, b| e.handle_play(Coord::new(0, 0), b));
        output(&mut engine, |e, b| e.handle_play(Coord::new(1, 0), b));
        let out = output(&mut engine, |e, b| e.handle_play(Coord::new(0, 0), b));
        assert!(out.contains("board 3x3:2/.,a2,./a1,.,./.,.,./ab"));
        assert!(out.contains("winner 0"));

        let out = output(&mut engine, |e, b| e.handle_go(None, b));
        assert_eq!(out.trim(), "bestmove none");
    }

    #[test]
    fn illegal_play_is_reported() {
        let mut engine = Engine::with_seed(1);
        engine.set_position("2x2:2/b1,./.,./b").unwrap();
        let out = output(&mut engine, |e, b| e.handle_play(Coord::new(0, 0), b));
        assert!(out.starts_with("illegal"));
    }

    #[test]
    fn options_update_config_and_seed() {
        let mut engine = Engine::with_seed(1);
        engine.set_option("Strategy", Some("tactical")).unwrap();
        engine.set_option("HardDepth", Some("2")).unwrap();
        engine.set_option("Seed", Some("42")).unwrap();
        assert_eq!(engine.config.strategy, Strategy::Tactical);
        assert_eq!(engine.config.hard_depth, 2);
        assert!(engine.set_option("Seed", Some("abc")).is_err());
        assert!(engine.set_option("Nope", Some("1")).is_err());
    }

    #[test]
    fn same_seed_same_moves() {
        let mut a = Engine::with_seed(9);
        let mut b = Engine::with_seed(9);
        for d in Difficulty::ALL {
            assert_eq!(a.best_move(Some(d)), b.best_move(Some(d)));
        }
    }

    #[test]
    fn undo_and_show() {
        let mut engine = Engine::with_seed(1);
        engine.set_position("2x2:2/.,./.,./-").unwrap();
        output(&mut engine, |e, b| e.handle_play(Coord::new(1, 1), b));
        let out = output(&mut engine, |e, b| e.handle_undo(b));
        assert!(out.contains("board 2x2:2/.,./.,./-"));
        assert!(out.contains("turn 0"));
        let out = output(&mut engine, |e, b| e.handle_undo(b));
        assert!(out.starts_with("illegal"));
        let out = output(&mut engine, |e, b| e.handle_show(b));
        assert!(out.contains("turn 0"));
    }
}
