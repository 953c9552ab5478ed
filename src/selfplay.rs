//! Self-play game generation.
//!
//! Plays full games between difficulty tiers and records every placement,
//! the final position, and the winner. Each game draws from its own random
//! source seeded from the run seed plus the game id, so a run replays
//! exactly regardless of thread count.

use std::io::{self, Write};
use std::time::Instant;

use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::board::PlayerId;
use crate::config::EngineConfig;
use crate::game::Game;
use crate::protocol::notation::encode_board;
use crate::select::{select_move, Difficulty};

/// Errors from a self-play run.
#[derive(Debug, thiserror::Error)]
pub enum SelfPlayError {
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("need at least one difficulty")]
    NoDifficulties,
}

/// Configuration for self-play game generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub games: usize,
    pub rows: usize,
    pub cols: usize,
    pub players: u8,
    /// Tier per seat; seat `p` uses `difficulties[p % len]`.
    pub difficulties: Vec<Difficulty>,
    /// Placements before a game is abandoned without a winner.
    pub max_moves: u32,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Base seed; game `i` uses `seed + i`.
    pub seed: u64,
    /// Engine tuning shared by every seat.
    pub engine: EngineConfig,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            games: 10,
            rows: 6,
            cols: 6,
            players: 2,
            difficulties: vec![Difficulty::Medium, Difficulty::Hard],
            max_moves: 400,
            threads: 4,
            seed: 1,
            engine: EngineConfig::default(),
        }
    }
}

/// One placement in a recorded game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub player: PlayerId,
    pub x: usize,
    pub y: usize,
    pub waves: usize,
}

/// A complete self-play game record.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub seed: u64,
    pub difficulties: Vec<Difficulty>,
    pub moves: Vec<MoveRecord>,
    /// Final position in board notation.
    pub final_position: String,
    pub winner: Option<PlayerId>,
    pub move_count: u32,
    pub longest_chain: usize,
}

/// Plays one game to a winner or to the move limit.
pub fn play_game(config: &SelfPlayConfig, game_id: usize) -> GameRecord {
    let seed = config.seed.wrapping_add(game_id as u64);
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut game = Game::new(config.rows, config.cols, config.players);
    game.set_max_waves(config.engine.max_waves);

    let mut moves = Vec::new();
    let mut passes = 0u8;

    while !game.is_over() && game.moves() < config.max_moves {
        let player = game.current();
        let tier = config.difficulties[player as usize % config.difficulties.len()];
        let at = match select_move(game.board(), player, tier, &config.engine, &mut rng) {
            Some(at) => at,
            None => {
                passes += 1;
                if passes >= config.players || game.pass().is_err() {
                    break;
                }
                continue;
            }
        };
        passes = 0;

        match game.play(at) {
            Ok(report) => moves.push(MoveRecord {
                player,
                x: at.x,
                y: at.y,
                waves: report.waves,
            }),
            Err(e) => {
                warn!("game {}: selected move {} rejected: {}", game_id, at, e);
                break;
            }
        }
    }

    GameRecord {
        game_id,
        seed,
        difficulties: config.difficulties.clone(),
        moves,
        final_position: encode_board(game.board()),
        winner: game.winner(),
        move_count: game.moves(),
        longest_chain: game.stats().longest_chain,
    }
}

/// Runs self-play generation, producing multiple game records in game id
/// order.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    let mut games = Vec::with_capacity(config.games);
    run_self_play_with_callback(config, |game| games.push(game))?;
    Ok(games)
}

/// Runs self-play generation, calling `on_game` with each completed game
/// record in game id order.
pub fn run_self_play_with_callback<F>(
    config: &SelfPlayConfig,
    on_game: F,
) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord),
{
    if config.difficulties.is_empty() {
        return Err(SelfPlayError::NoDifficulties);
    }
    if config.threads > 1 {
        run_self_play_parallel(config, on_game)
    } else {
        run_self_play_sequential(config, on_game);
        Ok(())
    }
}

fn log_game(config: &SelfPlayConfig, game: &GameRecord, elapsed: f64) {
    let outcome = match game.winner {
        Some(w) => format!("player {} wins", w),
        None => "no winner".to_string(),
    };
    info!(
        "game {}/{}: {} after {} moves ({:.2}s)",
        game.game_id + 1,
        config.games,
        outcome,
        game.move_count,
        elapsed
    );
}

/// Sequential self-play: plays games one at a time.
fn run_self_play_sequential<F>(config: &SelfPlayConfig, mut on_game: F)
where
    F: FnMut(GameRecord),
{
    for i in 0..config.games {
        let start = Instant::now();
        let game = play_game(config, i);
        log_game(config, &game, start.elapsed().as_secs_f64());
        on_game(game);
    }
}

/// Parallel self-play: plays games concurrently on a dedicated rayon pool.
fn run_self_play_parallel<F>(config: &SelfPlayConfig, mut on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord),
{
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let games: Vec<GameRecord> = pool.install(|| {
        (0..config.games)
            .into_par_iter()
            .map(|i| {
                let start = Instant::now();
                let game = play_game(config, i);
                log_game(config, &game, start.elapsed().as_secs_f64());
                game
            })
            .collect()
    });

    for game in games {
        on_game(game);
    }
    Ok(())
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Summary statistics over a batch of games.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub games: usize,
    /// Wins indexed by player.
    pub wins: Vec<usize>,
    pub unfinished: usize,
    pub avg_moves: f64,
    pub longest_chain: usize,
}

pub fn summarize(games: &[GameRecord], players: u8) -> Summary {
    let mut wins = vec![0usize; players as usize];
    let mut unfinished = 0;
    let mut total_moves = 0u64;
    let mut longest_chain = 0;
    for game in games {
        match game.winner {
            Some(w) if (w as usize) < wins.len() => wins[w as usize] += 1,
            _ => unfinished += 1,
        }
        total_moves += game.move_count as u64;
        longest_chain = longest_chain.max(game.longest_chain);
    }
    Summary {
        games: games.len(),
        wins,
        unfinished,
        avg_moves: total_moves as f64 / games.len().max(1) as f64,
        longest_chain,
    }
}

/// Prints a summary of self-play results to stderr.
pub fn print_summary(summary: &Summary) {
    eprintln!("=== Self-Play Summary ===");
    eprintln!("Games: {}", summary.games);
    eprintln!("Avg moves/game: {:.1}", summary.avg_moves);
    eprintln!("Longest chain: {} waves", summary.longest_chain);
    eprintln!("Unfinished: {}", summary.unfinished);
    eprintln!("Win distribution:");
    for (p, &w) in summary.wins.iter().enumerate() {
        let pct = 100.0 * w as f64 / summary.games.max(1) as f64;
        eprintln!("  player {}: {} ({:.1}%)", p, w, pct);
    }
}
