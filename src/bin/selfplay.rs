//! Self-play game generation CLI.
//!
//! Plays games between difficulty tiers and outputs records as JSONL.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --games N          Number of games to play (default: 10)
//!   --size RxC         Board size (default: 6x6)
//!   --players N        Number of players (default: 2)
//!   --tiers A,B,...    Difficulty per seat (default: medium,hard)
//!   --max-moves N      Move limit per game (default: 400)
//!   --threads N        Number of parallel threads (default: 4)
//!   --seed N           Base random seed (default: 1)
//!   --config FILE      Engine configuration JSON
//!   --output FILE      Output file path (default: stdout)
//!   --quiet            Suppress summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process;
use std::str::FromStr;
use std::time::Instant;

use fission::board::{MAX_DIMENSION, MAX_PLAYERS};
use fission::config::EngineConfig;
use fission::select::Difficulty;
use fission::selfplay::{self, SelfPlayConfig};

fn parse_value<T: FromStr>(flag: &str, value: Option<&String>) -> T {
    match value.and_then(|v| v.parse().ok()) {
        Some(v) => v,
        None => {
            eprintln!("invalid {} value", flag);
            process::exit(1);
        }
    }
}

fn parse_size(value: Option<&String>) -> (usize, usize) {
    let parsed = value
        .and_then(|v| v.split_once('x'))
        .and_then(|(r, c)| Some((r.parse().ok()?, c.parse().ok()?)));
    let side_ok = |n: usize| (2..=MAX_DIMENSION).contains(&n);
    match parsed {
        Some((r, c)) if side_ok(r) && side_ok(c) => (r, c),
        _ => {
            eprintln!("invalid --size value, expected RxC with sides 2..={}", MAX_DIMENSION);
            process::exit(1);
        }
    }
}

fn parse_tiers(value: Option<&String>) -> Vec<Difficulty> {
    match value.and_then(|v| Difficulty::parse_list(v)) {
        Some(t) => t,
        None => {
            eprintln!("invalid --tiers value, expected e.g. medium,hard");
            process::exit(1);
        }
    }
}

fn main() -> io::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = SelfPlayConfig::default();
    let mut output_path: Option<String> = None;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args.get(i + 1);
        match flag {
            "--games" => config.games = parse_value(flag, value),
            "--size" => (config.rows, config.cols) = parse_size(value),
            "--players" => config.players = parse_value(flag, value),
            "--tiers" => config.difficulties = parse_tiers(value),
            "--max-moves" => config.max_moves = parse_value(flag, value),
            "--threads" => config.threads = parse_value(flag, value),
            "--seed" => config.seed = parse_value(flag, value),
            "--config" => {
                let path: String = parse_value(flag, value);
                config.engine = match EngineConfig::load(&path) {
                    Ok(c) => c,
                    Err(e) => {
                        eprintln!("{}: {}", path, e);
                        process::exit(1);
                    }
                };
            }
            "--output" => output_path = Some(parse_value(flag, value)),
            "--quiet" => {
                quiet = true;
                i += 1;
                continue;
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 2;
    }

    if !(2..=MAX_PLAYERS as u8).contains(&config.players) {
        eprintln!("--players must be between 2 and {}", MAX_PLAYERS);
        process::exit(1);
    }

    if !quiet {
        eprintln!(
            "Self-play: {} games on {}x{}, {} players, tiers {:?}, {} threads",
            config.games,
            config.rows,
            config.cols,
            config.players,
            config.difficulties,
            config.threads
        );
    }

    let start = Instant::now();
    let games = match selfplay::run_self_play(&config) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    let elapsed = start.elapsed();

    if !quiet {
        eprintln!(
            "Completed {} games in {:.1}s",
            games.len(),
            elapsed.as_secs_f64()
        );
        selfplay::print_summary(&selfplay::summarize(&games, config.players));
    }

    match output_path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(&path)?);
            selfplay::write_jsonl(&games, &mut writer)?;
            if !quiet {
                eprintln!("Wrote {} games to {}", games.len(), path);
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            selfplay::write_jsonl(&games, &mut writer)?;
        }
    }
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N          Number of games to play (default: 10)");
    eprintln!("  --size RxC         Board size (default: 6x6)");
    eprintln!("  --players N        Number of players (default: 2)");
    eprintln!("  --tiers A,B,...    Difficulty per seat (default: medium,hard)");
    eprintln!("  --max-moves N      Move limit per game (default: 400)");
    eprintln!("  --threads N        Number of parallel threads (default: 4)");
    eprintln!("  --seed N           Base random seed (default: 1)");
    eprintln!("  --config FILE      Engine configuration JSON");
    eprintln!("  --output FILE      Output file path (default: stdout)");
    eprintln!("  --quiet            Suppress summary output");
    eprintln!("  --help             Show this help");
}
