//! fission -- a chain-reaction board game engine.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! Diagnostics go to stderr through `env_logger` (set `RUST_LOG`).

use std::io::{self, BufRead};

use log::{debug, warn};

use fission::engine::Engine;
use fission::protocol::parser::{parse_command, Command};

/// Runs the main protocol loop, reading commands from stdin
/// and writing responses to stdout.
fn main() -> io::Result<()> {
    env_logger::init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };
        debug!("command: {:?}", cmd);

        match cmd {
            Command::Handshake => engine.handle_handshake(&mut out)?,
            Command::IsReady => engine.handle_isready(&mut out)?,
            Command::SetOption { name, value } => {
                if let Err(e) = engine.set_option(&name, value.as_deref()) {
                    warn!("setoption {}: {}", name, e);
                }
            }
            Command::NewGame(params) => engine.new_game(&params),
            Command::Position { notation } => {
                if let Err(e) = engine.set_position(&notation) {
                    warn!("{}", e);
                }
            }
            Command::SetPlayer { player } => {
                if let Err(e) = engine.set_player(player) {
                    warn!("{}", e);
                }
            }
            Command::SetDifficulty { difficulty } => engine.set_difficulty(difficulty),
            Command::Go { difficulty } => engine.handle_go(difficulty, &mut out)?,
            Command::Hint => engine.handle_hint(&mut out)?,
            Command::Play { at } => engine.handle_play(at, &mut out)?,
            Command::Undo => engine.handle_undo(&mut out)?,
            Command::Show => engine.handle_show(&mut out)?,
            Command::Quit => break,
        }
    }
    Ok(())
}
