//! Engine command parser.
//!
//! Parses incoming protocol commands from raw text into structured
//! `Command` variants that the engine main loop can dispatch on.

use log::warn;

use crate::board::{Coord, PlayerId, MAX_DIMENSION, MAX_PLAYERS};
use crate::protocol::notation::parse_coord;
use crate::select::Difficulty;

/// Board size used by `newgame` without arguments.
pub const DEFAULT_ROWS: usize = 9;
pub const DEFAULT_COLS: usize = 9;
pub const DEFAULT_PLAYERS: u8 = 2;

/// Parameters of a fresh game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGameParams {
    pub rows: usize,
    pub cols: usize,
    pub players: u8,
    pub blocked: Vec<Coord>,
}

impl Default for NewGameParams {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            players: DEFAULT_PLAYERS,
            blocked: Vec::new(),
        }
    }
}

/// A parsed client-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Protocol handshake.
    Handshake,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Start a fresh game.
    NewGame(NewGameParams),

    /// Replace the board with a position in notation.
    Position { notation: String },

    /// Set whose turn it is.
    SetPlayer { player: PlayerId },

    /// Set the default tier used by `go`.
    SetDifficulty { difficulty: Difficulty },

    /// Choose a move for the player to act, optionally at a given tier.
    Go { difficulty: Option<Difficulty> },

    /// Recommend a move for the player to act.
    Hint,

    /// Apply a real move for the player to act.
    Play { at: Coord },

    /// Take back the last move.
    Undo,

    /// Print the current board.
    Show,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();

    match tokens[0] {
        "fission" => Some(Command::Handshake),
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "hint" => Some(Command::Hint),
        "undo" => Some(Command::Undo),
        "show" => Some(Command::Show),

        "setoption" => parse_setoption(&tokens),
        "newgame" => parse_newgame(&tokens),
        "position" => parse_position(&tokens),
        "setplayer" => parse_setplayer(&tokens),
        "difficulty" => parse_difficulty(&tokens),
        "go" => parse_go(&tokens),
        "play" => parse_play(&tokens),

        other => {
            warn!("unknown command: {}", other);
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");

    let (name, value) = match value_idx {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                warn!("malformed setoption: empty name");
                return None;
            }
            let value = if value_parts.is_empty() {
                None
            } else {
                Some(value_parts.join(" "))
            };
            (name_parts.join(" "), value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Parses `newgame [<rows>x<cols> [<players> [blocked=x,y;x,y...]]]`.
///
/// Each side must be between 2 and `MAX_DIMENSION` cells.
fn parse_newgame(tokens: &[&str]) -> Option<Command> {
    let mut params = NewGameParams::default();
    let side_ok = |n: usize| (2..=MAX_DIMENSION).contains(&n);

    if let Some(dims) = tokens.get(1) {
        let parsed = dims
            .split_once('x')
            .and_then(|(r, c)| Some((r.parse::<usize>().ok()?, c.parse::<usize>().ok()?)));
        match parsed {
            Some((rows, cols)) if side_ok(rows) && side_ok(cols) => {
                params.rows = rows;
                params.cols = cols;
            }
            _ => {
                warn!("invalid board size: '{}'", dims);
                return None;
            }
        }
    }

    if let Some(players) = tokens.get(2) {
        match players.parse::<u8>() {
            Ok(p) if (2..=MAX_PLAYERS as u8).contains(&p) => params.players = p,
            _ => {
                warn!("invalid player count: '{}'", players);
                return None;
            }
        }
    }

    if let Some(blocked) = tokens.get(3) {
        let list = match blocked.strip_prefix("blocked=") {
            Some(l) => l,
            None => {
                warn!("expected 'blocked=x,y;...', got '{}'", blocked);
                return None;
            }
        };
        for entry in list.split(';').filter(|e| !e.is_empty()) {
            match parse_coord(entry) {
                Some(c) if c.x < params.cols && c.y < params.rows => params.blocked.push(c),
                _ => {
                    warn!("invalid blocked cell: '{}'", entry);
                    return None;
                }
            }
        }
    }

    Some(Command::NewGame(params))
}

/// Parses `position <notation>`.
fn parse_position(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 2 {
        warn!("malformed position: expected 'position <notation>'");
        return None;
    }
    Some(Command::Position {
        notation: tokens[1].to_string(),
    })
}

/// Parses `setplayer <n>`.
fn parse_setplayer(tokens: &[&str]) -> Option<Command> {
    match tokens.get(1).map(|t| t.parse::<PlayerId>()) {
        Some(Ok(player)) => Some(Command::SetPlayer { player }),
        _ => {
            warn!("malformed setplayer: expected 'setplayer <n>'");
            None
        }
    }
}

fn parse_tier(token: &str) -> Option<Difficulty> {
    let d = Difficulty::from_name(token);
    if d.is_none() {
        warn!("unknown difficulty: '{}'", token);
    }
    d
}

/// Parses `difficulty <tier>`.
fn parse_difficulty(tokens: &[&str]) -> Option<Command> {
    let token = match tokens.get(1) {
        Some(t) => t,
        None => {
            warn!("malformed difficulty: expected 'difficulty <tier>'");
            return None;
        }
    };
    parse_tier(token).map(|difficulty| Command::SetDifficulty { difficulty })
}

/// Parses `go [<tier>]`.
fn parse_go(tokens: &[&str]) -> Option<Command> {
    match tokens.get(1) {
        None => Some(Command::Go { difficulty: None }),
        Some(t) => parse_tier(t).map(|d| Command::Go {
            difficulty: Some(d),
        }),
    }
}

/// Parses `play <x>,<y>`.
fn parse_play(tokens: &[&str]) -> Option<Command> {
    match tokens.get(1).and_then(|t| parse_coord(t)) {
        Some(at) => Some(Command::Play { at }),
        None => {
            warn!("malformed play: expected 'play <x>,<y>'");
            None
        }
    }
}
