//! UCI protocol front-end.
//!
//! Parses commands from stdin, maintains the current position, routes `go`
//! requests to the engine, and writes protocol replies to stdout. Only the
//! engine's public operations are called from here.

use std::io::{self, BufRead, Write};

use crate::engine::{Engine, EngineConfig};
use crate::movegen::apply::make;
use crate::movegen::move_from_uci;
use crate::position::board::Position;
use crate::search::negamax::SearchLimits;

const ENGINE_NAME: &str = "Quince Chess";
const ENGINE_AUTHOR: &str = "the quince authors";

pub fn run_stdio_loop() -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut state = UciState::new();

    for line in stdin.lock().lines() {
        let line = line?;
        let should_quit = state.handle_command(&line, &mut stdout)?;
        stdout.flush()?;
        if should_quit {
            break;
        }
    }

    Ok(())
}

struct UciState {
    position: Position,
    engine: Engine,
}

impl UciState {
    fn new() -> Self {
        Self {
            position: Position::start(),
            engine: Engine::new(EngineConfig::default()),
        }
    }

    fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let mut parts = trimmed.split_whitespace();
        let command = parts.next().unwrap_or_default();

        match command {
            "uci" => {
                writeln!(out, "id name {ENGINE_NAME}")?;
                writeln!(out, "id author {ENGINE_AUTHOR}")?;
                writeln!(out, "uciok")?;
            }
            "isready" => {
                writeln!(out, "readyok")?;
            }
            "ucinewgame" => {
                self.position = Position::start();
                self.engine.new_game();
            }
            "position" => {
                if let Err(message) = self.handle_position(trimmed) {
                    writeln!(out, "info string position error: {message}")?;
                }
            }
            "go" => {
                self.handle_go(trimmed, out)?;
            }
            "perft" => {
                if let Some(depth) = parts.next().and_then(|d| d.parse::<u32>().ok()) {
                    let nodes = self.engine.perft(&mut self.position, depth);
                    writeln!(out, "info string perft {depth} nodes {nodes}")?;
                } else {
                    writeln!(out, "info string perft needs a depth argument")?;
                }
            }
            "quit" => return Ok(true),
            _ => {
                writeln!(out, "info string unknown command: {command}")?;
            }
        }

        Ok(false)
    }

    fn handle_position(&mut self, line: &str) -> Result<(), String> {
        let rest = line.strip_prefix("position").unwrap_or(line).trim();

        let (mut position, moves_part) = if let Some(tail) = rest.strip_prefix("startpos") {
            (Position::start(), tail.trim())
        } else if let Some(tail) = rest.strip_prefix("fen") {
            let tail = tail.trim();
            let (fen_part, moves_part) = match tail.find("moves") {
                Some(idx) => (&tail[..idx], &tail[idx..]),
                None => (tail, ""),
            };
            let position = Position::from_fen(fen_part.trim()).map_err(|e| e.to_string())?;
            (position, moves_part)
        } else {
            return Err(format!("expected 'startpos' or 'fen', got '{rest}'"));
        };

        if let Some(moves) = moves_part.strip_prefix("moves") {
            for text in moves.split_whitespace() {
                let mv = move_from_uci(&mut position, text).map_err(|e| e.to_string())?;
                make(&mut position, mv);
            }
        }

        self.position = position;
        Ok(())
    }

    fn handle_go(&mut self, line: &str, out: &mut impl Write) -> io::Result<()> {
        let mut limits = SearchLimits::default();
        let mut parts = line.split_whitespace().skip(1);

        while let Some(token) = parts.next() {
            match token {
                "depth" => {
                    limits.depth = parts.next().and_then(|v| v.parse().ok());
                }
                "movetime" => {
                    limits.movetime_ms = parts.next().and_then(|v| v.parse().ok());
                }
                _ => {}
            }
        }

        match self.engine.find_move(&mut self.position, &limits) {
            Some(outcome) => {
                writeln!(
                    out,
                    "info depth {} score cp {} nodes {}",
                    outcome.depth, outcome.score, outcome.nodes
                )?;
                writeln!(out, "bestmove {}", outcome.best_move)?;
            }
            None => {
                writeln!(out, "bestmove 0000")?;
            }
        }

        Ok(())
    }
}
