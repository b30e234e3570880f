//! Interactive command-line front end.
//!
//! A small play loop over stdin/stdout: the user enters long-algebraic
//! moves, asks the engine to reply, and inspects the position. Everything
//! routes through the engine's public operations; the board rendering comes
//! from [`crate::position::display`].

use std::io::{self, BufRead, Write};

use crate::engine::{Engine, EngineConfig};
use crate::movegen::apply::make;
use crate::movegen::generate::generate_legal;
use crate::movegen::list::MoveList;
use crate::movegen::move_from_uci;
use crate::movegen::perft::perft_divide;
use crate::position::board::Position;
use crate::position::display::render;
use crate::position::status::GameStatus;
use crate::search::negamax::SearchLimits;

const HELP_TEXT: &str = "\
commands:
  <move>         play a move in long algebraic form, e.g. e2e4 or a7a8q
  go [ms]        let the engine move (default budget 1000 ms)
  board          print the board
  fen [FEN]      print the position as FEN, or set it from one
  legal          list the legal moves
  eval           static evaluation in centipawns for the side to move
  status         active / checkmate / stalemate / draw
  perft <depth>  leaf count at the given depth
  divide <depth> per-move perft breakdown
  new            restart from the standard start position
  help           this text
  quit           leave
";

pub fn run_stdio_loop() -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut state = CliState::new();

    writeln!(stdout, "{}", render(&state.position))?;
    writeln!(stdout, "Enter a move (e2e4) or 'help'.")?;
    write!(stdout, "> ")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        let should_quit = state.handle_command(&line, &mut stdout)?;
        if should_quit {
            break;
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }

    Ok(())
}

struct CliState {
    position: Position,
    engine: Engine,
}

impl CliState {
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
            "help" => write!(out, "{HELP_TEXT}")?,
            "quit" | "exit" => return Ok(true),
            "new" => {
                self.position = Position::start();
                self.engine.new_game();
                writeln!(out, "{}", render(&self.position))?;
            }
            "board" => write!(out, "{}", render(&self.position))?,
            "fen" => {
                let rest = trimmed.strip_prefix("fen").unwrap_or("").trim();
                if rest.is_empty() {
                    writeln!(out, "{}", self.position.fen())?;
                } else {
                    match Position::from_fen(rest) {
                        Ok(position) => {
                            self.position = position;
                            self.engine.new_game();
                            writeln!(out, "{}", render(&self.position))?;
                        }
                        Err(error) => writeln!(out, "bad FEN: {error}")?,
                    }
                }
            }
            "legal" => {
                let mut list = MoveList::new();
                generate_legal(&mut self.position, &mut list);
                let ucis: Vec<String> = list.iter().map(|m| m.uci()).collect();
                writeln!(out, "{} legal: {}", ucis.len(), ucis.join(" "))?;
            }
            "eval" => {
                writeln!(out, "{} cp", self.engine.evaluate(&self.position))?;
            }
            "status" => {
                writeln!(out, "{}", status_text(self.engine.status(&mut self.position)))?;
            }
            "perft" => match parts.next().and_then(|d| d.parse::<u32>().ok()) {
                Some(depth) => {
                    let nodes = self.engine.perft(&mut self.position, depth);
                    writeln!(out, "perft {depth}: {nodes}")?;
                }
                None => writeln!(out, "usage: perft <depth>")?,
            },
            "divide" => match parts.next().and_then(|d| d.parse::<u32>().ok()) {
                Some(depth) => {
                    let mut total = 0u64;
                    for (mv, nodes) in perft_divide(&mut self.position, depth) {
                        writeln!(out, "{mv}: {nodes}")?;
                        total += nodes;
                    }
                    writeln!(out, "total: {total}")?;
                }
                None => writeln!(out, "usage: divide <depth>")?,
            },
            "go" => {
                let limits = SearchLimits {
                    depth: None,
                    movetime_ms: parts.next().and_then(|v| v.parse().ok()),
                };
                self.engine_move(&limits, out)?;
            }
            _ => self.try_user_move(trimmed, out)?,
        }

        Ok(false)
    }

    fn try_user_move(&mut self, text: &str, out: &mut impl Write) -> io::Result<()> {
        match move_from_uci(&mut self.position, text) {
            Ok(mv) => {
                make(&mut self.position, mv);
                writeln!(out, "{}", render(&self.position))?;
                if !self.report_if_over(out)? {
                    // The engine answers immediately, like a casual game.
                    self.engine_move(&SearchLimits::default(), out)?;
                }
            }
            Err(error) => writeln!(out, "{error} (try 'help')")?,
        }
        Ok(())
    }

    fn engine_move(&mut self, limits: &SearchLimits, out: &mut impl Write) -> io::Result<()> {
        match self.engine.find_move(&mut self.position, limits) {
            Some(outcome) => {
                make(&mut self.position, outcome.best_move);
                writeln!(
                    out,
                    "engine plays {} (depth {}, {} cp, {} nodes)",
                    outcome.best_move, outcome.depth, outcome.score, outcome.nodes
                )?;
                writeln!(out, "{}", render(&self.position))?;
                self.report_if_over(out)?;
            }
            None => {
                self.report_if_over(out)?;
            }
        }
        Ok(())
    }

    /// Print a game-over line if the position is terminal. Returns whether
    /// it was.
    fn report_if_over(&mut self, out: &mut impl Write) -> io::Result<bool> {
        let status = self.engine.status(&mut self.position);
        if status == GameStatus::Active {
            return Ok(false);
        }
        writeln!(out, "game over: {}", status_text(status))?;
        Ok(true)
    }
}

fn status_text(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Active => "active",
        GameStatus::Checkmate => "checkmate",
        GameStatus::Stalemate => "stalemate",
        GameStatus::DrawInsufficientMaterial => "draw by insufficient material",
        GameStatus::DrawFiftyMove => "draw by the fifty-move rule",
    }
}
