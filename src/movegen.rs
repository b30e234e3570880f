//! Move encoding, generation, application, and the wire format.

pub mod apply;
pub mod attacked;
pub mod encode;
pub mod generate;
pub mod list;
pub mod perft;

use thiserror::Error;

use crate::movegen::generate::generate_legal;
use crate::movegen::list::MoveList;
use crate::position::board::Position;

pub use encode::Move;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("'{0}' is not a long-algebraic move")]
    BadFormat(String),
    #[error("'{0}' is not legal in this position")]
    Illegal(String),
}

/// Resolve a long-algebraic string (`e2e4`, `a7a8q`) against the legal moves
/// of `pos`.
pub fn move_from_uci(pos: &mut Position, text: &str) -> Result<Move, MoveParseError> {
    let text = text.trim();
    if !(text.len() == 4 || text.len() == 5) || !text.is_ascii() {
        return Err(MoveParseError::BadFormat(text.to_owned()));
    }

    let wanted = text.to_ascii_lowercase();
    let mut legal = MoveList::new();
    generate_legal(pos, &mut legal);

    legal
        .iter()
        .copied()
        .find(|mv| mv.uci() == wanted)
        .ok_or_else(|| MoveParseError::Illegal(text.to_owned()))
}
