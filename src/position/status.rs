//! Terminal-state detection.
//!
//! Derived after a move is applied: no legal replies means checkmate or
//! stalemate, bare kings or an expired fifty-move clock mean a draw.

use crate::movegen::attacked::in_check;
use crate::movegen::generate::generate_legal;
use crate::movegen::list::MoveList;
use crate::position::board::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Checkmate,
    Stalemate,
    DrawInsufficientMaterial,
    DrawFiftyMove,
}

/// Classify the position from the side to move's point of view.
pub fn game_status(pos: &mut Position) -> GameStatus {
    let mut list = MoveList::new();
    generate_legal(pos, &mut list);

    if list.is_empty() {
        return if in_check(pos, pos.side_to_move) {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        };
    }

    if pos.only_kings_remain() {
        return GameStatus::DrawInsufficientMaterial;
    }

    if pos.halfmove_clock >= 100 {
        return GameStatus::DrawFiftyMove;
    }

    GameStatus::Active
}
