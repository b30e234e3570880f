//! FEN parsing and rendering.
//!
//! Builds a fully-populated [`Position`] from a Forsyth-Edwards Notation
//! string, including piece bitboards, rights, clocks, and occupancies, and
//! renders a position back to the same format.

use thiserror::Error;

use crate::position::board::Position;
use crate::position::types::{
    algebraic_to_square, square_to_algebraic, CastlingRights, Color, PieceKind, Square,
    CASTLE_BLACK_KINGSIDE, CASTLE_BLACK_QUEENSIDE, CASTLE_WHITE_KINGSIDE, CASTLE_WHITE_QUEENSIDE,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN is missing the {0} field")]
    MissingField(&'static str),
    #[error("FEN has extra trailing fields")]
    TrailingFields,
    #[error("board layout must contain 8 ranks")]
    BadRankCount,
    #[error("board rank does not sum to 8 files")]
    BadRankWidth,
    #[error("invalid piece character '{0}' in board layout")]
    BadPiece(char),
    #[error("invalid side-to-move field '{0}'")]
    BadSideToMove(String),
    #[error("invalid castling rights character '{0}'")]
    BadCastling(char),
    #[error("invalid en-passant square '{0}'")]
    BadEnPassant(String),
    #[error("invalid clock field '{0}'")]
    BadClock(String),
}

impl Position {
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut parts = fen.split_whitespace();

        let board_part = parts.next().ok_or(FenError::MissingField("board layout"))?;
        let side_part = parts.next().ok_or(FenError::MissingField("side to move"))?;
        let castling_part = parts.next().ok_or(FenError::MissingField("castling rights"))?;
        let ep_part = parts.next().ok_or(FenError::MissingField("en-passant square"))?;
        let halfmove_part = parts.next().ok_or(FenError::MissingField("halfmove clock"))?;
        let fullmove_part = parts.next().ok_or(FenError::MissingField("fullmove number"))?;
        if parts.next().is_some() {
            return Err(FenError::TrailingFields);
        }

        let mut pos = Position::empty();
        parse_board(board_part, &mut pos)?;

        pos.side_to_move = match side_part {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::BadSideToMove(other.to_owned())),
        };
        pos.castling = parse_castling(castling_part)?;
        pos.ep_square = parse_ep_square(ep_part)?;
        pos.halfmove_clock = halfmove_part
            .parse::<u16>()
            .map_err(|_| FenError::BadClock(halfmove_part.to_owned()))?;
        pos.fullmove_number = fullmove_part
            .parse::<u16>()
            .map_err(|_| FenError::BadClock(fullmove_part.to_owned()))?;

        pos.recompute_occupancy();
        Ok(pos)
    }

    /// Render the position back to a FEN string.
    pub fn fen(&self) -> String {
        let mut out = String::new();

        for rank in (0..8u8).rev() {
            let mut empty_run = 0u8;
            for file in 0..8u8 {
                let sq = rank * 8 + file;
                match self.piece_on(sq) {
                    Some((color, kind)) => {
                        if empty_run > 0 {
                            out.push(char::from(b'0' + empty_run));
                            empty_run = 0;
                        }
                        out.push(piece_to_fen_char(color, kind));
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                out.push(char::from(b'0' + empty_run));
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        if self.castling == 0 {
            out.push('-');
        } else {
            for (right, ch) in [
                (CASTLE_WHITE_KINGSIDE, 'K'),
                (CASTLE_WHITE_QUEENSIDE, 'Q'),
                (CASTLE_BLACK_KINGSIDE, 'k'),
                (CASTLE_BLACK_QUEENSIDE, 'q'),
            ] {
                if self.castling & right != 0 {
                    out.push(ch);
                }
            }
        }

        out.push(' ');
        match self.ep_square {
            Some(sq) => out.push_str(&square_to_algebraic(sq)),
            None => out.push('-'),
        }

        out.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        out
    }
}

fn parse_board(board_part: &str, pos: &mut Position) -> Result<(), FenError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::BadRankCount);
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(step) = ch.to_digit(10) {
                if !(1..=8).contains(&step) {
                    return Err(FenError::BadPiece(ch));
                }
                file += step as u8;
                continue;
            }

            let (color, kind) = piece_from_fen_char(ch).ok_or(FenError::BadPiece(ch))?;
            if file >= 8 {
                return Err(FenError::BadRankWidth);
            }
            let sq = board_rank * 8 + file;
            pos.pieces[color.index()][kind.index()] |= 1u64 << sq;
            file += 1;
        }

        if file != 8 {
            return Err(FenError::BadRankWidth);
        }
    }

    Ok(())
}

fn parse_castling(castling_part: &str) -> Result<CastlingRights, FenError> {
    if castling_part == "-" {
        return Ok(0);
    }
    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_WHITE_KINGSIDE,
            'Q' => rights |= CASTLE_WHITE_QUEENSIDE,
            'k' => rights |= CASTLE_BLACK_KINGSIDE,
            'q' => rights |= CASTLE_BLACK_QUEENSIDE,
            _ => return Err(FenError::BadCastling(ch)),
        }
    }
    Ok(rights)
}

fn parse_ep_square(ep_part: &str) -> Result<Option<Square>, FenError> {
    if ep_part == "-" {
        return Ok(None);
    }
    algebraic_to_square(ep_part)
        .map(Some)
        .ok_or_else(|| FenError::BadEnPassant(ep_part.to_owned()))
}

fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some((color, kind))
}

fn piece_to_fen_char(color: Color, kind: PieceKind) -> char {
    let ch = match kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };
    match color {
        Color::White => ch.to_ascii_uppercase(),
        Color::Black => ch,
    }
}
