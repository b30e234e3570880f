//! Static evaluation: material plus tapered piece-square tables.
//!
//! Each piece contributes a midgame and an endgame score; the two sums are
//! blended by a phase value derived from remaining non-pawn material, so
//! king safety dominates early and king activity late. Scores are
//! centipawns from the side to move's perspective.

use crate::position::board::Position;
use crate::position::types::{Color, PieceKind};

/// Full-board phase. Queens count 4, rooks 2, minors 1; the start position
/// sums to 24 and bare kings to 0.
pub const MAX_PHASE: i32 = 24;

const MG_VALUE: [i32; 6] = [100, 320, 330, 500, 900, 0];
const EG_VALUE: [i32; 6] = [120, 300, 320, 520, 930, 0];

/// Map a square to the white perspective of the visually-written tables
/// below (first row = rank 8).
#[inline]
const fn flip(sq: usize) -> usize {
    sq ^ 56
}

#[rustfmt::skip]
const PAWN_MG: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     50,  50,  50,  50,  50,  50,  50,  50,
     10,  10,  20,  30,  30,  20,  10,  10,
      5,   5,  10,  25,  25,  10,   5,   5,
      0,   0,   0,  20,  20,   0,   0,   0,
      5,  -5, -10,   0,   0, -10,  -5,   5,
      5,  10,  10, -20, -20,  10,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const PAWN_EG: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     80,  80,  80,  80,  80,  80,  80,  80,
     50,  50,  50,  50,  50,  50,  50,  50,
     30,  30,  30,  30,  30,  30,  30,  30,
     15,  15,  15,  15,  15,  15,  15,  15,
      5,   5,   5,   5,   5,   5,   5,   5,
      5,   5,   5,   5,   5,   5,   5,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_MG: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const KNIGHT_EG: [i32; 64] = [
    -40, -30, -20, -20, -20, -20, -30, -40,
    -30, -15,   0,   0,   0,   0, -15, -30,
    -20,   0,  10,  10,  10,  10,   0, -20,
    -20,   0,  10,  15,  15,  10,   0, -20,
    -20,   0,  10,  15,  15,  10,   0, -20,
    -20,   0,  10,  10,  10,  10,   0, -20,
    -30, -15,   0,   0,   0,   0, -15, -30,
    -40, -30, -20, -20, -20, -20, -30, -40,
];

#[rustfmt::skip]
const BISHOP_MG: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const BISHOP_EG: [i32; 64] = [
    -15, -10,  -5,  -5,  -5,  -5, -10, -15,
    -10,   0,   0,   0,   0,   0,   0, -10,
     -5,   0,   5,   5,   5,   5,   0,  -5,
     -5,   0,   5,  10,  10,   5,   0,  -5,
     -5,   0,   5,  10,  10,   5,   0,  -5,
     -5,   0,   5,   5,   5,   5,   0,  -5,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -15, -10,  -5,  -5,  -5,  -5, -10, -15,
];

#[rustfmt::skip]
const ROOK_MG: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
      5,  10,  10,  10,  10,  10,  10,   5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
      0,   0,   0,   5,   5,   0,   0,   0,
];

#[rustfmt::skip]
const ROOK_EG: [i32; 64] = [
      5,   5,   5,   5,   5,   5,   5,   5,
     10,  10,  10,  10,  10,  10,  10,  10,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN_MG: [i32; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
     -5,   0,   5,   5,   5,   5,   0,  -5,
      0,   0,   5,   5,   5,   5,   0,  -5,
    -10,   5,   5,   5,   5,   5,   0, -10,
    -10,   0,   5,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const QUEEN_EG: [i32; 64] = [
    -10,  -5,  -5,  -5,  -5,  -5,  -5, -10,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   5,   5,   5,   5,   0,  -5,
     -5,   0,   5,  10,  10,   5,   0,  -5,
     -5,   0,   5,  10,  10,   5,   0,  -5,
     -5,   0,   5,   5,   5,   5,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
    -10,  -5,  -5,  -5,  -5,  -5,  -5, -10,
];

#[rustfmt::skip]
const KING_MG: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
];

#[rustfmt::skip]
const KING_EG: [i32; 64] = [
    -50, -40, -30, -20, -20, -30, -40, -50,
    -30, -20, -10,   0,   0, -10, -20, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -30,   0,   0,   0,   0, -30, -30,
    -50, -30, -30, -30, -30, -30, -30, -50,
];

#[inline]
fn tables_for(kind: PieceKind) -> (&'static [i32; 64], &'static [i32; 64]) {
    match kind {
        PieceKind::Pawn => (&PAWN_MG, &PAWN_EG),
        PieceKind::Knight => (&KNIGHT_MG, &KNIGHT_EG),
        PieceKind::Bishop => (&BISHOP_MG, &BISHOP_EG),
        PieceKind::Rook => (&ROOK_MG, &ROOK_EG),
        PieceKind::Queen => (&QUEEN_MG, &QUEEN_EG),
        PieceKind::King => (&KING_MG, &KING_EG),
    }
}

/// Remaining non-pawn material mapped into `0..=MAX_PHASE`.
pub fn phase(pos: &Position) -> i32 {
    let mut phase = 0i32;
    for color in [Color::White, Color::Black] {
        let boards = &pos.pieces[color.index()];
        phase += boards[PieceKind::Queen.index()].count_ones() as i32 * 4;
        phase += boards[PieceKind::Rook.index()].count_ones() as i32 * 2;
        phase += boards[PieceKind::Bishop.index()].count_ones() as i32;
        phase += boards[PieceKind::Knight.index()].count_ones() as i32;
    }
    phase.min(MAX_PHASE)
}

/// Tapered centipawn score, positive when the side to move stands better.
pub fn evaluate(pos: &Position) -> i32 {
    let mut mg = 0i32;
    let mut eg = 0i32;

    for color in [Color::White, Color::Black] {
        let sign = match color {
            Color::White => 1,
            Color::Black => -1,
        };

        for kind in PieceKind::ALL {
            let (mg_table, eg_table) = tables_for(kind);
            let mut bb = pos.pieces[color.index()][kind.index()];
            while bb != 0 {
                let sq = bb.trailing_zeros() as usize;
                // The tables are written from white's point of view; black
                // reads them mirrored vertically.
                let idx = match color {
                    Color::White => flip(sq),
                    Color::Black => sq,
                };
                mg += sign * (MG_VALUE[kind.index()] + mg_table[idx]);
                eg += sign * (EG_VALUE[kind.index()] + eg_table[idx]);
                bb &= bb - 1;
            }
        }
    }

    let p = phase(pos);
    let white_minus_black = (mg * p + eg * (MAX_PHASE - p)) / MAX_PHASE;

    match pos.side_to_move {
        Color::White => white_minus_black,
        Color::Black => -white_minus_black,
    }
}

#[cfg(test)]
mod tests {
    use super::{evaluate, phase, MAX_PHASE};
    use crate::position::board::Position;
    use crate::position::types::Color;

    /// Mirror the board vertically and swap piece colors, keeping the same
    /// side to move.
    fn color_swapped(pos: &Position) -> Position {
        let mut out = Position::empty();
        for kind in 0..6 {
            out.pieces[0][kind] = pos.pieces[1][kind].swap_bytes();
            out.pieces[1][kind] = pos.pieces[0][kind].swap_bytes();
        }
        out.side_to_move = pos.side_to_move;
        out.recompute_occupancy();
        out
    }

    #[test]
    fn start_position_is_balanced_and_full_phase() {
        let pos = Position::start();
        assert_eq!(evaluate(&pos), 0);
        assert_eq!(phase(&pos), MAX_PHASE);
    }

    #[test]
    fn bare_kings_are_balanced_and_endgame_phase() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1")
            .expect("FEN should parse");
        assert_eq!(evaluate(&pos), 0);
        assert_eq!(phase(&pos), 0);
    }

    #[test]
    fn extra_material_shows_from_the_mover_perspective() {
        let white_up = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1")
            .expect("FEN should parse");
        let score_white = evaluate(&white_up);
        assert!(score_white > 500, "queen-up score was {score_white}");

        let black_view = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 b - - 0 1")
            .expect("FEN should parse");
        assert_eq!(evaluate(&black_view), -score_white);
    }

    #[test]
    fn color_swap_negates_the_score() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "4k3/P7/8/8/8/8/8/4K3 w - - 0 1",
            "k7/8/8/5p2/4P3/6K1/8/8 w - - 0 1",
            "8/8/1k3r2/8/8/4N1K1/8/8 b - - 0 1",
        ];
        for fen in fens {
            let pos = Position::from_fen(fen).expect("FEN should parse");
            let swapped = color_swapped(&pos);
            assert_eq!(
                evaluate(&pos),
                -evaluate(&swapped),
                "symmetry violated for {fen}"
            );

            // Handing the move to the other side on the swapped board gives
            // the mover the same game back.
            let mut handed_over = swapped.clone();
            handed_over.side_to_move = handed_over.side_to_move.opposite();
            assert_eq!(evaluate(&pos), evaluate(&handed_over));
        }
    }

    #[test]
    fn central_knight_beats_rim_knight() {
        let center = Position::from_fen("4k3/8/8/3N4/8/8/8/4K3 w - - 0 1")
            .expect("FEN should parse");
        let rim = Position::from_fen("4k3/8/8/8/8/8/8/N3K3 w - - 0 1")
            .expect("FEN should parse");
        assert!(evaluate(&center) > evaluate(&rim));
    }

    #[test]
    fn king_prefers_shelter_in_the_midgame_and_center_in_the_endgame() {
        // Full material: castled king beats a wandering one.
        let sheltered = Position::from_fen(
            "rnbq1bnr/pppppppp/4k3/8/8/8/PPPPPPPP/RNBQ2KR w - - 0 1",
        )
        .expect("FEN should parse");
        let wandering = Position::from_fen(
            "rnbq1bnr/pppppppp/4k3/8/8/4K3/PPPPPPPP/RNBQ2R1 w - - 0 1",
        )
        .expect("FEN should parse");
        assert!(evaluate(&sheltered) > evaluate(&wandering));

        // Bare kings: the centralized king stands better.
        let central = Position::from_fen("k7/8/8/8/3K4/8/8/8 w - - 0 1")
            .expect("FEN should parse");
        let cornered = Position::from_fen("k7/8/8/8/8/8/8/7K w - - 0 1")
            .expect("FEN should parse");
        assert!(evaluate(&central) > evaluate(&cornered));
    }
}
