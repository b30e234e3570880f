//! Zobrist hashing for position identity and transposition lookup.
//!
//! Codes are generated from a fixed seed so hashes are deterministic across
//! runs, which keeps transposition-table behavior reproducible in tests.
//! The incremental update XORs exactly the terms a move changes, so applying
//! the same update twice is the identity.

use std::sync::OnceLock;

use crate::movegen::encode::Move;
use crate::position::board::Position;
use crate::position::types::{CastlingRights, Color, PieceKind, Square};

struct ZobristCodes {
    /// One code per `(color, kind, square)`.
    piece: [[[u64; 64]; 6]; 2],
    /// One code per castling right, FEN order KQkq.
    castle: [u64; 4],
    /// One code per en-passant file.
    ep_file: [u64; 8],
    /// XORed whenever black is to move.
    side: u64,
}

static CODES: OnceLock<ZobristCodes> = OnceLock::new();

#[inline]
fn codes() -> &'static ZobristCodes {
    CODES.get_or_init(build_codes)
}

fn build_codes() -> ZobristCodes {
    let mut seed: u64 = 0x00C0_FFEE_D00D_CAFE;

    let mut piece = [[[0u64; 64]; 6]; 2];
    for color in &mut piece {
        for kind in color {
            for square in kind {
                *square = next_random_u64(&mut seed);
            }
        }
    }

    let mut castle = [0u64; 4];
    for code in &mut castle {
        *code = next_random_u64(&mut seed);
    }

    let mut ep_file = [0u64; 8];
    for code in &mut ep_file {
        *code = next_random_u64(&mut seed);
    }

    let side = next_random_u64(&mut seed);

    ZobristCodes {
        piece,
        castle,
        ep_file,
        side,
    }
}

#[inline]
fn next_random_u64(state: &mut u64) -> u64 {
    // splitmix64
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Full hash of a position: every occupied piece-square, every held castling
/// right, the en-passant file if present, and the side code for black.
pub fn position_hash(pos: &Position) -> u64 {
    let codes = codes();
    let mut hash = 0u64;

    for color in [Color::White, Color::Black] {
        for kind in PieceKind::ALL {
            let mut bb = pos.pieces[color.index()][kind.index()];
            while bb != 0 {
                let sq = bb.trailing_zeros() as usize;
                hash ^= codes.piece[color.index()][kind.index()][sq];
                bb &= bb - 1;
            }
        }
    }

    for right in 0..4 {
        if pos.castling >> right & 1 != 0 {
            hash ^= codes.castle[right];
        }
    }

    if let Some(sq) = pos.ep_square {
        hash ^= codes.ep_file[(sq % 8) as usize];
    }

    if pos.side_to_move == Color::Black {
        hash ^= codes.side;
    }

    hash
}

/// Incrementally fold `mv` into `hash`.
///
/// `prior_*` are the castling rights and en-passant target before the move,
/// `next_*` the values after it; the make snapshot holds the former and the
/// mutated position the latter. The result equals [`position_hash`] of the
/// post-move position, and applying the same update again restores the
/// input.
pub fn update_hash(
    hash: u64,
    mv: Move,
    prior_castling: CastlingRights,
    prior_ep: Option<Square>,
    next_castling: CastlingRights,
    next_ep: Option<Square>,
) -> u64 {
    let codes = codes();
    let us = mv.color();
    let them = us.opposite();
    let kind = mv.piece();
    let from = mv.from() as usize;
    let to = mv.to() as usize;

    let mut out = hash;

    // Mover off the source, mover or promotion onto the destination.
    out ^= codes.piece[us.index()][kind.index()][from];
    let placed = mv.promotion().unwrap_or(kind);
    out ^= codes.piece[us.index()][placed.index()][to];

    // Captured piece: behind the destination for en passant, on it
    // otherwise.
    if mv.is_en_passant() {
        let victim = match us {
            Color::White => to - 8,
            Color::Black => to + 8,
        };
        out ^= codes.piece[them.index()][PieceKind::Pawn.index()][victim];
    } else if let Some(captured) = mv.captured() {
        out ^= codes.piece[them.index()][captured.index()][to];
    }

    // The castling rook hops too.
    if mv.is_castle() {
        let (rook_from, rook_to) = match to {
            6 => (7usize, 5usize),
            2 => (0, 3),
            62 => (63, 61),
            58 => (56, 59),
            _ => unreachable!("castle destination must be g1, c1, g8 or c8"),
        };
        out ^= codes.piece[us.index()][PieceKind::Rook.index()][rook_from];
        out ^= codes.piece[us.index()][PieceKind::Rook.index()][rook_to];
    }

    // Exactly the rights that changed.
    let changed = prior_castling ^ next_castling;
    for right in 0..4 {
        if changed >> right & 1 != 0 {
            out ^= codes.castle[right];
        }
    }

    if let Some(sq) = prior_ep {
        out ^= codes.ep_file[(sq % 8) as usize];
    }
    if let Some(sq) = next_ep {
        out ^= codes.ep_file[(sq % 8) as usize];
    }

    out ^ codes.side
}

#[cfg(test)]
mod tests {
    use super::{position_hash, update_hash};
    use crate::movegen::apply::{make, unmake};
    use crate::movegen::generate::generate_legal;
    use crate::movegen::list::MoveList;
    use crate::movegen::move_from_uci;
    use crate::position::board::Position;

    #[test]
    fn hash_is_deterministic_across_instances() {
        assert_eq!(
            position_hash(&Position::start()),
            position_hash(&Position::start())
        );
    }

    #[test]
    fn side_castling_and_ep_fields_feed_the_hash() {
        let base = Position::from_fen("4k3/8/8/8/8/8/4P3/R3K3 w Q - 0 1")
            .expect("FEN should parse");
        let black_to_move = Position::from_fen("4k3/8/8/8/8/8/4P3/R3K3 b Q - 0 1")
            .expect("FEN should parse");
        let no_rights = Position::from_fen("4k3/8/8/8/8/8/4P3/R3K3 w - - 0 1")
            .expect("FEN should parse");
        let with_ep = Position::from_fen("4k3/8/8/8/8/8/4P3/R3K3 w Q e3 0 1")
            .expect("FEN should parse");

        let h = position_hash(&base);
        assert_ne!(h, position_hash(&black_to_move));
        assert_ne!(h, position_hash(&no_rights));
        assert_ne!(h, position_hash(&with_ep));
    }

    #[test]
    fn update_is_self_inverse() {
        let mut pos = Position::start();
        let hash = position_hash(&pos);
        let mv = move_from_uci(&mut pos, "e2e4").expect("e2e4 should be legal");

        let snapshot = make(&mut pos, mv);
        let updated = update_hash(
            hash,
            mv,
            snapshot.castling,
            snapshot.ep_square,
            pos.castling,
            pos.ep_square,
        );
        let reverted = update_hash(
            updated,
            mv,
            snapshot.castling,
            snapshot.ep_square,
            pos.castling,
            pos.ep_square,
        );
        unmake(&mut pos, mv, snapshot);

        assert_ne!(hash, updated);
        assert_eq!(hash, reverted);
    }

    #[test]
    fn incremental_update_matches_full_hash_for_every_first_move() {
        let mut pos = Position::start();
        let hash = position_hash(&pos);
        let mut list = MoveList::new();
        generate_legal(&mut pos, &mut list);

        for &mv in list.as_slice() {
            let snapshot = make(&mut pos, mv);
            let incremental = update_hash(
                hash,
                mv,
                snapshot.castling,
                snapshot.ep_square,
                pos.castling,
                pos.ep_square,
            );
            assert_eq!(
                incremental,
                position_hash(&pos),
                "hash mismatch after {}",
                mv
            );
            unmake(&mut pos, mv, snapshot);
        }
    }

    #[test]
    fn incremental_update_matches_full_hash_for_special_moves() {
        // Castling, en passant, promotion, and a rook capture that strips
        // castling rights.
        let cases = [
            ("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1g1"),
            ("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1c1"),
            ("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", "e8g8"),
            ("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "a1a8"),
            ("4k3/8/8/pP6/8/8/8/4K3 w - a6 0 1", "b5a6"),
            ("4k3/P7/8/8/8/8/8/4K3 w - - 0 1", "a7a8q"),
            ("4k3/P7/8/8/8/8/8/4K3 w - - 0 1", "a7a8n"),
        ];

        for (fen, uci) in cases {
            let mut pos = Position::from_fen(fen).expect("FEN should parse");
            let hash = position_hash(&pos);
            let mv = move_from_uci(&mut pos, uci).expect("move should be legal");

            let snapshot = make(&mut pos, mv);
            let incremental = update_hash(
                hash,
                mv,
                snapshot.castling,
                snapshot.ep_square,
                pos.castling,
                pos.ep_square,
            );
            assert_eq!(
                incremental,
                position_hash(&pos),
                "hash mismatch after {uci} from {fen}"
            );
        }
    }

    /// Walk every legal line to `depth`, asserting the incremental hash
    /// matches the full recomputation at each node.
    fn walk_hashes(pos: &mut Position, hash: u64, depth: u32) {
        if depth == 0 {
            return;
        }

        let mut list = MoveList::new();
        generate_legal(pos, &mut list);

        for &mv in list.as_slice() {
            let snapshot = make(pos, mv);
            let child = update_hash(
                hash,
                mv,
                snapshot.castling,
                snapshot.ep_square,
                pos.castling,
                pos.ep_square,
            );
            assert_eq!(child, position_hash(pos), "hash diverged after {mv}");
            walk_hashes(pos, child, depth - 1);
            unmake(pos, mv, snapshot);
        }
    }

    #[test]
    fn incremental_hash_tracks_every_line_to_depth_three() {
        let mut pos = Position::start();
        let hash = position_hash(&pos);
        walk_hashes(&mut pos, hash, 3);
    }

    #[test]
    fn incremental_hash_tracks_kiwipete_lines_to_depth_two() {
        let mut pos = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("FEN should parse");
        let hash = position_hash(&pos);
        walk_hashes(&mut pos, hash, 2);
    }

    #[test]
    fn hash_survives_a_ten_ply_excursion() {
        let line = [
            "e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "g8f6", "e1g1", "f6e4", "d2d4", "e4d6",
        ];

        let mut pos = Position::start();
        let start_hash = position_hash(&pos);
        let mut applied = Vec::new();

        for uci in line {
            let mv = move_from_uci(&mut pos, uci).expect("line move should be legal");
            let snapshot = make(&mut pos, mv);
            applied.push((mv, snapshot));
        }

        for (mv, snapshot) in applied.into_iter().rev() {
            unmake(&mut pos, mv, snapshot);
        }

        assert_eq!(pos, Position::start());
        assert_eq!(position_hash(&pos), start_hash);
    }
}
