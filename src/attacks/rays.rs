//! Reference slider attack generation by ray tracing.
//!
//! Walks each ray square by square and stops on (and includes) the first
//! blocker. This is the oracle the magic tables are built from and checked
//! against; it is also a correct, slower stand-in wherever the magic path
//! is unavailable.

use crate::position::types::{Bitboard, Square};

pub const ROOK_DELTAS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const BISHOP_DELTAS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[inline]
pub fn rook_rays(square: Square, occupancy: Bitboard) -> Bitboard {
    let mut attacks = 0u64;
    for (file_step, rank_step) in ROOK_DELTAS {
        attacks |= trace_ray(square as i32, file_step, rank_step, occupancy);
    }
    attacks
}

#[inline]
pub fn bishop_rays(square: Square, occupancy: Bitboard) -> Bitboard {
    let mut attacks = 0u64;
    for (file_step, rank_step) in BISHOP_DELTAS {
        attacks |= trace_ray(square as i32, file_step, rank_step, occupancy);
    }
    attacks
}

fn trace_ray(square: i32, file_step: i32, rank_step: i32, occupancy: Bitboard) -> Bitboard {
    let mut file = (square % 8) + file_step;
    let mut rank = (square / 8) + rank_step;
    let mut attacks = 0u64;

    while (0..8).contains(&file) && (0..8).contains(&rank) {
        let bit = 1u64 << (rank * 8 + file);
        attacks |= bit;
        if occupancy & bit != 0 {
            break;
        }
        file += file_step;
        rank += rank_step;
    }

    attacks
}
