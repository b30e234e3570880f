//! Magic lookup tables for sliding-piece attacks.
//!
//! For each square the relevant-occupancy mask keeps the ray squares whose
//! occupants can block the slider, excluding board edges. A magic constant
//! multiplied into the masked occupancy and shifted down is a perfect hash
//! into a per-square table of precomputed attack sets, so a slider lookup is
//! a mask, a multiply, a shift, and an index.
//!
//! The tables are built once behind a `OnceLock`. Magic constants are found
//! by trying random sparse candidates from a fixed-seed generator until one
//! maps every occupancy subset of the mask collision-free (two subsets may
//! share an index only if they share an attack set). Construction failure is
//! an invariant violation and aborts.

use std::sync::OnceLock;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::attacks::rays::{bishop_rays, rook_rays, BISHOP_DELTAS, ROOK_DELTAS};
use crate::position::types::{Bitboard, PieceKind, Square};

const MAGIC_SEED: u64 = 0xD6E8_FEB8_6659_FD93;
const MAX_MAGIC_TRIES: u32 = 100_000_000;

struct SliderTable {
    masks: [Bitboard; 64],
    magics: [u64; 64],
    shifts: [u32; 64],
    attacks: Vec<Vec<Bitboard>>,
}

struct MagicTables {
    rook: SliderTable,
    bishop: SliderTable,
}

static TABLES: OnceLock<MagicTables> = OnceLock::new();

#[inline]
fn tables() -> &'static MagicTables {
    TABLES.get_or_init(build_tables)
}

/// Rook attacks from `square` over `occupancy`.
#[inline]
pub fn rook_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    lookup(&tables().rook, square, occupancy)
}

/// Bishop attacks from `square` over `occupancy`.
#[inline]
pub fn bishop_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    lookup(&tables().bishop, square, occupancy)
}

/// Queen attacks are the union of the rook and bishop lookups.
#[inline]
pub fn queen_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    rook_attacks(square, occupancy) | bishop_attacks(square, occupancy)
}

/// Uniform slider entry point.
#[inline]
pub fn slider_attacks(kind: PieceKind, square: Square, occupancy: Bitboard) -> Bitboard {
    match kind {
        PieceKind::Bishop => bishop_attacks(square, occupancy),
        PieceKind::Rook => rook_attacks(square, occupancy),
        PieceKind::Queen => queen_attacks(square, occupancy),
        _ => unreachable!("slider_attacks called with a non-slider kind"),
    }
}

#[inline]
fn lookup(table: &SliderTable, square: Square, occupancy: Bitboard) -> Bitboard {
    let sq = square as usize;
    let relevant = occupancy & table.masks[sq];
    let index = (relevant.wrapping_mul(table.magics[sq]) >> table.shifts[sq]) as usize;
    table.attacks[sq][index]
}

fn build_tables() -> MagicTables {
    let started = Instant::now();
    let mut rng = SmallRng::seed_from_u64(MAGIC_SEED);

    let rook = build_slider_table(&mut rng, &ROOK_DELTAS, rook_rays);
    let bishop = build_slider_table(&mut rng, &BISHOP_DELTAS, bishop_rays);

    tracing::debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "magic attack tables built"
    );

    MagicTables { rook, bishop }
}

fn build_slider_table(
    rng: &mut SmallRng,
    deltas: &[(i32, i32); 4],
    reference: fn(Square, Bitboard) -> Bitboard,
) -> SliderTable {
    let mut masks = [0u64; 64];
    let mut magics = [0u64; 64];
    let mut shifts = [0u32; 64];
    let mut attacks = Vec::with_capacity(64);

    for sq in 0..64u8 {
        let mask = relevant_mask(sq, deltas);
        let bits = mask.count_ones();
        let (magic, table) = find_magic(rng, sq, mask, reference);

        masks[sq as usize] = mask;
        magics[sq as usize] = magic;
        shifts[sq as usize] = 64 - bits;
        attacks.push(table);
    }

    SliderTable {
        masks,
        magics,
        shifts,
        attacks,
    }
}

/// Ray squares whose occupancy can block the slider, excluding the edge
/// square at the end of each ray.
fn relevant_mask(square: Square, deltas: &[(i32, i32); 4]) -> Bitboard {
    let mut mask = 0u64;

    for &(file_step, rank_step) in deltas {
        let mut file = (square as i32 % 8) + file_step;
        let mut rank = (square as i32 / 8) + rank_step;

        while (0..8).contains(&(file + file_step)) && (0..8).contains(&(rank + rank_step)) {
            mask |= 1u64 << (rank * 8 + file);
            file += file_step;
            rank += rank_step;
        }
    }

    mask
}

/// Expand subset `index` of `mask` into an occupancy bitboard: bit `i` of the
/// index selects the `i`-th set bit of the mask.
fn occupancy_subset(index: usize, mask: Bitboard) -> Bitboard {
    let mut occupancy = 0u64;
    let mut remaining = mask;
    let mut bit = 0usize;

    while remaining != 0 {
        let sq = remaining.trailing_zeros();
        if index & (1 << bit) != 0 {
            occupancy |= 1u64 << sq;
        }
        remaining &= remaining - 1;
        bit += 1;
    }

    occupancy
}

fn find_magic(
    rng: &mut SmallRng,
    square: Square,
    mask: Bitboard,
    reference: fn(Square, Bitboard) -> Bitboard,
) -> (u64, Vec<Bitboard>) {
    let bits = mask.count_ones();
    let subset_count = 1usize << bits;
    let shift = 64 - bits;

    let occupancies: Vec<Bitboard> = (0..subset_count)
        .map(|i| occupancy_subset(i, mask))
        .collect();
    let references: Vec<Bitboard> = occupancies
        .iter()
        .map(|&occ| reference(square, occ))
        .collect();

    for _ in 0..MAX_MAGIC_TRIES {
        // Sparse candidates converge far faster than uniform ones.
        let magic = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
        if (mask.wrapping_mul(magic) >> 56).count_ones() < 6 {
            continue;
        }

        let mut table = vec![0u64; subset_count];
        let mut used = vec![false; subset_count];
        let mut collided = false;

        for (i, &occ) in occupancies.iter().enumerate() {
            let index = (occ.wrapping_mul(magic) >> shift) as usize;
            if !used[index] {
                used[index] = true;
                table[index] = references[i];
            } else if table[index] != references[i] {
                collided = true;
                break;
            }
        }

        if !collided {
            return (magic, table);
        }
    }

    tracing::error!(square, "no collision-free magic constant found");
    panic!("magic table construction failed for square {square}");
}
