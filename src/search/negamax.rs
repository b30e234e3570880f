//! Negamax alpha-beta search with transposition probing and iterative
//! deepening.
//!
//! The recursion makes and unmakes moves on a single position, threading
//! the Zobrist hash incrementally. The transposition table is probed before
//! anything else and written on every exit path with the bound class the
//! classical alpha-beta convention assigns. Iterative deepening checks the
//! clock only between plies, so the first ply always completes and the
//! returned move is always from a fully-searched depth.

use std::time::{Duration, Instant};

use crate::movegen::apply::{make, unmake};
use crate::movegen::attacked::in_check;
use crate::movegen::encode::Move;
use crate::movegen::generate::{generate_legal, generate_pseudo_legal};
use crate::movegen::list::MoveList;
use crate::position::board::Position;
use crate::search::eval::evaluate;
use crate::search::table::{Bound, TranspositionTable};
use crate::search::zobrist::{position_hash, update_hash};

/// Mate scores start here and shrink by one per ply so shorter mates win.
pub const MATE_SCORE: i32 = 30_000;
/// Deepest ply the driver will request.
pub const MAX_SEARCH_PLY: u8 = 64;

const DEFAULT_MOVETIME_MS: u64 = 1_000;

/// Caller-facing search limits: a fixed depth, a per-move wall-clock budget,
/// or both. With neither, the budget defaults to one second.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchLimits {
    pub depth: Option<u8>,
    pub movetime_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchOutcome {
    pub best_move: Move,
    pub score: i32,
    pub depth: u8,
    pub nodes: u64,
}

struct SearchContext<'a> {
    tt: &'a mut TranspositionTable,
    nodes: u64,
}

/// Iterative deepening driver. Returns `None` only when the side to move
/// has no legal move; otherwise the best move of the deepest fully-searched
/// ply.
pub fn find_move(
    pos: &mut Position,
    limits: &SearchLimits,
    tt: &mut TranspositionTable,
) -> Option<SearchOutcome> {
    let started = Instant::now();
    let budget = Duration::from_millis(limits.movetime_ms.unwrap_or(DEFAULT_MOVETIME_MS));
    let max_depth = limits.depth.unwrap_or(MAX_SEARCH_PLY).clamp(1, MAX_SEARCH_PLY);

    let mut root_moves = MoveList::new();
    generate_legal(pos, &mut root_moves);
    if root_moves.is_empty() {
        return None;
    }

    let root_hash = position_hash(pos);
    let mut ctx = SearchContext { tt, nodes: 0 };
    let mut outcome = None;

    for depth in 1..=max_depth {
        let (best_move, score) = search_root(pos, &root_moves, depth, root_hash, &mut ctx);
        outcome = Some(SearchOutcome {
            best_move,
            score,
            depth,
            nodes: ctx.nodes,
        });

        tracing::info!(
            depth,
            score,
            nodes = ctx.nodes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            best = %best_move,
            "search ply complete"
        );

        // A forced mate cannot improve with more depth.
        if score.abs() >= MATE_SCORE - i32::from(MAX_SEARCH_PLY) {
            break;
        }
        if started.elapsed() >= budget {
            break;
        }
    }

    outcome
}

fn search_root(
    pos: &mut Position,
    root_moves: &MoveList,
    depth: u8,
    root_hash: u64,
    ctx: &mut SearchContext<'_>,
) -> (Move, i32) {
    let mut alpha = -MATE_SCORE;
    let beta = MATE_SCORE;
    let mut best_move = root_moves.as_slice()[0];

    for &mv in root_moves.as_slice() {
        let snapshot = make(pos, mv);
        let child_hash = update_hash(
            root_hash,
            mv,
            snapshot.castling,
            snapshot.ep_square,
            pos.castling,
            pos.ep_square,
        );
        let score = -negamax(pos, depth - 1, -beta, -alpha, child_hash, 1, ctx);
        unmake(pos, mv, snapshot);

        if score > alpha {
            alpha = score;
            best_move = mv;
        }
    }

    (best_move, alpha)
}

fn negamax(
    pos: &mut Position,
    depth: u8,
    mut alpha: i32,
    beta: i32,
    hash: u64,
    ply: u8,
    ctx: &mut SearchContext<'_>,
) -> i32 {
    if let Some(score) = ctx.tt.probe(hash, i16::from(depth), alpha, beta) {
        return score;
    }

    ctx.nodes += 1;

    if depth == 0 {
        let score = evaluate(pos);
        ctx.tt.store(hash, 0, score, Bound::Exact, None);
        return score;
    }

    let mut list = MoveList::new();
    generate_pseudo_legal(pos, &mut list);
    order_moves(&mut list, ctx.tt.probe_move(hash));

    let us = pos.side_to_move;
    let mut bound = Bound::Upper;
    let mut best_move = None;
    let mut any_legal = false;

    for i in 0..list.len() {
        let mv = list.as_slice()[i];
        let snapshot = make(pos, mv);
        if in_check(pos, us) {
            unmake(pos, mv, snapshot);
            continue;
        }
        any_legal = true;

        let child_hash = update_hash(
            hash,
            mv,
            snapshot.castling,
            snapshot.ep_square,
            pos.castling,
            pos.ep_square,
        );
        let score = -negamax(pos, depth - 1, -beta, -alpha, child_hash, ply + 1, ctx);
        unmake(pos, mv, snapshot);

        if score >= beta {
            ctx.tt
                .store(hash, i16::from(depth), beta, Bound::Lower, Some(mv));
            return beta;
        }
        if score > alpha {
            alpha = score;
            bound = Bound::Exact;
            best_move = Some(mv);
        }
    }

    if !any_legal {
        // Checkmate prefers shorter distances; stalemate is dead even.
        return if in_check(pos, us) {
            -MATE_SCORE + i32::from(ply)
        } else {
            0
        };
    }

    ctx.tt
        .store(hash, i16::from(depth), alpha, bound, best_move);
    alpha
}

/// Ordering is a speed lever only: the remembered best move first, then
/// captures by descending victim value, then the quiet moves.
fn order_moves(list: &mut MoveList, tt_move: Option<Move>) {
    list.as_mut_slice().sort_unstable_by_key(|&mv| {
        if Some(mv) == tt_move {
            return -1_000;
        }
        match mv.captured() {
            Some(victim) => -(10 + victim.index() as i32),
            None => 0,
        }
    });
}
