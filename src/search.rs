use std::time::Instant;

use crate::board::{Board, BoardStatus, ChessMove};
use crate::counters::Counters;
use crate::error::AnomalySink;
use crate::evaluation::evaluate;
use crate::movegen::order_moves;
use crate::phase::PhaseTracker;
use crate::types::{Score, CHECKMATE_BASE, DRAW_SCORE, SCORE_INFINITY};

/// Everything a single `negamax`/`qsearch` recursion needs that outlives one
/// node: counters, the phase tracker, the position history for repetition
/// claims, a deadline, and the anomaly sink for move-ordering contract
/// violations. Threaded through by reference rather than globals.
pub struct SearchContext<'a> {
    pub counters: &'a mut Counters,
    pub tracker: &'a mut PhaseTracker,
    pub position_history: Vec<u64>,
    pub deadline: Option<Instant>,
    pub sink: &'a dyn AnomalySink,
}

impl<'a> SearchContext<'a> {
    pub fn new(counters: &'a mut Counters, tracker: &'a mut PhaseTracker, sink: &'a dyn AnomalySink) -> Self {
        Self {
            counters,
            tracker,
            position_history: Vec::new(),
            deadline: None,
            sink,
        }
    }

    fn deadline_exceeded(&self) -> bool {
        match self.deadline {
            Some(d) => Instant::now() >= d,
            None => false,
        }
    }

    fn claims_draw(&self, board: &Board) -> bool {
        board.can_claim_fifty_moves() || board.can_claim_threefold_repetition(&self.position_history)
    }
}

/// Quiescence search: a tactical-only extension past the nominal horizon that
/// stabilizes leaf evaluations against the horizon effect.
pub fn qsearch(board: &Board, q_depth: u8, mut alpha: Score, beta: Score, ctx: &mut SearchContext) -> Score {
    ctx.counters.record_position();

    let stand_pat = evaluate(board, ctx.tracker);

    if board.status() != BoardStatus::Ongoing || q_depth == 0 {
        if stand_pat.abs() == CHECKMATE_BASE {
            return stand_pat.signum() * (CHECKMATE_BASE + q_depth as Score);
        }
        return stand_pat;
    }

    if ctx.claims_draw(board) {
        return DRAW_SCORE;
    }

    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let moves = order_moves(board, true, ctx.sink);
    let mut best = stand_pat;

    ctx.position_history.push(board.get_hash());
    for mv in &moves {
        let child = board.make_move_new(*mv);
        let score = -qsearch(&child, q_depth - 1, -beta, -alpha, ctx);
        let score = if score.abs() >= CHECKMATE_BASE {
            score.signum() * (CHECKMATE_BASE + q_depth as Score)
        } else {
            score
        };

        if score > best {
            best = score;
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            ctx.counters.record_cutoff();
            break;
        }
    }
    ctx.position_history.pop();

    best
}

/// Depth-limited negamax with alpha-beta pruning. Returns the score from the
/// perspective of the side to move at `board`.
pub fn negamax(
    board: &Board,
    depth: u8,
    q_depth: u8,
    mut alpha: Score,
    beta: Score,
    ctx: &mut SearchContext,
) -> Score {
    ctx.counters.record_position();

    if board.status() != BoardStatus::Ongoing {
        let eval = evaluate(board, ctx.tracker);
        if eval.abs() == CHECKMATE_BASE {
            return eval.signum() * (CHECKMATE_BASE + q_depth as Score + depth as Score);
        }
        return eval;
    }

    if ctx.claims_draw(board) {
        return DRAW_SCORE;
    }

    if depth == 0 {
        return qsearch(board, q_depth, alpha, beta, ctx);
    }

    let moves = order_moves(board, false, ctx.sink);
    // A legal position with Ongoing status always has at least one legal move.
    debug_assert!(!moves.is_empty());

    ctx.position_history.push(board.get_hash());

    let mut best = -SCORE_INFINITY;
    for (i, mv) in moves.iter().enumerate() {
        if i > 0 && ctx.deadline_exceeded() {
            break;
        }

        let child = board.make_move_new(*mv);
        let mut score = -negamax(&child, depth - 1, q_depth, -beta, -alpha, ctx);

        if score.abs() >= CHECKMATE_BASE {
            score = score.signum() * (CHECKMATE_BASE + q_depth as Score + depth as Score);
            // Only a forced mate *for* the mover short-circuits the node: it can't be
            // improved upon, so searching remaining siblings is wasted work. A mate
            // *against* the mover is just a very bad score -- other siblings may avoid
            // it, so it must fall through to the normal best/alpha update below.
            if score >= CHECKMATE_BASE {
                ctx.position_history.pop();
                return score;
            }
        }

        if score > best {
            best = score;
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            ctx.counters.record_cutoff();
            break;
        }
    }

    ctx.position_history.pop();
    best
}

/// Search every root move and report `move -> score` for each one actually
/// searched, along with the best. Used by the iterative driver.
pub fn negamax_root(
    board: &Board,
    depth: u8,
    q_depth: u8,
    ordered_moves: &[ChessMove],
    ctx: &mut SearchContext,
) -> Vec<(ChessMove, Score)> {
    let mut results = Vec::with_capacity(ordered_moves.len());
    let mut alpha = -SCORE_INFINITY;
    let beta = SCORE_INFINITY;

    ctx.position_history.push(board.get_hash());
    for (i, mv) in ordered_moves.iter().enumerate() {
        if i > 0 && ctx.deadline_exceeded() {
            break;
        }

        let child = board.make_move_new(*mv);
        let mut score = -negamax(&child, depth.saturating_sub(1), q_depth, -beta, -alpha, ctx);

        if score.abs() >= CHECKMATE_BASE {
            score = score.signum() * (CHECKMATE_BASE + q_depth as Score + depth as Score);
        }

        results.push((*mv, score));
        if score > alpha {
            alpha = score;
        }
    }
    ctx.position_history.pop();

    results
}


// Negamax: symmetric formulation of minimax where max_me(P) = -max_opponent(P);
// evaluation is always reported from the mover's perspective, so the caller negates.

// Alpha-beta pruning: skip branches that cannot improve the bound a rational
// opponent would already guarantee themselves.

// Quiescence search: at the nominal horizon, don't just evaluate -- search noisy
// moves (captures, checks, promotions) so a leaf never stops mid-exchange.
