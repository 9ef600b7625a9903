use arrayvec::ArrayVec;
use crate::board::{Board, ChessMove, MoveGen};

use crate::pst::{CHECK_BONUS, MVV_VALUE};
use crate::error::AnomalySink;

/// A legal move annotated with its ordering key. Only meaningful within the
/// capture bucket; other buckets carry moves in generation order.
struct ScoredMove {
    mv: ChessMove,
    score: i32,
}

/// Produces a heuristically sorted move list for a node.
///
/// Partitions legal moves into five buckets — checkmates, promotions, captures,
/// non-mating checks, quiet moves — and assembles them in that order. If any
/// checkmating move exists, it short-circuits and returns only those moves (the
/// early-exit rule). Captures are MVV-LVA ordered with a check bonus. In
/// quiescence mode the quiet bucket is omitted entirely.
pub fn order_moves(board: &Board, quiescence: bool, sink: &dyn AnomalySink) -> ArrayVec<ChessMove, 256> {
    let moves = MoveGen::new_legal(board);

    let mut mates: ArrayVec<ChessMove, 256> = ArrayVec::new();
    let mut promotions: ArrayVec<ChessMove, 256> = ArrayVec::new();
    let mut captures: ArrayVec<ScoredMove, 256> = ArrayVec::new();
    let mut checks: ArrayVec<ChessMove, 256> = ArrayVec::new();
    let mut quiet: ArrayVec<ChessMove, 256> = ArrayVec::new();

    for mv in moves {
        if board.is_checkmate_after(mv) {
            mates.push(mv);
            continue;
        }
        if mv.get_promotion().is_some() {
            promotions.push(mv);
            continue;
        }
        if board.is_capture(mv) {
            captures.push(ScoredMove {
                mv,
                score: capture_score(board, mv, sink),
            });
            continue;
        }
        if board.gives_check(mv) {
            checks.push(mv);
            continue;
        }
        quiet.push(mv);
    }

    if !mates.is_empty() {
        return mates;
    }

    captures.sort_unstable_by(|a, b| b.score.cmp(&a.score));

    let mut out: ArrayVec<ChessMove, 256> = ArrayVec::new();
    out.extend(promotions);
    out.extend(captures.into_iter().map(|sm| sm.mv));
    out.extend(checks);
    if !quiescence {
        out.extend(quiet);
    }
    out
}

/// MVV-LVA ordering key: `value(victim) - value(aggressor) + CHECK_BONUS if the
/// move also gives check`. The victim for en-passant is the pawn captured on the
/// adjacent square, not the (empty) destination square.
fn capture_score(board: &Board, mv: ChessMove, sink: &dyn AnomalySink) -> i32 {
    let aggressor = match board.piece_on(mv.get_source()) {
        Some(p) => p,
        None => {
            sink.record("mvv-lva: missing aggressor for move flagged as a capture");
            return 0;
        }
    };

    let victim = if board.is_en_passant(mv) {
        crate::pst::PAWN
    } else {
        match board.piece_on(mv.get_dest()) {
            Some(p) => crate::pst::piece_index(p),
            None => {
                sink.record("mvv-lva: missing victim for move flagged as a capture");
                return 0;
            }
        }
    };

    let aggressor_idx = crate::pst::piece_index(aggressor);
    let mut score = MVV_VALUE[victim] - MVV_VALUE[aggressor_idx];
    if board.gives_check(mv) {
        score += CHECK_BONUS;
    }
    score
}
