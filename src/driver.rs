use std::time::{Duration, Instant};

use crate::board::{Board, BoardStatus, ChessMove, MoveGen};
use crate::counters::CounterSet;
use crate::error::{AnomalySink, LoggingSink};
use crate::movegen::order_moves;
use crate::phase::{Phase, PhaseTracker};
use crate::search::{negamax_root, SearchContext};
use crate::types::{EngineConfig, QDepthPolicy, Score, CHECKMATE_BASE};

/// Ratio applied to the time budget for the predictive bail-out heuristic: if
/// `elapsed * 1.3 >= budget` and fewer than 70% of this depth's root moves have
/// been searched, the current depth is abandoned rather than pushed through.
const BAILOUT_ELAPSED_MULTIPLIER: f64 = 1.3;
const BAILOUT_MIN_FRACTION_SEARCHED: f64 = 0.7;

/// Owns the process-wide mutable state the core carries across many searches
/// within one game: the phase tracker (with its endgame latch) and the
/// cumulative/per-move counters. A fresh `Engine` should be created per game.
pub struct Engine {
    phase_tracker: PhaseTracker,
    counters: CounterSet,
    sink: Box<dyn AnomalySink>,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            phase_tracker: PhaseTracker::new(),
            counters: CounterSet::new(),
            sink: Box::new(LoggingSink),
        }
    }

    pub fn get_phase(&self) -> Phase {
        self.phase_tracker.get_phase()
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase_tracker.set_phase(phase);
    }

    pub fn get_counters(&self) -> (u64, u64) {
        self.counters.get()
    }

    pub fn reset_counters(&mut self) {
        self.counters.reset_game();
    }

    /// Iterative deepening driver: searches increasing depths, reordering the
    /// root move list by the scores observed at the previous depth, until
    /// `max_depth` is reached or the deadline forces a bail-out.
    ///
    /// Returns `(None, 0)` if `board` has no legal moves -- the caller decides
    /// whether to report checkmate or stalemate from the position itself.
    pub fn find_best_move(
        &mut self,
        board: &Board,
        config: &EngineConfig,
        deadline_from_now: Option<Duration>,
        game_history: &[u64],
    ) -> (Option<ChessMove>, Score) {
        config.validate().expect("invalid engine configuration");

        let legal_count = MoveGen::new_legal(board).count();
        if legal_count == 0 {
            return (None, 0);
        }

        // Touch the phase tracker so the endgame latch updates even if this
        // call's searches never re-derive it deeper in the tree.
        self.phase_tracker.calculate_phase(board);
        let q_depth = config.q_depth_policy.resolve(config.max_depth);
        let deadline = deadline_from_now.map(|d| Instant::now() + d);
        let start = Instant::now();
        let budget_secs = deadline_from_now.map(|d| d.as_secs_f64());

        let mut ordered: Vec<ChessMove> = order_moves(board, false, self.sink.as_ref()).into_iter().collect();

        let mut best_move: Option<ChessMove> = None;
        let mut best_score: Score = Score::MIN;

        let max_depth = config.max_depth;
        let depth_range: Vec<u8> = if config.iterative_deepening {
            (1..=max_depth).collect()
        } else {
            vec![max_depth]
        };

        'depths: for depth in depth_range {
            if let Some(dl) = deadline {
                if Instant::now() >= dl {
                    break;
                }
            }

            let mut ctx = SearchContext::new(self.counters.per_move(), &mut self.phase_tracker, self.sink.as_ref());
            ctx.deadline = deadline;
            // `game_history` conventionally ends with `board`'s own hash (callers track
            // it as "every position reached so far"). `negamax_root` pushes `board`'s
            // hash itself before recursing, matching every other node's convention of
            // pushing its own hash for its children -- so strip it here to avoid
            // counting the root position twice.
            ctx.position_history = game_history.to_vec();
            if ctx.position_history.last() == Some(&board.get_hash()) {
                ctx.position_history.pop();
            }

            let results = negamax_root(board, depth, q_depth, &ordered, &mut ctx);

            if results.is_empty() {
                break;
            }

            // Early forced-mate: a root move that delivers checkmate directly.
            for &(mv, _) in &results {
                if board.is_checkmate_after(mv) {
                    self.counters.commit_move();
                    return (Some(mv), CHECKMATE_BASE + q_depth as Score + max_depth as Score);
                }
            }

            // Predictive bail-out: sunk-cost heuristic for the current depth.
            if let Some(budget) = budget_secs {
                let elapsed = start.elapsed().as_secs_f64();
                let fraction_searched = results.len() as f64 / ordered.len() as f64;
                if elapsed * BAILOUT_ELAPSED_MULTIPLIER >= budget && fraction_searched < BAILOUT_MIN_FRACTION_SEARCHED {
                    break 'depths;
                }
            }

            let (depth_best_move, depth_best_score) = results
                .iter()
                .copied()
                .max_by_key(|&(_, s)| s)
                .expect("results non-empty, checked above");

            // Scores aren't comparable across depths -- a deeper, more accurate
            // iteration can legitimately lower the eval. A fully completed iteration
            // always replaces the best regardless of score; only a partial iteration
            // (deadline cut it short mid-depth) is gated on improving, since its score
            // reflects an incomplete root search.
            let depth_completed = results.len() == ordered.len();
            if depth_completed || depth_best_score > best_score || best_move.is_none() {
                best_score = depth_best_score;
                best_move = Some(depth_best_move);
            }

            // Reorder root moves by this depth's observed scores, best first,
            // for the next iteration. Moves not yet searched (deadline hit
            // mid-depth) keep their prior relative order, appended last.
            let mut scored: Vec<(ChessMove, Score)> = results;
            let searched: std::collections::HashSet<ChessMove> = scored.iter().map(|&(m, _)| m).collect();
            scored.sort_by(|a, b| b.1.cmp(&a.1));
            let mut next_order: Vec<ChessMove> = scored.into_iter().map(|(m, _)| m).collect();
            for mv in &ordered {
                if !searched.contains(mv) {
                    next_order.push(*mv);
                }
            }
            ordered = next_order;

            if best_score.abs() >= CHECKMATE_BASE {
                break;
            }
        }

        self.counters.commit_move();
        (best_move, best_score)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
