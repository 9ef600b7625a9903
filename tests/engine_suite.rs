use std::str::FromStr;
use std::time::Duration;

use ferrite::board::{Board, BoardStatus};
use ferrite::driver::Engine;
use ferrite::evaluation::evaluate;
use ferrite::phase::PhaseTracker;
use ferrite::types::{EngineConfig, QDepthPolicy, CHECKMATE_BASE};

fn config(max_depth: u8, q_depth_policy: QDepthPolicy) -> EngineConfig {
    EngineConfig {
        max_depth,
        q_depth_policy,
        iterative_deepening: true,
    }
}

#[test]
fn mate_in_one_is_found_with_winning_score() {
    ferrite::board::init();
    let board = Board::from_str("6k1/5ppp/8/8/8/8/5PPP/3Q2KR w - - 0 1").unwrap();
    let mut engine = Engine::new();
    let (mv, score) = engine.find_best_move(&board, &config(4, QDepthPolicy::Restricted), None, &[]);
    let mv = mv.expect("mate in one should be found");
    assert_eq!(mv.to_string(), "d1d8");
    assert!(score >= CHECKMATE_BASE);
}

#[test]
fn stand_pat_quiescence_equals_static_eval_at_startpos() {
    ferrite::board::init();
    let board = Board::default();
    let mut tracker = PhaseTracker::new();
    let direct = evaluate(&board, &mut tracker);

    // At the startpos there are no captures, so the root's quiescence result
    // (depth-0 negamax) should be exactly the static evaluation.
    let mut tracker2 = PhaseTracker::new();
    let mut counters = ferrite::counters::Counters::default();
    let sink = ferrite::error::LoggingSink;
    let mut ctx = ferrite::search::SearchContext::new(&mut counters, &mut tracker2, &sink);
    let q = ferrite::search::qsearch(&board, 4, -ferrite::types::SCORE_INFINITY, ferrite::types::SCORE_INFINITY, &mut ctx);
    assert_eq!(q, direct);
}

#[test]
fn terminal_evaluation_is_checkmate_or_draw() {
    ferrite::board::init();
    let checkmated = Board::from_str("rnbqkbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
    assert_eq!(checkmated.status(), BoardStatus::Checkmate);
    let mut tracker = PhaseTracker::new();
    assert_eq!(evaluate(&checkmated, &mut tracker), -CHECKMATE_BASE);

    let stalemated = Board::from_str("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert_eq!(stalemated.status(), BoardStatus::Stalemate);
    let mut tracker2 = PhaseTracker::new();
    assert_eq!(evaluate(&stalemated, &mut tracker2), 0);
}

#[test]
fn endgame_phase_latch_survives_underpromotion_material_swing() {
    // A position one pawn push away from promoting to a knight, deep enough
    // into the endgame that the tracker should already be latched.
    ferrite::board::init();
    let mut tracker = PhaseTracker::new();
    let bare_endgame = Board::from_str("4k3/8/8/8/8/8/8/4K2R w - - 0 40").unwrap();
    let phase = tracker.calculate_phase(&bare_endgame);
    assert_eq!(phase, ferrite::phase::Phase::Endgame);

    // Promote to a knight, materially enriching the side to move's army --
    // the latch must not regress back to Midgame/Opening.
    let promoted = Board::from_str("4k3/7P/8/8/8/8/8/4K2R w - - 0 41").unwrap();
    let phase_after = tracker.calculate_phase(&promoted);
    assert_eq!(phase_after, ferrite::phase::Phase::Endgame);
}

#[test]
fn time_bailout_returns_within_budget_with_a_legal_move() {
    ferrite::board::init();
    let board = Board::from_str("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4").unwrap();
    let mut engine = Engine::new();
    let start = std::time::Instant::now();
    let (mv, _) = engine.find_best_move(
        &board,
        &config(12, QDepthPolicy::Restricted),
        Some(Duration::from_millis(150)),
        &[],
    );
    let elapsed = start.elapsed();
    assert!(mv.is_some());
    assert!(board.legal(mv.unwrap()));
    assert!(elapsed < Duration::from_millis(450), "took {:?}", elapsed);
}

#[test]
fn negamax_never_returns_unbounded_infinity() {
    ferrite::board::init();
    let board = Board::default();
    let mut engine = Engine::new();
    let (_, score) = engine.find_best_move(&board, &config(3, QDepthPolicy::Restricted), None, &[]);
    assert!(score.abs() < ferrite::types::SCORE_INFINITY);
}

#[test]
fn board_is_unmodified_after_a_full_search() {
    ferrite::board::init();
    let board = Board::from_str("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4").unwrap();
    let before = board;
    let mut engine = Engine::new();
    engine.find_best_move(&board, &config(4, QDepthPolicy::Restricted), None, &[]);
    assert_eq!(board, before);
}

#[test]
fn full_game_loop_always_produces_legal_moves_until_terminal() {
    ferrite::board::init();
    let mut board = Board::default();
    let mut engine = Engine::new();
    let mut history = vec![board.get_hash()];

    for _ in 0..12 {
        if board.status() != BoardStatus::Ongoing {
            break;
        }
        let (mv, _) = engine.find_best_move(&board, &config(2, QDepthPolicy::Restricted), None, &history);
        let mv = mv.expect("ongoing position must have a legal move");
        assert!(board.legal(mv));
        board = board.make_move_new(mv);
        history.push(board.get_hash());
    }
}
