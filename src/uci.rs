use std::io::{self, BufRead};
use std::str::FromStr;
use std::time::Duration;

use crate::board::{Board, ChessMove, Color, File, Piece, Rank, Square};

use crate::driver::Engine;
use crate::time::{self, TimeControl};
use crate::types::{EngineConfig, QDepthPolicy, CHECKMATE_BASE, DEFAULT_DEPTH};

/// Runs the UCI transport loop: reads commands from stdin, drives `Engine`,
/// writes responses to stdout. The core itself is single-threaded and
/// synchronous (see the concurrency model), so `go` blocks until the search's
/// own deadline expires -- there is no background search thread to `stop`.
pub fn run() {
    let stdin = io::stdin();

    let mut board = Board::default();
    let mut engine = Engine::new();
    let mut position_history: Vec<u64> = vec![board.get_hash()];
    let mut requested_max_depth = DEFAULT_DEPTH;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        match tokens[0] {
            "uci" => {
                println!("id name chess-engine");
                println!("id author yourname");
                println!("option name Depth type spin default {} min 1 max 20", DEFAULT_DEPTH);
                println!("uciok");
            }
            "isready" => {
                println!("readyok");
            }
            "ucinewgame" => {
                board = Board::default();
                position_history = vec![board.get_hash()];
                engine = Engine::new();
            }
            "position" => {
                parse_position(&tokens, &mut board, &mut position_history);
            }
            "go" => {
                let go_params = parse_go(&tokens);
                let (best_move, score) = run_search(&board, &mut engine, &go_params, requested_max_depth, &position_history);

                let score_str = format_score(score);
                println!("info {} ", score_str);

                match best_move {
                    Some(m) => println!("bestmove {}", m),
                    None => println!("bestmove 0000"),
                }
            }
            "stop" => {
                // No background search to interrupt; `go` already returned.
            }
            "setoption" => {
                parse_setoption(&tokens, &mut requested_max_depth);
            }
            "quit" => break,
            "d" | "print" => {
                println!("{}", board);
            }
            _ => {}
        }
    }
}

/// Parsed `go` command parameters.
struct GoParams {
    depth: Option<u8>,
    movetime_ms: Option<u64>,
    wtime_ms: Option<u64>,
    btime_ms: Option<u64>,
    winc_ms: Option<u64>,
    binc_ms: Option<u64>,
    infinite: bool,
}

impl GoParams {
    fn new() -> Self {
        Self {
            depth: None,
            movetime_ms: None,
            wtime_ms: None,
            btime_ms: None,
            winc_ms: None,
            binc_ms: None,
            infinite: false,
        }
    }
}

/// Resolves a `go` command plus the current position into a time control,
/// following the UCI collaborator contract: `movetime` is divided by 40 when
/// it is very early in the game (at most 2 full moves), otherwise used as-is;
/// `wtime/btime/winc/binc` forward the side-to-move's clock and increment.
fn resolve_time_control(go: &GoParams, board: &Board) -> TimeControl {
    if let Some(mt) = go.movetime_ms {
        let ms = if board.fullmove_number() <= 2 { mt / 40 } else { mt };
        return TimeControl::Movetime(ms as f64 / 1000.0);
    }

    let (my_time, my_inc) = if board.side_to_move() == Color::White {
        (go.wtime_ms, go.winc_ms)
    } else {
        (go.btime_ms, go.binc_ms)
    };

    match my_time {
        Some(t) => TimeControl::Clock {
            total: t as f64 / 1000.0,
            increment: my_inc.unwrap_or(0) as f64 / 1000.0,
        },
        None => TimeControl::None,
    }
}

fn run_search(
    board: &Board,
    engine: &mut Engine,
    go: &GoParams,
    requested_max_depth: u8,
    position_history: &[u64],
) -> (Option<ChessMove>, crate::types::Score) {
    let requested_max_depth = go.depth.unwrap_or(requested_max_depth);

    if go.infinite {
        let config = EngineConfig {
            max_depth: requested_max_depth,
            q_depth_policy: QDepthPolicy::Unrestricted,
            iterative_deepening: true,
        };
        return engine.find_best_move(board, &config, None, position_history);
    }

    let control = resolve_time_control(go, board);
    let phase = engine.get_phase();
    let plan = time::plan(control, phase, requested_max_depth, QDepthPolicy::Unrestricted);

    let config = EngineConfig {
        max_depth: plan.max_depth,
        q_depth_policy: plan.q_depth_policy,
        iterative_deepening: true,
    };
    let deadline = Some(Duration::from_secs_f64(plan.budget_secs));
    engine.find_best_move(board, &config, deadline, position_history)
}

/// Format a score for UCI output (centipawns or mate-in-N).
fn format_score(score: crate::types::Score) -> String {
    if score.abs() >= CHECKMATE_BASE {
        let mate_in = ((score.abs() - CHECKMATE_BASE) / 2).max(1);
        if score > 0 {
            format!("score mate {}", mate_in)
        } else {
            format!("score mate -{}", mate_in)
        }
    } else {
        format!("score cp {}", score)
    }
}

fn parse_go(tokens: &[&str]) -> GoParams {
    let mut params = GoParams::new();
    let mut i = 1;

    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                i += 1;
                if i < tokens.len() {
                    params.depth = tokens[i].parse().ok();
                }
            }
            "movetime" => {
                i += 1;
                if i < tokens.len() {
                    params.movetime_ms = tokens[i].parse().ok();
                }
            }
            "wtime" => {
                i += 1;
                if i < tokens.len() {
                    params.wtime_ms = tokens[i].parse().ok();
                }
            }
            "btime" => {
                i += 1;
                if i < tokens.len() {
                    params.btime_ms = tokens[i].parse().ok();
                }
            }
            "winc" => {
                i += 1;
                if i < tokens.len() {
                    params.winc_ms = tokens[i].parse().ok();
                }
            }
            "binc" => {
                i += 1;
                if i < tokens.len() {
                    params.binc_ms = tokens[i].parse().ok();
                }
            }
            "movestogo" => {
                i += 1; // Not modeled -- the time manager uses phase-based expected-moves-left instead.
            }
            "infinite" => {
                params.infinite = true;
            }
            _ => {}
        }
        i += 1;
    }

    params
}

fn parse_position(tokens: &[&str], board: &mut Board, history: &mut Vec<u64>) {
    if tokens.len() < 2 {
        return;
    }

    let mut idx = 1;

    if tokens[idx] == "startpos" {
        *board = Board::default();
        idx += 1;
    } else if tokens[idx] == "fen" {
        idx += 1;
        let mut fen_parts: Vec<&str> = Vec::new();
        while idx < tokens.len() && tokens[idx] != "moves" && fen_parts.len() < 6 {
            fen_parts.push(tokens[idx]);
            idx += 1;
        }
        if fen_parts.len() >= 4 {
            let fen_str = fen_parts.join(" ");
            match Board::from_str(&fen_str) {
                Ok(b) => *board = b,
                Err(_) => return,
            }
        } else {
            return;
        }
    } else {
        return;
    }

    history.clear();
    history.push(board.get_hash());

    if idx < tokens.len() && tokens[idx] == "moves" {
        idx += 1;
        for &move_str in &tokens[idx..] {
            if let Some(m) = parse_uci_move(board, move_str) {
                *board = board.make_move_new(m);
                history.push(board.get_hash());
            }
        }
    }
}

/// Parse a UCI move string directly into squares + optional promotion piece.
fn parse_uci_move(board: &Board, move_str: &str) -> Option<ChessMove> {
    if move_str.len() < 4 {
        return None;
    }
    let bytes = move_str.as_bytes();

    let src_file = bytes[0].wrapping_sub(b'a');
    let src_rank = bytes[1].wrapping_sub(b'1');
    let dst_file = bytes[2].wrapping_sub(b'a');
    let dst_rank = bytes[3].wrapping_sub(b'1');

    if src_file >= 8 || src_rank >= 8 || dst_file >= 8 || dst_rank >= 8 {
        return None;
    }

    let src = Square::make_square(
        Rank::from_index(src_rank as usize),
        File::from_index(src_file as usize),
    );
    let dst = Square::make_square(
        Rank::from_index(dst_rank as usize),
        File::from_index(dst_file as usize),
    );

    let promo = if move_str.len() >= 5 {
        match bytes[4] {
            b'q' => Some(Piece::Queen),
            b'r' => Some(Piece::Rook),
            b'b' => Some(Piece::Bishop),
            b'n' => Some(Piece::Knight),
            _ => None,
        }
    } else {
        None
    };

    let mv = ChessMove::new(src, dst, promo);
    if board.legal(mv) {
        Some(mv)
    } else {
        None
    }
}

fn parse_setoption(tokens: &[&str], requested_max_depth: &mut u8) {
    let name_idx = tokens.iter().position(|&t| t == "name");
    let value_idx = tokens.iter().position(|&t| t == "value");

    if let (Some(ni), Some(vi)) = (name_idx, value_idx) {
        let name: String = tokens[ni + 1..vi].join(" ");
        let value: String = tokens[vi + 1..].join(" ");

        if name.eq_ignore_ascii_case("depth") {
            if let Ok(d) = value.parse::<u8>() {
                *requested_max_depth = d.clamp(1, 20);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position_startpos() {
        let mut board = Board::default();
        let mut history = Vec::new();
        let tokens = vec!["position", "startpos"];
        parse_position(&tokens, &mut board, &mut history);
        assert_eq!(board, Board::default());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_parse_position_startpos_with_moves() {
        let mut board = Board::default();
        let mut history = Vec::new();
        let tokens = vec!["position", "startpos", "moves", "e2e4", "e7e5"];
        parse_position(&tokens, &mut board, &mut history);
        assert_ne!(board, Board::default());
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_parse_position_fen() {
        let mut board = Board::default();
        let mut history = Vec::new();
        let tokens = vec![
            "position", "fen",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR",
            "b", "KQkq", "e3", "0", "1",
        ];
        parse_position(&tokens, &mut board, &mut history);
        assert_ne!(board, Board::default());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_parse_go_depth() {
        let tokens = vec!["go", "depth", "6"];
        let params = parse_go(&tokens);
        assert_eq!(params.depth, Some(6));
    }

    #[test]
    fn test_parse_go_time() {
        let tokens = vec!["go", "wtime", "60000", "btime", "60000", "winc", "1000", "binc", "1000"];
        let params = parse_go(&tokens);
        assert_eq!(params.wtime_ms, Some(60000));
        assert_eq!(params.btime_ms, Some(60000));
        assert_eq!(params.winc_ms, Some(1000));
        assert_eq!(params.binc_ms, Some(1000));
    }

    #[test]
    fn test_resolve_time_control_movetime_divides_early_game() {
        let board = Board::default(); // fullmove 1, within the "very early" window
        let mut go = GoParams::new();
        go.movetime_ms = Some(4000);
        match resolve_time_control(&go, &board) {
            TimeControl::Movetime(secs) => assert!((secs - 0.1).abs() < 1e-9),
            _ => panic!("expected Movetime"),
        }
    }

    #[test]
    fn test_resolve_time_control_movetime_used_as_is_later() {
        let board = Board::from_str("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 5").unwrap();
        let mut go = GoParams::new();
        go.movetime_ms = Some(4000);
        match resolve_time_control(&go, &board) {
            TimeControl::Movetime(secs) => assert!((secs - 4.0).abs() < 1e-9),
            _ => panic!("expected Movetime"),
        }
    }

    #[test]
    fn test_resolve_time_control_clock() {
        let board = Board::default();
        let mut go = GoParams::new();
        go.wtime_ms = Some(60000);
        go.winc_ms = Some(1000);
        match resolve_time_control(&go, &board) {
            TimeControl::Clock { total, increment } => {
                assert!((total - 60.0).abs() < 1e-9);
                assert!((increment - 1.0).abs() < 1e-9);
            }
            _ => panic!("expected Clock"),
        }
    }

    #[test]
    fn test_parse_setoption_depth() {
        let mut depth = DEFAULT_DEPTH;
        let tokens = vec!["setoption", "name", "Depth", "value", "8"];
        parse_setoption(&tokens, &mut depth);
        assert_eq!(depth, 8);
    }

    #[test]
    fn test_parse_uci_move_basic() {
        let board = Board::default();
        let mv = parse_uci_move(&board, "e2e4");
        assert!(mv.is_some());
    }

    #[test]
    fn test_parse_uci_move_invalid() {
        let board = Board::default();
        let mv = parse_uci_move(&board, "e2e5");
        assert!(mv.is_none());
    }

    #[test]
    fn test_parse_uci_move_promotion() {
        let board = Board::from_str("8/P7/8/8/8/8/8/K6k w - - 0 1").unwrap();
        let mv = parse_uci_move(&board, "a7a8q");
        assert!(mv.is_some());
        assert_eq!(mv.unwrap().get_promotion(), Some(Piece::Queen));
    }

    #[test]
    fn test_format_score_mate() {
        assert_eq!(format_score(CHECKMATE_BASE + 3), "score mate 1");
        assert_eq!(format_score(-(CHECKMATE_BASE + 3)), "score mate -1");
        assert_eq!(format_score(100), "score cp 100");
    }
}
