use crate::board::{Board, BoardStatus, Color, ALL_SQUARES};
use crate::phase::{Phase, PhaseTracker};
use crate::pst;
use crate::types::{Score, CHECKMATE_BASE};

/// Endgame incentive applied only when the phase is `Endgame`: encourages driving
/// the enemy king to the edge as material thins out.
fn endgame_incentive(board: &Board) -> Score {
    let white_king = board.king_square(Color::White);
    let black_king = board.king_square(Color::Black);
    50 - white_king.distance(black_king) as Score
}

/// Static evaluation of `board`, from the perspective of the side to move
/// (positive = good for the mover). Consults `tracker` for the current phase;
/// does not itself decide whether the phase has changed beyond that one call.
pub fn evaluate(board: &Board, tracker: &mut PhaseTracker) -> Score {
    match board.status() {
        BoardStatus::Checkmate => return -CHECKMATE_BASE,
        BoardStatus::Stalemate => return 0,
        BoardStatus::Ongoing => {}
    }

    let phase = tracker.calculate_phase(board);

    let mut material: Score = 0;
    let mut pst_sum: Score = 0;

    for sq in ALL_SQUARES {
        if let Some(piece) = board.piece_on(sq) {
            let color = board.color_on(sq).unwrap();
            let sign: Score = if color == Color::White { 1 } else { -1 };
            material += sign * pst::piece_value(piece);
            pst_sum += sign * pst::lookup(piece, color, sq, phase);
        }
    }

    let mut total = material + pst_sum;
    if phase == Phase::Endgame {
        total += endgame_incentive(board);
    }

    if board.side_to_move() == Color::White {
        total
    } else {
        -total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn init() {
        crate::board::init();
    }

    #[test]
    fn test_startpos_near_zero() {
        init();
        let board = Board::default();
        let mut tracker = PhaseTracker::new();
        let score = evaluate(&board, &mut tracker);
        assert!(score.abs() < 100, "Startpos score {} is too far from 0", score);
    }

    #[test]
    fn test_white_up_queen() {
        init();
        let board = Board::from_str("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .unwrap();
        let mut tracker = PhaseTracker::new();
        let score = evaluate(&board, &mut tracker);
        assert!(score > 800, "White up a queen should score high, got {}", score);
    }

    #[test]
    fn test_black_up_queen() {
        init();
        let board = Board::from_str("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR b KQkq - 0 1")
            .unwrap();
        let mut tracker = PhaseTracker::new();
        let score = evaluate(&board, &mut tracker);
        assert!(score > 800, "Black up a queen (black to move) should be positive, got {}", score);
    }

    #[test]
    fn test_checkmate_is_negative_checkmate_base() {
        init();
        // Black to move and checkmated (fool's-mate-style position)
        let board = Board::from_str("rnbqkbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
        let mut tracker = PhaseTracker::new();
        let score = evaluate(&board, &mut tracker);
        assert_eq!(score, -CHECKMATE_BASE);
    }

    #[test]
    fn test_endgame_king_distance_incentive() {
        init();
        // Bare kings, far apart -> phase is Endgame, incentive applies
        let close = Board::from_str("8/8/8/3k4/3K4/8/8/8 w - - 0 1").unwrap();
        let far = Board::from_str("k7/8/8/8/8/8/8/7K w - - 0 1").unwrap();
        let mut tracker_close = PhaseTracker::new();
        let mut tracker_far = PhaseTracker::new();
        let score_close = evaluate(&close, &mut tracker_close);
        let score_far = evaluate(&far, &mut tracker_far);
        assert!(score_close > score_far, "Closer kings should score higher in a bare-king endgame");
    }

    #[test]
    fn test_deterministic() {
        init();
        let board = Board::default();
        let mut t1 = PhaseTracker::new();
        let mut t2 = PhaseTracker::new();
        assert_eq!(evaluate(&board, &mut t1), evaluate(&board, &mut t2));
    }
}
