use crate::board::{Board, Color, Piece};

/// Coarse stage classification used to select which piece-square tables apply.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Opening,
    Midgame,
    Endgame,
}

/// Non-pawn material (centipawns) below which the side is considered to have
/// entered an endgame.
const ENDGAME_MATERIAL_THRESHOLD: i32 = 1300;

fn non_pawn_material(board: &Board, color: Color) -> i32 {
    let pieces = board.color_combined(color);
    let mut total = 0;
    for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
        let count = (pieces & board.pieces(piece)).popcnt() as i32;
        total += count * crate::pst::piece_value(piece);
    }
    total
}

/// Classify a position's phase, ignoring any latch. Rules evaluated in order:
/// opponent's non-pawn material at or below the threshold wins as `Endgame`,
/// otherwise the fullmove number distinguishes `Opening` from `Midgame`.
fn calculate_phase_raw(board: &Board) -> Phase {
    let opponent = !board.side_to_move();
    if non_pawn_material(board, opponent) <= ENDGAME_MATERIAL_THRESHOLD {
        return Phase::Endgame;
    }
    if board.fullmove_number() <= 10 {
        Phase::Opening
    } else {
        Phase::Midgame
    }
}

/// Tracks the game's phase across many calls to `calculate_phase`. Holds the
/// `Endgame` latch: once entered, endgame never regresses even if material is
/// later regenerated (e.g. by underpromotion).
pub struct PhaseTracker {
    last_phase: Phase,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            last_phase: Phase::Opening,
        }
    }

    /// Compute the phase for `board`, honoring the endgame latch and updating
    /// the tracker's internal state.
    pub fn calculate_phase(&mut self, board: &Board) -> Phase {
        if self.last_phase == Phase::Endgame {
            return Phase::Endgame;
        }
        let phase = calculate_phase_raw(board);
        if phase != self.last_phase {
            log::info!("phase transition: {:?} -> {:?}", self.last_phase, phase);
            self.last_phase = phase;
        }
        phase
    }

    pub fn get_phase(&self) -> Phase {
        self.last_phase
    }

    /// Reset to `Opening`. For tests and manual resets between games.
    pub fn set_phase(&mut self, phase: Phase) {
        self.last_phase = phase;
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}
