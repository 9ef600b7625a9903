use crate::board::{Color, Piece, Square};
use crate::phase::Phase;
use crate::types::Score;

pub const PAWN: usize = 0;
pub const KNIGHT: usize = 1;
pub const BISHOP: usize = 2;
pub const ROOK: usize = 3;
pub const QUEEN: usize = 4;
pub const KING: usize = 5;

/// Maps a Piece to its PST/value-table index (0-5).
pub fn piece_index(piece: Piece) -> usize {
    match piece {
        Piece::Pawn => PAWN,
        Piece::Knight => KNIGHT,
        Piece::Bishop => BISHOP,
        Piece::Rook => ROOK,
        Piece::Queen => QUEEN,
        Piece::King => KING,
    }
}

/// Material value in centipawns, indexed by `piece_index`.
pub const PIECE_VALUE: [Score; 6] = [100, 300, 320, 500, 900, 0];

pub fn piece_value(piece: Piece) -> Score {
    PIECE_VALUE[piece_index(piece)]
}

/// Victim value used by MVV-LVA, indexed by `piece_index`. Same magnitudes as
/// `PIECE_VALUE`; kept as a separate name because move ordering and static
/// evaluation are conceptually distinct consumers even though the numbers agree.
pub const MVV_VALUE: [Score; 6] = PIECE_VALUE;

/// Bonus added to a capture's ordering key when it also gives check.
pub const CHECK_BONUS: Score = 100;

#[rustfmt::skip]
const PAWN_OPENING_TABLE: [Score; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 40, 35, 35, 40, 50, 50,
    10, 10, 30, 35, 35, 30, 10, 10,
     5,  5, 10, 35, 35, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const PAWN_MID_TABLE: [Score; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const PAWN_END_TABLE: [Score; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 60, 60, 50, 50, 50,
    10, 10, 30, 35, 35, 30, 10, 10,
     5,  5, 15, 25, 25, 15,  5,  5,
     0,  0, 10, 20, 20, 10,  0,  0,
     5,  5,  5,  5,  5,  5,  5,  5,
    10, 10, 10,-10,-10, 10, 10, 10,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [Score; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [Score; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_OPENING_TABLE: [Score; 64] = [
     1,  0,  0,  2,  2,  0,  0,  1,
    -5, -2, -2,  0,  0, -2, -2, -5,
    -5, -5, -5, -5, -5, -5, -5, -5,
    -5, -5, -5, -5, -5, -5, -5, -5,
     0,  0,  5, 10, 10,  5,  0,  0,
     5, 10, 15, 20, 20, 15, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const ROOK_TABLE: [Score; 64] = [
     0,  0,  0,  5,  5,  0,  0,  0,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     5, 10, 10, 10, 10, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [Score; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  0,  5,  5,  5,  5,  0,-10,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_MID_TABLE: [Score; 64] = [
     20, 30, 10,  0,  0, 10, 30, 20,
     20, 20,  0,  0,  0,  0, 20, 20,
    -10,-20,-20,-20,-20,-20,-20,-10,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
];

#[rustfmt::skip]
const KING_END_TABLE: [Score; 64] = [
    -50,-30,-30,-30,-30,-30,-30,-50,
    -30,-30,  0,  0,  0,  0,-30,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-20,-10,  0,  0,-10,-20,-30,
    -50,-40,-30,-20,-20,-30,-40,-50,
];

/// `TABLES[phase][piece_index]` gives the 64-entry table for that (piece, phase)
/// pair. Authored from White's perspective with rank 1 first (index 0 = a1).
///
/// The source material defines 10 distinct arrays, not 18: Knight, Bishop and
/// Queen use one table across all three phases; the Rook has a distinct opening
/// table but shares one table between midgame and endgame; the King has one
/// table for opening+midgame and a distinct endgame table. Only the Pawn has
/// three genuinely distinct tables. The lookup below is still `[phase][piece]`
/// (18 logical slots) so the evaluator never branches on phase/piece — it just
/// happens that several slots point at the same underlying array.
const TABLES: [[&[Score; 64]; 6]; 3] = [
    // Opening
    [
        &PAWN_OPENING_TABLE,
        &KNIGHT_TABLE,
        &BISHOP_TABLE,
        &ROOK_OPENING_TABLE,
        &QUEEN_TABLE,
        &KING_MID_TABLE,
    ],
    // Midgame
    [
        &PAWN_MID_TABLE,
        &KNIGHT_TABLE,
        &BISHOP_TABLE,
        &ROOK_TABLE,
        &QUEEN_TABLE,
        &KING_MID_TABLE,
    ],
    // Endgame
    [
        &PAWN_END_TABLE,
        &KNIGHT_TABLE,
        &BISHOP_TABLE,
        &ROOK_TABLE,
        &QUEEN_TABLE,
        &KING_END_TABLE,
    ],
];

fn phase_index(phase: Phase) -> usize {
    match phase {
        Phase::Opening => 0,
        Phase::Midgame => 1,
        Phase::Endgame => 2,
    }
}

/// Look up the PST bonus for `piece` of `color` on `square`, at the given `phase`.
/// Black squares are mirrored vertically before lookup since every table is
/// authored from White's perspective.
pub fn lookup(piece: Piece, color: Color, square: Square, phase: Phase) -> Score {
    let table = TABLES[phase_index(phase)][piece_index(piece)];
    let sq = if color == Color::White {
        square
    } else {
        square.mirror()
    };
    table[sq.to_index()]
}
