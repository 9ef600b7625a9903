use crate::board::ChessMove;

pub type Score = i32;

/// Magnitude reserved for a forced mate. A mate found at remaining depth `d` and
/// quiescence depth `q` is reported as `CHECKMATE_BASE + q + d` so that shallower
/// mates dominate deeper ones from the winning side's perspective.
pub const CHECKMATE_BASE: Score = 1_000_000;

/// Score returned for a rule-claimed draw (threefold repetition, fifty-move) found
/// while exploring. Terminal stalemates surfaced by `board.status()` score 0 instead.
pub const DRAW_SCORE: Score = -1;

pub const MAX_PLY: usize = 128;
pub const SCORE_INFINITY: Score = CHECKMATE_BASE + MAX_PLY as Score + 1;

pub const DEFAULT_DEPTH: u8 = 5;

/// How deep quiescence search is allowed to run past the nominal horizon.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QDepthPolicy {
    /// Quiescence search is skipped entirely; leaves return the stand-pat score.
    Removed,
    /// `base_depth / 2 + 2`, a shallow tactical extension.
    Restricted,
    /// A large constant, effectively uncapped.
    Unrestricted,
}

impl QDepthPolicy {
    /// Resolve this policy into a concrete q_depth for a given nominal search depth.
    pub fn resolve(self, base_depth: u8) -> u8 {
        match self {
            QDepthPolicy::Removed => 0,
            QDepthPolicy::Restricted => base_depth / 2 + 2,
            QDepthPolicy::Unrestricted => 64,
        }
    }
}

pub struct EngineConfig {
    pub max_depth: u8,
    pub q_depth_policy: QDepthPolicy,
    pub iterative_deepening: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_DEPTH,
            q_depth_policy: QDepthPolicy::Unrestricted,
            iterative_deepening: true,
        }
    }
}

impl EngineConfig {
    /// Validate configuration knobs; rejects invalid values before search begins.
    pub fn validate(&self) -> Result<(), crate::error::EngineError> {
        if self.max_depth < 1 || self.max_depth > 20 {
            return Err(crate::error::EngineError::InvalidConfiguration(format!(
                "max_depth must be in 1..=20, got {}",
                self.max_depth
            )));
        }
        Ok(())
    }
}

pub struct SearchResult {
    pub best_move: Option<ChessMove>,
    pub score: Score,
    pub depth: u8,
    pub nodes: u64,
}
