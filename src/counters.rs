/// Positions examined and alpha-beta cutoffs, tracked both per find-best-move call
/// and cumulatively across a game. Incremented inside negamax and qsearch.
#[derive(Clone, Copy, Debug, Default)]
pub struct Counters {
    pub positions_evaluated: u64,
    pub cutoffs: u64,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.positions_evaluated = 0;
        self.cutoffs = 0;
    }

    pub fn record_position(&mut self) {
        self.positions_evaluated += 1;
    }

    pub fn record_cutoff(&mut self) {
        self.cutoffs += 1;
    }

    fn merge_from(&mut self, other: Counters) {
        self.positions_evaluated += other.positions_evaluated;
        self.cutoffs += other.cutoffs;
    }
}

/// Owns the per-move counters for one `find_best_move` call and the cumulative
/// totals for the game they belong to.
pub struct CounterSet {
    per_move: Counters,
    cumulative: Counters,
}

impl CounterSet {
    pub fn new() -> Self {
        Self {
            per_move: Counters::new(),
            cumulative: Counters::new(),
        }
    }

    pub fn per_move(&mut self) -> &mut Counters {
        &mut self.per_move
    }

    pub fn get(&self) -> (u64, u64) {
        (self.cumulative.positions_evaluated, self.cumulative.cutoffs)
    }

    /// Called when the driver commits to a move: folds the per-move counters into
    /// the cumulative totals and resets the per-move set for the next call.
    pub fn commit_move(&mut self) {
        let finished = self.per_move;
        self.cumulative.merge_from(finished);
        self.per_move.reset();
    }

    /// Reset between games.
    pub fn reset_game(&mut self) {
        self.cumulative.reset();
        self.per_move.reset();
    }
}

impl Default for CounterSet {
    fn default() -> Self {
        Self::new()
    }
}
