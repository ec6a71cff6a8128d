//! Move policies for headless playouts

use cat_shelf_core::{predicted_run_len, valid_moves, Move, RuntimeLevel, SimpleRng};
use cat_shelf_types::MIN_RUN_LEN;

/// Chooses the next move for a level, or `None` when no legal move exists
///
/// Object-safe so playouts can take `&mut dyn Policy`.
pub trait Policy {
    fn choose_move(&mut self, level: &RuntimeLevel) -> Option<Move>;
}

/// Prefers moves that clear a run on landing; ties broken by the rng
#[derive(Debug, Clone)]
pub struct GreedyPolicy {
    rng: SimpleRng,
}

impl GreedyPolicy {
    pub fn new(rng: SimpleRng) -> Self {
        Self { rng }
    }
}

impl Policy for GreedyPolicy {
    fn choose_move(&mut self, level: &RuntimeLevel) -> Option<Move> {
        let moves = valid_moves(level);
        let rank = |mv: Move| {
            let run = predicted_run_len(level, mv);
            if run >= MIN_RUN_LEN {
                run
            } else {
                0
            }
        };
        let best = moves.iter().map(|&mv| rank(mv)).max()?;
        let top: Vec<Move> = moves.into_iter().filter(|&mv| rank(mv) == best).collect();
        self.rng.choose(&top).copied()
    }
}

/// Uniformly random legal move
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: SimpleRng,
}

impl RandomPolicy {
    pub fn new(rng: SimpleRng) -> Self {
        Self { rng }
    }
}

impl Policy for RandomPolicy {
    fn choose_move(&mut self, level: &RuntimeLevel) -> Option<Move> {
        let moves = valid_moves(level);
        self.rng.choose(&moves).copied()
    }
}
