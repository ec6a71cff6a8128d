//! Solvability estimation by greedy playouts
//!
//! Each run plays an independent copy of the level with its own rng stream,
//! so runs are spread over the rayon pool and the result only depends on the
//! definition and the base seed.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cat_shelf_core::{apply_move, LevelError, RuntimeLevel, SimpleRng};
use cat_shelf_types::{EvaluatorConfig, LevelDefinition, LIKELY_SOLVABLE_RATE, MIN_RUN_LEN};

use crate::policy::{GreedyPolicy, Policy};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub likely_solvable: bool,
    pub solvable_rate: f64,
    pub estimated_difficulty: u32,
}

impl EvaluationReport {
    pub fn from_rate(solvable_rate: f64) -> Self {
        Self {
            likely_solvable: solvable_rate >= LIKELY_SOLVABLE_RATE,
            solvable_rate,
            estimated_difficulty: difficulty_for_rate(solvable_rate),
        }
    }
}

/// `clamp(round((1 - rate) * 10), 1, 10)`
pub fn difficulty_for_rate(rate: f64) -> u32 {
    (((1.0 - rate) * 10.0).round() as i64).clamp(1, 10) as u32
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluateError {
    #[error("at least one simulation run is required")]
    ZeroRuns,
    #[error("level cannot be built: {0}")]
    Level(#[from] LevelError),
    #[error("evaluation cancelled")]
    Cancelled,
}

impl EvaluateError {
    pub fn code(&self) -> &'static str {
        match self {
            EvaluateError::ZeroRuns => "zero_runs",
            EvaluateError::Level(e) => e.code(),
            EvaluateError::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolvabilityEvaluator {
    config: EvaluatorConfig,
}

impl SolvabilityEvaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn evaluate(&self, def: &LevelDefinition) -> Result<EvaluationReport, EvaluateError> {
        self.evaluate_with_cancel(def, &AtomicBool::new(false))
    }

    /// Like [`evaluate`](Self::evaluate), but stops at the next run boundary
    /// once `cancel` is set
    pub fn evaluate_with_cancel(
        &self,
        def: &LevelDefinition,
        cancel: &AtomicBool,
    ) -> Result<EvaluationReport, EvaluateError> {
        if self.config.runs == 0 {
            return Err(EvaluateError::ZeroRuns);
        }
        let template = RuntimeLevel::build(def)?;

        let outcomes: Option<Vec<bool>> = (0..self.config.runs)
            .into_par_iter()
            .map(|run| {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                Some(self.play_out(&template, run))
            })
            .collect();
        let outcomes = outcomes.ok_or(EvaluateError::Cancelled)?;

        let successes = outcomes.iter().filter(|&&solved| solved).count();
        Ok(EvaluationReport::from_rate(
            successes as f64 / self.config.runs as f64,
        ))
    }

    /// One greedy playout on a copy of `template`; true when cleared within budget
    pub fn play_out(&self, template: &RuntimeLevel, run: u32) -> bool {
        let mut level = template.clone();
        let mut policy = GreedyPolicy::new(SimpleRng::stream(self.config.base_seed, run as u64));
        play_out_with(&mut level, &mut policy, self.config.move_budget)
    }
}

/// Drive `level` with `policy` for at most `budget` moves
///
/// A level counts as cleared once no color keeps enough boxes to form a run.
pub fn play_out_with(level: &mut RuntimeLevel, policy: &mut dyn Policy, budget: u32) -> bool {
    for _ in 0..budget {
        if level.is_cleared(MIN_RUN_LEN) {
            return true;
        }
        let Some(mv) = policy.choose_move(level) else {
            return false;
        };
        if apply_move(level, mv.from, mv.to).is_err() {
            return false;
        }
    }
    level.is_cleared(MIN_RUN_LEN)
}
