//! Level production - generation, occlusion and solvability
//!
//! Everything here sits on top of `cat-shelf-core` and never mutates a level
//! definition it is handed. Randomness is threaded explicitly: generation takes
//! a caller-owned [`SimpleRng`](cat_shelf_core::SimpleRng), evaluation derives
//! one stream per playout from its base seed.
//!
//! - [`layout`]: group-of-four color layouts with no repeated color per shelf
//! - [`occlusion`]: spreading hidden boxes under the top-always-visible cap
//! - [`designer`]: layout plus occlusion into a [`LevelDefinition`](cat_shelf_types::LevelDefinition)
//! - [`policy`]: move choice for headless playouts
//! - [`evaluate`]: parallel greedy playouts and the difficulty estimate

pub mod designer;
pub mod evaluate;
pub mod layout;
pub mod occlusion;
pub mod policy;

pub use designer::{design_level, DesignError, DesignedLevel};
pub use evaluate::{
    difficulty_for_rate, play_out_with, EvaluateError, EvaluationReport, SolvabilityEvaluator,
};
pub use layout::{AttemptFailure, GenerationError, Layout, LayoutGenerator, LayoutParams};
pub use occlusion::{OcclusionAllocator, OcclusionError, OcclusionPlan};
pub use policy::{GreedyPolicy, Policy, RandomPolicy};
