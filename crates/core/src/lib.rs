//! Core puzzle logic - pure, deterministic, and testable
//!
//! This crate holds the rules of the shelf puzzle and the state a play session
//! mutates. It has **no dependencies** on rendering, input, platform SDKs or
//! I/O, which makes it:
//!
//! - **Deterministic**: every random choice draws from a caller-seeded [`SimpleRng`]
//! - **Testable**: persistence is an injected [`KeyValueStore`]
//! - **Portable**: the same rules drive the player session and headless playouts
//!
//! # Module Structure
//!
//! - [`rng`]: seedable generator and independent per-run streams
//! - [`shelf`]: boxes and capacity-bounded shelves
//! - [`level`]: building a [`RuntimeLevel`] from a level definition, goal placement
//! - [`rules`]: move legality, valid-move enumeration, elimination to fixpoint
//! - [`session`]: the `Idle -> Playing -> Win/Lose` state machine with tools and undo
//! - [`storage`]: daily attempt and point counters behind a key/value capability
//! - [`snapshot`]: what the UI layer observes
//!
//! # Game Rules
//!
//! - Only the top box of a shelf moves, and only onto an empty shelf or a
//!   shelf whose top has the same color
//! - A same-color run of three or more on any shelf clears immediately, scoring
//!   ten points per box
//! - Clearing the run that holds the goal box wins; running out of legal moves loses
//! - A shelf's top box is always visible
//!
//! # Example
//!
//! ```
//! use cat_shelf_core::{MemoryStore, PuzzleSession};
//! use cat_shelf_core::types::{
//!     BoxSlot, Color, GameState, GoalPlacement, LevelDefinition, SessionConfig, ShelfDefinition,
//! };
//!
//! let shelf = |colors: &[Color]| ShelfDefinition {
//!     capacity: 4,
//!     boxes: colors.iter().map(|&c| BoxSlot::visible(c)).collect(),
//! };
//! let def = LevelDefinition {
//!     reward_score: 50,
//!     shelves: vec![
//!         shelf(&[Color::Blue, Color::Red, Color::Red]),
//!         shelf(&[Color::Green, Color::Red]),
//!         shelf(&[Color::Blue, Color::Green]),
//!         shelf(&[Color::Blue]),
//!     ],
//!     ..Default::default()
//! };
//!
//! let mut session = PuzzleSession::new(SessionConfig::default(), MemoryStore::new(), 1);
//! session
//!     .try_start_level(&def, GoalPlacement::At { shelf: 1, depth: 0 }, 0)
//!     .unwrap();
//!
//! let outcome = session.try_move_top_box(1, 0).unwrap();
//! assert_eq!(outcome.elimination.score, 30);
//! assert_eq!(session.state(), GameState::Win);
//! ```

pub mod level;
pub mod rng;
pub mod rules;
pub mod session;
pub mod shelf;
pub mod snapshot;
pub mod storage;

pub use cat_shelf_types as types;

// Re-export commonly used types for convenience
pub use level::{LevelError, RuntimeLevel};
pub use rng::SimpleRng;
pub use rules::{
    apply_move, check_move, has_valid_move, predicted_run_len, resolve_eliminations, valid_moves,
    AppliedMove, ClearedRun, Elimination, Move, MoveError,
};
pub use session::{
    LevelSource, MoveOutcome, PuzzleSession, SessionError, SessionEvent, ToolError,
    ToolInventory, ToolOutcome,
};
pub use shelf::{BoxData, ShelfData};
pub use snapshot::{BoxView, SessionSnapshot, ShelfView};
pub use storage::{KeyValueStore, MemoryStore};
