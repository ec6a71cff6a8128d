//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the puzzle core.
//! All types are plain data with `serde` derives so level-authoring tools and
//! storage layers can persist them in whatever format they own.
//!
//! # Rules Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `GROUP_SIZE` | 4 | Boxes per same-color group in generated layouts |
//! | `MIN_RUN_LEN` | 3 | Shortest same-color run that is eliminated |
//! | `POINTS_PER_CLEARED_BOX` | 10 | Score awarded per eliminated box |
//! | `UNUSED_TOOL_BONUS` | 10 | Reward per tool use left over on a win |
//! | `DEFAULT_SHELF_CAPACITY` | 4 | Capacity of extra shelves when a level has none |
//!
//! # Tuning Defaults
//!
//! - `DEFAULT_MAX_ATTEMPTS`: 500 layout attempts before generation gives up
//! - `DEFAULT_DAILY_ATTEMPT_LIMIT`: 5 level starts per day
//! - `DEFAULT_SIMULATION_RUNS` / `DEFAULT_MOVE_BUDGET`: 64 playouts of 200 moves
//! - `LIKELY_SOLVABLE_RATE`: 0.25
//!
//! # Examples
//!
//! ```
//! use cat_shelf_types::{Color, ToolKind, GameState, GROUP_SIZE};
//!
//! assert_eq!(Color::from_str("RED"), Some(Color::Red));
//! assert_eq!(ToolKind::from_str("undo"), Some(ToolKind::Undo));
//! assert!(GameState::Win.is_terminal());
//! assert_eq!(GROUP_SIZE, 4);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxes per same-color group produced by layout generation
pub const GROUP_SIZE: usize = 4;

/// Shortest same-color run that is eliminated automatically
pub const MIN_RUN_LEN: usize = 3;

/// Score awarded per eliminated box
pub const POINTS_PER_CLEARED_BOX: u32 = 10;

/// Reward granted on a win for every tool use left in the inventory
pub const UNUSED_TOOL_BONUS: u32 = 10;

/// Capacity used for extra empty shelves when a level defines no shelves
pub const DEFAULT_SHELF_CAPACITY: usize = 4;

/// Layout attempts before generation reports exhaustion
pub const DEFAULT_MAX_ATTEMPTS: u32 = 500;

/// Level starts allowed per day stamp
pub const DEFAULT_DAILY_ATTEMPT_LIMIT: u32 = 5;

/// Playouts per evaluation
pub const DEFAULT_SIMULATION_RUNS: u32 = 64;

/// Moves allowed per playout
pub const DEFAULT_MOVE_BUDGET: u32 = 200;

/// Solvable rate at or above which a level is reported as likely solvable
pub const LIKELY_SOLVABLE_RATE: f64 = 0.25;

/// Number of distinct colors
pub const COLOR_COUNT: usize = 8;

/// Number of distinct tools
pub const TOOL_KIND_COUNT: usize = 3;

/// Box colors
///
/// Ordered so iteration over colors is stable across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
}

impl Color {
    pub const ALL: [Color; COLOR_COUNT] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Cyan,
        Color::Blue,
        Color::Purple,
        Color::Pink,
    ];

    /// Dense index in `0..COLOR_COUNT`
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "orange" => Some(Color::Orange),
            "yellow" => Some(Color::Yellow),
            "green" => Some(Color::Green),
            "cyan" => Some(Color::Cyan),
            "blue" => Some(Color::Blue),
            "purple" => Some(Color::Purple),
            "pink" => Some(Color::Pink),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Cyan => "cyan",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Pink => "pink",
        }
    }
}

/// Player tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Reveal every box on one shelf
    RevealShelf,
    /// Reverse the last player move
    Undo,
    /// Point at the shelf holding the goal box
    GoalHint,
}

impl ToolKind {
    pub const ALL: [ToolKind; TOOL_KIND_COUNT] =
        [ToolKind::RevealShelf, ToolKind::Undo, ToolKind::GoalHint];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse from string (accepts snake_case or camelCase, case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "").as_str() {
            "revealshelf" | "reveal" => Some(ToolKind::RevealShelf),
            "undo" | "undomove" => Some(ToolKind::Undo),
            "goalhint" | "cathint" | "hint" => Some(ToolKind::GoalHint),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::RevealShelf => "reveal_shelf",
            ToolKind::Undo => "undo",
            ToolKind::GoalHint => "goal_hint",
        }
    }

    /// Whether the tool acts on a specific shelf
    pub fn needs_shelf(&self) -> bool {
        matches!(self, ToolKind::RevealShelf)
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    #[default]
    Idle,
    Playing,
    Win,
    Lose,
}

impl GameState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameState::Win | GameState::Lose)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::Idle => "idle",
            GameState::Playing => "playing",
            GameState::Win => "win",
            GameState::Lose => "lose",
        }
    }
}

/// Where the goal box goes when a level starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalPlacement {
    /// Uniformly among all boxes
    #[default]
    Random,
    /// A specific box; `depth` 0 is the top of the shelf
    At { shelf: usize, depth: usize },
}

/// One authored box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxSlot {
    pub color: Color,
    #[serde(default = "default_true")]
    pub start_visible: bool,
}

fn default_true() -> bool {
    true
}

impl BoxSlot {
    pub fn visible(color: Color) -> Self {
        Self {
            color,
            start_visible: true,
        }
    }

    pub fn hidden(color: Color) -> Self {
        Self {
            color,
            start_visible: false,
        }
    }
}

/// One authored shelf; `boxes` run bottom to top
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfDefinition {
    pub capacity: usize,
    #[serde(default)]
    pub boxes: Vec<BoxSlot>,
}

/// Design-time level, produced by the level designer or authored by hand
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDefinition {
    pub difficulty_rating: u32,
    pub reward_score: u32,
    pub only_top_visible: bool,
    pub extra_empty_shelves: usize,
    pub shelves: Vec<ShelfDefinition>,
}

/// Structural problems with a [`LevelDefinition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("total box count {total} is not a multiple of the group size {group_size}")]
    NotGroupMultiple { total: usize, group_size: usize },
    #[error("shelf {shelf} holds {boxes} boxes but has capacity {capacity}")]
    OverCapacity {
        shelf: usize,
        boxes: usize,
        capacity: usize,
    },
    #[error("shelf {shelf} has zero capacity")]
    ZeroCapacity { shelf: usize },
    #[error("group size must be positive")]
    ZeroGroupSize,
}

impl LevelDefinition {
    pub fn total_boxes(&self) -> usize {
        self.shelves.iter().map(|s| s.boxes.len()).sum()
    }

    /// Check capacity bounds and the group-multiple box count
    pub fn validate(&self, group_size: usize) -> Result<(), DefinitionError> {
        if group_size == 0 {
            return Err(DefinitionError::ZeroGroupSize);
        }
        for (shelf, def) in self.shelves.iter().enumerate() {
            if def.capacity == 0 {
                return Err(DefinitionError::ZeroCapacity { shelf });
            }
            if def.boxes.len() > def.capacity {
                return Err(DefinitionError::OverCapacity {
                    shelf,
                    boxes: def.boxes.len(),
                    capacity: def.capacity,
                });
            }
        }
        let total = self.total_boxes();
        if total % group_size != 0 {
            return Err(DefinitionError::NotGroupMultiple { total, group_size });
        }
        Ok(())
    }
}

/// One undoable player move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from_shelf: usize,
    pub to_shelf: usize,
    pub box_id: u32,
}

/// Palette entry; `display` is opaque to the core (a hex code, sprite name, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub color: Color,
    #[serde(default)]
    pub display: String,
}

/// Ordered set of enabled colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub entries: Vec<PaletteEntry>,
}

impl ColorPalette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    /// Palette enabling the given colors with empty display metadata
    pub fn from_colors(colors: &[Color]) -> Self {
        Self {
            entries: colors
                .iter()
                .map(|&color| PaletteEntry {
                    color,
                    display: String::new(),
                })
                .collect(),
        }
    }

    /// Enabled colors in palette order; repeats after the first are dropped
    pub fn enabled_colors(&self) -> Vec<Color> {
        let mut seen = [false; COLOR_COUNT];
        let mut out = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if !seen[entry.color.index()] {
                seen[entry.color.index()] = true;
                out.push(entry.color);
            }
        }
        out
    }

    pub fn contains(&self, color: Color) -> bool {
        self.entries.iter().any(|e| e.color == color)
    }

    pub fn display(&self, color: Color) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.color == color)
            .map(|e| e.display.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        const HEX: [&str; COLOR_COUNT] = [
            "#e74c3c", "#e67e22", "#f1c40f", "#2ecc71", "#1abc9c", "#3498db", "#9b59b6", "#fd79a8",
        ];
        Self {
            entries: Color::ALL
                .iter()
                .zip(HEX)
                .map(|(&color, hex)| PaletteEntry {
                    color,
                    display: hex.to_string(),
                })
                .collect(),
        }
    }
}

/// Starting tool uses for a level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolCounts {
    pub reveal_shelf: u32,
    pub undo: u32,
    pub goal_hint: u32,
}

impl ToolCounts {
    pub fn get(&self, kind: ToolKind) -> u32 {
        match kind {
            ToolKind::RevealShelf => self.reveal_shelf,
            ToolKind::Undo => self.undo,
            ToolKind::GoalHint => self.goal_hint,
        }
    }
}

impl Default for ToolCounts {
    fn default() -> Self {
        Self {
            reveal_shelf: 1,
            undo: 3,
            goal_hint: 1,
        }
    }
}

/// Parameters for generating one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutRequest {
    pub total_shelf_count: usize,
    pub empty_shelf_count: usize,
    pub total_box_count: usize,
    pub max_boxes_per_shelf: usize,
    pub shelf_capacity: usize,
    /// Fraction of boxes that start hidden, in `[0, 1]`
    pub hidden_fraction: f64,
    pub extra_empty_shelves: usize,
    pub reward_score: u32,
    pub difficulty_rating: u32,
}

impl Default for LayoutRequest {
    fn default() -> Self {
        Self {
            total_shelf_count: 8,
            empty_shelf_count: 0,
            total_box_count: 32,
            max_boxes_per_shelf: 4,
            shelf_capacity: 8,
            hidden_fraction: 0.0,
            extra_empty_shelves: 2,
            reward_score: 100,
            difficulty_rating: 1,
        }
    }
}

/// Per-session rules configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub group_size: usize,
    pub daily_attempt_limit: u32,
    pub starting_tools: ToolCounts,
    pub ad_bonus_uses: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            group_size: GROUP_SIZE,
            daily_attempt_limit: DEFAULT_DAILY_ATTEMPT_LIMIT,
            starting_tools: ToolCounts::default(),
            ad_bonus_uses: 1,
        }
    }
}

/// Solvability evaluation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub runs: u32,
    pub move_budget: u32,
    pub base_seed: u64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            runs: DEFAULT_SIMULATION_RUNS,
            move_budget: DEFAULT_MOVE_BUDGET,
            base_seed: 1,
        }
    }
}

/// Top-level configuration consumed from the hosting layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub palette: ColorPalette,
    pub group_size: usize,
    pub max_generation_attempts: u32,
    pub layout: LayoutRequest,
    pub session: SessionConfig,
    pub evaluator: EvaluatorConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            palette: ColorPalette::default(),
            group_size: GROUP_SIZE,
            max_generation_attempts: DEFAULT_MAX_ATTEMPTS,
            layout: LayoutRequest::default(),
            session: SessionConfig::default(),
            evaluator: EvaluatorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("group size must be positive")]
    ZeroGroupSize,
    #[error("session group size {session} differs from generation group size {generation}")]
    GroupSizeMismatch { session: usize, generation: usize },
    #[error("max generation attempts must be positive")]
    ZeroAttempts,
    #[error("palette has no colors")]
    EmptyPalette,
    #[error("evaluator needs at least one run")]
    ZeroRuns,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.group_size == 0 {
            return Err(ConfigError::ZeroGroupSize);
        }
        if self.session.group_size != self.group_size {
            return Err(ConfigError::GroupSizeMismatch {
                session: self.session.group_size,
                generation: self.group_size,
            });
        }
        if self.max_generation_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if self.evaluator.runs == 0 {
            return Err(ConfigError::ZeroRuns);
        }
        Ok(())
    }
}
