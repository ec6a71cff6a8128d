//! Play session - the puzzle state machine
//!
//! `Idle -> Playing -> {Win, Lose}`. A session owns exactly one
//! [`RuntimeLevel`] at a time together with its undo history and tool
//! inventory. Every operation returns a `Result`; a failed call leaves the
//! session as it was, with one exception noted on [`ToolKind::Undo`].

use thiserror::Error;

use crate::level::{LevelError, RuntimeLevel};
use crate::rng::SimpleRng;
use crate::rules::{self, Elimination, Move, MoveError};
use crate::snapshot::SessionSnapshot;
use crate::storage::{self, KeyValueStore};
use crate::types::{
    DefinitionError, GameState, GoalPlacement, LevelDefinition, MoveRecord, SessionConfig,
    ToolCounts, ToolKind, TOOL_KIND_COUNT, UNUSED_TOOL_BONUS,
};

/// Remaining uses per tool for the current attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolInventory {
    counts: [u32; TOOL_KIND_COUNT],
}

impl ToolInventory {
    pub fn from_counts(counts: ToolCounts) -> Self {
        Self {
            counts: ToolKind::ALL.map(|k| counts.get(k)),
        }
    }

    pub fn get(&self, kind: ToolKind) -> u32 {
        self.counts[kind.index()]
    }

    pub fn total_remaining(&self) -> u32 {
        self.counts.iter().fold(0u32, |acc, &n| acc.saturating_add(n))
    }

    pub fn as_pairs(&self) -> [(ToolKind, u32); TOOL_KIND_COUNT] {
        ToolKind::ALL.map(|k| (k, self.get(k)))
    }

    pub(crate) fn add(&mut self, kind: ToolKind, uses: u32) -> u32 {
        let slot = &mut self.counts[kind.index()];
        *slot = slot.saturating_add(uses);
        *slot
    }

    pub(crate) fn consume(&mut self, kind: ToolKind) -> bool {
        let slot = &mut self.counts[kind.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

/// Indexed access to designed levels held by the host
pub trait LevelSource {
    fn level(&self, index: usize) -> Option<LevelDefinition>;
}

impl LevelSource for [LevelDefinition] {
    fn level(&self, index: usize) -> Option<LevelDefinition> {
        self.get(index).cloned()
    }
}

impl LevelSource for Vec<LevelDefinition> {
    fn level(&self, index: usize) -> Option<LevelDefinition> {
        self.get(index).cloned()
    }
}

/// Most recent notable transition (consumed by observers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LevelStarted { goal_box_id: u32 },
    Moved { from: usize, to: usize, box_id: u32 },
    Cleared { boxes: usize, score: u32 },
    ToolUsed { kind: ToolKind },
    AdBonusClaimed { kind: ToolKind },
    Won { reward: u32 },
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no attempts left for day {day} (limit {limit})")]
    NoAttemptsLeft { day: u32, limit: u32 },
    #[error("level {index} not found")]
    UnknownLevel { index: usize },
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error(transparent)]
    Level(#[from] LevelError),
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::NoAttemptsLeft { .. } => "no_attempts_left",
            SessionError::UnknownLevel { .. } => "unknown_level",
            SessionError::Definition(_) => "invalid_definition",
            SessionError::Level(e) => e.code(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("no level is being played")]
    NotPlaying,
    #[error("no {} uses left", .kind.as_str())]
    Unavailable { kind: ToolKind },
    #[error("tool needs a target shelf")]
    MissingShelf,
    #[error("shelf {index} does not exist")]
    InvalidShelf { index: usize },
    #[error("shelf {index} is empty")]
    EmptyShelf { index: usize },
    #[error("no move to undo")]
    NothingToUndo,
    #[error("undo record {record:?} no longer matches the shelves")]
    UndoMismatch { record: MoveRecord },
    #[error("goal already found")]
    GoalAlreadyFound,
    #[error("level has no goal box")]
    NoGoal,
    #[error("no ad bonus left")]
    AdBonusExhausted,
}

impl ToolError {
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::NotPlaying => "not_playing",
            ToolError::Unavailable { .. } | ToolError::AdBonusExhausted => "tool_unavailable",
            ToolError::MissingShelf | ToolError::InvalidShelf { .. } => "invalid_shelf",
            ToolError::EmptyShelf { .. } => "empty_shelf",
            ToolError::NothingToUndo => "nothing_to_undo",
            ToolError::UndoMismatch { .. } => "undo_mismatch",
            ToolError::GoalAlreadyFound | ToolError::NoGoal => "goal_unavailable",
        }
    }
}

/// Result of a successful player move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub record: MoveRecord,
    pub elimination: Elimination,
    pub state: GameState,
}

/// Result of a successful tool use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOutcome {
    Revealed { shelf: usize, boxes: usize },
    Undone { record: MoveRecord },
    Hint { shelf: usize },
}

pub struct PuzzleSession<S: KeyValueStore> {
    config: SessionConfig,
    store: S,
    rng: SimpleRng,
    state: GameState,
    level: Option<RuntimeLevel>,
    history: Vec<MoveRecord>,
    tools: ToolInventory,
    last_hint: Option<usize>,
    last_event: Option<SessionEvent>,
    last_reward: Option<u32>,
}

impl<S: KeyValueStore> PuzzleSession<S> {
    pub fn new(config: SessionConfig, store: S, seed: u64) -> Self {
        Self {
            config,
            store,
            rng: SimpleRng::new(seed),
            state: GameState::Idle,
            level: None,
            history: Vec::new(),
            tools: ToolInventory::default(),
            last_hint: None,
            last_event: None,
            last_reward: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn level(&self) -> Option<&RuntimeLevel> {
        self.level.as_ref()
    }

    pub fn tools(&self) -> &ToolInventory {
        &self.tools
    }

    pub fn last_hint(&self) -> Option<usize> {
        self.last_hint
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn score(&self) -> u32 {
        self.level.as_ref().map(|l| l.score()).unwrap_or(0)
    }

    /// Reward granted by the most recent win
    pub fn last_reward(&self) -> Option<u32> {
        self.last_reward
    }

    pub fn last_event(&self) -> Option<SessionEvent> {
        self.last_event
    }

    pub fn take_last_event(&mut self) -> Option<SessionEvent> {
        self.last_event.take()
    }

    pub fn total_points(&self) -> u64 {
        storage::total_points(&self.store)
    }

    pub fn attempts_remaining(&self, day: u32) -> u32 {
        self.config
            .daily_attempt_limit
            .saturating_sub(storage::attempts_used(&self.store, day))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Start an attempt at `def`, consuming one of today's attempts
    ///
    /// Allowed from any state. Nothing changes unless the definition is valid,
    /// an attempt is left for `day`, and the goal can be placed.
    pub fn try_start_level(
        &mut self,
        def: &LevelDefinition,
        placement: GoalPlacement,
        day: u32,
    ) -> Result<u32, SessionError> {
        def.validate(self.config.group_size)?;
        if self.attempts_remaining(day) == 0 {
            return Err(SessionError::NoAttemptsLeft {
                day,
                limit: self.config.daily_attempt_limit,
            });
        }

        let mut level = RuntimeLevel::build(def)?.with_ad_bonus(self.config.ad_bonus_uses);
        let goal_box_id = level.place_goal(placement, &mut self.rng)?;

        storage::record_attempt(&mut self.store, day);
        self.level = Some(level);
        self.state = GameState::Playing;
        self.history.clear();
        self.tools = ToolInventory::from_counts(self.config.starting_tools);
        self.last_hint = None;
        self.last_reward = None;
        self.last_event = Some(SessionEvent::LevelStarted { goal_box_id });
        Ok(goal_box_id)
    }

    pub fn try_start_level_index<L: LevelSource + ?Sized>(
        &mut self,
        source: &L,
        index: usize,
        placement: GoalPlacement,
        day: u32,
    ) -> Result<u32, SessionError> {
        let def = source
            .level(index)
            .ok_or(SessionError::UnknownLevel { index })?;
        self.try_start_level(&def, placement, day)
    }

    /// Move the top box of `from` onto `to`
    pub fn try_move_top_box(&mut self, from: usize, to: usize) -> Result<MoveOutcome, MoveError> {
        if self.state != GameState::Playing {
            return Err(MoveError::NotPlaying);
        }
        let level = self.level.as_mut().ok_or(MoveError::NotPlaying)?;
        let applied = rules::apply_move(level, from, to)?;

        let record = MoveRecord {
            from_shelf: from,
            to_shelf: to,
            box_id: applied.box_id,
        };
        self.history.push(record);
        self.last_event = Some(if applied.elimination.is_empty() {
            SessionEvent::Moved {
                from,
                to,
                box_id: applied.box_id,
            }
        } else {
            SessionEvent::Cleared {
                boxes: applied.elimination.boxes_cleared(),
                score: applied.elimination.score,
            }
        });

        let state = self.check_end_state();
        Ok(MoveOutcome {
            record,
            elimination: applied.elimination,
            state,
        })
    }

    /// Settle Win/Lose after a move; grants and persists the reward on a win
    pub fn check_end_state(&mut self) -> GameState {
        if self.state != GameState::Playing {
            return self.state;
        }
        let Some(level) = self.level.as_ref() else {
            return self.state;
        };

        if level.goal_found() {
            let reward = level
                .reward_score()
                .saturating_add(level.score())
                .saturating_add(UNUSED_TOOL_BONUS.saturating_mul(self.tools.total_remaining()));
            storage::add_points(&mut self.store, reward);
            self.state = GameState::Win;
            self.last_reward = Some(reward);
            self.last_event = Some(SessionEvent::Won { reward });
        } else if !rules::has_valid_move(level) {
            self.state = GameState::Lose;
            self.last_event = Some(SessionEvent::Lost);
        }
        self.state
    }

    /// Apply a tool; the use is only spent on success
    ///
    /// [`ToolKind::Undo`] pops the last record before checking it. A record
    /// that no longer matches the shelves is dropped and reported as
    /// [`ToolError::UndoMismatch`]. Undo never re-runs elimination.
    pub fn use_tool(
        &mut self,
        kind: ToolKind,
        shelf: Option<usize>,
    ) -> Result<ToolOutcome, ToolError> {
        if self.state != GameState::Playing {
            return Err(ToolError::NotPlaying);
        }
        if self.tools.get(kind) == 0 {
            return Err(ToolError::Unavailable { kind });
        }
        let level = self.level.as_mut().ok_or(ToolError::NotPlaying)?;

        let outcome = match kind {
            ToolKind::RevealShelf => {
                let index = shelf.ok_or(ToolError::MissingShelf)?;
                let target = level
                    .shelves_mut()
                    .get_mut(index)
                    .ok_or(ToolError::InvalidShelf { index })?;
                if target.is_empty() {
                    return Err(ToolError::EmptyShelf { index });
                }
                let boxes = target.reveal_all();
                ToolOutcome::Revealed {
                    shelf: index,
                    boxes,
                }
            }
            ToolKind::Undo => {
                let record = self.history.pop().ok_or(ToolError::NothingToUndo)?;
                let matches = level
                    .shelf(record.to_shelf)
                    .and_then(|s| s.top())
                    .is_some_and(|b| b.id == record.box_id)
                    && level
                        .shelf(record.from_shelf)
                        .is_some_and(|s| !s.is_full());
                if !matches {
                    return Err(ToolError::UndoMismatch { record });
                }
                rules::transfer_top(level, record.to_shelf, record.from_shelf)
                    .ok_or(ToolError::UndoMismatch { record })?;
                ToolOutcome::Undone { record }
            }
            ToolKind::GoalHint => {
                if level.goal_found() {
                    return Err(ToolError::GoalAlreadyFound);
                }
                let index = level.goal_shelf().ok_or(ToolError::NoGoal)?;
                self.last_hint = Some(index);
                ToolOutcome::Hint { shelf: index }
            }
        };

        self.tools.consume(kind);
        self.last_event = Some(SessionEvent::ToolUsed { kind });
        Ok(outcome)
    }

    /// Spend one ad bonus on an extra use of `kind`; returns the new count
    pub fn try_claim_ad_bonus(&mut self, kind: ToolKind) -> Result<u32, ToolError> {
        if self.state != GameState::Playing {
            return Err(ToolError::NotPlaying);
        }
        let level = self.level.as_mut().ok_or(ToolError::NotPlaying)?;
        if !level.spend_ad_bonus() {
            return Err(ToolError::AdBonusExhausted);
        }
        self.last_event = Some(SessionEvent::AdBonusClaimed { kind });
        Ok(self.tools.add(kind, 1))
    }

    pub fn valid_moves(&self) -> Vec<Move> {
        self.level
            .as_ref()
            .map(rules::valid_moves)
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            shelves: SessionSnapshot::shelves_of(self.level.as_ref(), self.last_hint),
            tools: self.tools.as_pairs(),
            last_hint: self.last_hint,
            score: self.score(),
            total_points: self.total_points(),
            undo_depth: self.history.len(),
            ad_bonus_remaining: self
                .level
                .as_ref()
                .map(|l| l.ad_bonus_remaining())
                .unwrap_or(0),
        }
    }
}
